//! The dynamic value universe flowing through the engine.
//!
//! Subjects and expectation arguments are [`Value`]s: plain data, live
//! instances under specification, pending method calls, wrapped builder
//! objects, or lazily-constructed subjects.

use std::fmt;
use std::sync::Arc;

use crate::error::ExpectationError;

/// A dynamic value handed to matchers as a subject or argument.
#[derive(Clone)]
pub enum Value {
    /// Plain data: numbers, strings, bools, arrays, maps, null.
    Data(serde_json::Value),
    /// An instance under specification, with callable methods.
    Object(Arc<dyn SpecObject>),
    /// A pending invocation `receiver.method(args)`, used as the subject of
    /// throw/trigger expectations.
    Call(Arc<MethodCall>),
    /// A wrapped subject or expectation-builder; the unwrapper peels these.
    Wrapped(Box<Value>),
    /// A constructor-injected subject built on first use.
    Lazy(Arc<LazySubject>),
}

impl Value {
    /// Wrap a value the way the expectation-builder layer does.
    pub fn wrapped(inner: Value) -> Self {
        Value::Wrapped(Box::new(inner))
    }

    /// Describe a pending `receiver.method(args)` invocation.
    pub fn call(receiver: Value, method: impl Into<String>, args: Vec<Value>) -> Self {
        Value::Call(Arc::new(MethodCall {
            receiver,
            method: method.into(),
            args,
        }))
    }

    /// A subject whose construction is deferred until verification.
    pub fn lazy(
        type_name: impl Into<String>,
        factory: impl Fn() -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Value::Lazy(Arc::new(LazySubject {
            type_name: type_name.into(),
            factory: Box::new(factory),
        }))
    }

    /// The plain data payload, if this is a `Data` value.
    pub fn as_data(&self) -> Option<&serde_json::Value> {
        match self {
            Value::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Short label used in failure messages and event payloads.
    pub fn type_label(&self) -> String {
        match self {
            Value::Data(serde_json::Value::Null) => "null".into(),
            Value::Data(serde_json::Value::Bool(_)) => "bool".into(),
            Value::Data(serde_json::Value::Number(_)) => "number".into(),
            Value::Data(serde_json::Value::String(_)) => "string".into(),
            Value::Data(serde_json::Value::Array(_)) => "array".into(),
            Value::Data(serde_json::Value::Object(_)) => "map".into(),
            Value::Object(object) => object.type_name().to_string(),
            Value::Call(call) => format!("call of {}()", call.method),
            Value::Wrapped(inner) => inner.type_label(),
            Value::Lazy(lazy) => format!("lazy {}", lazy.type_name),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(data: serde_json::Value) -> Self {
        Value::Data(data)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Data(a), Value::Data(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Call(a), Value::Call(b)) => Arc::ptr_eq(a, b),
            (Value::Wrapped(a), Value::Wrapped(b)) => a == b,
            (Value::Lazy(a), Value::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Data(data) => write!(f, "Data({data})"),
            Value::Object(object) => write!(f, "Object(<{}>)", object.type_name()),
            Value::Call(call) => write!(f, "Call(<{}({} args)>)", call.method, call.args.len()),
            Value::Wrapped(inner) => write!(f, "Wrapped({inner:?})"),
            Value::Lazy(lazy) => write!(f, "Lazy(<{}>)", lazy.type_name),
        }
    }
}

/// An instance under specification.
///
/// The engine never downcasts subjects; everything it needs is behind this
/// capability-probe-plus-dispatch surface. `has_catch_all` reports whether the
/// instance routes unknown method names through a fallback dispatcher, in
/// which case `call` must accept any method name.
pub trait SpecObject: Send + Sync {
    /// Type name used in failure messages.
    fn type_name(&self) -> &str;

    /// Whether the instance exposes the named method.
    fn has_method(&self, name: &str) -> bool;

    /// Whether unknown method names are routed through a catch-all dispatcher.
    fn has_catch_all(&self) -> bool {
        false
    }

    /// Invoke a method. Spec'd code signals its own exceptions by returning
    /// [`ExpectationError::Raised`].
    fn call(&self, method: &str, args: &[Value]) -> Result<Value, ExpectationError>;
}

/// A pending `receiver.method(args)` invocation.
pub struct MethodCall {
    pub receiver: Value,
    pub method: String,
    pub args: Vec<Value>,
}

/// A subject whose constructor runs on first use and may itself raise.
pub struct LazySubject {
    type_name: String,
    factory: Box<dyn Fn() -> Result<Value, String> + Send + Sync>,
}

impl LazySubject {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Run the constructor. A factory error becomes `ConstructionFailed`.
    pub fn construct(&self) -> Result<Value, ExpectationError> {
        (self.factory)().map_err(|message| ExpectationError::ConstructionFailed {
            type_name: self.type_name.clone(),
            message,
        })
    }
}
