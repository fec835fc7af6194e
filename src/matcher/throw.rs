//! Exception matcher: `shouldThrow` / `shouldNotThrow`.
//!
//! The subject is a pending method call; the check runs deferred so the
//! expectation layer controls the moment the call executes. Up to two
//! arguments filter the raise: an exception kind, and a required substring of
//! its message.

use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::matcher::{Matcher, Polarity};
use crate::present::Presenter;
use crate::unwrap::Unwrapper;
use crate::value::{MethodCall, SpecObject, Value};

pub struct ThrowMatcher {
    presenter: Arc<dyn Presenter>,
    unwrapper: Unwrapper,
}

impl ThrowMatcher {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self {
            presenter,
            unwrapper: Unwrapper::new(),
        }
    }

    fn unpack_filters(args: &[Value]) -> Result<(Option<String>, Option<String>), ExpectationError> {
        if args.len() > 2 {
            return Err(ExpectationError::InvalidArgumentCount {
                matcher: "throw",
                max: 2,
                got: args.len(),
            });
        }
        let mut filters = args.iter().map(|arg| {
            arg.as_data()
                .and_then(|data| data.as_str())
                .map(str::to_string)
                .ok_or_else(|| ExpectationError::InvalidArgument {
                    detail: format!(
                        "throw matcher filters must be strings, got {}",
                        arg.type_label()
                    ),
                })
        });
        let kind = filters.next().transpose()?;
        let message = filters.next().transpose()?;
        Ok((kind, message))
    }

    fn filters_match(kind: &str, message: &str, filter: &(Option<String>, Option<String>)) -> bool {
        if let Some(expected_kind) = &filter.0 {
            if kind != expected_kind {
                return false;
            }
        }
        if let Some(expected_message) = &filter.1 {
            if !message.contains(expected_message.as_str()) {
                return false;
            }
        }
        true
    }

    fn build(
        &self,
        polarity: Polarity,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        let filter = Self::unpack_filters(args)?;
        let call = match subject {
            Value::Call(call) => call.clone(),
            other => {
                return Err(ExpectationError::InvalidArgument {
                    detail: format!(
                        "the throw matcher requires a pending method call subject, got {}",
                        other.type_label()
                    ),
                })
            }
        };

        let unwrapper = self.unwrapper;
        let presenter = self.presenter.clone();
        Ok(Some(DelayedCall::new(move || {
            let (receiver, method, call_args) = resolve_method_call(&call, unwrapper)?;
            let outcome = receiver.call(&method, &call_args);
            match (polarity, outcome) {
                (_, Err(ExpectationError::Raised { kind, message })) => {
                    let matched = Self::filters_match(&kind, &message, &filter);
                    match polarity {
                        Polarity::Positive if matched => Ok(Value::from(serde_json::Value::Null)),
                        Polarity::Positive => Err(ExpectationError::Failure(format!(
                            "expected {} to be raised, but got {kind}: {message}",
                            filter.0.as_deref().unwrap_or("an exception")
                        ))),
                        Polarity::Negative if matched => Err(ExpectationError::Failure(format!(
                            "did not expect {kind} to be raised, but got it: {message}"
                        ))),
                        Polarity::Negative => Ok(Value::from(serde_json::Value::Null)),
                    }
                }
                (Polarity::Positive, Ok(value)) => Err(ExpectationError::Failure(format!(
                    "expected {} to be raised, but {} was returned instead",
                    filter.0.as_deref().unwrap_or("an exception"),
                    presenter.present(&value)
                ))),
                (Polarity::Negative, Ok(value)) => Ok(value),
                (_, Err(other)) => Err(other),
            }
        })))
    }
}

/// Resolve a pending call against its receiver, probing method existence
/// before any side effect. Shared with the trigger matcher.
pub(crate) fn resolve_method_call(
    call: &MethodCall,
    unwrapper: Unwrapper,
) -> Result<(Arc<dyn SpecObject>, String, Vec<Value>), ExpectationError> {
    let receiver = match &call.receiver {
        Value::Object(object) => object.clone(),
        other => {
            return Err(ExpectationError::InvalidArgument {
                detail: format!(
                    "cannot invoke {}() on a {} value",
                    call.method,
                    other.type_label()
                ),
            })
        }
    };
    if !receiver.has_method(&call.method) && !receiver.has_catch_all() {
        return Err(ExpectationError::MethodNotFound {
            type_name: receiver.type_name().to_string(),
            method: call.method.clone(),
        });
    }
    let args = unwrapper.unwrap_all(call.args.clone());
    Ok((receiver, call.method.clone(), args))
}

impl Matcher for ThrowMatcher {
    fn name(&self) -> &'static str {
        "throw"
    }

    fn priority(&self) -> i32 {
        1
    }

    fn supports(&self, name: &str, _subject: &Value, _args: &[Value]) -> bool {
        name == "throw"
    }

    fn positive_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        self.build(Polarity::Positive, subject, args)
    }

    fn negative_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        self.build(Polarity::Negative, subject, args)
    }
}
