//! Normalization of wrapped subjects and arguments.

use crate::value::Value;

/// Peels expectation-builder wrapping from values.
///
/// Only engine-level `Wrapped` layers are removed; `Lazy` subjects are left
/// intact because construction is the constructor decorator's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unwrapper;

impl Unwrapper {
    pub fn new() -> Self {
        Self
    }

    /// Unwrap a single value to its raw form.
    pub fn unwrap(&self, value: Value) -> Value {
        match value {
            Value::Wrapped(inner) => self.unwrap(*inner),
            other => other,
        }
    }

    /// Unwrap every value in an argument list.
    pub fn unwrap_all(&self, values: Vec<Value>) -> Vec<Value> {
        values.into_iter().map(|value| self.unwrap(value)).collect()
    }
}
