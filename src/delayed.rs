//! Deferred, single-execution actions produced by matchers.

use crate::error::ExpectationError;
use crate::value::Value;

/// A deferred, parameterless invocation.
///
/// Separates a matcher's "deciding what to check" from "running the check":
/// the matcher captures the subject and resolved arguments in the thunk, and
/// the expectation layer decides when, or whether, it runs. Construction
/// never executes the thunk; `invoke` consumes the call, so it runs at most
/// once by construction.
pub struct DelayedCall {
    thunk: Box<dyn FnOnce() -> Result<Value, ExpectationError> + Send>,
}

impl DelayedCall {
    pub fn new(thunk: impl FnOnce() -> Result<Value, ExpectationError> + Send + 'static) -> Self {
        Self {
            thunk: Box::new(thunk),
        }
    }

    /// Execute the captured action, propagating any error unchanged.
    pub fn invoke(self) -> Result<Value, ExpectationError> {
        (self.thunk)()
    }
}

impl std::fmt::Debug for DelayedCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DelayedCall")
    }
}
