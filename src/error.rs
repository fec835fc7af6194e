//! The closed error set of the expectation engine.
//!
//! `Failure` and its two trigger-specific specializations are the routine
//! negative outcome of a check; every other kind indicates a misuse of the
//! API and surfaces unmodified to the caller. Nothing is retried internally.

/// Error type for matcher resolution and expectation execution.
#[derive(Debug, thiserror::Error)]
pub enum ExpectationError {
    #[error("no matcher supports the '{name}' expectation")]
    MatcherNotFound { name: String },

    #[error("expectation '{name}' must start with 'should' or 'shouldNot'")]
    InvalidExpectationName { name: String },

    #[error("wrong argument count provided to the {matcher} matcher: up to {max} expected, got {got}")]
    InvalidArgumentCount {
        matcher: &'static str,
        max: usize,
        got: usize,
    },

    #[error("{detail}")]
    InvalidArgument { detail: String },

    #[error("method {type_name}::{method} not found")]
    MethodNotFound { type_name: String, method: String },

    #[error("constructing {type_name} failed: {message}")]
    ConstructionFailed { type_name: String, message: String },

    /// An exception raised by the code under specification.
    #[error("{kind}: {message}")]
    Raised { kind: String, message: String },

    /// The assertion did not hold.
    #[error("{0}")]
    Failure(String),

    #[error("expected to trigger diagnostics, but got none")]
    NoDiagnosticsTriggered,

    #[error("expected to not trigger diagnostics, but got {0}")]
    UnexpectedDiagnosticsTriggered(usize),
}

impl ExpectationError {
    /// Whether this is an assertion failure (the expected, common negative
    /// outcome of a check) as opposed to a broken-example condition.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ExpectationError::Failure(_)
                | ExpectationError::NoDiagnosticsTriggered
                | ExpectationError::UnexpectedDiagnosticsTriggered(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_are_failures() {
        assert!(ExpectationError::Failure("nope".into()).is_failure());
        assert!(ExpectationError::NoDiagnosticsTriggered.is_failure());
        assert!(ExpectationError::UnexpectedDiagnosticsTriggered(2).is_failure());
    }

    #[test]
    fn misuse_kinds_are_not_failures() {
        assert!(!ExpectationError::MatcherNotFound { name: "equal".into() }.is_failure());
        assert!(!ExpectationError::MethodNotFound {
            type_name: "Widget".into(),
            method: "frob".into()
        }
        .is_failure());
    }
}
