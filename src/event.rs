//! Event notifications emitted around expectation verification.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of a verification, as reported in the `expectation.after` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The assertion held.
    Pass,
    /// The assertion did not hold.
    Fail,
    /// The example misused the API or hit an unrelated error.
    Broken,
}

/// Payload carried by verification events.
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    /// Identity of the example being verified.
    pub example: String,
    /// Name of the matcher performing the check.
    pub matcher: String,
    /// Present on `expectation.after` only.
    pub outcome: Option<Outcome>,
    pub at: DateTime<Utc>,
}

impl EventPayload {
    pub fn before(example: impl Into<String>, matcher: impl Into<String>) -> Self {
        Self {
            example: example.into(),
            matcher: matcher.into(),
            outcome: None,
            at: Utc::now(),
        }
    }

    pub fn after(example: impl Into<String>, matcher: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            example: example.into(),
            matcher: matcher.into(),
            outcome: Some(outcome),
            at: Utc::now(),
        }
    }
}

/// External channel the dispatcher decorator notifies around verification.
pub trait EventDispatcher: Send + Sync {
    fn notify(&self, event: &str, payload: &EventPayload);
}

/// Dispatcher for callers that do not observe events.
#[derive(Debug, Default)]
pub struct NullDispatcher;

impl EventDispatcher for NullDispatcher {
    fn notify(&self, _event: &str, _payload: &EventPayload) {}
}
