//! Matcher strategies and the registry that resolves them.
//!
//! Matcher selection is runtime and data-driven: the set of variants is open
//! to user registration, so the registry evaluates `supports` across every
//! registered matcher and resolves by priority.

mod comparison;
mod count;
mod identity;
mod iterate;
mod pattern;
mod scalar;
mod throw;
mod trigger;

pub use comparison::ComparisonMatcher;
pub use count::CountMatcher;
pub use identity::IdentityMatcher;
pub use iterate::IterateMatcher;
pub use pattern::PatternMatcher;
pub use scalar::ScalarMatcher;
pub use throw::ThrowMatcher;
pub use trigger::TriggerMatcher;

use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::present::Presenter;
use crate::unwrap::Unwrapper;
use crate::value::Value;

/// Which side of the assertion a match function is checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Polarity {
    Positive,
    Negative,
}

/// A strategy deciding whether a named assertion holds for a subject and
/// arguments.
///
/// Matchers are constructed once at registry build time and immutable
/// thereafter. A match function returns `Ok(None)` when it fully performed a
/// synchronous check, or `Ok(Some(DelayedCall))` when the real check must run
/// against a wrapped call later.
pub trait Matcher: Send + Sync {
    /// Identity used in event payloads and failure reports.
    fn name(&self) -> &'static str;

    /// Higher priority wins when several matchers support the same call.
    fn priority(&self) -> i32 {
        100
    }

    /// Whether this matcher handles the given expectation name, subject and
    /// arguments.
    fn supports(&self, name: &str, subject: &Value, args: &[Value]) -> bool;

    /// Check that the assertion holds.
    fn positive_match(
        &self,
        name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError>;

    /// Check that the assertion does not hold.
    fn negative_match(
        &self,
        name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError>;
}

impl std::fmt::Debug for dyn Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").field("name", &self.name()).finish()
    }
}

/// Holds every registered matcher and selects the right one for a call.
pub struct MatcherManager {
    matchers: Vec<Arc<dyn Matcher>>,
}

impl MatcherManager {
    pub fn new() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Registry preloaded with the built-in matcher set.
    pub fn with_defaults(presenter: Arc<dyn Presenter>) -> Self {
        let mut manager = Self::new();
        manager.register(Arc::new(IdentityMatcher::new(presenter.clone())));
        manager.register(Arc::new(ComparisonMatcher::new(presenter.clone())));
        manager.register(Arc::new(ScalarMatcher::new(presenter.clone())));
        manager.register(Arc::new(CountMatcher::new(presenter.clone())));
        manager.register(Arc::new(IterateMatcher::new(presenter.clone())));
        manager.register(Arc::new(PatternMatcher::new(presenter.clone())));
        manager.register(Arc::new(ThrowMatcher::new(presenter)));
        manager.register(Arc::new(TriggerMatcher::new(Unwrapper::new())));
        manager
    }

    pub fn register(&mut self, matcher: Arc<dyn Matcher>) {
        self.matchers.push(matcher);
    }

    /// Select the matcher for a call.
    ///
    /// Among supporting matchers the numerically highest priority wins; ties
    /// go to the first registered. Selection is deterministic for identical
    /// inputs.
    pub fn find(
        &self,
        name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Arc<dyn Matcher>, ExpectationError> {
        let mut best: Option<&Arc<dyn Matcher>> = None;
        for matcher in &self.matchers {
            if !matcher.supports(name, subject, args) {
                continue;
            }
            match best {
                Some(current) if matcher.priority() <= current.priority() => {}
                _ => best = Some(matcher),
            }
        }
        best.cloned().ok_or_else(|| ExpectationError::MatcherNotFound {
            name: name.to_string(),
        })
    }
}

impl Default for MatcherManager {
    fn default() -> Self {
        Self::new()
    }
}
