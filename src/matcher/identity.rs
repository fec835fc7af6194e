//! Strict equality matcher.

use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::matcher::Matcher;
use crate::present::Presenter;
use crate::value::Value;

const KEYS: &[&str] = &["be", "return", "beequalto"];

/// Handles `shouldBe` / `shouldReturn` / `shouldBeEqualTo`: strict equality,
/// where integer and float representations of the same number differ.
pub struct IdentityMatcher {
    presenter: Arc<dyn Presenter>,
}

impl IdentityMatcher {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self { presenter }
    }

    fn matches(subject: &Value, expected: &Value) -> bool {
        subject == expected
    }
}

impl Matcher for IdentityMatcher {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn supports(&self, name: &str, _subject: &Value, args: &[Value]) -> bool {
        KEYS.contains(&name) && args.len() == 1
    }

    fn positive_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        if Self::matches(subject, &args[0]) {
            Ok(None)
        } else {
            Err(ExpectationError::Failure(format!(
                "expected {}, but got {}",
                self.presenter.present(&args[0]),
                self.presenter.present(subject)
            )))
        }
    }

    fn negative_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        if Self::matches(subject, &args[0]) {
            Err(ExpectationError::Failure(format!(
                "did not expect {}, but got it",
                self.presenter.present(&args[0])
            )))
        } else {
            Ok(None)
        }
    }
}
