//! Pattern matcher: `shouldBeLike`.
//!
//! Patterns are tried as a glob first, then as a regex, then as an exact
//! string.

use std::sync::Arc;

use glob::Pattern;
use regex::Regex;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::matcher::Matcher;
use crate::present::Presenter;
use crate::value::Value;

pub struct PatternMatcher {
    presenter: Arc<dyn Presenter>,
}

impl PatternMatcher {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self { presenter }
    }

    fn matches(subject: &str, pattern: &str) -> bool {
        if let Ok(glob) = Pattern::new(pattern) {
            if glob.matches(subject) {
                return true;
            }
        }

        if let Ok(re) = Regex::new(pattern) {
            if re.is_match(subject) {
                return true;
            }
        }

        subject == pattern
    }

    fn string_of(value: &Value) -> Option<&str> {
        value.as_data()?.as_str()
    }
}

impl Matcher for PatternMatcher {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn priority(&self) -> i32 {
        40
    }

    fn supports(&self, name: &str, subject: &Value, args: &[Value]) -> bool {
        name == "belike"
            && args.len() == 1
            && Self::string_of(subject).is_some()
            && Self::string_of(&args[0]).is_some()
    }

    fn positive_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        let text = Self::string_of(subject).unwrap_or_default();
        let pattern = Self::string_of(&args[0]).unwrap_or_default();
        if Self::matches(text, pattern) {
            Ok(None)
        } else {
            Err(ExpectationError::Failure(format!(
                "expected {} to be like {}, but it is not",
                self.presenter.present(subject),
                self.presenter.present(&args[0])
            )))
        }
    }

    fn negative_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        let text = Self::string_of(subject).unwrap_or_default();
        let pattern = Self::string_of(&args[0]).unwrap_or_default();
        if Self::matches(text, pattern) {
            Err(ExpectationError::Failure(format!(
                "did not expect {} to be like {}, but it is",
                self.presenter.present(subject),
                self.presenter.present(&args[0])
            )))
        } else {
            Ok(None)
        }
    }
}
