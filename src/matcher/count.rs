//! Element-count matcher: `shouldHaveCount`.

use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::matcher::Matcher;
use crate::present::Presenter;
use crate::value::Value;

pub struct CountMatcher {
    presenter: Arc<dyn Presenter>,
}

impl CountMatcher {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self { presenter }
    }

    fn count_of(subject: &Value) -> Option<usize> {
        match subject.as_data()? {
            serde_json::Value::Array(items) => Some(items.len()),
            serde_json::Value::String(s) => Some(s.chars().count()),
            serde_json::Value::Object(map) => Some(map.len()),
            _ => None,
        }
    }

    fn expected_count(args: &[Value]) -> Option<u64> {
        args.first()?.as_data()?.as_u64()
    }
}

impl Matcher for CountMatcher {
    fn name(&self) -> &'static str {
        "count"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn supports(&self, name: &str, subject: &Value, args: &[Value]) -> bool {
        name == "havecount"
            && args.len() == 1
            && Self::count_of(subject).is_some()
            && Self::expected_count(args).is_some()
    }

    fn positive_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        let actual = Self::count_of(subject).unwrap_or(0);
        let expected = Self::expected_count(args).unwrap_or(0) as usize;
        if actual == expected {
            Ok(None)
        } else {
            Err(ExpectationError::Failure(format!(
                "expected {} to contain {expected} elements, but it contains {actual}",
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
        let actual = Self::count_of(subject).unwrap_or(0);
        let expected = Self::expected_count(args).unwrap_or(0) as usize;
        if actual == expected {
            Err(ExpectationError::Failure(format!(
                "did not expect {} to contain {expected} elements, but it does",
                self.presenter.present(subject)
            )))
        } else {
            Ok(None)
        }
    }
}
