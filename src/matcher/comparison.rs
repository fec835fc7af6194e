//! Loose equality matcher.

use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::matcher::Matcher;
use crate::present::Presenter;
use crate::value::Value;

/// Handles `shouldEqual`: loose equality, where numbers compare by value
/// across integer and float representations.
pub struct ComparisonMatcher {
    presenter: Arc<dyn Presenter>,
}

impl ComparisonMatcher {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self { presenter }
    }

    fn matches(subject: &Value, expected: &Value) -> bool {
        if let (Some(serde_json::Value::Number(a)), Some(serde_json::Value::Number(b))) =
            (subject.as_data(), expected.as_data())
        {
            return Self::numbers_equal(a, b);
        }
        subject == expected
    }

    /// Integers compare exactly; the lossy `f64` route is reserved for mixed
    /// integer/float representations, where it is the only common ground.
    fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
        if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
            return a == b;
        }
        match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl Matcher for ComparisonMatcher {
    fn name(&self) -> &'static str {
        "comparison"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn supports(&self, name: &str, _subject: &Value, args: &[Value]) -> bool {
        name == "equal" && args.len() == 1
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::present::PlainPresenter;
    use serde_json::json;

    fn matcher() -> ComparisonMatcher {
        ComparisonMatcher::new(Arc::new(PlainPresenter))
    }

    #[test]
    fn equal_numbers_match_across_representations() {
        let m = matcher();
        let int = Value::from(json!(5));
        let float = Value::from(json!(5.0));
        assert!(m.positive_match("equal", &int, &[float]).unwrap().is_none());
    }

    #[test]
    fn unequal_values_fail_positively_and_pass_negatively() {
        let m = matcher();
        let subject = Value::from(json!("a"));
        let other = Value::from(json!("b"));
        assert!(m.positive_match("equal", &subject, &[other.clone()]).is_err());
        assert!(m.negative_match("equal", &subject, &[other]).unwrap().is_none());
    }

    #[test]
    fn large_integers_compare_exactly() {
        let m = matcher();
        // Adjacent once rounded through f64, distinct as integers.
        let subject = Value::from(json!(9007199254740993i64));
        let other = Value::from(json!(9007199254740992i64));
        assert!(m.positive_match("equal", &subject, &[other.clone()]).is_err());
        assert!(m.negative_match("equal", &subject, &[other]).unwrap().is_none());
        assert!(m
            .positive_match("equal", &subject, &[subject.clone()])
            .unwrap()
            .is_none());
    }

    #[test]
    fn sign_mismatch_never_compares_equal() {
        let m = matcher();
        let subject = Value::from(json!(u64::MAX));
        let other = Value::from(json!(-1));
        assert!(m.positive_match("equal", &subject, &[other]).is_err());
    }

    #[test]
    fn non_numeric_data_compares_structurally() {
        let m = matcher();
        let subject = Value::from(json!({"a": [1, 2]}));
        assert!(m
            .positive_match("equal", &subject, &[subject.clone()])
            .unwrap()
            .is_none());
    }
}
