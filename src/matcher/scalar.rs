//! JSON-type checks: `shouldBeString`, `shouldBeInteger` and friends.

use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::matcher::Matcher;
use crate::present::Presenter;
use crate::value::Value;

const KEYS: &[&str] = &[
    "bestring",
    "beinteger",
    "befloat",
    "bebool",
    "bearray",
    "benull",
];

pub struct ScalarMatcher {
    presenter: Arc<dyn Presenter>,
}

impl ScalarMatcher {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self { presenter }
    }

    fn expected_type(name: &str) -> &'static str {
        match name {
            "bestring" => "string",
            "beinteger" => "integer",
            "befloat" => "float",
            "bebool" => "bool",
            "bearray" => "array",
            "benull" => "null",
            _ => unreachable!("unsupported scalar key"),
        }
    }

    fn matches(name: &str, subject: &Value) -> bool {
        let Some(data) = subject.as_data() else {
            return false;
        };
        match name {
            "bestring" => data.is_string(),
            "beinteger" => data.is_i64() || data.is_u64(),
            "befloat" => data.is_f64(),
            "bebool" => data.is_boolean(),
            "bearray" => data.is_array(),
            "benull" => data.is_null(),
            _ => false,
        }
    }
}

impl Matcher for ScalarMatcher {
    fn name(&self) -> &'static str {
        "scalar"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn supports(&self, name: &str, _subject: &Value, args: &[Value]) -> bool {
        KEYS.contains(&name) && args.is_empty()
    }

    fn positive_match(
        &self,
        name: &str,
        subject: &Value,
        _args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        if Self::matches(name, subject) {
            Ok(None)
        } else {
            Err(ExpectationError::Failure(format!(
                "expected a {} value, but got {}",
                Self::expected_type(name),
                self.presenter.present(subject)
            )))
        }
    }

    fn negative_match(
        &self,
        name: &str,
        subject: &Value,
        _args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        if Self::matches(name, subject) {
            Err(ExpectationError::Failure(format!(
                "did not expect a {} value, but got {}",
                Self::expected_type(name),
                self.presenter.present(subject)
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

    fn matcher() -> ScalarMatcher {
        ScalarMatcher::new(Arc::new(PlainPresenter))
    }

    #[test]
    fn string_check_passes_for_strings_only() {
        let m = matcher();
        assert!(m
            .positive_match("bestring", &Value::from(json!("x")), &[])
            .unwrap()
            .is_none());
        assert!(m.positive_match("bestring", &Value::from(json!(5)), &[]).is_err());
    }

    #[test]
    fn integer_and_float_are_distinct_types() {
        let m = matcher();
        assert!(m
            .positive_match("beinteger", &Value::from(json!(5)), &[])
            .unwrap()
            .is_none());
        assert!(m.positive_match("beinteger", &Value::from(json!(5.0)), &[]).is_err());
        assert!(m
            .positive_match("befloat", &Value::from(json!(5.0)), &[])
            .unwrap()
            .is_none());
    }

    #[test]
    fn supports_requires_zero_arguments() {
        let m = matcher();
        let subject = Value::from(json!(null));
        assert!(m.supports("benull", &subject, &[]));
        assert!(!m.supports("benull", &subject, &[subject.clone()]));
    }

    #[test]
    fn negative_check_inverts_the_outcome() {
        let m = matcher();
        assert!(m
            .negative_match("bebool", &Value::from(json!("no")), &[])
            .unwrap()
            .is_none());
        assert!(m.negative_match("bebool", &Value::from(json!(true)), &[]).is_err());
    }
}
