//! Iteration-prefix matcher: `shouldStartIteratingAs` / `shouldStartYielding`.
//!
//! The subject passes when it begins with the expected element sequence.
//! Extra subject elements beyond the expectation are success; fewer are a
//! failure.

use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::error::ExpectationError;
use crate::matcher::Matcher;
use crate::present::Presenter;
use crate::value::Value;

const KEYS: &[&str] = &["startiteratingas", "startyielding"];

pub struct IterateMatcher {
    presenter: Arc<dyn Presenter>,
}

impl IterateMatcher {
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self { presenter }
    }

    fn elements_of(value: &Value) -> Option<&[serde_json::Value]> {
        match value.as_data()? {
            serde_json::Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    fn check_prefix(&self, subject: &Value, expected: &Value) -> Result<(), ExpectationError> {
        let subject_items = Self::elements_of(subject).unwrap_or(&[]);
        let expected_items = Self::elements_of(expected).unwrap_or(&[]);

        for (index, expected_item) in expected_items.iter().enumerate() {
            match subject_items.get(index) {
                None => {
                    return Err(ExpectationError::Failure(
                        "expected subject to have the same or more elements than the matched \
                         value, but it has fewer"
                            .into(),
                    ))
                }
                Some(actual) if actual != expected_item => {
                    return Err(ExpectationError::Failure(format!(
                        "expected subject to start iterating as {}, but element {index} is {} \
                         instead of {}",
                        self.presenter.present(expected),
                        self.presenter.present(&Value::Data(actual.clone())),
                        self.presenter.present(&Value::Data(expected_item.clone()))
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

impl Matcher for IterateMatcher {
    fn name(&self) -> &'static str {
        "iterate"
    }

    fn supports(&self, name: &str, subject: &Value, args: &[Value]) -> bool {
        KEYS.contains(&name)
            && args.len() == 1
            && Self::elements_of(subject).is_some()
            && Self::elements_of(&args[0]).is_some()
    }

    fn positive_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        self.check_prefix(subject, &args[0]).map(|()| None)
    }

    fn negative_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        match self.check_prefix(subject, &args[0]) {
            Ok(()) => Err(ExpectationError::Failure(format!(
                "did not expect subject to start iterating as {}, but it does",
                self.presenter.present(&args[0])
            ))),
            Err(err) if err.is_failure() => Ok(None),
            Err(other) => Err(other),
        }
    }
}
