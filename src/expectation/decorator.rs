//! Cross-cutting behavior composed around a base expectation.
//!
//! Each decorator owns the expectation it wraps and preserves its pass/fail
//! outcome. The factory builds the fixed chain dispatcher -> unwrap ->
//! constructor -> base.

use std::sync::Arc;

use crate::error::ExpectationError;
use crate::event::{EventDispatcher, EventPayload, Outcome};
use crate::expectation::Expectation;
use crate::unwrap::Unwrapper;
use crate::value::Value;

/// Emits `expectation.before` and `expectation.after` around verification.
/// The after-event fires exactly once whatever the inner outcome.
pub struct DispatcherDecorator {
    inner: Box<dyn Expectation>,
    dispatcher: Arc<dyn EventDispatcher>,
    matcher_name: String,
    example: String,
}

impl DispatcherDecorator {
    pub fn new(
        inner: Box<dyn Expectation>,
        dispatcher: Arc<dyn EventDispatcher>,
        matcher_name: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        Self {
            inner,
            dispatcher,
            matcher_name: matcher_name.into(),
            example: example.into(),
        }
    }
}

impl Expectation for DispatcherDecorator {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        let Self {
            inner,
            dispatcher,
            matcher_name,
            example,
        } = *self;

        dispatcher.notify(
            "expectation.before",
            &EventPayload::before(example.clone(), matcher_name.clone()),
        );

        let result = inner.verify(name, subject, args);

        let outcome = match &result {
            Ok(()) => Outcome::Pass,
            Err(err) if err.is_failure() => Outcome::Fail,
            Err(_) => Outcome::Broken,
        };
        dispatcher.notify(
            "expectation.after",
            &EventPayload::after(example, matcher_name, outcome),
        );

        result
    }
}

/// Normalizes the subject and arguments to their raw values before
/// delegating. Lazy subjects pass through untouched.
pub struct UnwrapDecorator {
    inner: Box<dyn Expectation>,
    unwrapper: Unwrapper,
}

impl UnwrapDecorator {
    pub fn new(inner: Box<dyn Expectation>, unwrapper: Unwrapper) -> Self {
        Self { inner, unwrapper }
    }
}

impl Expectation for UnwrapDecorator {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        let subject = self.unwrapper.unwrap(subject);
        let args = self.unwrapper.unwrap_all(args);
        self.inner.verify(name, subject, args)
    }
}

/// Forces construction of a lazy subject and routes a constructor raise as
/// the expectation's own failure rather than an unrelated system error.
/// A no-op for subjects that already exist.
pub struct ConstructorDecorator {
    inner: Box<dyn Expectation>,
}

impl ConstructorDecorator {
    pub fn new(inner: Box<dyn Expectation>) -> Self {
        Self { inner }
    }
}

impl Expectation for ConstructorDecorator {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        let subject = match subject {
            Value::Lazy(lazy) => match lazy.construct() {
                Ok(constructed) => constructed,
                Err(ExpectationError::ConstructionFailed { type_name, message }) => {
                    return Err(ExpectationError::Failure(format!(
                        "constructing {type_name} raised: {message}"
                    )))
                }
                Err(other) => return Err(other),
            },
            ready => ready,
        };
        self.inner.verify(name, subject, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expectation::PositiveExpectation;
    use crate::matcher::ComparisonMatcher;
    use crate::matcher::Matcher;
    use crate::present::PlainPresenter;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingDispatcher {
        events: Mutex<Vec<(String, Option<Outcome>)>>,
    }

    impl EventDispatcher for RecordingDispatcher {
        fn notify(&self, event: &str, payload: &EventPayload) {
            self.events.lock().push((event.to_string(), payload.outcome));
        }
    }

    fn equality_base() -> Box<dyn Expectation> {
        let matcher: Arc<dyn Matcher> = Arc::new(ComparisonMatcher::new(Arc::new(PlainPresenter)));
        Box::new(PositiveExpectation::new(matcher))
    }

    fn dispatcher_around(
        base: Box<dyn Expectation>,
        dispatcher: Arc<RecordingDispatcher>,
    ) -> Box<DispatcherDecorator> {
        Box::new(DispatcherDecorator::new(
            base,
            dispatcher,
            "comparison",
            "it equals five",
        ))
    }

    #[test]
    fn dispatcher_emits_before_and_after_on_pass() {
        let recorder = Arc::new(RecordingDispatcher::default());
        let decorated = dispatcher_around(equality_base(), recorder.clone());

        let five = Value::from(json!(5));
        assert!(decorated.verify("equal", five.clone(), vec![five]).is_ok());

        let events = recorder.events.lock();
        assert_eq!(
            *events,
            vec![
                ("expectation.before".to_string(), None),
                ("expectation.after".to_string(), Some(Outcome::Pass)),
            ]
        );
    }

    #[test]
    fn dispatcher_reports_fail_and_broken_outcomes() {
        let recorder = Arc::new(RecordingDispatcher::default());
        let decorated = dispatcher_around(equality_base(), recorder.clone());
        let err = decorated
            .verify("equal", Value::from(json!(1)), vec![Value::from(json!(2))])
            .unwrap_err();
        assert!(err.is_failure());
        assert_eq!(recorder.events.lock()[1].1, Some(Outcome::Fail));

        struct Broken;
        impl Expectation for Broken {
            fn verify(
                self: Box<Self>,
                _name: &str,
                _subject: Value,
                _args: Vec<Value>,
            ) -> Result<(), ExpectationError> {
                Err(ExpectationError::MethodNotFound {
                    type_name: "Widget".into(),
                    method: "frob".into(),
                })
            }
        }

        let recorder = Arc::new(RecordingDispatcher::default());
        let decorated = dispatcher_around(Box::new(Broken), recorder.clone());
        assert!(decorated
            .verify("equal", Value::from(json!(1)), vec![])
            .is_err());
        let events = recorder.events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].1, Some(Outcome::Broken));
    }

    #[test]
    fn unwrap_decorator_normalizes_subject_and_arguments() {
        let decorated = Box::new(UnwrapDecorator::new(equality_base(), Unwrapper::new()));
        let subject = Value::wrapped(Value::from(json!(7)));
        let arg = Value::wrapped(Value::from(json!(7)));
        assert!(decorated.verify("equal", subject, vec![arg]).is_ok());
    }

    #[test]
    fn constructor_decorator_builds_lazy_subjects() {
        let decorated = Box::new(ConstructorDecorator::new(equality_base()));
        let subject = Value::lazy("Widget", || Ok(Value::from(json!(9))));
        assert!(decorated
            .verify("equal", subject, vec![Value::from(json!(9))])
            .is_ok());
    }

    #[test]
    fn constructor_decorator_routes_construction_raise_as_failure() {
        let decorated = Box::new(ConstructorDecorator::new(equality_base()));
        let subject = Value::lazy("Widget", || Err("bad wiring".into()));
        let err = decorated
            .verify("equal", subject, vec![Value::from(json!(9))])
            .unwrap_err();
        assert!(matches!(
            err,
            ExpectationError::Failure(ref reason) if reason.contains("bad wiring")
        ));
    }
}
