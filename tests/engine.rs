//! End-to-end tests for matcher resolution and expectation execution.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use proptest::prelude::*;
use serde_json::json;
use specmatch::{
    diagnostics, DelayedCall, DiagnosticHook, DiagnosticLevel, EventDispatcher, EventPayload,
    ExpectationError, ExpectationFactory, HookGuard, Matcher, MatcherManager, NullDispatcher,
    Outcome, PlainPresenter, SpecObject, Value,
};

/// Serializes tests that touch the process-wide diagnostic hook slot.
static HOOK_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn factory() -> ExpectationFactory {
    ExpectationFactory::new(
        "integration example",
        Arc::new(NullDispatcher),
        MatcherManager::with_defaults(Arc::new(PlainPresenter)),
    )
}

struct Emitter;

impl SpecObject for Emitter {
    fn type_name(&self) -> &str {
        "Emitter"
    }

    fn has_method(&self, name: &str) -> bool {
        matches!(name, "warn_about" | "silent")
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value, ExpectationError> {
        match method {
            "warn_about" => {
                let topic = args
                    .first()
                    .and_then(|arg| arg.as_data())
                    .and_then(|data| data.as_str())
                    .unwrap_or("something");
                diagnostics::emit(DiagnosticLevel::Warning, format!("careful with {topic}"));
                Ok(Value::from(json!(null)))
            }
            "silent" => Ok(Value::from(json!("nothing to report"))),
            other => unreachable!("unexpected method {other}"),
        }
    }
}

fn call_subject(method: &str, args: Vec<Value>) -> Value {
    Value::call(Value::Object(Arc::new(Emitter)), method, args)
}

#[test]
fn should_equal_resolves_the_equality_matcher() {
    let five = Value::from(json!(5));

    let positive = factory()
        .create("shouldEqual", five.clone(), vec![five.clone()])
        .unwrap();
    assert!(positive.verify().is_ok());

    let negative = factory()
        .create("shouldNotEqual", five.clone(), vec![five])
        .unwrap();
    let err = negative.verify().unwrap_err();
    assert!(matches!(err, ExpectationError::Failure(_)));
}

#[test]
fn malformed_expectation_names_are_rejected_before_lookup() {
    let err = factory()
        .create("wouldEqual", Value::from(json!(1)), vec![Value::from(json!(1))])
        .unwrap_err();
    assert!(matches!(err, ExpectationError::InvalidExpectationName { .. }));
}

#[test]
fn trigger_with_no_diagnostics_fails_positive_and_passes_negative() {
    let _serial = HOOK_LOCK.lock();

    let positive = factory()
        .create("shouldTrigger", call_subject("silent", vec![]), vec![])
        .unwrap();
    let err = positive.verify().unwrap_err();
    assert!(matches!(err, ExpectationError::NoDiagnosticsTriggered));

    let negative = factory()
        .create("shouldNotTrigger", call_subject("silent", vec![]), vec![])
        .unwrap();
    assert!(negative.verify().is_ok());
}

#[test]
fn trigger_counts_diagnostics_matching_the_filters() {
    let _serial = HOOK_LOCK.lock();

    let args = vec![
        Value::from(json!("warning")),
        Value::from(json!("the mainframe")),
    ];
    let subject = call_subject("warn_about", vec![Value::from(json!("the mainframe"))]);
    let positive = factory().create("shouldTrigger", subject, args).unwrap();
    assert!(positive.verify().is_ok());
}

#[test]
fn trigger_restores_the_hook_after_every_outcome() {
    let _serial = HOOK_LOCK.lock();
    let outer: DiagnosticHook = Arc::new(|_| {});
    let _outer = HookGuard::install(outer.clone());

    // Pass.
    let subject = call_subject("warn_about", vec![]);
    factory()
        .create("shouldTrigger", subject, vec![])
        .unwrap()
        .verify()
        .unwrap();
    assert!(Arc::ptr_eq(&diagnostics::current().unwrap(), &outer));

    // Fail.
    let subject = call_subject("silent", vec![]);
    assert!(factory()
        .create("shouldTrigger", subject, vec![])
        .unwrap()
        .verify()
        .is_err());
    assert!(Arc::ptr_eq(&diagnostics::current().unwrap(), &outer));
}

#[test]
fn wrapped_subjects_are_unwrapped_before_matching() {
    let subject = Value::wrapped(Value::from(json!("config.env")));
    let expectation = factory()
        .create("shouldBeLike", subject, vec![Value::from(json!("*.env"))])
        .unwrap();
    assert!(expectation.verify().is_ok());
}

#[test]
fn lazy_subjects_are_constructed_by_the_decorator_chain() {
    let subject = Value::lazy("Calculator", || Ok(Value::from(json!(42))));
    let expectation = factory()
        .create("shouldEqual", subject, vec![Value::from(json!(42))])
        .unwrap();
    assert!(expectation.verify().is_ok());

    let subject = Value::lazy("Calculator", || Err("division by zero in new()".into()));
    let expectation = factory()
        .create("shouldEqual", subject, vec![Value::from(json!(42))])
        .unwrap();
    let err = expectation.verify().unwrap_err();
    assert!(matches!(
        err,
        ExpectationError::Failure(ref reason) if reason.contains("division by zero")
    ));
}

#[test]
fn should_start_iterating_as_checks_the_element_prefix() {
    let subject = Value::from(json!([1, 2, 3]));

    let expectation = factory()
        .create(
            "shouldStartIteratingAs",
            subject.clone(),
            vec![Value::from(json!([1, 2]))],
        )
        .unwrap();
    assert!(expectation.verify().is_ok());

    // The subject runs out before the expected sequence does.
    let expectation = factory()
        .create(
            "shouldStartIteratingAs",
            Value::from(json!([1])),
            vec![Value::from(json!([1, 2]))],
        )
        .unwrap();
    assert!(expectation.verify().unwrap_err().is_failure());

    let expectation = factory()
        .create(
            "shouldNotStartYielding",
            subject,
            vec![Value::from(json!([1, 2]))],
        )
        .unwrap();
    assert!(expectation.verify().unwrap_err().is_failure());
}

#[test]
fn user_registered_matchers_override_by_priority() {
    struct AlwaysHolds;

    impl Matcher for AlwaysHolds {
        fn name(&self) -> &'static str {
            "always-holds"
        }

        fn priority(&self) -> i32 {
            500
        }

        fn supports(&self, name: &str, _subject: &Value, _args: &[Value]) -> bool {
            name == "equal"
        }

        fn positive_match(
            &self,
            _name: &str,
            _subject: &Value,
            _args: &[Value],
        ) -> Result<Option<DelayedCall>, ExpectationError> {
            Ok(None)
        }

        fn negative_match(
            &self,
            _name: &str,
            _subject: &Value,
            _args: &[Value],
        ) -> Result<Option<DelayedCall>, ExpectationError> {
            Err(ExpectationError::Failure("it always holds".into()))
        }
    }

    let mut matchers = MatcherManager::with_defaults(Arc::new(PlainPresenter));
    matchers.register(Arc::new(AlwaysHolds));
    let factory = ExpectationFactory::new("override example", Arc::new(NullDispatcher), matchers);

    // 1 never equals 2, but the overriding matcher says everything holds.
    let expectation = factory
        .create("shouldEqual", Value::from(json!(1)), vec![Value::from(json!(2))])
        .unwrap();
    assert!(expectation.verify().is_ok());
}

#[test]
fn dispatcher_observes_the_whole_verification() {
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(String, Option<Outcome>)>>,
    }

    impl EventDispatcher for Recorder {
        fn notify(&self, event: &str, payload: &EventPayload) {
            self.events.lock().push((event.to_string(), payload.outcome));
        }
    }

    let recorder = Arc::new(Recorder::default());
    let factory = ExpectationFactory::new(
        "observed example",
        recorder.clone(),
        MatcherManager::with_defaults(Arc::new(PlainPresenter)),
    );

    factory
        .create("shouldEqual", Value::from(json!(1)), vec![Value::from(json!(1))])
        .unwrap()
        .verify()
        .unwrap();

    let events = recorder.events.lock();
    assert_eq!(
        *events,
        vec![
            ("expectation.before".to_string(), None),
            ("expectation.after".to_string(), Some(Outcome::Pass)),
        ]
    );
}

proptest! {
    /// For data values, exactly one of the positive and negative equality
    /// expectations holds.
    #[test]
    fn equality_polarity_is_dual(a in -1000i64..1000, b in -1000i64..1000) {
        let subject = Value::from(json!(a));
        let expected = Value::from(json!(b));

        let positive = factory()
            .create("shouldEqual", subject.clone(), vec![expected.clone()])
            .unwrap()
            .verify();
        let negative = factory()
            .create("shouldNotEqual", subject, vec![expected])
            .unwrap()
            .verify();

        prop_assert_eq!(positive.is_ok(), !negative.is_ok());
    }
}
