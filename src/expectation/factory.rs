//! Builds decorated expectations from a requested expectation name.

use std::sync::Arc;

use crate::error::ExpectationError;
use crate::event::EventDispatcher;
use crate::expectation::{
    ConstructorDecorator, DispatcherDecorator, Expectation, NegativeExpectation,
    NegativeThrowExpectation, NegativeTriggerExpectation, PositiveExpectation,
    PositiveThrowExpectation, PositiveTriggerExpectation, UnwrapDecorator,
};
use crate::matcher::{Matcher, MatcherManager};
use crate::unwrap::Unwrapper;
use crate::value::Value;

#[derive(Clone, Copy)]
enum Polarity {
    Positive,
    Negative,
}

/// Resolves the matcher for a requested expectation, builds the right base
/// variant and wraps it in the decorator chain.
pub struct ExpectationFactory {
    example: String,
    dispatcher: Arc<dyn EventDispatcher>,
    matchers: MatcherManager,
}

impl ExpectationFactory {
    pub fn new(
        example: impl Into<String>,
        dispatcher: Arc<dyn EventDispatcher>,
        matchers: MatcherManager,
    ) -> Self {
        Self {
            example: example.into(),
            dispatcher,
            matchers,
        }
    }

    /// Build the expectation for a `should...` / `shouldNot...` call.
    ///
    /// Any other prefix fails with `InvalidExpectationName` before matcher
    /// lookup. The remainder of the name, lower-cased, is the lookup key.
    pub fn create(
        &self,
        expectation: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<BuiltExpectation, ExpectationError> {
        if let Some(rest) = expectation.strip_prefix("shouldNot") {
            self.build(Polarity::Negative, &rest.to_lowercase(), subject, args)
        } else if let Some(rest) = expectation.strip_prefix("should") {
            self.build(Polarity::Positive, &rest.to_lowercase(), subject, args)
        } else {
            Err(ExpectationError::InvalidExpectationName {
                name: expectation.to_string(),
            })
        }
    }

    fn build(
        &self,
        polarity: Polarity,
        key: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<BuiltExpectation, ExpectationError> {
        let matcher = self.find_matcher(key, &subject, &args)?;

        let base: Box<dyn Expectation> = match (key, polarity) {
            ("throw", Polarity::Positive) => {
                Box::new(PositiveThrowExpectation::new(matcher.clone()))
            }
            ("throw", Polarity::Negative) => {
                Box::new(NegativeThrowExpectation::new(matcher.clone()))
            }
            ("trigger", Polarity::Positive) => {
                Box::new(PositiveTriggerExpectation::new(matcher.clone()))
            }
            ("trigger", Polarity::Negative) => {
                Box::new(NegativeTriggerExpectation::new(matcher.clone()))
            }
            (_, Polarity::Positive) => Box::new(PositiveExpectation::new(matcher.clone())),
            (_, Polarity::Negative) => Box::new(NegativeExpectation::new(matcher.clone())),
        };

        // Throw expectations own their exception semantics and run bare.
        let inner = if key == "throw" {
            base
        } else {
            self.decorate(base, &matcher)
        };

        Ok(BuiltExpectation {
            inner,
            name: key.to_string(),
            subject,
            args,
        })
    }

    fn find_matcher(
        &self,
        key: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Arc<dyn Matcher>, ExpectationError> {
        // Lookup sees raw values; the decorator chain normalizes again for
        // the verification itself.
        let unwrapper = Unwrapper::new();
        let subject = unwrapper.unwrap(subject.clone());
        let args = unwrapper.unwrap_all(args.to_vec());
        self.matchers.find(key, &subject, &args)
    }

    fn decorate(&self, base: Box<dyn Expectation>, matcher: &Arc<dyn Matcher>) -> Box<dyn Expectation> {
        let constructor = Box::new(ConstructorDecorator::new(base));
        let unwrap = Box::new(UnwrapDecorator::new(constructor, Unwrapper::new()));
        Box::new(DispatcherDecorator::new(
            unwrap,
            self.dispatcher.clone(),
            matcher.name(),
            self.example.clone(),
        ))
    }
}

/// A decorated expectation bound to its subject and arguments, verified at
/// most once.
pub struct BuiltExpectation {
    inner: Box<dyn Expectation>,
    name: String,
    subject: Value,
    args: Vec<Value>,
}

impl std::fmt::Debug for BuiltExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltExpectation")
            .field("name", &self.name)
            .field("subject", &self.subject)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl BuiltExpectation {
    /// The resolved matcher lookup key.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn verify(self) -> Result<(), ExpectationError> {
        self.inner.verify(&self.name, self.subject, self.args)
    }
}
