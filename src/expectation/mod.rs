//! Polarity-bound execution of a single matcher for one verification call.
//!
//! An expectation is constructed per call and verified exactly once. The
//! generic positive/negative variants cover synchronous matchers; the throw
//! and trigger variants are the dedicated split for the two deferring
//! matchers, which always hand back a [`DelayedCall`](crate::delayed::DelayedCall)
//! owning the polarized check.

mod decorator;
mod factory;

pub use decorator::{ConstructorDecorator, DispatcherDecorator, UnwrapDecorator};
pub use factory::{BuiltExpectation, ExpectationFactory};

use std::sync::Arc;

use crate::error::ExpectationError;
use crate::matcher::Matcher;
use crate::value::Value;

/// A single verification: either the assertion holds or this returns an
/// error. Consumed by `verify`, so it runs at most once.
pub trait Expectation {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError>;
}

/// The assertion must hold.
pub struct PositiveExpectation {
    matcher: Arc<dyn Matcher>,
}

impl PositiveExpectation {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self { matcher }
    }
}

impl Expectation for PositiveExpectation {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        match self.matcher.positive_match(name, &subject, &args)? {
            Some(delayed) => delayed.invoke().map(|_| ()),
            None => Ok(()),
        }
    }
}

/// The assertion must not hold.
pub struct NegativeExpectation {
    matcher: Arc<dyn Matcher>,
}

impl NegativeExpectation {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self { matcher }
    }
}

impl Expectation for NegativeExpectation {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        match self.matcher.negative_match(name, &subject, &args)? {
            Some(delayed) => delayed.invoke().map(|_| ()),
            None => Ok(()),
        }
    }
}

/// `shouldThrow`: the deferred check owns the raise-translation semantics,
/// so this variant runs undecorated.
pub struct PositiveThrowExpectation {
    matcher: Arc<dyn Matcher>,
}

impl PositiveThrowExpectation {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self { matcher }
    }
}

impl Expectation for PositiveThrowExpectation {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        match self.matcher.positive_match(name, &subject, &args)? {
            Some(delayed) => delayed.invoke().map(|_| ()),
            None => Ok(()),
        }
    }
}

/// `shouldNotThrow`, undecorated like its positive twin.
pub struct NegativeThrowExpectation {
    matcher: Arc<dyn Matcher>,
}

impl NegativeThrowExpectation {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self { matcher }
    }
}

impl Expectation for NegativeThrowExpectation {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        match self.matcher.negative_match(name, &subject, &args)? {
            Some(delayed) => delayed.invoke().map(|_| ()),
            None => Ok(()),
        }
    }
}

/// `shouldTrigger`: the deferred check installs and restores the diagnostic
/// hook around the subject's call.
pub struct PositiveTriggerExpectation {
    matcher: Arc<dyn Matcher>,
}

impl PositiveTriggerExpectation {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self { matcher }
    }
}

impl Expectation for PositiveTriggerExpectation {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        match self.matcher.positive_match(name, &subject, &args)? {
            Some(delayed) => delayed.invoke().map(|_| ()),
            None => Ok(()),
        }
    }
}

/// `shouldNotTrigger`.
pub struct NegativeTriggerExpectation {
    matcher: Arc<dyn Matcher>,
}

impl NegativeTriggerExpectation {
    pub fn new(matcher: Arc<dyn Matcher>) -> Self {
        Self { matcher }
    }
}

impl Expectation for NegativeTriggerExpectation {
    fn verify(
        self: Box<Self>,
        name: &str,
        subject: Value,
        args: Vec<Value>,
    ) -> Result<(), ExpectationError> {
        match self.matcher.negative_match(name, &subject, &args)? {
            Some(delayed) => delayed.invoke().map(|_| ()),
            None => Ok(()),
        }
    }
}
