//! # specmatch
//!
//! The matcher-resolution and expectation-execution engine of a
//! behavior-driven testing tool.
//!
//! Given a subject value, a requested expectation name ("shouldEqual",
//! "shouldNotThrow", "shouldTrigger", ...) and call arguments, the engine
//! selects a matcher, executes it in the requested polarity, and reports
//! success or a structured failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use specmatch::{ExpectationFactory, MatcherManager, NullDispatcher, PlainPresenter, Value};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let factory = ExpectationFactory::new(
//!     "it adds numbers",
//!     Arc::new(NullDispatcher),
//!     MatcherManager::with_defaults(Arc::new(PlainPresenter)),
//! );
//!
//! let expectation = factory
//!     .create("shouldEqual", Value::from(json!(5)), vec![Value::from(json!(5))])
//!     .unwrap();
//! assert!(expectation.verify().is_ok());
//! ```
//!
//! ## Diagnostic interception
//!
//! Code under specification raises warnings, notices and deprecations through
//! [`diagnostics::emit`]; `shouldTrigger` / `shouldNotTrigger` count the ones
//! matching an optional level and message filter while the subject's pending
//! method call runs, forwarding everything else to the previously installed
//! hook and restoring it afterwards on every exit path.

pub mod delayed;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod expectation;
pub mod matcher;
pub mod present;
pub mod unwrap;
pub mod value;

// Core types
pub use delayed::DelayedCall;
pub use error::ExpectationError;
pub use expectation::{BuiltExpectation, Expectation, ExpectationFactory};
pub use matcher::{Matcher, MatcherManager};
pub use value::{LazySubject, MethodCall, SpecObject, Value};

// Collaborator contracts
pub use event::{EventDispatcher, EventPayload, NullDispatcher, Outcome};
pub use present::{PlainPresenter, Presenter};
pub use unwrap::Unwrapper;

// Diagnostics
pub use diagnostics::{Diagnostic, DiagnosticHook, DiagnosticLevel, HookGuard};
