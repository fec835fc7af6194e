//! Diagnostic-interception matcher: `shouldTrigger` / `shouldNotTrigger`.
//!
//! The check installs a counting hook into the process-wide diagnostic slot,
//! runs the subject's pending method call, and restores the previous hook on
//! every exit path. Diagnostics that do not match the level/message filters
//! are forwarded unchanged to the previously installed hook so unrelated
//! diagnostic handling elsewhere in the process is unaffected. Forwarding is
//! identical in both polarities.

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::delayed::DelayedCall;
use crate::diagnostics::{self, Diagnostic, DiagnosticHook, DiagnosticLevel, HookGuard};
use crate::error::ExpectationError;
use crate::matcher::throw::resolve_method_call;
use crate::matcher::{Matcher, Polarity};
use crate::unwrap::Unwrapper;
use crate::value::Value;

pub struct TriggerMatcher {
    unwrapper: Unwrapper,
}

impl TriggerMatcher {
    pub fn new(unwrapper: Unwrapper) -> Self {
        Self { unwrapper }
    }

    /// Zero arguments match any diagnostic; one restricts the level; two add
    /// a required message substring. Anything else is a misuse, rejected
    /// before any side effect.
    fn unpack_filters(
        args: &[Value],
    ) -> Result<(Option<DiagnosticLevel>, Option<String>), ExpectationError> {
        if args.len() > 2 {
            return Err(ExpectationError::InvalidArgumentCount {
                matcher: "trigger",
                max: 2,
                got: args.len(),
            });
        }

        let level = match args.first() {
            None => None,
            Some(arg) => {
                let name = arg.as_data().and_then(|data| data.as_str()).ok_or_else(|| {
                    ExpectationError::InvalidArgument {
                        detail: format!(
                            "trigger level filter must be a string, got {}",
                            arg.type_label()
                        ),
                    }
                })?;
                Some(
                    DiagnosticLevel::from_str(name)
                        .map_err(|detail| ExpectationError::InvalidArgument { detail })?,
                )
            }
        };

        let message = match args.get(1) {
            None => None,
            Some(arg) => Some(
                arg.as_data()
                    .and_then(|data| data.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| ExpectationError::InvalidArgument {
                        detail: format!(
                            "trigger message filter must be a string, got {}",
                            arg.type_label()
                        ),
                    })?,
            ),
        };

        Ok((level, message))
    }

    fn counting_hook(
        level: Option<DiagnosticLevel>,
        message: Option<String>,
        counter: Arc<AtomicUsize>,
        previous: Option<DiagnosticHook>,
    ) -> DiagnosticHook {
        Arc::new(move |diagnostic: &Diagnostic| {
            let level_matches = level.map_or(true, |expected| diagnostic.level == expected);
            let message_matches = message
                .as_ref()
                .map_or(true, |expected| diagnostic.message.contains(expected.as_str()));

            if level_matches && message_matches {
                counter.fetch_add(1, Ordering::SeqCst);
            } else if let Some(previous) = &previous {
                previous(diagnostic);
            }
        })
    }

    fn build(
        &self,
        polarity: Polarity,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        let (level, message) = Self::unpack_filters(args)?;
        let call = match subject {
            Value::Call(call) => call.clone(),
            other => {
                return Err(ExpectationError::InvalidArgument {
                    detail: format!(
                        "the trigger matcher requires a pending method call subject, got {}",
                        other.type_label()
                    ),
                })
            }
        };

        let unwrapper = self.unwrapper;
        Ok(Some(DelayedCall::new(move || {
            // Capability check happens before any hook is installed.
            let (receiver, method, call_args) = resolve_method_call(&call, unwrapper)?;

            let counter = Arc::new(AtomicUsize::new(0));
            let outcome = {
                let previous = diagnostics::current();
                let hook =
                    Self::counting_hook(level, message.clone(), counter.clone(), previous);
                let _guard = HookGuard::install(hook);
                receiver.call(&method, &call_args)
                // Guard drops here: the previous hook is back even when the
                // call raised.
            };
            let value = outcome?;

            let triggered = counter.load(Ordering::SeqCst);
            match polarity {
                Polarity::Positive if triggered == 0 => {
                    Err(ExpectationError::NoDiagnosticsTriggered)
                }
                Polarity::Negative if triggered > 0 => {
                    Err(ExpectationError::UnexpectedDiagnosticsTriggered(triggered))
                }
                _ => Ok(value),
            }
        })))
    }
}

impl Matcher for TriggerMatcher {
    fn name(&self) -> &'static str {
        "trigger"
    }

    fn priority(&self) -> i32 {
        1
    }

    fn supports(&self, name: &str, _subject: &Value, _args: &[Value]) -> bool {
        name == "trigger"
    }

    fn positive_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        self.build(Polarity::Positive, subject, args)
    }

    fn negative_match(
        &self,
        _name: &str,
        subject: &Value,
        args: &[Value],
    ) -> Result<Option<DelayedCall>, ExpectationError> {
        self.build(Polarity::Negative, subject, args)
    }
}
