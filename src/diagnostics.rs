//! Process-wide diagnostic events and the single-slot observer hook.
//!
//! Code under specification raises warnings, notices and deprecations through
//! [`emit`]. At most one hook observes them at a time; the trigger matcher
//! installs its counting hook through [`HookGuard`], which saves the previous
//! hook and restores it on every exit path, including unwinds. A leaked hook
//! would corrupt diagnostic handling for every subsequent example in the
//! process, so restoration is a correctness invariant, not cleanup.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::Serialize;

/// Severity class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Warning,
    Notice,
    Deprecation,
}

impl FromStr for DiagnosticLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "warning" => Ok(DiagnosticLevel::Warning),
            "notice" => Ok(DiagnosticLevel::Notice),
            "deprecation" => Ok(DiagnosticLevel::Deprecation),
            other => Err(format!(
                "unknown diagnostic level '{other}'; expected warning, notice or deprecation"
            )),
        }
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Notice => write!(f, "notice"),
            DiagnosticLevel::Deprecation => write!(f, "deprecation"),
        }
    }
}

/// A non-fatal runtime signal observed by the trigger matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

/// An installed diagnostic observer.
pub type DiagnosticHook = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

static HOOK: Lazy<Mutex<Option<DiagnosticHook>>> = Lazy::new(|| Mutex::new(None));

/// Deliver a diagnostic to the currently installed hook, if any.
///
/// The hook runs outside the slot lock so it may itself install or forward.
pub fn emit(level: DiagnosticLevel, message: impl Into<String>) {
    let hook = current();
    if let Some(hook) = hook {
        let diagnostic = Diagnostic {
            level,
            message: message.into(),
        };
        hook(&diagnostic);
    }
}

/// Install a hook, returning the previously installed one.
pub fn install(hook: DiagnosticHook) -> Option<DiagnosticHook> {
    replace(Some(hook))
}

/// The currently installed hook.
pub fn current() -> Option<DiagnosticHook> {
    HOOK.lock().clone()
}

fn replace(hook: Option<DiagnosticHook>) -> Option<DiagnosticHook> {
    std::mem::replace(&mut *HOOK.lock(), hook)
}

/// Scoped hook installation: saves the prior hook, installs the new one, and
/// restores the prior hook on drop.
#[must_use = "dropping the guard immediately restores the previous hook"]
pub struct HookGuard {
    previous: Option<DiagnosticHook>,
}

impl HookGuard {
    pub fn install(hook: DiagnosticHook) -> Self {
        Self {
            previous: replace(Some(hook)),
        }
    }
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        replace(self.previous.take());
    }
}

/// Serializes tests that touch the process-wide hook slot.
#[cfg(test)]
pub(crate) static TEST_HOOK_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn emit_without_a_hook_is_a_no_op() {
        let _serial = TEST_HOOK_LOCK.lock();
        emit(DiagnosticLevel::Notice, "nobody listening");
    }

    #[test]
    fn emit_delivers_to_the_installed_hook() {
        let _serial = TEST_HOOK_LOCK.lock();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let _guard = HookGuard::install(Arc::new(move |diagnostic| {
            assert_eq!(diagnostic.level, DiagnosticLevel::Warning);
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        emit(DiagnosticLevel::Warning, "careful");
        emit(DiagnosticLevel::Warning, "very careful");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn guard_restores_the_previous_hook() {
        let _serial = TEST_HOOK_LOCK.lock();
        let outer: DiagnosticHook = Arc::new(|_| {});
        let previous = install(outer.clone());
        {
            let _guard = HookGuard::install(Arc::new(|_| {}));
            assert!(!Arc::ptr_eq(&current().unwrap(), &outer));
        }
        assert!(Arc::ptr_eq(&current().unwrap(), &outer));
        replace(previous);
    }

    #[test]
    fn guard_restores_on_unwind() {
        let _serial = TEST_HOOK_LOCK.lock();
        let outer: DiagnosticHook = Arc::new(|_| {});
        let previous = install(outer.clone());
        let result = std::panic::catch_unwind(|| {
            let _guard = HookGuard::install(Arc::new(|_| {}));
            panic!("mid-verification unwind");
        });
        assert!(result.is_err());
        assert!(Arc::ptr_eq(&current().unwrap(), &outer));
        replace(previous);
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(
            "Warning".parse::<DiagnosticLevel>().unwrap(),
            DiagnosticLevel::Warning
        );
        assert_eq!(
            "DEPRECATION".parse::<DiagnosticLevel>().unwrap(),
            DiagnosticLevel::Deprecation
        );
        assert!("fatal".parse::<DiagnosticLevel>().is_err());
    }
}
