//! Rendering of values for failure messages.

use crate::value::Value;

/// Renders arbitrary values to human-readable strings.
///
/// Matchers consume this to build failure text; the surrounding tool provides
/// richer implementations for its console output.
pub trait Presenter: Send + Sync {
    fn present(&self, value: &Value) -> String;
}

/// Default presenter: compact JSON for data, type labels for everything else.
#[derive(Debug, Default)]
pub struct PlainPresenter;

impl Presenter for PlainPresenter {
    fn present(&self, value: &Value) -> String {
        match value {
            Value::Data(data) => data.to_string(),
            Value::Wrapped(inner) => self.present(inner),
            other => format!("<{}>", other.type_label()),
        }
    }
}
