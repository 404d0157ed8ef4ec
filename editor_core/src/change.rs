//! Change payloads emitted by an editing widget

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors at the widget boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("Editor emitted non-string content ({found})")]
    NonStringContent { found: &'static str },

    #[error("Change rejected: {0}")]
    Rejected(String),
}

/// The editor's serialized HTML after a user mutation
///
/// Carried verbatim; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentChange(String);

impl ContentChange {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Validates a payload from a dynamically-typed widget bridge
    ///
    /// Only JSON strings are content. `null`, numbers, arrays and objects are
    /// contract violations.
    pub fn from_value(value: Value) -> Result<Self, SurfaceError> {
        match value {
            Value::String(html) => Ok(Self(html)),
            other => Err(SurfaceError::NonStringContent {
                found: value_kind(&other),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ContentChange {
    fn from(html: String) -> Self {
        Self(html)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
