//! The JSON envelope every API response body uses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::FieldErrors;

/// `{success, message, data?, count?, errors?, error?}`.
///
/// Successful bodies carry `data` (and `count` when `data` is an array).
/// Failed bodies never carry `data`; they may carry field `errors` and, outside
/// production, a debug `error` string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Envelope<Value> {
    /// Success body. Adds `count` when `data` is a JSON array.
    pub fn success(message: &str, data: Value) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            count: data.as_array().map(Vec::len),
            data: Some(data),
            errors: None,
            error: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Failure body with only a message.
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            data: None,
            count: None,
            errors: None,
            error: None,
        }
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn with_error(mut self, detail: Option<String>) -> Self {
        self.error = detail;
        self
    }
}
