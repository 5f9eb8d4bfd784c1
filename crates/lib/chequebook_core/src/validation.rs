//! Field-level validation errors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation failures keyed by request field name.
///
/// Serializes as a flat JSON object (`{"notify_sms": "…"}`), which is the
/// `errors` member of a failed response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Creates an empty set of field errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single field error.
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records an error for `field`. A later message for the same field wins.
    pub fn add(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the message recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// True when an optional text input is absent or blank.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn recorded_errors_are_returned() {
        let mut errors = FieldErrors::new();
        errors.add("branch_code", "Branch code is required");
        errors.add("notify_sms", "SMS notification preference is required");

        let errors = errors.into_result().unwrap_err();
        assert_eq!(errors.get("branch_code"), Some("Branch code is required"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), ["branch_code", "notify_sms"]);
    }

    #[test]
    fn serializes_as_flat_object() {
        let errors = FieldErrors::single("status", "bad");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "bad" }));
    }

    #[test]
    fn display_joins_fields() {
        let mut errors = FieldErrors::new();
        errors.add("a", "one");
        errors.add("b", "two");
        assert_eq!(errors.to_string(), "a: one; b: two");
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(None));
        assert!(is_blank(Some("  ")));
        assert!(!is_blank(Some("ACC1")));
    }
}
