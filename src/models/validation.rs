use std::collections::BTreeMap;

use crate::error::ApiError;

/// Collects per-field problems so a request reports every omission at once
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// Trimmed, non-empty text or a "<label> is required" error
    pub fn require_text(&mut self, field: &str, label: &str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.add(field, format!("{} is required", label));
                String::new()
            }
        }
    }

    /// Non-empty list of trimmed, non-blank entries
    pub fn require_list(&mut self, field: &str, label: &str, value: Option<Vec<String>>) -> Vec<String> {
        let items = clean_list(value);
        if items.is_empty() {
            self.add(field, format!("{} are required", label));
        }
        items
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self, message: &str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(message, Some(self.errors)))
        }
    }
}

/// Drop blank entries and surrounding whitespace
pub fn clean_list(value: Option<Vec<String>>) -> Vec<String> {
    value
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trimmed text, or None when absent or blank
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
