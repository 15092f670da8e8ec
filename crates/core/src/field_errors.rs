//! Field-level validation failures as data.
//!
//! Validators never stop at the first problem: every rule runs and each
//! rejection is recorded against the field it concerns, so a submitter sees
//! all problems at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Message recorded when a required field is missing or blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Mapping from field name to one or more human-readable rejection reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Record several messages against `field` (no-op for an empty iterator).
    pub fn extend_field<I, M>(&mut self, field: &str, messages: I)
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        for message in messages {
            self.add(field, message);
        }
    }

    /// Messages recorded for `field` (empty slice when the field is clean).
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the fields carrying at least one error.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Total number of messages across all fields.
    pub fn message_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Trimmed, non-empty view of a submitted text value.
///
/// Submitted text is whitespace-stripped before any rule runs; a blank value
/// counts as absent.
pub fn cleaned(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
