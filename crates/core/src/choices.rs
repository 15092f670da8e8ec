//! Fixed choice vocabularies (categories, condition labels).
//!
//! A `ChoiceSet` is configuration handed to validators at construction; it
//! is never a process global, so tests can run several vocabularies side by
//! side.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// One entry of a vocabulary: the stored code and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub code: String,
    pub label: String,
}

/// Ordered, duplicate-free vocabulary of codes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
}

impl ChoiceSet {
    /// Build a vocabulary from `(code, label)` pairs.
    ///
    /// Later duplicates of a code are ignored; the first label wins.
    pub fn new<I, C, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, L)>,
        C: Into<String>,
        L: Into<String>,
    {
        let mut choices: Vec<Choice> = Vec::new();
        for (code, label) in entries {
            let code = code.into();
            if choices.iter().any(|c| c.code == code) {
                continue;
            }
            choices.push(Choice {
                code,
                label: label.into(),
            });
        }
        Self { choices }
    }

    /// Exact (case-sensitive) membership test.
    pub fn contains(&self, code: &str) -> bool {
        self.choices.iter().any(|c| c.code == code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(|c| c.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Rejection message for a code outside the vocabulary.
    pub fn invalid_choice_message(code: &str) -> String {
        format!("Select a valid choice. {code} is not one of the available choices.")
    }
}

impl ValueObject for ChoiceSet {}
