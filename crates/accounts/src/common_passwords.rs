//! Common-password list used by the baseline password rules.

use std::collections::HashSet;
use std::path::Path;

const BUILTIN: &str = include_str!("../data/common-passwords.txt");

/// Set of passwords rejected as too common.
///
/// Entries and candidates are compared trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPasswords {
    passwords: HashSet<String>,
}

impl CommonPasswords {
    /// The list shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_list(BUILTIN)
    }

    /// Parse a newline-separated list; blank lines and `#` comments are skipped.
    pub fn from_list(text: &str) -> Self {
        let passwords = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_lowercase)
            .collect();
        Self { passwords }
    }

    pub fn load(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_list(&text))
    }

    pub fn contains(&self, password: &str) -> bool {
        self.passwords.contains(&password.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

impl Default for CommonPasswords {
    fn default() -> Self {
        Self::builtin()
    }
}
