//! Baseline identity rules (username policy, password strength heuristics).
//!
//! The registration validator consumes these through [`IdentityRules`] and
//! surfaces their messages unchanged.

use std::sync::Arc;

use crate::common_passwords::CommonPasswords;
use crate::directory::AccountDirectory;
use crate::similarity::too_similar;

pub const USERNAME_TAKEN_MESSAGE: &str = "A user with that username already exists.";
pub const USERNAME_INVALID_MESSAGE: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const PASSWORD_COMMON_MESSAGE: &str = "This password is too common.";
pub const PASSWORD_NUMERIC_MESSAGE: &str = "This password is entirely numeric.";

/// The account attributes a password is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CandidateAccount<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
}

/// Baseline account rules provided by the identity subsystem.
pub trait IdentityRules: Send + Sync {
    /// Problems with a (trimmed, non-empty) username: character set, length, uniqueness.
    fn username_errors(&self, username: &str) -> Vec<String>;

    /// Strength problems with a password for the given candidate account.
    fn password_errors(&self, password: &str, candidate: &CandidateAccount<'_>) -> Vec<String>;
}

impl<R> IdentityRules for Arc<R>
where
    R: IdentityRules + ?Sized,
{
    fn username_errors(&self, username: &str) -> Vec<String> {
        (**self).username_errors(username)
    }

    fn password_errors(&self, password: &str, candidate: &CandidateAccount<'_>) -> Vec<String> {
        (**self).password_errors(password, candidate)
    }
}

/// Default identity rules backed by an account directory.
#[derive(Debug, Clone)]
pub struct StandardIdentityRules<D> {
    directory: D,
    common: Arc<CommonPasswords>,
    username_max_chars: usize,
    max_similarity: f64,
}

impl<D> StandardIdentityRules<D>
where
    D: AccountDirectory,
{
    pub fn new(directory: D, common: Arc<CommonPasswords>) -> Self {
        Self {
            directory,
            common,
            username_max_chars: 150,
            max_similarity: 0.7,
        }
    }
}

fn username_char_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-')
}

impl<D> IdentityRules for StandardIdentityRules<D>
where
    D: AccountDirectory,
{
    fn username_errors(&self, username: &str) -> Vec<String> {
        let mut errors = Vec::new();

        let len = username.chars().count();
        if len > self.username_max_chars {
            errors.push(format!(
                "Ensure this value has at most {} characters (it has {len}).",
                self.username_max_chars
            ));
        }
        if !username.chars().all(username_char_allowed) {
            errors.push(USERNAME_INVALID_MESSAGE.to_string());
        }
        // Uniqueness only matters for an otherwise acceptable name.
        if errors.is_empty() && self.directory.username_taken(username) {
            errors.push(USERNAME_TAKEN_MESSAGE.to_string());
        }

        errors
    }

    fn password_errors(&self, password: &str, candidate: &CandidateAccount<'_>) -> Vec<String> {
        let mut errors = Vec::new();

        let attributes = [
            (candidate.username, "username"),
            (candidate.email, "email address"),
        ];
        if let Some((_, name)) = attributes.iter().find(|(value, _)| {
            value.is_some_and(|v| !v.is_empty() && too_similar(password, v, self.max_similarity))
        }) {
            errors.push(format!("The password is too similar to the {name}."));
        }

        if self.common.contains(password) {
            errors.push(PASSWORD_COMMON_MESSAGE.to_string());
        }

        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            errors.push(PASSWORD_NUMERIC_MESSAGE.to_string());
        }

        errors
    }
}
