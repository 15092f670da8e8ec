//! Credential submission for signing in.

use serde::Deserialize;

use kindaebay_core::{cleaned, FieldErrors, REQUIRED_MESSAGE};

pub mod fields {
    pub const USERNAME: &str = "username";
    pub const PASSWORD: &str = "password";
}

pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("login form invalid: {0}")]
    Invalid(FieldErrors),
    #[error("{}", INVALID_LOGIN_MESSAGE)]
    InvalidCredentials,
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl core::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Trimmed username and raw password, or the missing-field errors.
    pub fn credentials(&self) -> Result<(&str, &str), LoginError> {
        let mut errors = FieldErrors::new();

        let username = cleaned(self.username.as_deref());
        if username.is_none() {
            errors.add(fields::USERNAME, REQUIRED_MESSAGE);
        }
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        if password.is_none() {
            errors.add(fields::PASSWORD, REQUIRED_MESSAGE);
        }

        match (username, password) {
            (Some(u), Some(p)) => Ok((u, p)),
            _ => Err(LoginError::Invalid(errors)),
        }
    }
}
