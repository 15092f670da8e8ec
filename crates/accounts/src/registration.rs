//! Registration Validator.
//!
//! Decides whether a signup submission may create an account. Baseline
//! identity checks come from an [`IdentityRules`] implementation; this module
//! layers the marketplace policy (campus email domain, minimum password
//! length) on top and reports every problem keyed by field.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use kindaebay_core::{cleaned, FieldErrors, REQUIRED_MESSAGE};

use crate::identity::{CandidateAccount, IdentityRules};

pub mod fields {
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PASSWORD1: &str = "password1";
    pub const PASSWORD2: &str = "password2";
}

pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn’t match.";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern compiles")
});

/// A signup submission as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password1: Option<String>,
    pub password2: Option<String>,
}

/// Marketplace-specific registration policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationPolicy {
    /// Domain every registering email must belong to (without the `@`).
    pub email_domain: String,
    pub min_password_chars: usize,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            email_domain: "case.edu".to_string(),
            min_password_chars: 8,
        }
    }
}

impl RegistrationPolicy {
    pub fn domain_message(&self) -> String {
        format!("Only @{} email addresses are allowed", self.email_domain)
    }

    pub fn short_password_message(&self) -> String {
        format!(
            "This password is too short. It must contain at least {} characters.",
            self.min_password_chars
        )
    }

    fn email_in_domain(&self, email: &str) -> bool {
        let suffix = format!("@{}", self.email_domain);
        email.len() >= suffix.len()
            && email
                .get(email.len() - suffix.len()..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(&suffix))
    }
}

/// A registration that passed every rule.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for ValidRegistration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValidRegistration")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationValidator<R> {
    rules: R,
    policy: RegistrationPolicy,
}

impl<R> RegistrationValidator<R>
where
    R: IdentityRules,
{
    pub fn new(rules: R, policy: RegistrationPolicy) -> Self {
        Self { rules, policy }
    }

    pub fn validate(&self, form: &RegistrationForm) -> Result<ValidRegistration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.clean_username(form.username.as_deref(), &mut errors);
        let email = self.clean_email(form.email.as_deref(), &mut errors);

        // Passwords are compared as typed; surrounding whitespace is significant.
        let password1 = raw_required(fields::PASSWORD1, form.password1.as_deref(), &mut errors);
        let password2 = raw_required(fields::PASSWORD2, form.password2.as_deref(), &mut errors);

        let mut password = None;
        if let (Some(p1), Some(p2)) = (password1, password2) {
            if p1 != p2 {
                errors.add(fields::PASSWORD2, PASSWORD_MISMATCH_MESSAGE);
            } else {
                let candidate = CandidateAccount {
                    username: username.as_deref(),
                    email: email.as_deref(),
                };
                let mut problems = self.rules.password_errors(p2, &candidate);
                if p2.chars().count() < self.policy.min_password_chars {
                    problems.push(self.policy.short_password_message());
                }
                if problems.is_empty() {
                    password = Some(p2.to_string());
                } else {
                    errors.extend_field(fields::PASSWORD2, problems);
                }
            }
        }

        match (username, email, password) {
            (Some(username), Some(email), Some(password)) if errors.is_empty() => {
                Ok(ValidRegistration {
                    username,
                    email,
                    password,
                })
            }
            _ => {
                tracing::debug!(
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    messages = errors.message_count(),
                    "registration rejected"
                );
                Err(errors)
            }
        }
    }

    fn clean_username(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
        let Some(username) = cleaned(value) else {
            errors.add(fields::USERNAME, REQUIRED_MESSAGE);
            return None;
        };
        let problems = self.rules.username_errors(username);
        if problems.is_empty() {
            Some(username.to_string())
        } else {
            errors.extend_field(fields::USERNAME, problems);
            None
        }
    }

    fn clean_email(&self, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
        let Some(email) = cleaned(value) else {
            errors.add(fields::EMAIL, REQUIRED_MESSAGE);
            return None;
        };
        if !EMAIL_PATTERN.is_match(email) {
            errors.add(fields::EMAIL, INVALID_EMAIL_MESSAGE);
            return None;
        }
        if !self.policy.email_in_domain(email) {
            errors.add(fields::EMAIL, self.policy.domain_message());
            return None;
        }
        Some(email.to_string())
    }
}

fn raw_required<'a>(field: &str, value: Option<&'a str>, errors: &mut FieldErrors) -> Option<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.add(field, REQUIRED_MESSAGE);
            None
        }
    }
}
