//! Runtime configuration, read once at start-up from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

use kindaebay_accounts::password::DEFAULT_ITERATIONS;
use kindaebay_accounts::session::DEFAULT_SESSION_TTL_SECS;
use kindaebay_accounts::RegistrationPolicy;
use kindaebay_products::LabelVocabulary;

pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {reason}")]
    Invalid { var: &'static str, reason: String },
    #[error("failed to load common password list from {path}: {reason}")]
    CommonPasswords { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub registration: RegistrationPolicy,
    pub label_vocabulary: LabelVocabulary,
    pub session_ttl: Duration,
    pub password_iterations: u32,
    /// Replaces the built-in common password list when set.
    pub common_passwords_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            registration: RegistrationPolicy::default(),
            label_vocabulary: LabelVocabulary::default(),
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            password_iterations: DEFAULT_ITERATIONS,
            common_passwords_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("KINDAEBAY_BIND_ADDR") {
            config.bind_addr = parse("KINDAEBAY_BIND_ADDR", &v)?;
        }

        match get("JWT_SECRET") {
            Some(secret) => config.jwt_secret = secret,
            None => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
        }

        if let Some(v) = get("KINDAEBAY_EMAIL_DOMAIN") {
            let domain = v.trim().trim_start_matches('@').to_string();
            if domain.is_empty() {
                return Err(invalid("KINDAEBAY_EMAIL_DOMAIN", "domain cannot be empty"));
            }
            config.registration.email_domain = domain;
        }

        if let Some(v) = get("KINDAEBAY_MIN_PASSWORD_LENGTH") {
            config.registration.min_password_chars = parse("KINDAEBAY_MIN_PASSWORD_LENGTH", &v)?;
        }

        if let Some(v) = get("KINDAEBAY_LABEL_VOCABULARY") {
            config.label_vocabulary = v
                .parse()
                .map_err(|e: String| invalid("KINDAEBAY_LABEL_VOCABULARY", e))?;
        }

        if let Some(v) = get("KINDAEBAY_SESSION_TTL_SECS") {
            let secs: i64 = parse("KINDAEBAY_SESSION_TTL_SECS", &v)?;
            if secs <= 0 {
                return Err(invalid("KINDAEBAY_SESSION_TTL_SECS", "must be positive"));
            }
            config.session_ttl = Duration::try_seconds(secs)
                .ok_or_else(|| invalid("KINDAEBAY_SESSION_TTL_SECS", "out of range"))?;
        }

        if let Some(v) = get("KINDAEBAY_PASSWORD_ITERATIONS") {
            let iterations: u32 = parse("KINDAEBAY_PASSWORD_ITERATIONS", &v)?;
            if iterations == 0 {
                return Err(invalid("KINDAEBAY_PASSWORD_ITERATIONS", "must be positive"));
            }
            config.password_iterations = iterations;
        }

        config.common_passwords_path = get("KINDAEBAY_COMMON_PASSWORDS").map(PathBuf::from);

        Ok(config)
    }

    /// Defaults with a known secret and a cheap hash cost.
    pub fn for_tests(jwt_secret: &str) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: jwt_secret.to_string(),
            password_iterations: 10,
            ..Self::default()
        }
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| invalid(var, e.to_string()))
}

fn invalid(var: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.into(),
    }
}
