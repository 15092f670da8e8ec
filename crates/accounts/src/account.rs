//! Registered account record.

use chrono::{DateTime, Utc};

use kindaebay_core::{AccountId, Entity};

/// A registered account.
///
/// # Invariants
/// - `username` is unique across the directory (enforced on insert).
/// - The password is only ever held as an encoded salted hash.
/// - Inactive accounts cannot authenticate.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    username: String,
    email: String,
    password_hash: String,
    is_active: bool,
    date_joined: DateTime<Utc>,
}

impl Account {
    pub fn new(
        id: AccountId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        date_joined: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_active: true,
            date_joined,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

// Keeps the password hash out of logs.
impl core::fmt::Debug for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("is_active", &self.is_active)
            .field("date_joined", &self.date_joined)
            .finish_non_exhaustive()
    }
}
