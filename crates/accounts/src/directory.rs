//! Account directory: storage and lookup of registered accounts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use kindaebay_core::{AccountId, DomainError, DomainResult};

use crate::account::Account;

/// Account storage abstraction.
///
/// `insert` is the single point where username uniqueness is enforced, so
/// two registrations racing past validation cannot both succeed.
pub trait AccountDirectory: Send + Sync {
    /// Store a new account; `Conflict` if the id or username is taken.
    fn insert(&self, account: Account) -> DomainResult<()>;
    fn get(&self, id: &AccountId) -> Option<Account>;
    /// Exact (case-sensitive) username lookup.
    fn find_by_username(&self, username: &str) -> Option<Account>;
    /// All accounts, oldest first.
    fn list(&self) -> Vec<Account>;
    fn set_active(&self, id: &AccountId, active: bool) -> DomainResult<()>;

    fn username_taken(&self, username: &str) -> bool {
        self.find_by_username(username).is_some()
    }
}

impl<S> AccountDirectory for Arc<S>
where
    S: AccountDirectory + ?Sized,
{
    fn insert(&self, account: Account) -> DomainResult<()> {
        (**self).insert(account)
    }

    fn get(&self, id: &AccountId) -> Option<Account> {
        (**self).get(id)
    }

    fn find_by_username(&self, username: &str) -> Option<Account> {
        (**self).find_by_username(username)
    }

    fn list(&self) -> Vec<Account> {
        (**self).list()
    }

    fn set_active(&self, id: &AccountId, active: bool) -> DomainResult<()> {
        (**self).set_active(id, active)
    }

    fn username_taken(&self, username: &str) -> bool {
        (**self).username_taken(username)
    }
}

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<AccountId, Account>,
    by_username: HashMap<String, AccountId>,
}

/// In-memory directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn insert(&self, account: Account) -> DomainResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("account directory lock poisoned"))?;

        if inner.by_username.contains_key(account.username()) {
            return Err(DomainError::conflict(format!(
                "username '{}' is already registered",
                account.username()
            )));
        }
        let id = account.id_typed();
        if inner.by_id.contains_key(&id) {
            return Err(DomainError::conflict(format!("account {id} already exists")));
        }

        inner.by_username.insert(account.username().to_string(), id);
        inner.by_id.insert(id, account);
        Ok(())
    }

    fn get(&self, id: &AccountId) -> Option<Account> {
        let inner = self.inner.read().ok()?;
        inner.by_id.get(id).cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<Account> {
        let inner = self.inner.read().ok()?;
        let id = inner.by_username.get(username)?;
        inner.by_id.get(id).cloned()
    }

    fn list(&self) -> Vec<Account> {
        let inner = match self.inner.read() {
            Ok(i) => i,
            Err(_) => return vec![],
        };

        let mut accounts: Vec<Account> = inner.by_id.values().cloned().collect();
        accounts.sort_by(|a, b| {
            a.date_joined()
                .cmp(&b.date_joined())
                .then_with(|| a.id_typed().cmp(&b.id_typed()))
        });
        accounts
    }

    fn set_active(&self, id: &AccountId, active: bool) -> DomainResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("account directory lock poisoned"))?;
        let account = inner.by_id.get_mut(id).ok_or_else(DomainError::not_found)?;
        account.set_active(active);
        Ok(())
    }
}
