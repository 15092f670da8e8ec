//! Account use cases: register, authenticate, list peers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use kindaebay_core::{AccountId, DomainError, FieldErrors};

use crate::account::Account;
use crate::common_passwords::CommonPasswords;
use crate::directory::AccountDirectory;
use crate::identity::{StandardIdentityRules, USERNAME_TAKEN_MESSAGE};
use crate::login::{LoginError, LoginForm};
use crate::password::PasswordHasher;
use crate::registration::{fields, RegistrationForm, RegistrationPolicy, RegistrationValidator};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RegisterError {
    #[error("registration invalid: {0}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Domain(DomainError),
}

pub struct AccountService<D> {
    directory: D,
    validator: RegistrationValidator<StandardIdentityRules<D>>,
    hasher: PasswordHasher,
}

impl<D> AccountService<D>
where
    D: AccountDirectory + Clone,
{
    pub fn new(
        directory: D,
        policy: RegistrationPolicy,
        common: Arc<CommonPasswords>,
        hasher: PasswordHasher,
    ) -> Self {
        let rules = StandardIdentityRules::new(directory.clone(), common);
        Self {
            directory,
            validator: RegistrationValidator::new(rules, policy),
            hasher,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Validate, hash and store a new account.
    pub fn register(&self, form: &RegistrationForm, now: DateTime<Utc>) -> Result<Account, RegisterError> {
        let valid = self.validator.validate(form).map_err(RegisterError::Invalid)?;
        let hash = self.hasher.hash(&valid.password);
        let account = Account::new(AccountId::new(), valid.username, valid.email, hash, now);

        match self.directory.insert(account.clone()) {
            Ok(()) => {}
            // Lost a race with a concurrent registration for the same name.
            Err(DomainError::Conflict(_)) => {
                let mut errors = FieldErrors::new();
                errors.add(fields::USERNAME, USERNAME_TAKEN_MESSAGE);
                return Err(RegisterError::Invalid(errors));
            }
            Err(e) => return Err(RegisterError::Domain(e)),
        }

        tracing::info!(account_id = %account.id_typed(), username = %account.username(), "account registered");
        Ok(account)
    }

    /// Resolve credentials to an active account.
    pub fn authenticate(&self, form: &LoginForm) -> Result<Account, LoginError> {
        let (username, password) = form.credentials()?;

        let Some(account) = self.directory.find_by_username(username) else {
            self.hasher.verify_decoy(password);
            tracing::debug!(username, "login for unknown username");
            return Err(LoginError::InvalidCredentials);
        };

        if !self.hasher.verify(password, account.password_hash()) || !account.is_active() {
            tracing::debug!(username, "login rejected");
            return Err(LoginError::InvalidCredentials);
        }

        Ok(account)
    }

    /// Every account except `me`, oldest first.
    pub fn others(&self, me: &AccountId) -> Vec<Account> {
        self.directory
            .list()
            .into_iter()
            .filter(|a| a.id_typed() != *me)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryAccountDirectory;

    fn service() -> AccountService<Arc<InMemoryAccountDirectory>> {
        AccountService::new(
            Arc::new(InMemoryAccountDirectory::new()),
            RegistrationPolicy::default(),
            Arc::new(CommonPasswords::builtin()),
            PasswordHasher::new(5).unwrap(),
        )
    }

    fn signup(username: &str, email: &str, password: &str) -> RegistrationForm {
        RegistrationForm {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password1: Some(password.to_string()),
            password2: Some(password.to_string()),
        }
    }

    #[test]
    fn register_then_authenticate() {
        let svc = service();
        let account = svc
            .register(&signup("testuser", "testUser@case.edu", "mytestpassword"), Utc::now())
            .unwrap();

        assert!(account.password_hash().starts_with("pbkdf2_sha256$"));
        assert_ne!(account.password_hash(), "mytestpassword");

        let found = svc
            .authenticate(&LoginForm::new("testuser", "mytestpassword"))
            .unwrap();
        assert_eq!(found.id_typed(), account.id_typed());
    }

    #[test]
    fn second_registration_with_same_name_fails() {
        let svc = service();
        svc.register(&signup("testuser", "a@case.edu", "mytestpassword"), Utc::now())
            .unwrap();

        match svc.register(&signup("testuser", "b@case.edu", "mytestpassword"), Utc::now()) {
            Err(RegisterError::Invalid(errors)) => {
                assert_eq!(errors.get(fields::USERNAME), [USERNAME_TAKEN_MESSAGE]);
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn wrong_password_and_unknown_user_are_indistinguishable() {
        let svc = service();
        svc.register(&signup("testuser", "testUser@case.edu", "mytestpassword"), Utc::now())
            .unwrap();

        assert_eq!(
            svc.authenticate(&LoginForm::new("testuser", "usertest1234")),
            Err(LoginError::InvalidCredentials)
        );
        assert_eq!(
            svc.authenticate(&LoginForm::new("userNotExists", "testuser")),
            Err(LoginError::InvalidCredentials)
        );
    }

    #[test]
    fn inactive_account_cannot_log_in() {
        let svc = service();
        let account = svc
            .register(&signup("inuser", "inuser@case.edu", "inpassword"), Utc::now())
            .unwrap();
        svc.directory().set_active(&account.id_typed(), false).unwrap();

        assert_eq!(
            svc.authenticate(&LoginForm::new("inuser", "inpassword")),
            Err(LoginError::InvalidCredentials)
        );
    }

    #[test]
    fn others_excludes_caller() {
        let svc = service();
        let me = svc
            .register(&signup("alice", "alice@case.edu", "grapefruit9"), Utc::now())
            .unwrap();
        svc.register(&signup("bob", "bob@case.edu", "grapefruit9"), Utc::now())
            .unwrap();

        let names: Vec<String> = svc
            .others(&me.id_typed())
            .iter()
            .map(|a| a.username().to_string())
            .collect();
        assert_eq!(names, ["bob"]);
    }
}
