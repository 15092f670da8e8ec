//! Service wiring: validators, stores and the session manager shared by all handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use kindaebay_accounts::{
    Account, AccountDirectory, AccountService, CommonPasswords, InMemoryAccountDirectory,
    PasswordHasher, SessionManager,
};
use kindaebay_core::{AccountId, DomainError, FieldErrors, ProductId};
use kindaebay_products::{
    CatalogQuery, InMemoryProductCatalog, ListingForm, ListingRules, ListingValidator, Product,
    ProductCatalog, Publisher,
};

use crate::config::{AppConfig, ConfigError};

/// Directory handle shared between the account service and its identity rules.
pub type Directory = Arc<InMemoryAccountDirectory>;

/// Everything a request handler needs. Immutable after start-up apart from
/// the stores' interior locks.
pub struct AppServices {
    pub listings: ListingValidator,
    pub catalog: InMemoryProductCatalog,
    pub accounts: AccountService<Directory>,
    pub sessions: SessionManager,
}

/// Why a listing could not be published.
#[derive(Debug)]
pub enum PublishError {
    Invalid(FieldErrors),
    Domain(DomainError),
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let common = match &config.common_passwords_path {
            Some(path) => {
                let list = CommonPasswords::load(path).map_err(|e| ConfigError::CommonPasswords {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                tracing::info!(path = %path.display(), entries = list.len(), "loaded common password list");
                list
            }
            None => CommonPasswords::builtin(),
        };

        let hasher = PasswordHasher::new(config.password_iterations).map_err(|e| ConfigError::Invalid {
            var: "KINDAEBAY_PASSWORD_ITERATIONS",
            reason: e.to_string(),
        })?;

        let directory: Directory = Arc::new(InMemoryAccountDirectory::new());
        let accounts = AccountService::new(
            directory,
            config.registration.clone(),
            Arc::new(common),
            hasher,
        );

        Ok(Self {
            listings: ListingValidator::new(ListingRules::with_labels(config.label_vocabulary)),
            catalog: InMemoryProductCatalog::new(),
            accounts,
            sessions: SessionManager::new(config.jwt_secret.as_bytes(), config.session_ttl),
        })
    }

    /// Validate a listing and publish it under `account`.
    pub fn publish_listing(
        &self,
        form: &ListingForm,
        account: &Account,
        now: DateTime<Utc>,
    ) -> Result<Product, PublishError> {
        let listing = self.listings.validate(form).map_err(PublishError::Invalid)?;
        let publisher = Publisher {
            account_id: account.id_typed(),
            username: account.username().to_string(),
        };
        let product = Product::publish(ProductId::new(), listing, publisher, now)
            .map_err(PublishError::Domain)?;
        self.catalog
            .insert(product.clone())
            .map_err(PublishError::Domain)?;

        tracing::info!(
            product_id = %product.id_typed(),
            publisher = %account.username(),
            "product published"
        );
        Ok(product)
    }

    pub fn products_search(&self, query: &CatalogQuery) -> Vec<Product> {
        self.catalog.search(query)
    }

    pub fn product_get(&self, id: &ProductId) -> Option<Product> {
        self.catalog.get(id)
    }

    /// Active account behind a session, if it still exists.
    pub fn session_account(&self, id: &AccountId) -> Option<Account> {
        self.accounts
            .directory()
            .get(id)
            .filter(Account::is_active)
    }
}
