//! Product catalogue storage and search.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use kindaebay_core::{DomainError, DomainResult, ProductId};

use crate::product::Product;

/// Browse/search filters. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogQuery {
    /// Case-insensitive substring matched against title, summary and description.
    pub q: Option<String>,
    /// Exact category code.
    pub category: Option<String>,
    /// Exact publisher username.
    pub publisher: Option<String>,
}

impl CatalogQuery {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = non_blank(&self.category) {
            if product.category() != category {
                return false;
            }
        }
        if let Some(publisher) = non_blank(&self.publisher) {
            if product.publisher().username != publisher {
                return false;
            }
        }
        if let Some(text) = non_blank(&self.q) {
            let needle = text.to_lowercase();
            let haystacks = [
                Some(product.title()),
                Some(product.summary()),
                product.description(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Catalogue storage abstraction.
pub trait ProductCatalog: Send + Sync {
    /// Store a newly published product (conflict if the id already exists).
    fn insert(&self, product: Product) -> DomainResult<()>;
    fn get(&self, id: &ProductId) -> Option<Product>;
    /// All products, newest first.
    fn list(&self) -> Vec<Product>;

    /// Products matching `query`, newest first.
    fn search(&self, query: &CatalogQuery) -> Vec<Product> {
        self.list()
            .into_iter()
            .filter(|p| query.matches(p))
            .collect()
    }
}

impl<S> ProductCatalog for Arc<S>
where
    S: ProductCatalog + ?Sized,
{
    fn insert(&self, product: Product) -> DomainResult<()> {
        (**self).insert(product)
    }

    fn get(&self, id: &ProductId) -> Option<Product> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<Product> {
        (**self).list()
    }

    fn search(&self, query: &CatalogQuery) -> Vec<Product> {
        (**self).search(query)
    }
}

/// In-memory catalogue for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductCatalog for InMemoryProductCatalog {
    fn insert(&self, product: Product) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::invariant("product catalogue lock poisoned"))?;
        let id = product.id_typed();
        if map.contains_key(&id) {
            return Err(DomainError::conflict(format!("product {id} already exists")));
        }
        map.insert(id, product);
        Ok(())
    }

    fn get(&self, id: &ProductId) -> Option<Product> {
        let map = self.inner.read().ok()?;
        map.get(id).cloned()
    }

    fn list(&self) -> Vec<Product> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut products: Vec<Product> = map.values().cloned().collect();
        products.sort_by(|a, b| {
            b.published_at()
                .cmp(&a.published_at())
                .then_with(|| b.id_typed().cmp(&a.id_typed()))
        });
        products
    }
}
