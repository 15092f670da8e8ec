//! Published product record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kindaebay_core::{AccountId, DomainError, DomainResult, Entity, ProductId};

use crate::listing::ValidListing;
use crate::price::Price;

/// The account that submitted a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub account_id: AccountId,
    pub username: String,
}

/// A product as stored in the catalogue.
///
/// Built only from a [`ValidListing`] plus the submitting account; the
/// publisher and publish time are stamped once and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    description: Option<String>,
    price: Price,
    summary: String,
    category: String,
    label: String,
    image: Option<String>,
    publisher: Publisher,
    published_at: DateTime<Utc>,
}

impl Product {
    pub fn publish(
        id: ProductId,
        listing: ValidListing,
        publisher: Publisher,
        published_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if publisher.username.trim().is_empty() {
            return Err(DomainError::invariant("publisher username cannot be empty"));
        }

        Ok(Self {
            id,
            title: listing.title,
            description: listing.description,
            price: listing.price,
            summary: listing.summary,
            category: listing.category,
            label: listing.label,
            image: listing.image,
            publisher,
            published_at,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.title)
    }
}
