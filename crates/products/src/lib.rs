//! Product listings: validation, the published product record, and the
//! catalogue it lands in.
//!
//! Everything here is deterministic domain logic; the HTTP layer maps form
//! submissions onto [`ListingForm`] and publishes accepted listings.

pub mod catalog;
pub mod listing;
pub mod price;
pub mod product;
pub mod rules;

pub use catalog::{CatalogQuery, InMemoryProductCatalog, ProductCatalog};
pub use listing::{fields, ListingForm, ListingValidator, ValidListing};
pub use price::{DecimalShape, Price};
pub use product::{Product, Publisher};
pub use rules::{LabelVocabulary, ListingRules};
