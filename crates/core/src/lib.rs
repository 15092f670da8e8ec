//! `kindaebay-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the listing and
//! account crates (no IO, no HTTP, no storage).

pub mod choices;
pub mod entity;
pub mod error;
pub mod field_errors;
pub mod id;
pub mod value_object;

pub use choices::{Choice, ChoiceSet};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use field_errors::{cleaned, FieldErrors, REQUIRED_MESSAGE};
pub use id::{AccountId, ProductId};
pub use value_object::ValueObject;
