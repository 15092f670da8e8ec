//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: a `Price` of
/// `99.99` equals any other `Price` of `99.99`, and a choice vocabulary is
/// defined entirely by its entries.
///
/// - **Value Object**: no identity (`Price`, `ChoiceSet`)
/// - **Entity**: has identity (`Account`, `Product`)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
