//! Records with identity.

/// A record whose identity is its id, not its field values.
///
/// Accounts and published products are entities: two records with the same
/// field values but different ids are different records, and a record keeps
/// its id for its whole life.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Whether `other` is the same record, regardless of field values.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
