//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Customers, products and orders are all entities: two rows with the same id
/// are the same thing, whatever their other fields say.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
