//! Entity trait defining the common shape of every stored record

/// Store-assigned entity identifier
///
/// Identifiers are positive and assigned on insert; `0` marks an entity that
/// has not been saved yet.
pub type EntityId = i64;

/// Base trait for all stored entities
///
/// Stores rely on it to assign ids on insert and to name the entity in
/// integrity errors.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The singular resource name (e.g., "customer")
    fn resource_name_singular() -> &'static str;

    /// Get the identifier for this entity instance
    fn id(&self) -> EntityId;

    /// Assign the identifier (called by stores on insert)
    fn set_id(&mut self, id: EntityId);
}
