//! EntityStore - Host-owned persistence for entities.

use super::{Entity, EntityRef};
use crate::error::StorageError;

/// Load, save and delete host entities.
pub trait EntityStore: Send + Sync {
    /// Load an entity. Returns None if it does not exist.
    fn load(&self, reference: &EntityRef) -> Result<Option<Entity>, StorageError>;

    /// Insert or overwrite an entity.
    fn save(&self, entity: &Entity) -> Result<(), StorageError>;

    /// Delete an entity. Returns true if it existed.
    fn delete(&self, reference: &EntityRef) -> Result<bool, StorageError>;
}
