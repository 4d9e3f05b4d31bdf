//! InMemoryEntityStore - HashMap-backed entity store for testing and embedding.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Entity, EntityRef, EntityStore};
use crate::error::StorageError;

/// In-memory entity store. Entities are kept as JSON bytes keyed by `"type:id"`.
/// Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryEntityStore {
    storage: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored entities.
    pub fn len(&self) -> Result<usize, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("entity read"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl EntityStore for InMemoryEntityStore {
    fn load(&self, reference: &EntityRef) -> Result<Option<Entity>, StorageError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StorageError::LockPoisoned("entity read"))?;

        match storage.get(&reference.key()) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, entity: &Entity) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(entity)?;
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StorageError::LockPoisoned("entity write"))?;
        storage.insert(entity.reference().key(), bytes);
        Ok(())
    }

    fn delete(&self, reference: &EntityRef) -> Result<bool, StorageError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StorageError::LockPoisoned("entity write"))?;
        Ok(storage.remove(&reference.key()).is_some())
    }
}
