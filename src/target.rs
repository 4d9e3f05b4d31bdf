//! Target bridge - find the second entity that mirrors a rated entity's votes.

use crate::config::FieldConfig;
use crate::entity::{Entity, EntityStore};
use crate::error::StorageError;

/// Resolves vote-mirroring targets through a reference ("bridge") field.
pub struct TargetResolver<E> {
    entities: E,
}

impl<E: EntityStore> TargetResolver<E> {
    pub fn new(entities: E) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &E {
        &self.entities
    }

    /// The target entity for `entity` under `config`, if bridging applies.
    ///
    /// Misconfiguration (no bridge field, bridge not a reference, dangling
    /// reference, target without the rating field) resolves to `None`. Only
    /// entity store failures are errors.
    pub fn resolve(
        &self,
        entity: &Entity,
        config: &FieldConfig,
    ) -> Result<Option<Entity>, StorageError> {
        let settings = &config.target;
        if !settings.enabled {
            return Ok(None);
        }
        if !entity.has_field(&settings.bridge_field) {
            return Ok(None);
        }
        let Some(reference) = entity.referenced(&settings.bridge_field) else {
            return Ok(None);
        };

        match self.entities.load(reference)? {
            Some(target) if target.has_field(&settings.fivestar_field) => Ok(Some(target)),
            _ => Ok(None),
        }
    }
}
