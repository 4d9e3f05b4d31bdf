//! Entities - Host content that carries rating and reference fields.
//!
//! The host application owns its entities. This module gives the rating core
//! a typed view of them (identity, bundle, publish state, owner, named fields)
//! and an `EntityStore` seam for loading bridged targets and persisting
//! submitted ratings.

mod content;
mod in_memory;
mod store;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use content::Entity;
pub use in_memory::InMemoryEntityStore;
pub use store::EntityStore;

/// Identity of any entity: its type id plus its identifier within that type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: String,
    pub entity_id: String,
}

impl EntityRef {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }

    /// Storage key (`"type:id"`).
    pub fn key(&self) -> String {
        format!("{}:{}", self.entity_type, self.entity_id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.entity_id)
    }
}

/// A typed field value. The variant doubles as the field's type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// A rating field holding a 0-100 value.
    Rating(Option<i32>),
    /// A reference to another entity.
    Reference(Option<EntityRef>),
    Integer(Option<i64>),
    Text(Option<String>),
}

impl FieldValue {
    /// Machine name of the field type.
    pub fn field_type(&self) -> &'static str {
        match self {
            FieldValue::Rating(_) => "fivestar",
            FieldValue::Reference(_) => "entity_reference",
            FieldValue::Integer(_) => "integer",
            FieldValue::Text(_) => "string",
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, FieldValue::Reference(_))
    }

    /// A rating with no value, or a zero value, counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Rating(value) => matches!(value, None | Some(0)),
            FieldValue::Reference(target) => target.is_none(),
            FieldValue::Integer(value) => value.is_none(),
            FieldValue::Text(value) => value.as_deref().map_or(true, str::is_empty),
        }
    }
}
