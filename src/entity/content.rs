use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{EntityRef, FieldValue};

/// A content entity as seen by the rating core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    reference: EntityRef,
    bundle: String,
    published: bool,
    owner: Option<u64>,
    fields: BTreeMap<String, FieldValue>,
}

impl Entity {
    /// Create a published entity whose bundle matches its type.
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let reference = EntityRef::new(entity_type, entity_id);
        Entity {
            bundle: reference.entity_type.clone(),
            reference,
            published: true,
            owner: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_bundle(mut self, bundle: impl Into<String>) -> Self {
        self.bundle = bundle.into();
        self
    }

    pub fn with_owner(mut self, owner: u64) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn reference(&self) -> &EntityRef {
        &self.reference
    }

    pub fn entity_type(&self) -> &str {
        &self.reference.entity_type
    }

    pub fn id(&self) -> &str {
        &self.reference.entity_id
    }

    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    pub fn owner(&self) -> Option<u64> {
        self.owner
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Current value of a rating field; `None` when absent, empty, or not a rating.
    pub fn rating(&self, name: &str) -> Option<i32> {
        match self.fields.get(name) {
            Some(FieldValue::Rating(value)) => *value,
            _ => None,
        }
    }

    pub fn set_rating(&mut self, name: impl Into<String>, rating: i32) {
        self.fields.insert(name.into(), FieldValue::Rating(Some(rating)));
    }

    /// The entity a reference field points at, if it is a populated reference.
    pub fn referenced(&self, name: &str) -> Option<&EntityRef> {
        match self.fields.get(name) {
            Some(FieldValue::Reference(target)) => target.as_ref(),
            _ => None,
        }
    }
}
