use std::collections::HashMap;
use std::sync::RwLock;

use entity_types::{EntityError, Payload, TemporalValue};

/// In-process stand-in for a MongoDB wire-protocol connection. Holds two
/// independent collections keyed by entity id: free-form metadata (a flat
/// field map, non-temporal) and document-classified attribute histories
/// (one sub-document per attribute name).
#[derive(Debug, Default)]
pub struct DocumentStore {
    metadata: RwLock<HashMap<String, HashMap<String, Payload>>>,
    attributes: RwLock<HashMap<String, HashMap<String, Vec<TemporalValue>>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_metadata(&self, entity_id: &str, metadata: HashMap<String, Payload>) {
        self.metadata
            .write()
            .expect("document store lock poisoned")
            .insert(entity_id.to_string(), metadata);
    }

    pub fn read_metadata(&self, entity_id: &str) -> HashMap<String, Payload> {
        self.metadata
            .read()
            .expect("document store lock poisoned")
            .get(entity_id)
            .cloned()
            .unwrap_or_default()
    }

    /// `DeleteEntity` is document-only (Invariant decision): drop both
    /// collections for `entity_id`, leaving graph/catalog/tabular state
    /// untouched.
    pub fn delete_entity_documents(&self, entity_id: &str) {
        self.metadata
            .write()
            .expect("document store lock poisoned")
            .remove(entity_id);
        self.attributes
            .write()
            .expect("document store lock poisoned")
            .remove(entity_id);
    }

    /// Appends `value` to the attribute's history. First write for a given
    /// `(entity_id, attribute_name)` creates the sub-document.
    pub fn create_attribute(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) {
        let mut attrs = self.attributes.write().expect("document store lock poisoned");
        attrs
            .entry(entity_id.to_string())
            .or_default()
            .entry(attribute_name.to_string())
            .or_default()
            .push(value);
    }

    pub fn read_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
    ) -> Result<Vec<TemporalValue>, EntityError> {
        self.attributes
            .read()
            .expect("document store lock poisoned")
            .get(entity_id)
            .and_then(|m| m.get(attribute_name))
            .cloned()
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })
    }

    /// Replaces the attribute's entire sub-document with a single current
    /// value, per the update contract decided for document-classified
    /// attributes: update replaces, it does not append to history.
    pub fn update_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
        value: TemporalValue,
    ) -> Result<(), EntityError> {
        let mut attrs = self.attributes.write().expect("document store lock poisoned");
        let owner = attrs
            .get_mut(entity_id)
            .and_then(|m| m.get_mut(attribute_name))
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })?;
        *owner = vec![value];
        Ok(())
    }

    pub fn delete_attribute(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError> {
        let mut attrs = self.attributes.write().expect("document store lock poisoned");
        let owned = attrs
            .get_mut(entity_id)
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })?;
        owned
            .remove(attribute_name)
            .map(|_| ())
            .ok_or_else(|| EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}")))
    }
}
