//! Attribute catalog (C5): a second-order graph of `IS_ATTRIBUTE` edges
//! linking attribute entries to the entity that owns them, plus the
//! `StorageKind` each attribute was classified as on first write.
//!
//! Grounded on the same `RwLock<HashMap<...>>` ownership pattern as
//! [`crate::graph::GraphStore`] — the catalog is itself a small graph, kept
//! separate from entity/relationship storage because its lifecycle (one
//! entry per attribute name, overwritten on reclassification) differs from
//! relationship lifecycle (append-only, explicitly deleted).

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use entity_types::{EntityError, StorageKind};
use serde_json::Value;

/// One `IS_ATTRIBUTE` catalog entry: which entity owns `attribute_name`,
/// what kind of backend its values are classified into, where those values
/// physically live, and when the entry was first seen / last reclassified.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub attribute_id: String,
    pub entity_id: String,
    pub attribute_name: String,
    pub storage_kind: StorageKind,
    pub storage_path: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub schema_snapshot: Option<Value>,
}

#[derive(Debug, Default)]
pub struct AttributeCatalog {
    entries: RwLock<HashMap<(String, String), CatalogEntry>>,
}

impl AttributeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or overwrites the catalog entry for `(entity_id,
    /// attribute_name)`. Reclassification (the attribute's shape changes
    /// between writes) replaces the prior entry outright — the catalog
    /// tracks current placement, not history. `created` is preserved across
    /// an overwrite; `updated` is bumped to now on every call.
    pub fn put(
        &self,
        entity_id: &str,
        attribute_name: &str,
        storage_kind: StorageKind,
        schema_snapshot: Option<Value>,
    ) -> CatalogEntry {
        let storage_path = storage_kind.storage_path(entity_id, attribute_name);
        let attribute_id = format!("{entity_id}_attr_{attribute_name}");
        let now = Utc::now();
        let key = (entity_id.to_string(), attribute_name.to_string());
        let mut entries = self.entries.write().expect("catalog lock poisoned");
        let created = entries.get(&key).map(|e| e.created).unwrap_or(now);
        let entry = CatalogEntry {
            attribute_id,
            entity_id: entity_id.to_string(),
            attribute_name: attribute_name.to_string(),
            storage_kind,
            storage_path,
            created,
            updated: now,
            schema_snapshot,
        };
        entries.insert(key, entry.clone());
        entry
    }

    pub fn get(&self, entity_id: &str, attribute_name: &str) -> Result<CatalogEntry, EntityError> {
        self.entries
            .read()
            .expect("catalog lock poisoned")
            .get(&(entity_id.to_string(), attribute_name.to_string()))
            .cloned()
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })
    }

    /// All catalog entries owned by `entity_id`, in no particular order.
    pub fn list_for_entity(&self, entity_id: &str) -> Vec<CatalogEntry> {
        self.entries
            .read()
            .expect("catalog lock poisoned")
            .values()
            .filter(|e| e.entity_id == entity_id)
            .cloned()
            .collect()
    }

    pub fn remove(&self, entity_id: &str, attribute_name: &str) -> Option<CatalogEntry> {
        self.entries
            .write()
            .expect("catalog lock poisoned")
            .remove(&(entity_id.to_string(), attribute_name.to_string()))
    }
}
