//! Attribute dispatch engine (C6): classify → catalog → resolve → report.
//!
//! Grounded on `in-mem-db-runtime::runtime::Runtime::process_request`'s
//! match-and-delegate shape, generalized from "one request, one handler"
//! to "one attribute, one backend resolver chosen by its catalog entry".

use std::collections::HashMap;
use std::sync::Arc;

use entity_core::{classify, AttributeCatalog};
use entity_types::{EntityError, StorageKind, TemporalValue};
use tracing::{debug, warn};

use crate::request::{is_hard_failure, AttributeWrite, DispatchOutcome, ReadOptions};
use crate::resolver::Resolver;

/// Owns the catalog and one resolver per `StorageKind`, and carries out the
/// classify → catalog → resolve → report pipeline for attribute writes and
/// reads. Resolvers are trait objects so `entity-service` can wire real or
/// test doubles without this engine knowing which.
pub struct AttributeDispatchEngine {
    catalog: Arc<AttributeCatalog>,
    resolvers: HashMap<StorageKind, Arc<dyn Resolver>>,
}

impl AttributeDispatchEngine {
    pub fn new(catalog: Arc<AttributeCatalog>, resolvers: HashMap<StorageKind, Arc<dyn Resolver>>) -> Self {
        Self { catalog, resolvers }
    }

    fn resolver_for(&self, kind: StorageKind) -> Result<&Arc<dyn Resolver>, EntityError> {
        self.resolvers
            .get(&kind)
            .ok_or_else(|| EntityError::Internal(format!("no resolver registered for {kind:?}")))
    }

    /// Classifies `write.value`, records the catalog entry, and delegates
    /// creation to the matching resolver.
    pub fn create_attribute(&self, entity_id: &str, write: &AttributeWrite) -> DispatchOutcome {
        let shape = classify(&write.value.payload);
        let kind = StorageKind::from(shape);
        let resolver = match self.resolver_for(kind) {
            Ok(r) => r,
            Err(e) => return DispatchOutcome::Failed(e),
        };
        match resolver.create(entity_id, &write.attribute_name, write.value.clone()) {
            Ok(()) => {
                self.catalog.put(entity_id, &write.attribute_name, kind, Some(write.value.payload.value.clone()));
                debug!(entity_id, attribute = %write.attribute_name, ?kind, "attribute created");
                DispatchOutcome::Created
            }
            Err(e) => DispatchOutcome::Failed(e),
        }
    }

    pub fn read_attribute(&self, entity_id: &str, attribute_name: &str) -> DispatchOutcome {
        self.read_attribute_with_options(entity_id, attribute_name, &ReadOptions::default())
    }

    /// `options` carries the equality-filter/projection `GetData` contract
    /// (§4.4); resolvers that have no columnar shape to project ignore it.
    pub fn read_attribute_with_options(&self, entity_id: &str, attribute_name: &str, options: &ReadOptions) -> DispatchOutcome {
        match self.catalog.get(entity_id, attribute_name) {
            Ok(entry) => match self.resolver_for(entry.storage_kind) {
                Ok(resolver) => match resolver.read(entity_id, attribute_name, options) {
                    Ok(values) => DispatchOutcome::Read(values),
                    Err(e) => DispatchOutcome::Failed(e),
                },
                Err(e) => DispatchOutcome::Failed(e),
            },
            Err(e) => DispatchOutcome::Failed(e),
        }
    }

    /// Reclassifies `write.value` and routes to whichever resolver the new
    /// shape maps to. A shape change mid-lifetime (e.g. a scalar attribute
    /// later written as a table) moves the catalog entry to the new
    /// backend rather than erroring — the old backend's copy is left
    /// behind, matching the no-rollback design (§9 Open Question).
    pub fn update_attribute(&self, entity_id: &str, write: &AttributeWrite) -> DispatchOutcome {
        let shape = classify(&write.value.payload);
        let kind = StorageKind::from(shape);
        let existing_kind = self.catalog.get(entity_id, &write.attribute_name).ok().map(|e| e.storage_kind);

        let resolver = match self.resolver_for(kind) {
            Ok(r) => r,
            Err(e) => return DispatchOutcome::Failed(e),
        };

        let result = if existing_kind == Some(kind) {
            resolver.update(entity_id, &write.attribute_name, write.value.clone())
        } else {
            resolver.create(entity_id, &write.attribute_name, write.value.clone())
        };

        match result {
            Ok(()) => {
                self.catalog.put(entity_id, &write.attribute_name, kind, Some(write.value.payload.value.clone()));
                DispatchOutcome::Updated
            }
            Err(e) => DispatchOutcome::Failed(e),
        }
    }

    pub fn delete_attribute(&self, entity_id: &str, attribute_name: &str) -> DispatchOutcome {
        let entry = match self.catalog.get(entity_id, attribute_name) {
            Ok(e) => e,
            Err(e) => return DispatchOutcome::Failed(e),
        };
        let resolver = match self.resolver_for(entry.storage_kind) {
            Ok(r) => r,
            Err(e) => return DispatchOutcome::Failed(e),
        };
        match resolver.delete(entity_id, attribute_name) {
            Ok(()) => {
                self.catalog.remove(entity_id, attribute_name);
                DispatchOutcome::Deleted
            }
            Err(e) => DispatchOutcome::Failed(e),
        }
    }

    /// Runs `create_attribute` for every write in `writes`, isolating
    /// per-attribute failures (they're reported, not raised) but
    /// short-circuiting the whole batch the moment a hard failure (backend
    /// unreachable, internal inconsistency) appears, since continuing to
    /// dispatch against a dead backend would just accumulate more of the
    /// same error.
    pub fn create_attributes(
        &self,
        entity_id: &str,
        writes: &[AttributeWrite],
    ) -> Result<Vec<(String, DispatchOutcome)>, EntityError> {
        let mut report = Vec::with_capacity(writes.len());
        for write in writes {
            let outcome = self.create_attribute(entity_id, write);
            if let DispatchOutcome::Failed(err) = &outcome {
                if is_hard_failure(err) {
                    warn!(entity_id, attribute = %write.attribute_name, %err, "aborting attribute batch on hard failure");
                    return Err(err.clone());
                }
            }
            report.push((write.attribute_name.clone(), outcome));
        }
        Ok(report)
    }

    pub fn read_attributes(&self, entity_id: &str, names: &[String]) -> Vec<(String, DispatchOutcome)> {
        names
            .iter()
            .map(|name| (name.clone(), self.read_attribute(entity_id, name)))
            .collect()
    }
}

/// Convenience constructor matching what `entity-service` needs: one
/// `TemporalValue` write per attribute, created as a single-item write.
pub fn single_write(attribute_name: impl Into<String>, value: TemporalValue) -> AttributeWrite {
    AttributeWrite {
        attribute_name: attribute_name.into(),
        value,
    }
}
