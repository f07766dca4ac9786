//! Entity orchestration service (C7): the public CRUD surface that
//! composes the graph, document, and tabular repositories through the
//! attribute dispatch engine.
//!
//! Grounded on `in-mem-db-api::handlers::crud_handlers`'s per-operation
//! method shape, generalized from single-table CRUD to cross-store
//! orchestration. There is deliberately no cross-store transaction here —
//! a partial failure after the graph node is created is never unwound
//! (§9 Open Question decision); callers that need atomicity must retry at
//! a higher level, which mirrors the teacher's own lack of multi-table
//! transactions.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use entity_core::{AttributeCatalog, DocumentStore, GraphStore};
use entity_runtime::{AttributeDispatchEngine, AttributeWrite, DispatchOutcome};
use entity_types::{
    Entity, EntityError, EntityProjection, Relationship, RelationshipFilter, RelationshipView,
};
use tracing::{info, warn};

use crate::filter::filter_active_at;
use crate::request::{EntityFilter, OutputField, ReadEntityRequest, UpdateEntityRequest};

pub struct EntityService {
    graph: Arc<GraphStore>,
    documents: Arc<DocumentStore>,
    catalog: Arc<AttributeCatalog>,
    dispatch: Arc<AttributeDispatchEngine>,
}

impl EntityService {
    pub fn new(
        graph: Arc<GraphStore>,
        documents: Arc<DocumentStore>,
        catalog: Arc<AttributeCatalog>,
        dispatch: Arc<AttributeDispatchEngine>,
    ) -> Self {
        Self { graph, documents, catalog, dispatch }
    }

    /// Writes in the fixed order the no-rollback design depends on:
    /// metadata, then the graph node (where required-field validation
    /// actually happens), then relationships, then attributes. A failure
    /// at any later step leaves the earlier steps' writes in place — the
    /// document upsert in particular can succeed even if the graph node
    /// creation that follows it then fails validation.
    pub fn create_entity(&self, entity: Entity) -> Result<Entity, EntityError> {
        if !entity.metadata.is_empty() {
            self.documents.put_metadata(&entity.id, entity.metadata.clone());
        }

        self.graph.create_entity(&entity)?;

        for relationship in entity.relationships.values() {
            self.graph.create_relationship(&entity.id, relationship.clone())?;
        }

        for (name, values) in &entity.attributes {
            for (i, value) in values.iter().enumerate() {
                let write = AttributeWrite {
                    attribute_name: name.clone(),
                    value: value.clone(),
                };
                let outcome = if i == 0 {
                    self.dispatch.create_attribute(&entity.id, &write)
                } else {
                    self.dispatch.update_attribute(&entity.id, &write)
                };
                if let DispatchOutcome::Failed(err) = outcome {
                    warn!(entity_id = %entity.id, attribute = %name, %err, "attribute dispatch failed during create");
                }
            }
        }

        info!(entity_id = %entity.id, kind = %entity.kind.major, "entity created");
        self.read_entity(&entity.id, &ReadEntityRequest::all())
    }

    /// Best-effort read: a missing attribute or relationship is silently
    /// skipped rather than failing the whole call (§9 Open Question
    /// decision — there is no side-channel reporting what was dropped).
    /// Base fields (`Kind`/`Name`/`Created`/`Terminated`) are always
    /// populated from the graph store regardless of `request.output`;
    /// metadata, relationships, and attributes are populated only when
    /// their tag is present (§4.7) — `output={}` returns just the base
    /// fields with empty collections.
    pub fn read_entity(&self, id: &str, request: &ReadEntityRequest) -> Result<Entity, EntityError> {
        let node = self.graph.read_entity(id)?;

        let mut attributes = HashMap::new();
        if request.output.contains(&OutputField::Attributes) {
            let names = match &request.attribute_names {
                Some(names) => names.clone(),
                None => self
                    .catalog
                    .list_for_entity(id)
                    .into_iter()
                    .map(|e| e.attribute_name)
                    .collect(),
            };

            for name in names {
                let options = request.attribute_options.get(&name).cloned().unwrap_or_default();
                if let DispatchOutcome::Read(mut values) = self.dispatch.read_attribute_with_options(id, &name, &options) {
                    if let Some(at) = request.active_at {
                        values.retain(|v| v.is_active_at(at));
                    }
                    if !values.is_empty() {
                        attributes.insert(name, values);
                    }
                }
            }
        }

        let relationships = if request.output.contains(&OutputField::Relationships) {
            self.graph
                .read_relationships(id)
                .into_iter()
                .map(|v| (v.relationship.id.clone(), v.relationship))
                .collect()
        } else {
            HashMap::new()
        };

        let metadata = if request.output.contains(&OutputField::Metadata) {
            self.documents.read_metadata(&node.id)
        } else {
            HashMap::new()
        };

        Ok(Entity {
            id: node.id.clone(),
            kind: node.kind,
            name: node.name,
            created: node.created,
            terminated: node.terminated,
            metadata,
            attributes,
            relationships,
        })
    }

    /// Applies the node-level patch, then dispatches attribute writes and
    /// deletes independently. Failures in one attribute never block the
    /// others, and the node patch is never undone if a later attribute
    /// write fails.
    pub fn update_entity(&self, id: &str, patch: UpdateEntityRequest) -> Result<Entity, EntityError> {
        self.graph.update_entity(id, patch.name, patch.terminated)?;

        if !patch.metadata_patch.is_empty() {
            self.documents.put_metadata(id, patch.metadata_patch.clone());
        }

        for write in &patch.attribute_writes {
            let outcome = self.dispatch.update_attribute(id, write);
            if let DispatchOutcome::Failed(err) = &outcome {
                if matches!(err, EntityError::NotFound(_)) {
                    let create_outcome = self.dispatch.create_attribute(id, write);
                    if let DispatchOutcome::Failed(create_err) = create_outcome {
                        warn!(entity_id = %id, attribute = %write.attribute_name, %create_err, "attribute create fallback failed during update");
                    }
                } else {
                    warn!(entity_id = %id, attribute = %write.attribute_name, %err, "attribute update failed");
                }
            }
        }

        for name in &patch.attribute_deletes {
            if let DispatchOutcome::Failed(err) = self.dispatch.delete_attribute(id, name) {
                warn!(entity_id = %id, attribute = %name, %err, "attribute delete failed");
            }
        }

        self.read_entity(id, &ReadEntityRequest::all())
    }

    /// Document-only delete (§9 Open Question decision): the node, its
    /// catalog entries, and any tabular/graph-backed attribute values are
    /// left in place. Still validates the entity exists so the call fails
    /// the way a real delete would for an unknown id.
    pub fn delete_entity(&self, id: &str) -> Result<(), EntityError> {
        self.graph.read_entity(id)?;
        self.documents.delete_entity_documents(id);
        Ok(())
    }

    pub fn read_entities(&self, filter: &EntityFilter, active_at: Option<DateTime<Utc>>) -> Result<Vec<EntityProjection>, EntityError> {
        let projections = self.graph.filter_entities(&filter.major, filter.minor.as_deref(), filter.id.as_deref())?;
        Ok(filter_active_at(projections, active_at))
    }

    pub fn create_relationship(&self, from_id: &str, relationship: Relationship) -> Result<Relationship, EntityError> {
        self.graph.create_relationship(from_id, relationship)
    }

    /// Upserts: a known `relationship.id` may only have its `StartTime`/
    /// `EndTime` changed (any attempt to also change `Name` or
    /// `RelatedEntityId` is `UnsupportedField`); an unknown id is created
    /// outright from the full record the caller supplied.
    pub fn update_relationship(&self, from_id: &str, relationship: Relationship) -> Result<Relationship, EntityError> {
        let existing = self
            .graph
            .read_relationships(from_id)
            .into_iter()
            .find(|v| v.relationship.id == relationship.id);

        match existing {
            Some(current) => {
                if current.relationship.name != relationship.name {
                    return Err(EntityError::UnsupportedField(format!(
                        "relationship '{}': Name is immutable",
                        relationship.id
                    )));
                }
                if current.relationship.related_entity_id != relationship.related_entity_id {
                    return Err(EntityError::UnsupportedField(format!(
                        "relationship '{}': RelatedEntityId is immutable",
                        relationship.id
                    )));
                }
                let patch = entity_core::RelationshipPatch {
                    start_time: Some(relationship.start_time),
                    end_time: Some(relationship.end_time),
                };
                self.graph.update_relationship(&relationship.id, patch)
            }
            None => self.graph.create_relationship(from_id, relationship),
        }
    }

    pub fn delete_relationship(&self, relationship_id: &str) -> Result<(), EntityError> {
        self.graph.delete_relationship(relationship_id)
    }

    pub fn read_relationships(&self, entity_id: &str) -> Vec<RelationshipView> {
        self.graph.read_relationships(entity_id)
    }

    pub fn read_relationships_by_name(&self, entity_id: &str, name: &str, active_at: Option<DateTime<Utc>>) -> Vec<RelationshipView> {
        self.graph.read_relationships_by_name(entity_id, name, active_at)
    }

    pub fn read_filtered_relationships(&self, entity_id: &str, filters: &RelationshipFilter, active_at: Option<DateTime<Utc>>) -> Vec<RelationshipView> {
        self.graph.read_filtered_relationships(entity_id, filters, active_at)
    }
}
