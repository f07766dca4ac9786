use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use entity_types::{
    Direction, Entity, EntityError, EntityProjection, Kind, Relationship, RelationshipFilter,
    RelationshipView, TemporalValue,
};
use tracing::debug;

/// Graph-store projection of an entity: identity, kind, name, and lifecycle.
/// The graph store is authoritative for existence, kind, and lifecycle
/// timestamps (Invariant 5).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub kind: Kind,
    pub name: Option<TemporalValue>,
    pub created: Option<DateTime<Utc>>,
    pub terminated: Option<DateTime<Utc>>,
}

impl From<&GraphNode> for EntityProjection {
    fn from(node: &GraphNode) -> Self {
        EntityProjection {
            id: node.id.clone(),
            kind: node.kind.major.clone(),
            minor_kind: node.kind.minor.clone(),
            name: node.name.clone(),
            created: node.created,
            terminated: node.terminated,
        }
    }
}

#[derive(Debug, Clone)]
struct EdgeRecord {
    from_id: String,
    relationship: Relationship,
}

/// Patch accepted by `update_relationship`; outer `Option` means "this
/// field was present in the request", matching the §4.2 contract that an
/// all-absent patch is `NoValidFields` and any field outside
/// `{StartTime, EndTime}` is rejected by the caller before it reaches here.
#[derive(Debug, Clone, Default)]
pub struct RelationshipPatch {
    pub start_time: Option<Option<DateTime<Utc>>>,
    pub end_time: Option<Option<DateTime<Utc>>>,
}

impl RelationshipPatch {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }
}

/// In-process stand-in for a Bolt-protocol graph store connection.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: RwLock<HashMap<String, GraphNode>>,
    edges: RwLock<HashMap<String, EdgeRecord>>,
    /// Graph-classified attribute values (e.g. an org chart stored as an
    /// opaque `{nodes, edges}` sub-graph) — kept distinct from `nodes`
    /// because these values are never decomposed into addressable entity
    /// nodes of their own.
    attributes: RwLock<HashMap<(String, String), Vec<TemporalValue>>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&self, entity: &Entity) -> Result<GraphNode, EntityError> {
        entity.validate_for_create()?;
        let mut nodes = self.nodes.write().expect("graph store lock poisoned");
        if nodes.contains_key(&entity.id) {
            return Err(EntityError::already_exists("entity", &entity.id));
        }
        let node = GraphNode {
            id: entity.id.clone(),
            kind: entity.kind.clone(),
            name: entity.name.clone(),
            created: entity.created,
            terminated: entity.terminated,
        };
        nodes.insert(node.id.clone(), node.clone());
        debug!(entity_id = %node.id, kind = %node.kind.major, "graph node created");
        Ok(node)
    }

    pub fn read_entity(&self, id: &str) -> Result<GraphNode, EntityError> {
        let nodes = self.nodes.read().expect("graph store lock poisoned");
        nodes
            .get(id)
            .cloned()
            .ok_or_else(|| EntityError::not_found("entity", id))
    }

    /// `patch` is restricted to `Name`/`Terminated`; the caller (C7) is
    /// responsible for rejecting attempts to change `Major`, `Minor`,
    /// `Created`, or `Id` with `Invalid` before calling this.
    pub fn update_entity(
        &self,
        id: &str,
        name: Option<TemporalValue>,
        terminated: Option<Option<DateTime<Utc>>>,
    ) -> Result<GraphNode, EntityError> {
        let mut nodes = self.nodes.write().expect("graph store lock poisoned");
        let node = nodes
            .get_mut(id)
            .ok_or_else(|| EntityError::not_found("entity", id))?;
        if let Some(name) = name {
            node.name = Some(name);
        }
        if let Some(terminated) = terminated {
            node.terminated = terminated;
        }
        Ok(node.clone())
    }

    pub fn delete_entity(&self, id: &str) -> Result<(), EntityError> {
        let edges = self.edges.read().expect("graph store lock poisoned");
        let has_edges = edges
            .values()
            .any(|e| e.from_id == id || e.relationship.related_entity_id == id);
        drop(edges);
        if has_edges {
            return Err(EntityError::HasRelationships(format!(
                "entity '{id}' has attached relationships"
            )));
        }
        let mut nodes = self.nodes.write().expect("graph store lock poisoned");
        nodes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EntityError::not_found("entity", id))
    }

    pub fn create_relationship(
        &self,
        from_id: &str,
        rel: Relationship,
    ) -> Result<Relationship, EntityError> {
        let nodes = self.nodes.read().expect("graph store lock poisoned");
        if !nodes.contains_key(from_id) {
            return Err(EntityError::not_found("entity", from_id));
        }
        if !nodes.contains_key(&rel.related_entity_id) {
            return Err(EntityError::not_found("entity", &rel.related_entity_id));
        }
        drop(nodes);

        let mut edges = self.edges.write().expect("graph store lock poisoned");
        if edges.contains_key(&rel.id) {
            return Err(EntityError::already_exists("relationship", &rel.id));
        }
        edges.insert(
            rel.id.clone(),
            EdgeRecord {
                from_id: from_id.to_string(),
                relationship: rel.clone(),
            },
        );
        Ok(rel)
    }

    pub fn update_relationship(
        &self,
        rel_id: &str,
        patch: RelationshipPatch,
    ) -> Result<Relationship, EntityError> {
        if patch.is_empty() {
            return Err(EntityError::NoValidFields(format!(
                "relationship '{rel_id}' patch carried no recognized field"
            )));
        }
        let mut edges = self.edges.write().expect("graph store lock poisoned");
        let edge = edges
            .get_mut(rel_id)
            .ok_or_else(|| EntityError::not_found("relationship", rel_id))?;
        if let Some(start) = patch.start_time {
            edge.relationship.start_time = start;
        }
        if let Some(end) = patch.end_time {
            edge.relationship.end_time = end;
        }
        Ok(edge.relationship.clone())
    }

    pub fn delete_relationship(&self, rel_id: &str) -> Result<(), EntityError> {
        let mut edges = self.edges.write().expect("graph store lock poisoned");
        edges
            .remove(rel_id)
            .map(|_| ())
            .ok_or_else(|| EntityError::not_found("relationship", rel_id))
    }

    pub fn read_relationships(&self, entity_id: &str) -> Vec<RelationshipView> {
        self.edges
            .read()
            .expect("graph store lock poisoned")
            .values()
            .filter_map(|e| view_for(e, entity_id))
            .collect()
    }

    pub fn read_relationships_by_name(
        &self,
        entity_id: &str,
        name: &str,
        active_at: Option<DateTime<Utc>>,
    ) -> Vec<RelationshipView> {
        self.read_relationships(entity_id)
            .into_iter()
            .filter(|v| v.relationship.name == name)
            .filter(|v| active_at.map(|at| v.relationship.is_active_at(at)).unwrap_or(true))
            .collect()
    }

    pub fn read_filtered_relationships(
        &self,
        entity_id: &str,
        filters: &RelationshipFilter,
        active_at: Option<DateTime<Utc>>,
    ) -> Vec<RelationshipView> {
        self.read_relationships(entity_id)
            .into_iter()
            .filter(|v| filters.is_empty() || filters.matches(v))
            .filter(|v| active_at.map(|at| v.relationship.is_active_at(at)).unwrap_or(true))
            .collect()
    }

    pub fn filter_entities(
        &self,
        major: &str,
        minor: Option<&str>,
        id: Option<&str>,
    ) -> Result<Vec<EntityProjection>, EntityError> {
        if major.is_empty() {
            return Err(EntityError::invalid("Kind.Major", "must not be empty"));
        }
        let nodes = self.nodes.read().expect("graph store lock poisoned");
        let projections = nodes
            .values()
            .filter(|n| n.kind.major == major)
            .filter(|n| minor.map(|m| n.kind.minor == m).unwrap_or(true))
            .filter(|n| id.map(|i| n.id == i).unwrap_or(true))
            .map(EntityProjection::from)
            .collect();
        Ok(projections)
    }
}

impl GraphStore {
    pub fn create_attribute(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) {
        self.attributes
            .write()
            .expect("graph store lock poisoned")
            .entry((entity_id.to_string(), attribute_name.to_string()))
            .or_default()
            .push(value);
    }

    pub fn read_graph_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
    ) -> Result<Vec<TemporalValue>, EntityError> {
        self.attributes
            .read()
            .expect("graph store lock poisoned")
            .get(&(entity_id.to_string(), attribute_name.to_string()))
            .cloned()
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })
    }

    pub fn update_graph_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
        value: TemporalValue,
    ) -> Result<(), EntityError> {
        let mut attrs = self.attributes.write().expect("graph store lock poisoned");
        let owner = attrs
            .get_mut(&(entity_id.to_string(), attribute_name.to_string()))
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })?;
        *owner = vec![value];
        Ok(())
    }

    pub fn delete_graph_attribute(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError> {
        self.attributes
            .write()
            .expect("graph store lock poisoned")
            .remove(&(entity_id.to_string(), attribute_name.to_string()))
            .map(|_| ())
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })
    }
}

fn view_for(edge: &EdgeRecord, entity_id: &str) -> Option<RelationshipView> {
    if edge.from_id == entity_id {
        Some(RelationshipView {
            relationship: edge.relationship.clone(),
            direction: Direction::Outgoing,
        })
    } else if edge.relationship.related_entity_id == entity_id {
        Some(RelationshipView {
            relationship: edge.relationship.clone(),
            direction: Direction::Incoming,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use entity_types::Payload;
    use serde_json::json;

    fn entity(id: &str, major: &str, minor: &str) -> Entity {
        Entity {
            id: id.to_string(),
            kind: Kind::new(major, minor),
            name: Some(
                TemporalValue::new(
                    Some(Utc.with_ymd_and_hms(2025, 3, 18, 0, 0, 0).unwrap()),
                    None,
                    Payload::scalar(json!("John Doe")),
                )
                .unwrap(),
            ),
            created: Some(Utc.with_ymd_and_hms(2025, 3, 18, 0, 0, 0).unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn create_then_read_echoes_kind_major() {
        let store = GraphStore::new();
        store.create_entity(&entity("p1", "Person", "Minister")).unwrap();
        let node = store.read_entity("p1").unwrap();
        assert_eq!(node.kind.major, "Person");
    }

    #[test]
    fn duplicate_entity_id_rejected() {
        let store = GraphStore::new();
        store.create_entity(&entity("k1", "Person", "Employee")).unwrap();
        let err = store.create_entity(&entity("k1", "Person", "Employee")).unwrap_err();
        assert!(matches!(err, EntityError::AlreadyExists(_)));
    }

    #[test]
    fn duplicate_relationship_id_rejected_and_original_preserved() {
        let store = GraphStore::new();
        store.create_entity(&entity("e2", "Org", "Team")).unwrap();
        store.create_entity(&entity("e3", "Person", "Employee")).unwrap();
        store.create_entity(&entity("e4", "Person", "Employee")).unwrap();

        let rel1 = Relationship::new(
            "rid",
            "WORKS_WITH",
            "e2",
            Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()),
            None,
        )
        .unwrap();
        store.create_relationship("e3", rel1).unwrap();

        let rel2 = Relationship::new(
            "rid",
            "MANAGES",
            "e2",
            Some(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
            None,
        )
        .unwrap();
        let err = store.create_relationship("e4", rel2).unwrap_err();
        assert!(matches!(err, EntityError::AlreadyExists(_)));

        let preserved = store.read_relationships("e3");
        assert_eq!(preserved.len(), 1);
        assert_eq!(preserved[0].relationship.name, "WORKS_WITH");
    }

    #[test]
    fn update_relationship_rejects_unsupported_field_via_empty_patch() {
        let store = GraphStore::new();
        store.create_entity(&entity("e1", "Person", "Employee")).unwrap();
        store.create_entity(&entity("e2", "Org", "Team")).unwrap();
        let rel = Relationship::new(
            "r1",
            "MANAGES",
            "e2",
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            None,
        )
        .unwrap();
        store.create_relationship("e1", rel).unwrap();

        let err = store
            .update_relationship("r1", RelationshipPatch::default())
            .unwrap_err();
        assert!(matches!(err, EntityError::NoValidFields(_)));
    }

    #[test]
    fn delete_entity_blocked_by_relationships() {
        let store = GraphStore::new();
        store.create_entity(&entity("e1", "Person", "Employee")).unwrap();
        store.create_entity(&entity("e2", "Org", "Team")).unwrap();
        let rel = Relationship::new(
            "r1",
            "MANAGES",
            "e2",
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            None,
        )
        .unwrap();
        store.create_relationship("e1", rel).unwrap();

        let err = store.delete_entity("e1").unwrap_err();
        assert!(matches!(err, EntityError::HasRelationships(_)));
    }

    #[test]
    fn active_at_returns_only_covering_relationship() {
        let store = GraphStore::new();
        store.create_entity(&entity("a", "Person", "Employee")).unwrap();
        store.create_entity(&entity("b", "Org", "Team")).unwrap();
        store.create_entity(&entity("c", "Org", "Team")).unwrap();

        let r1 = Relationship::new(
            "r1",
            "MEMBER_OF",
            "b",
            Some(Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap()),
            None,
        )
        .unwrap();
        let r2 = Relationship::new(
            "r2",
            "MEMBER_OF",
            "c",
            Some(Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap()),
            Some(Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
        )
        .unwrap();
        store.create_relationship("a", r1).unwrap();
        store.create_relationship("a", r2).unwrap();

        let active_at = Utc.with_ymd_and_hms(2025, 5, 3, 0, 0, 0).unwrap();
        let results = store.read_filtered_relationships("a", &RelationshipFilter::default(), Some(active_at));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].relationship.id, "r1");
    }
}
