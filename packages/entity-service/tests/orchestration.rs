//! End-to-end orchestration tests across the graph, document, and tabular
//! repositories, wired the way `apps/entity-server` wires them at startup.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use entity_core::{AttributeCatalog, DocumentStore, GraphStore, TabularStore};
use entity_runtime::{
    AttributeDispatchEngine, DocumentResolver, GraphAttributeResolver, Resolver, TabularResolver,
};
use entity_runtime::ReadOptions;
use entity_service::{EntityFilter, EntityService, OutputField, ReadEntityRequest, UpdateEntityRequest};
use entity_types::{Entity, EntityError, Kind, Payload, Relationship, StorageKind, TemporalValue};
use serde_json::json;

fn service() -> EntityService {
    let graph = Arc::new(GraphStore::new());
    let documents = Arc::new(DocumentStore::new());
    let tabular = Arc::new(TabularStore::new());
    let catalog = Arc::new(AttributeCatalog::new());

    let mut resolvers: HashMap<StorageKind, Arc<dyn Resolver>> = HashMap::new();
    resolvers.insert(StorageKind::Tabular, Arc::new(TabularResolver::new(tabular)));
    resolvers.insert(StorageKind::Document, Arc::new(DocumentResolver::new(documents.clone())));
    resolvers.insert(StorageKind::Blob, Arc::new(DocumentResolver::new(documents.clone())));
    resolvers.insert(StorageKind::Graph, Arc::new(GraphAttributeResolver::new(graph.clone())));

    let dispatch = Arc::new(AttributeDispatchEngine::new(catalog.clone(), resolvers));
    EntityService::new(graph, documents, catalog, dispatch)
}

fn temporal(value: serde_json::Value) -> TemporalValue {
    TemporalValue::new(Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()), None, Payload::scalar(value))
        .unwrap()
}

fn base_entity(id: &str, major: &str, minor: &str) -> Entity {
    Entity {
        id: id.to_string(),
        kind: Kind::new(major, minor),
        created: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        ..Default::default()
    }
}

#[test]
fn create_then_read_echoes_metadata_and_attributes() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    entity.metadata.insert("tag".to_string(), Payload::scalar(json!("vip")));
    entity.attributes.insert("notes".to_string(), vec![temporal(json!("first contact"))]);

    let created = service.create_entity(entity).unwrap();
    assert_eq!(created.metadata.get("tag").unwrap().value, json!("vip"));
    assert_eq!(created.attributes.get("notes").unwrap().len(), 1);

    let read = service.read_entity("p1", &ReadEntityRequest::all()).unwrap();
    assert_eq!(read.id, "p1");
    assert_eq!(read.metadata.get("tag").unwrap().value, json!("vip"));
}

#[test]
fn read_with_no_output_tags_echoes_only_base_fields() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    entity.metadata.insert("tag".to_string(), Payload::scalar(json!("vip")));
    entity.attributes.insert("notes".to_string(), vec![temporal(json!("first contact"))]);
    service.create_entity(entity).unwrap();

    let read = service.read_entity("p1", &ReadEntityRequest::default()).unwrap();
    assert_eq!(read.id, "p1");
    assert_eq!(read.kind.major, "Person");
    assert!(read.metadata.is_empty());
    assert!(read.attributes.is_empty());
    assert!(read.relationships.is_empty());
}

#[test]
fn update_with_metadata_patch_replaces_the_entire_mapping() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    entity.metadata.insert("tag".to_string(), Payload::scalar(json!("vip")));
    entity.metadata.insert("region".to_string(), Payload::scalar(json!("west")));
    service.create_entity(entity).unwrap();

    let mut metadata_patch = HashMap::new();
    metadata_patch.insert("tag".to_string(), Payload::scalar(json!("regular")));
    let patch = UpdateEntityRequest { metadata_patch, ..Default::default() };
    let updated = service.update_entity("p1", patch).unwrap();

    assert_eq!(updated.metadata.get("tag").unwrap().value, json!("regular"));
    assert!(!updated.metadata.contains_key("region"));
}

#[test]
fn tabular_attribute_read_with_filter_and_projection_matches_scenario_6() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    entity.attributes.insert(
        "employees".to_string(),
        vec![temporal(json!({
            "columns": ["id", "name", "email", "department"],
            "rows": [
                ["001", "John Doe", "john@example.com", "Engineering"],
                ["002", "Jane Roe", "jane@example.com", "Sales"],
                ["003", "Amir Khan", "amir@example.com", "Engineering"],
                ["004", "Lee Park", "lee@example.com", "Support"],
            ],
        }))],
    );
    service.create_entity(entity).unwrap();

    let mut filters = HashMap::new();
    filters.insert("department".to_string(), json!("Engineering"));
    let options = ReadOptions { filters, projected_columns: vec!["id".to_string(), "name".to_string()] };
    let mut attribute_options = HashMap::new();
    attribute_options.insert("employees".to_string(), options);

    let request = ReadEntityRequest {
        output: [OutputField::Attributes].into_iter().collect(),
        attribute_names: Some(vec!["employees".to_string()]),
        attribute_options,
        active_at: None,
    };
    let read = service.read_entity("p1", &request).unwrap();
    let values = &read.attributes["employees"];
    assert_eq!(values[0].payload.value["columns"], json!(["id", "name"]));
    assert_eq!(values[0].payload.value["rows"], json!([["001", "John Doe"]]));
}

#[test]
fn duplicate_relationship_id_is_rejected_and_original_is_preserved() {
    let service = service();
    service.create_entity(base_entity("a", "Person", "Employee")).unwrap();
    service.create_entity(base_entity("b", "Org", "Team")).unwrap();
    service.create_entity(base_entity("c", "Org", "Team")).unwrap();

    let r1 = Relationship::new("r1", "MEMBER_OF", "b", Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()), None).unwrap();
    service.create_relationship("a", r1).unwrap();

    let r2 = Relationship::new("r1", "MANAGES", "c", Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()), None).unwrap();
    let err = service.create_relationship("a", r2).unwrap_err();
    assert!(matches!(err, EntityError::AlreadyExists(_)));

    let relationships = service.read_relationships("a");
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0].relationship.name, "MEMBER_OF");
}

#[test]
fn update_of_unknown_relationship_id_creates_it() {
    let service = service();
    service.create_entity(base_entity("a", "Person", "Employee")).unwrap();
    service.create_entity(base_entity("b", "Org", "Team")).unwrap();

    let rel = Relationship::new("r9", "MEMBER_OF", "b", Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()), None).unwrap();
    let result = service.update_relationship("a", rel).unwrap();
    assert_eq!(result.id, "r9");
    assert_eq!(service.read_relationships("a").len(), 1);
}

#[test]
fn patch_rejects_changing_immutable_relationship_fields() {
    let service = service();
    service.create_entity(base_entity("a", "Person", "Employee")).unwrap();
    service.create_entity(base_entity("b", "Org", "Team")).unwrap();
    service.create_entity(base_entity("c", "Org", "Team")).unwrap();

    let rel = Relationship::new("r1", "MEMBER_OF", "b", Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()), None).unwrap();
    service.create_relationship("a", rel).unwrap();

    let attempted = Relationship::new("r1", "MANAGES", "c", Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()), None).unwrap();
    let err = service.update_relationship("a", attempted).unwrap_err();
    assert!(matches!(err, EntityError::UnsupportedField(_)));
}

#[test]
fn kind_is_immutable_across_an_update() {
    let service = service();
    service.create_entity(base_entity("p1", "Person", "Minister")).unwrap();

    let patch = UpdateEntityRequest {
        terminated: Some(Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())),
        ..Default::default()
    };
    let updated = service.update_entity("p1", patch).unwrap();
    assert_eq!(updated.kind.major, "Person");
    assert_eq!(updated.kind.minor, "Minister");
}

#[test]
fn tabular_attribute_round_trips_through_filtered_projection() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    entity.attributes.insert(
        "salary".to_string(),
        vec![temporal(json!({"columns": ["amount", "currency"], "rows": [[1200, "USD"]]}))],
    );
    service.create_entity(entity).unwrap();

    let read = service.read_entity("p1", &ReadEntityRequest::all()).unwrap();
    let values = read.attributes.get("salary").unwrap();
    assert_eq!(values[0].payload.value["rows"], json!([[1200, "USD"]]));

    let filter = EntityFilter { major: "Person".to_string(), minor: None, id: None };
    let projections = service.read_entities(&filter, None).unwrap();
    assert_eq!(projections.len(), 1);
    assert_eq!(projections[0].id, "p1");
}

#[test]
fn read_request_for_a_missing_attribute_name_is_silently_dropped() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    entity.attributes.insert("notes".to_string(), vec![temporal(json!("hello"))]);
    service.create_entity(entity).unwrap();

    let request = ReadEntityRequest {
        output: [OutputField::Attributes].into_iter().collect(),
        attribute_names: Some(vec!["notes".to_string(), "ghost_tag".to_string()]),
        ..Default::default()
    };
    let read = service.read_entity("p1", &request).unwrap();
    assert!(read.attributes.contains_key("notes"));
    assert!(!read.attributes.contains_key("ghost_tag"));
}

#[test]
fn active_at_filters_out_attribute_values_outside_their_temporal_window() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    let expired = TemporalValue::new(
        Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
        Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
        Payload::scalar(json!("old title")),
    )
    .unwrap();
    entity.attributes.insert("title".to_string(), vec![expired]);
    service.create_entity(entity).unwrap();

    let request = ReadEntityRequest {
        output: [OutputField::Attributes].into_iter().collect(),
        active_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
        ..Default::default()
    };
    let read = service.read_entity("p1", &request).unwrap();
    assert!(!read.attributes.contains_key("title"));
}

#[test]
fn delete_entity_is_document_only_and_leaves_the_graph_node_in_place() {
    let service = service();
    let mut entity = base_entity("p1", "Person", "Minister");
    entity.metadata.insert("tag".to_string(), Payload::scalar(json!("vip")));
    service.create_entity(entity).unwrap();

    service.delete_entity("p1").unwrap();

    let request = ReadEntityRequest { output: [OutputField::Metadata].into_iter().collect(), ..Default::default() };
    let read = service.read_entity("p1", &request).unwrap();
    assert!(read.metadata.is_empty());
    assert_eq!(read.id, "p1");
}
