//! Process entry point for the entity store.
//!
//! Wires the three in-process backend repositories behind the attribute
//! dispatch engine and the orchestration service, then idles until a
//! shutdown signal arrives. The RPC transport that would accept client
//! requests is an out-of-scope external collaborator (§1) — this binary
//! exists to prove the wiring boots and logs the resolved backend
//! configuration, the way the teacher's own server binary separates
//! "engine starts" from "engine accepts traffic".

use std::collections::HashMap;
use std::sync::Arc;

use entity_core::{AttributeCatalog, BackendSettings, DocumentStore, GraphStore, TabularStore};
use entity_runtime::{
    AttributeDispatchEngine, DocumentResolver, GraphAttributeResolver, Resolver, TabularResolver,
};
use entity_service::EntityService;
use entity_types::StorageKind;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = BackendSettings::from_env();
    info!(
        neo4j_uri = %settings.neo4j.uri,
        mongo_uri = %settings.mongo.uri,
        postgres_host = %settings.postgres.host,
        postgres_port = settings.postgres.port,
        service_host = %settings.service.host,
        service_port = settings.service.port,
        "entity-server starting"
    );

    let _service = build_service();
    info!("entity orchestration service initialized");

    tokio::signal::ctrl_c()
        .await
        .expect("failed to listen for shutdown signal");
    info!("shutdown signal received, exiting");
}

fn build_service() -> EntityService {
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
