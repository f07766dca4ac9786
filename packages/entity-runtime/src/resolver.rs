//! Per-backend attribute resolvers: the `Resolve` side of classify →
//! catalog → resolve → report.
//!
//! Grounded on `in-mem-db-runtime::runtime::Runtime`'s dispatch-by-handler
//! shape — there the handler is chosen by request type, here it's chosen
//! by `StorageKind`. Each resolver owns exactly one in-process repository
//! from `entity_core`.

use std::sync::Arc;

use entity_core::tabular::validation::parse_table;
use entity_core::{DocumentStore, GraphStore, TabularStore};
use entity_types::{EntityError, Payload, TemporalValue};
use serde_json::json;

use crate::request::ReadOptions;

/// Common contract every backend-specific resolver implements for a single
/// attribute's lifecycle. `entity_id`/`attribute_name` together address the
/// catalog entry the dispatch engine already resolved before calling in.
/// `options` carries the equality-filter/projection `GetData` contract
/// (§4.4) — only the tabular resolver acts on it.
pub trait Resolver: Send + Sync {
    fn create(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError>;
    fn read(&self, entity_id: &str, attribute_name: &str, options: &ReadOptions) -> Result<Vec<TemporalValue>, EntityError>;
    fn update(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError>;
    fn delete(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError>;
}

pub struct TabularResolver {
    store: Arc<TabularStore>,
}

impl TabularResolver {
    pub fn new(store: Arc<TabularStore>) -> Self {
        Self { store }
    }
}

impl Resolver for TabularResolver {
    fn create(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.create_attribute(entity_id, attribute_name, value).map(|_| ())
    }

    fn read(&self, entity_id: &str, attribute_name: &str, options: &ReadOptions) -> Result<Vec<TemporalValue>, EntityError> {
        let record = self.store.read_attribute(entity_id, attribute_name)?;
        let (columns, rows) = self.store.select(entity_id, attribute_name, &options.filters, &options.projected_columns)?;
        let payload = Payload::scalar(json!({"columns": columns, "rows": rows}));
        let value = TemporalValue::new(record.current.start_time, record.current.end_time, payload)?;
        Ok(vec![value])
    }

    fn update(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.update_attribute(entity_id, attribute_name, value).map(|_| ())
    }

    fn delete(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError> {
        self.store.delete_attribute(entity_id, attribute_name)
    }
}

pub struct DocumentResolver {
    store: Arc<DocumentStore>,
}

impl DocumentResolver {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

impl Resolver for DocumentResolver {
    fn create(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.create_attribute(entity_id, attribute_name, value);
        Ok(())
    }

    fn read(&self, entity_id: &str, attribute_name: &str, _options: &ReadOptions) -> Result<Vec<TemporalValue>, EntityError> {
        self.store.read_attribute(entity_id, attribute_name)
    }

    fn update(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.update_attribute(entity_id, attribute_name, value)
    }

    fn delete(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError> {
        self.store.delete_attribute(entity_id, attribute_name)
    }
}

pub struct GraphAttributeResolver {
    store: Arc<GraphStore>,
}

impl GraphAttributeResolver {
    pub fn new(store: Arc<GraphStore>) -> Self {
        Self { store }
    }
}

impl Resolver for GraphAttributeResolver {
    fn create(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.create_attribute(entity_id, attribute_name, value);
        Ok(())
    }

    fn read(&self, entity_id: &str, attribute_name: &str, _options: &ReadOptions) -> Result<Vec<TemporalValue>, EntityError> {
        self.store.read_graph_attribute(entity_id, attribute_name)
    }

    fn update(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.update_graph_attribute(entity_id, attribute_name, value)
    }

    fn delete(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError> {
        self.store.delete_graph_attribute(entity_id, attribute_name)
    }
}

/// Blob (classifier `Unknown`) values have no structural backend to
/// decompose into; they are stored verbatim in the document backend under
/// the same sub-document contract, just tagged `Blob` in the catalog.
pub struct BlobResolver {
    store: Arc<DocumentStore>,
}

impl BlobResolver {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

impl Resolver for BlobResolver {
    fn create(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.create_attribute(entity_id, attribute_name, value);
        Ok(())
    }

    fn read(&self, entity_id: &str, attribute_name: &str, _options: &ReadOptions) -> Result<Vec<TemporalValue>, EntityError> {
        self.store.read_attribute(entity_id, attribute_name)
    }

    fn update(&self, entity_id: &str, attribute_name: &str, value: TemporalValue) -> Result<(), EntityError> {
        self.store.update_attribute(entity_id, attribute_name, value)
    }

    fn delete(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError> {
        self.store.delete_attribute(entity_id, attribute_name)
    }
}

/// Exercises the tabular payload parser so `entity-runtime` depends on
/// `entity_core::tabular::validation` for more than a re-export; used by
/// the dispatch engine to fail fast on malformed tabular payloads before
/// they ever reach the store.
pub fn precheck_tabular(value: &TemporalValue) -> Result<(), EntityError> {
    parse_table(&value.payload.value).map(|_| ())
}
