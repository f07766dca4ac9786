//! Storage-shape classification and the three in-process backend
//! repositories (C1-C5): graph, document, tabular, and the attribute
//! catalog that ties an attribute name back to wherever it landed.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod document;
pub mod graph;
pub mod tabular;

pub use catalog::{AttributeCatalog, CatalogEntry};
pub use classify::{classify, classify_value};
pub use config::BackendSettings;
pub use document::DocumentStore;
pub use graph::{GraphNode, GraphStore, RelationshipPatch};
pub use tabular::{Column, TableSchema, TabularStore};
