//! Storage-shape classification outputs.

use serde::{Deserialize, Serialize};

/// Output of the storage-shape classifier (C1): the structural pattern a
/// payload matches, in strict precedence order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StorageShape {
    Tabular,
    Graph,
    Document,
    List,
    Scalar,
    Unknown,
}

/// Backend selected for a given attribute, as recorded in the catalog.
/// `List`/`Scalar` classifier outputs map to `Document` (§4.5).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Tabular,
    Graph,
    Document,
    Blob,
}

impl From<StorageShape> for StorageKind {
    fn from(shape: StorageShape) -> Self {
        match shape {
            StorageShape::Tabular => StorageKind::Tabular,
            StorageShape::Graph => StorageKind::Graph,
            StorageShape::Document | StorageShape::List | StorageShape::Scalar => {
                StorageKind::Document
            }
            StorageShape::Unknown => StorageKind::Blob,
        }
    }
}

impl StorageKind {
    /// Deterministic catalog storage path for `(entity_id, attribute_name)`.
    pub fn storage_path(&self, entity_id: &str, attribute_name: &str) -> String {
        let prefix = match self {
            StorageKind::Tabular => "tables",
            StorageKind::Graph => "graphs",
            StorageKind::Document => "documents",
            StorageKind::Blob => "blobs",
        };
        format!("{prefix}/attr_{entity_id}_{attribute_name}")
    }
}
