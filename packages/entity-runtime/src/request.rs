//! Request/outcome types shared by the dispatch engine (C6) and its
//! callers in `entity-service` (C7).

use std::collections::HashMap;

use entity_types::{EntityError, TemporalValue};
use serde_json::Value;

/// One attribute write or read the engine is asked to perform, addressed
/// by the entity it belongs to.
#[derive(Debug, Clone)]
pub struct AttributeWrite {
    pub attribute_name: String,
    pub value: TemporalValue,
}

/// Equality filters and column projection for an attribute read. Only the
/// tabular resolver acts on these (the `GetData` SELECT contract, §4.4);
/// other resolvers ignore them and return their value verbatim, since a
/// document/graph/blob attribute has no columnar shape to project.
/// `filters` AND-combines by equality; an empty `projected_columns` selects
/// every column.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub filters: HashMap<String, Value>,
    pub projected_columns: Vec<String>,
}

/// Per-attribute result of a dispatch pass. Isolated from its siblings —
/// one attribute failing does not prevent the others in the same request
/// from being attempted.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Created,
    Updated,
    Deleted,
    Read(Vec<TemporalValue>),
    Failed(EntityError),
}

impl DispatchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DispatchOutcome::Failed(_))
    }
}

/// Errors that abort the whole batch rather than being isolated to one
/// attribute: the backend itself is unreachable, or engine state is
/// inconsistent. A per-field validation error (`Invalid`, `NotFound`, ...)
/// never reaches this — it is recorded as `DispatchOutcome::Failed` and the
/// remaining attributes still run.
pub fn is_hard_failure(err: &EntityError) -> bool {
    matches!(err, EntityError::BackendUnavailable(_) | EntityError::Internal(_))
}
