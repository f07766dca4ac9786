//! Wire-agnostic error kinds shared across the entity store.

use thiserror::Error;

/// Entity store operation errors.
///
/// Every variant maps to exactly one RPC status at the (out-of-scope)
/// transport boundary; messages always cite the offending field or id so
/// callers can surface a precise diagnostic without re-deriving context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// Request violates schema or a mutability rule.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Target entity, relationship, or table absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Id uniqueness violation (entity or relationship).
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Entity deletion blocked by existing relationships.
    #[error("has relationships: {0}")]
    HasRelationships(String),

    /// Relationship update targeted a non-patchable field.
    #[error("unsupported field: {0}")]
    UnsupportedField(String),

    /// Update request carried no recognized field.
    #[error("no valid fields: {0}")]
    NoValidFields(String),

    /// A backend driver raised a transport-level error.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Residual, unexpected state.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EntityError {
    pub fn invalid(field: impl std::fmt::Display, detail: impl std::fmt::Display) -> Self {
        EntityError::Invalid(format!("field '{field}': {detail}"))
    }

    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        EntityError::NotFound(format!("{kind} '{id}'"))
    }

    pub fn already_exists(kind: &str, id: impl std::fmt::Display) -> Self {
        EntityError::AlreadyExists(format!("{kind} '{id}'"))
    }
}
