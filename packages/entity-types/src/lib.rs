//! Shared domain types for the polyglot entity store.
//!
//! Grounded on `in-mem-db-core::{error, config}`'s style of a single
//! crate-local error enum and plain-struct domain types; the byte-level
//! record layout of the teacher's `table::Field` has no counterpart here —
//! attribute values are opaque JSON payloads, not fixed-width records.

pub mod entity;
pub mod error;
pub mod kind;
pub mod payload;
pub mod relationship;
pub mod storage_shape;
pub mod temporal;


pub use entity::{Entity, EntityProjection};
pub use error::EntityError;
pub use kind::Kind;
pub use payload::Payload;
pub use relationship::{Direction, Relationship, RelationshipFilter, RelationshipView};
pub use storage_shape::{StorageKind, StorageShape};
pub use temporal::TemporalValue;
