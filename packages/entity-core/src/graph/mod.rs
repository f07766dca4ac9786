//! Graph repository (C2): entity identity, typing, lifecycle, and directed
//! typed relationships.
//!
//! Grounded on `in-mem-db-core::database::Database`'s
//! `RwLock<HashMap<String, Table>>` ownership pattern — here the "table"
//! is an in-process stand-in for a Bolt-protocol graph store connection
//! (the real driver is an out-of-scope external collaborator, §1).

mod store;

pub use store::{GraphNode, GraphStore, RelationshipPatch};
