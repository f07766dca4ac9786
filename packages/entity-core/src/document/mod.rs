//! Document repository (C3): free-form metadata and document-classified
//! attribute values.
//!
//! Grounded on `in-mem-db-core::database::Database`'s
//! `RwLock<HashMap<String, Table>>` ownership pattern — here the "table" is
//! an in-process stand-in for a MongoDB wire-protocol connection (the real
//! driver is an out-of-scope external collaborator, §1).

mod store;

pub use store::DocumentStore;
