//! Tabular repository (C4): typed columnar attribute storage with a
//! per-attribute dynamic table and schema registry.
//!
//! Grounded on `in-mem-db-core::table::{field, query}` for the column/row
//! shape and on `database::Database`'s `RwLock<HashMap<...>>` ownership
//! pattern for the registry — here each "table" is an in-process stand-in
//! for a row in a PostgreSQL-backed attribute table (the real driver is an
//! out-of-scope external collaborator, §1).

pub mod schema;
mod store;
pub mod validation;

pub use schema::{Column, TableSchema};
pub use store::TabularStore;
