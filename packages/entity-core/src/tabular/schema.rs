//! Column and schema definitions for a dynamic attribute table.

use serde::{Deserialize, Serialize};

/// A single column definition, analogous to the teacher's `table::Field`
/// but describing a JSON column rather than a fixed-width record field:
/// there is no offset/alignment because rows are stored as `Vec<Value>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: String,
    /// Free-form type tag taken from the incoming payload (e.g. `"f64"`,
    /// `"string"`); never validated against a closed type system here.
    pub type_id: String,
}

/// Schema of one dynamic attribute table: a sanitized, deterministic name
/// (Invariant 7) plus its current column list and version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<Column>,
    /// Bumped whenever `UpdateResolve` replaces the table with a
    /// differently-shaped column list (§9 Open Question decision).
    pub version: u32,
}

impl TableSchema {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}
