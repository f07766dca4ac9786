use std::collections::HashMap;
use std::sync::RwLock;

use entity_types::{EntityError, TemporalValue};
use serde_json::Value;

use super::schema::TableSchema;
use super::validation::{parse_table, table_name};

/// A single dynamic attribute table: its schema, row data, and the
/// `TemporalValue` the rows were written from (needed to answer
/// `is_active_at` without re-deriving it from raw JSON).
#[derive(Debug, Clone)]
pub struct TableRecord {
    pub schema: TableSchema,
    pub rows: Vec<Vec<Value>>,
    pub current: TemporalValue,
}

/// In-process stand-in for a PostgreSQL connection: one dynamically named
/// table per `(entity_id, attribute_name)` pair.
#[derive(Debug, Default)]
pub struct TabularStore {
    tables: RwLock<HashMap<(String, String), TableRecord>>,
}

impl TabularStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
        value: TemporalValue,
    ) -> Result<TableSchema, EntityError> {
        let key = (entity_id.to_string(), attribute_name.to_string());
        let mut tables = self.tables.write().expect("tabular store lock poisoned");
        if tables.contains_key(&key) {
            return Err(EntityError::already_exists(
                "attribute",
                &format!("{entity_id}.{attribute_name}"),
            ));
        }
        let (columns, rows) = parse_table(&value.payload.value)?;
        let schema = TableSchema {
            table_name: table_name(entity_id, attribute_name),
            columns,
            version: 1,
        };
        tables.insert(
            key,
            TableRecord {
                schema: schema.clone(),
                rows,
                current: value,
            },
        );
        Ok(schema)
    }

    pub fn read_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
    ) -> Result<TableRecord, EntityError> {
        self.tables
            .read()
            .expect("tabular store lock poisoned")
            .get(&(entity_id.to_string(), attribute_name.to_string()))
            .cloned()
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })
    }

    /// Re-runs the create path in place: a column-identical payload keeps
    /// the schema version, a reshaped one bumps it (§9 Open Question
    /// decision — there is no independent "alter table" operation).
    pub fn update_attribute(
        &self,
        entity_id: &str,
        attribute_name: &str,
        value: TemporalValue,
    ) -> Result<TableSchema, EntityError> {
        let key = (entity_id.to_string(), attribute_name.to_string());
        let mut tables = self.tables.write().expect("tabular store lock poisoned");
        let existing = tables
            .get(&key)
            .ok_or_else(|| EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}")))?;

        let (columns, rows) = parse_table(&value.payload.value)?;
        let version = if columns == existing.schema.columns {
            existing.schema.version
        } else {
            existing.schema.version + 1
        };
        let schema = TableSchema {
            table_name: existing.schema.table_name.clone(),
            columns,
            version,
        };
        tables.insert(
            key,
            TableRecord {
                schema: schema.clone(),
                rows,
                current: value,
            },
        );
        Ok(schema)
    }

    /// `GetData` (§4.4): construct a SELECT over the stored table. An empty
    /// `projected_columns` selects every column; otherwise only the named
    /// columns are returned, in the order requested. `filters` AND-combines
    /// by equality against the row's value in each named column. Unknown
    /// column names in either `filters` or `projected_columns` are
    /// `Invalid` — the caller is responsible for validity per the spec, but
    /// a bad name fails loudly rather than silently dropping rows.
    pub fn select(
        &self,
        entity_id: &str,
        attribute_name: &str,
        filters: &HashMap<String, Value>,
        projected_columns: &[String],
    ) -> Result<(Vec<String>, Vec<Vec<Value>>), EntityError> {
        let tables = self.tables.read().expect("tabular store lock poisoned");
        let record = tables
            .get(&(entity_id.to_string(), attribute_name.to_string()))
            .ok_or_else(|| EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}")))?;

        let column_names = record.schema.column_names();
        let column_index = |name: &str| column_names.iter().position(|c| *c == name);

        let filter_indices = filters
            .iter()
            .map(|(name, value)| {
                column_index(name)
                    .map(|idx| (idx, value.clone()))
                    .ok_or_else(|| EntityError::invalid("filters", format!("unknown column '{name}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let selected_indices = if projected_columns.is_empty() {
            (0..column_names.len()).collect::<Vec<_>>()
        } else {
            projected_columns
                .iter()
                .map(|name| {
                    column_index(name)
                        .ok_or_else(|| EntityError::invalid("projected_columns", format!("unknown column '{name}'")))
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        let out_columns = selected_indices.iter().map(|&i| column_names[i].to_string()).collect();
        let out_rows = record
            .rows
            .iter()
            .filter(|row| filter_indices.iter().all(|(idx, value)| row.get(*idx) == Some(value)))
            .map(|row| selected_indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok((out_columns, out_rows))
    }

    /// Drops the dynamic table and its registry entry entirely.
    pub fn delete_attribute(&self, entity_id: &str, attribute_name: &str) -> Result<(), EntityError> {
        self.tables
            .write()
            .expect("tabular store lock poisoned")
            .remove(&(entity_id.to_string(), attribute_name.to_string()))
            .map(|_| ())
            .ok_or_else(|| {
                EntityError::not_found("attribute", &format!("{entity_id}.{attribute_name}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use entity_types::Payload;
    use serde_json::json;

    fn table_value(columns: Value, rows: Value) -> TemporalValue {
        TemporalValue::new(
            Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
            None,
            Payload::scalar(json!({"columns": columns, "rows": rows})),
        )
        .unwrap()
    }

    #[test]
    fn create_then_read_roundtrips_rows() {
        let store = TabularStore::new();
        store
            .create_attribute(
                "e1",
                "salary",
                table_value(json!(["amount"]), json!([[100]])),
            )
            .unwrap();
        let record = store.read_attribute("e1", "salary").unwrap();
        assert_eq!(record.rows, vec![vec![json!(100)]]);
        assert_eq!(record.schema.version, 1);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let store = TabularStore::new();
        store
            .create_attribute("e1", "salary", table_value(json!(["amount"]), json!([[100]])))
            .unwrap();
        let err = store
            .create_attribute("e1", "salary", table_value(json!(["amount"]), json!([[200]])))
            .unwrap_err();
        assert!(matches!(err, EntityError::AlreadyExists(_)));
    }

    #[test]
    fn update_with_same_columns_keeps_schema_version() {
        let store = TabularStore::new();
        store
            .create_attribute("e1", "salary", table_value(json!(["amount"]), json!([[100]])))
            .unwrap();
        let schema = store
            .update_attribute("e1", "salary", table_value(json!(["amount"]), json!([[150]])))
            .unwrap();
        assert_eq!(schema.version, 1);
        let record = store.read_attribute("e1", "salary").unwrap();
        assert_eq!(record.rows, vec![vec![json!(150)]]);
    }

    #[test]
    fn update_with_different_columns_bumps_schema_version() {
        let store = TabularStore::new();
        store
            .create_attribute("e1", "salary", table_value(json!(["amount"]), json!([[100]])))
            .unwrap();
        let schema = store
            .update_attribute(
                "e1",
                "salary",
                table_value(json!(["amount", "currency"]), json!([[100, "USD"]])),
            )
            .unwrap();
        assert_eq!(schema.version, 2);
    }

    #[test]
    fn select_applies_equality_filter_and_column_projection() {
        let store = TabularStore::new();
        store
            .create_attribute(
                "e1",
                "employees",
                table_value(
                    json!(["id", "name", "email", "department"]),
                    json!([
                        ["001", "John Doe", "john@example.com", "Engineering"],
                        ["002", "Jane Roe", "jane@example.com", "Sales"],
                    ]),
                ),
            )
            .unwrap();

        let mut filters = HashMap::new();
        filters.insert("department".to_string(), json!("Engineering"));
        let projected = vec!["id".to_string(), "name".to_string()];

        let (columns, rows) = store.select("e1", "employees", &filters, &projected).unwrap();
        assert_eq!(columns, vec!["id", "name"]);
        assert_eq!(rows, vec![vec![json!("001"), json!("John Doe")]]);
    }

    #[test]
    fn select_with_no_filter_and_no_projection_returns_everything() {
        let store = TabularStore::new();
        store
            .create_attribute("e1", "salary", table_value(json!(["amount"]), json!([[100]])))
            .unwrap();
        let (columns, rows) = store.select("e1", "salary", &HashMap::new(), &[]).unwrap();
        assert_eq!(columns, vec!["amount"]);
        assert_eq!(rows, vec![vec![json!(100)]]);
    }

    #[test]
    fn delete_removes_the_dynamic_table() {
        let store = TabularStore::new();
        store
            .create_attribute("e1", "salary", table_value(json!(["amount"]), json!([[100]])))
            .unwrap();
        store.delete_attribute("e1", "salary").unwrap();
        assert!(store.read_attribute("e1", "salary").is_err());
    }
}
