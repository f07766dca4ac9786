//! Dynamic table name sanitization and the separate duplicate-column /
//! required-field validation layer (§9 Open Question decision: this is an
//! optional extra pass a caller may run, not a gate built into the
//! canonical create/update path).

use entity_types::EntityError;
use serde_json::Value;

use crate::tabular::schema::Column;

/// Replaces any non-alphanumeric character with `_`, so
/// `attr_<sanitize(entity_id)>_<sanitize(attribute_name)>` is always a
/// legal, deterministic table identifier (Invariant 7). Case is preserved.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

pub fn table_name(entity_id: &str, attribute_name: &str) -> String {
    format!("attr_{}_{}", sanitize(entity_id), sanitize(attribute_name))
}

/// Parses a `{"columns": [...], "rows": [...]}` payload value into typed
/// columns and row data. `columns` entries may be bare strings (type
/// defaults to `"string"`) or `{"name", "type"}` objects.
pub fn parse_table(value: &Value) -> Result<(Vec<Column>, Vec<Vec<Value>>), EntityError> {
    let obj = value
        .as_object()
        .ok_or_else(|| EntityError::invalid("payload", "tabular payload must be a JSON object"))?;

    let raw_columns = obj
        .get("columns")
        .and_then(Value::as_array)
        .ok_or_else(|| EntityError::invalid("payload.columns", "must be an array"))?;
    let columns = raw_columns
        .iter()
        .map(parse_column)
        .collect::<Result<Vec<_>, _>>()?;

    let raw_rows = obj
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| EntityError::invalid("payload.rows", "must be an array"))?;
    let rows = raw_rows
        .iter()
        .map(|row| {
            row.as_array()
                .cloned()
                .ok_or_else(|| EntityError::invalid("payload.rows", "each row must be an array"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    for row in &rows {
        if row.len() != columns.len() {
            return Err(EntityError::invalid(
                "payload.rows",
                format!(
                    "row has {} values but schema declares {} columns",
                    row.len(),
                    columns.len()
                ),
            ));
        }
    }

    Ok((columns, rows))
}

fn parse_column(value: &Value) -> Result<Column, EntityError> {
    if let Some(name) = value.as_str() {
        return Ok(Column {
            name: name.to_string(),
            type_id: "string".to_string(),
        });
    }
    let obj = value
        .as_object()
        .ok_or_else(|| EntityError::invalid("payload.columns", "entry must be a string or object"))?;
    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| EntityError::invalid("payload.columns", "entry missing 'name'"))?
        .to_string();
    let type_id = obj
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("string")
        .to_string();
    Ok(Column { name, type_id })
}

/// Rejects duplicate column names. Not invoked by the canonical create/
/// update path — callers that want this stricter contract call it
/// explicitly before handing columns to the store.
pub fn reject_duplicate_columns(columns: &[Column]) -> Result<(), EntityError> {
    let mut seen = std::collections::HashSet::new();
    for column in columns {
        if !seen.insert(column.name.as_str()) {
            return Err(EntityError::invalid(
                "payload.columns",
                format!("duplicate column name '{}'", column.name),
            ));
        }
    }
    Ok(())
}

/// Rejects a schema missing any of `required`. Also not part of the
/// canonical path — an opt-in contract for callers with their own
/// required-field policy.
pub fn require_columns(columns: &[Column], required: &[&str]) -> Result<(), EntityError> {
    for name in required {
        if !columns.iter().any(|c| c.name == *name) {
            return Err(EntityError::invalid(
                "payload.columns",
                format!("required column '{name}' is missing"),
            ));
        }
    }
    Ok(())
}
