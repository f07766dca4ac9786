//! Storage-shape classifier (C1).
//!
//! A pure function from a payload's JSON structural shape to one of
//! `{Tabular, Graph, Document, List, Scalar, Unknown}`. Precedence is
//! strict and values are never inspected, only key presence and
//! array-ness — tabular has the narrowest signature, graph's keys could
//! collide with a generic map, document is the open default.

use entity_types::{Payload, StorageShape};
use serde_json::Value;

pub fn classify(payload: &Payload) -> StorageShape {
    classify_value(&payload.value)
}

pub fn classify_value(value: &Value) -> StorageShape {
    match value {
        Value::Object(map) => {
            let is_columns_of_strings = matches!(map.get("columns"), Some(Value::Array(cols)) if cols.iter().all(Value::is_string));
            let is_rows_of_arrays = matches!(map.get("rows"), Some(Value::Array(rows)) if rows.iter().all(Value::is_array));
            if is_columns_of_strings && is_rows_of_arrays {
                return StorageShape::Tabular;
            }
            let has_array_key = |key: &str| matches!(map.get(key), Some(Value::Array(_)));
            if has_array_key("nodes") && has_array_key("edges") {
                return StorageShape::Graph;
            }
            StorageShape::Document
        }
        Value::Array(_) => StorageShape::List,
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => StorageShape::Scalar,
    }
}
