//! Opaque typed payload envelope.
//!
//! Stands in for the self-describing `type_url` + serialized-bytes
//! envelope the (out-of-scope) RPC layer hands the engine. The engine
//! never interprets `value` beyond its JSON structural shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Payload {
    /// Identifies the original typed message; opaque to this crate.
    #[serde(default)]
    pub type_url: String,
    #[serde(default)]
    pub value: Value,
}

impl Payload {
    pub fn new(type_url: impl Into<String>, value: Value) -> Self {
        Self {
            type_url: type_url.into(),
            value,
        }
    }

    pub fn scalar(value: Value) -> Self {
        Self {
            type_url: String::new(),
            value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_null()
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::scalar(value)
    }
}
