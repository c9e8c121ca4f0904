//! Reply definitions
//!
//! Represents replies from the instrument.

use serde_json::{Map, Value};

use super::JSONRPC_VERSION;

/// A decoded JSON-RPC reply envelope
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Correlation id as sent back by the instrument (not checked)
    pub id: Option<Value>,

    /// Result payload, if the call succeeded
    pub result: Option<Value>,

    /// Error payload, if the call failed on the instrument side
    pub error: Option<Value>,
}

impl Reply {
    /// Create a reply carrying a result
    pub fn ok(result: Value) -> Self {
        Self {
            id: None,
            result: Some(result),
            error: None,
        }
    }

    /// Create a reply carrying an error
    pub fn error(error: Value) -> Self {
        Self {
            id: None,
            result: None,
            error: Some(error),
        }
    }

    /// Set the correlation id
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The reply as it appears on the wire (without line terminator)
    ///
    /// Used by instrument stand-ins; absent fields are omitted.
    pub fn to_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("jsonrpc".to_string(), Value::from(JSONRPC_VERSION));
        for (name, field) in [("id", &self.id), ("result", &self.result), ("error", &self.error)] {
            if let Some(value) = field {
                fields.insert(name.to_string(), value.clone());
            }
        }
        Value::Object(fields)
    }

    /// Whether a result field was present
    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }
}
