//! Request definitions
//!
//! Represents outbound calls to the instrument.

use serde::Serialize;
use serde_json::Value;

/// Protocol marker carried by every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Correlation id used for every request
pub const REQUEST_ID: u64 = 1;

/// A JSON-RPC request envelope
///
/// Field order matches the wire order: jsonrpc, id, method, params.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub jsonrpc: &'static str,

    pub id: u64,

    pub method: String,

    /// Only serialized when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl Request {
    /// Create a request, dropping params that carry nothing
    /// (`null`, `{}` or `[]`)
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: REQUEST_ID,
            method: method.into(),
            params: params.filter(|p| !is_empty(p)),
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
