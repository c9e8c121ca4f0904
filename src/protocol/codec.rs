//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! This is the boundary between wire bytes and typed values: encoding is
//! checked against the fixed buffer capacity before anything is written, and
//! decoding accepts nothing but a JSON object.

use serde_json::Value;

use crate::error::{IdsError, Result};
use super::{Reply, Request};

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode a request envelope to bytes
///
/// The output carries no line terminator; framing belongs to the transport.
/// Fails with `EncodingTooLarge` if the serialized form would not leave room
/// in a buffer of `capacity` bytes (i.e. `len >= capacity`).
pub fn encode_request(request: &Request, capacity: usize) -> Result<Vec<u8>> {
    let bytes = serde_json::to_vec(request)
        .map_err(|e| IdsError::Serialization(e.to_string()))?;

    if bytes.len() >= capacity {
        return Err(IdsError::EncodingTooLarge {
            size: bytes.len(),
            capacity,
        });
    }

    Ok(bytes)
}

/// Encode a method call to bytes
///
/// Params are included only when non-empty.
pub fn encode(method: &str, params: Option<&Value>, capacity: usize) -> Result<Vec<u8>> {
    let request = Request::new(method, params.cloned());
    encode_request(&request, capacity)
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Decode a reply from bytes
///
/// Trailing line terminators and whitespace are tolerated. Anything that is
/// not a complete JSON object fails with `MalformedReply`.
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| IdsError::MalformedReply(e.to_string()))?;

    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(IdsError::MalformedReply(format!(
                "expected a JSON object, got {}",
                kind(&other)
            )))
        }
    };

    Ok(Reply {
        id: fields.remove("id"),
        result: fields.remove("result"),
        error: fields.remove("error"),
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
