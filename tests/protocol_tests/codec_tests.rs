//! Codec Tests
//!
//! Tests for request encoding and reply decoding.

use idspoll::protocol::{decode_reply, encode, encode_request, method, Reply, Request};
use idspoll::IdsError;
use serde_json::{json, Value};

const CAPACITY: usize = 512;

fn encode_str(method: &str, params: Option<&Value>) -> String {
    let bytes = encode(method, params, CAPACITY).unwrap();
    String::from_utf8(bytes).unwrap()
}

// =============================================================================
// Request Encoding Tests
// =============================================================================

#[test]
fn test_encode_without_params() {
    let encoded = encode_str(method::AXES_DISPLACEMENT, None);
    assert_eq!(
        encoded,
        r#"{"jsonrpc":"2.0","id":1,"method":"com.attocube.ids.displacement.getAxesDisplacement"}"#
    );
}

#[test]
fn test_encode_omits_empty_params() {
    for empty in [json!(null), json!({}), json!([])] {
        let encoded = encode_str("m", Some(&empty));
        assert!(!encoded.contains("params"), "params leaked for {}", empty);
    }
}

#[test]
fn test_encode_includes_params_verbatim() {
    let params = json!({"axis": 2, "name": "x", "nested": [1, 2, {"k": true}]});
    let encoded = encode_str("m", Some(&params));

    let parsed: Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(parsed["params"], params);
}

#[test]
fn test_encode_positional_params() {
    let encoded = encode_str(method::AXIS_DISPLACEMENT, Some(&json!([1])));
    assert!(encoded.ends_with(r#""params":[1]}"#));
}

#[test]
fn test_encode_has_no_line_terminator() {
    let encoded = encode_str("m", None);
    assert!(!encoded.ends_with('\n'));
}

#[test]
fn test_encode_field_order() {
    let encoded = encode_str("m", Some(&json!([0])));
    let jsonrpc = encoded.find("jsonrpc").unwrap();
    let id = encoded.find("\"id\"").unwrap();
    let method = encoded.find("method").unwrap();
    let params = encoded.find("params").unwrap();
    assert!(jsonrpc < id && id < method && method < params);
}

// =============================================================================
// Size Limit Tests
// =============================================================================

/// Length of the envelope around a method name with no params
fn envelope_len() -> usize {
    encode("", None, usize::MAX).unwrap().len()
}

#[test]
fn test_encode_just_under_capacity() {
    let name = "a".repeat(CAPACITY - 1 - envelope_len());
    let bytes = encode(&name, None, CAPACITY).unwrap();
    assert_eq!(bytes.len(), CAPACITY - 1);
}

#[test]
fn test_encode_exactly_capacity_is_rejected() {
    let name = "a".repeat(CAPACITY - envelope_len());
    match encode(&name, None, CAPACITY) {
        Err(IdsError::EncodingTooLarge { size, capacity }) => {
            assert_eq!(size, CAPACITY);
            assert_eq!(capacity, CAPACITY);
        }
        other => panic!("Expected EncodingTooLarge, got {:?}", other),
    }
}

#[test]
fn test_encode_large_params_rejected() {
    let params = json!({"blob": "x".repeat(1000)});
    assert!(matches!(
        encode("m", Some(&params), CAPACITY),
        Err(IdsError::EncodingTooLarge { .. })
    ));
}

#[test]
fn test_encode_request_struct() {
    let request = Request::new("m", Some(json!([3])));
    assert_eq!(request.id, 1);
    assert_eq!(request.jsonrpc, "2.0");

    let bytes = encode_request(&request, CAPACITY).unwrap();
    assert_eq!(bytes, br#"{"jsonrpc":"2.0","id":1,"method":"m","params":[3]}"#.to_vec());
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_result_reply() {
    let reply = decode_reply(br#"{"jsonrpc":"2.0","id":1,"result":[0,100,200,300]}"#).unwrap();

    assert_eq!(reply.id, Some(json!(1)));
    assert_eq!(reply.result, Some(json!([0, 100, 200, 300])));
    assert_eq!(reply.error, None);
    assert!(reply.has_result());
}

#[test]
fn test_decode_error_reply() {
    let reply = decode_reply(br#"{"error":{"code":-1}}"#).unwrap();

    assert_eq!(reply.result, None);
    assert_eq!(reply.error, Some(json!({"code": -1})));
    assert!(!reply.has_result());
}

#[test]
fn test_decode_tolerates_trailing_newline() {
    let reply = decode_reply(b"{\"result\":true}\r\n").unwrap();
    assert_eq!(reply, Reply::ok(json!(true)));
}

#[test]
fn test_decode_is_idempotent() {
    let bytes = br#"{"id":1,"result":[0,1,2,3],"extra":"ignored"}"#;
    assert_eq!(decode_reply(bytes).unwrap(), decode_reply(bytes).unwrap());
}

#[test]
fn test_decode_garbage() {
    assert!(matches!(
        decode_reply(b"{not json"),
        Err(IdsError::MalformedReply(_))
    ));
}

#[test]
fn test_decode_truncated() {
    assert!(matches!(
        decode_reply(br#"{"result":[0,100,2"#),
        Err(IdsError::MalformedReply(_))
    ));
}

#[test]
fn test_decode_empty() {
    assert!(matches!(decode_reply(b""), Err(IdsError::MalformedReply(_))));
}

#[test]
fn test_decode_non_object() {
    for bytes in [&b"[1,2,3]"[..], &b"42"[..], &b"\"result\""[..], &b"null"[..]] {
        assert!(
            matches!(decode_reply(bytes), Err(IdsError::MalformedReply(_))),
            "accepted {:?}",
            String::from_utf8_lossy(bytes)
        );
    }
}

#[test]
fn test_decode_invalid_utf8() {
    assert!(matches!(
        decode_reply(b"{\"result\":\"\xff\"}"),
        Err(IdsError::MalformedReply(_))
    ));
}

#[test]
fn test_decode_null_result_is_present() {
    let reply = decode_reply(br#"{"result":null}"#).unwrap();
    assert_eq!(reply.result, Some(Value::Null));
}

#[test]
fn test_reply_constructors() {
    let err = Reply::error(json!({"code": 3}));
    assert!(!err.has_result());
    assert_eq!(err.error, Some(json!({"code": 3})));
}

#[test]
fn test_reply_wire_form_decodes_back() {
    let reply = Reply::ok(json!([0, 1])).with_id(1);
    let wire = reply.to_value();

    assert_eq!(wire, json!({"jsonrpc": "2.0", "id": 1, "result": [0, 1]}));
    assert_eq!(decode_reply(wire.to_string().as_bytes()).unwrap(), reply);

    let wire = Reply::error(json!({"code": -1})).to_value();
    assert_eq!(wire, json!({"jsonrpc": "2.0", "error": {"code": -1}}));
}
