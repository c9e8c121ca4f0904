//! Result Shape Tests
//!
//! Projection of result payloads into the fixed shapes.

use idspoll::protocol::{ResultShape, TypedResult};
use idspoll::IdsError;
use serde_json::json;

fn assert_mismatch(shape: ResultShape, value: serde_json::Value) {
    match shape.project(&value) {
        Err(IdsError::ResultShapeMismatch { shape: name, .. }) => {
            assert_eq!(name, shape.name());
        }
        other => panic!("{} accepted {}: {:?}", shape, value, other),
    }
}

// =============================================================================
// Status + triple
// =============================================================================

#[test]
fn test_status_triple_drops_status() {
    let result = ResultShape::StatusTriple
        .project(&json!([0, 100, 200, 300]))
        .unwrap();

    assert_eq!(
        result,
        TypedResult::StatusTriple {
            status: 0,
            values: [100, 200, 300]
        }
    );
    assert_eq!(result.values(), Some([100, 200, 300]));
    assert_eq!(result.status(), Some(0));
}

#[test]
fn test_status_triple_nonzero_status_still_accepted() {
    let result = ResultShape::StatusTriple.project(&json!([7, -1, -2, -3])).unwrap();
    assert_eq!(result.values(), Some([-1, -2, -3]));
}

#[test]
fn test_status_triple_full_i64_range() {
    let result = ResultShape::StatusTriple
        .project(&json!([0, i64::MIN, 0, i64::MAX]))
        .unwrap();
    assert_eq!(result.values(), Some([i64::MIN, 0, i64::MAX]));
}

#[test]
fn test_status_triple_wrong_length() {
    assert_mismatch(ResultShape::StatusTriple, json!([0, 1, 2]));
    assert_mismatch(ResultShape::StatusTriple, json!([0, 1, 2, 3, 4]));
    assert_mismatch(ResultShape::StatusTriple, json!([]));
}

#[test]
fn test_status_triple_wrong_element_types() {
    assert_mismatch(ResultShape::StatusTriple, json!([0, 1.5, 2, 3]));
    assert_mismatch(ResultShape::StatusTriple, json!([0, "1", 2, 3]));
    assert_mismatch(ResultShape::StatusTriple, json!([0, null, 2, 3]));
    assert_mismatch(ResultShape::StatusTriple, json!([0, u64::MAX, 2, 3]));
}

#[test]
fn test_status_triple_not_an_array() {
    assert_mismatch(ResultShape::StatusTriple, json!({"a": 1}));
    assert_mismatch(ResultShape::StatusTriple, json!(null));
    assert_mismatch(ResultShape::StatusTriple, json!(5));
}

// =============================================================================
// Plain triple
// =============================================================================

#[test]
fn test_triple() {
    let result = ResultShape::Triple.project(&json!([1, 2, 3])).unwrap();
    assert_eq!(result, TypedResult::Triple([1, 2, 3]));
    assert_eq!(result.values(), Some([1, 2, 3]));
    assert_eq!(result.status(), None);
}

#[test]
fn test_triple_rejects_four() {
    assert_mismatch(ResultShape::Triple, json!([0, 1, 2, 3]));
}

// =============================================================================
// Bool and pair
// =============================================================================

#[test]
fn test_bool() {
    assert_eq!(
        ResultShape::Bool.project(&json!(true)).unwrap().flag(),
        Some(true)
    );
    assert_mismatch(ResultShape::Bool, json!(1));
    assert_mismatch(ResultShape::Bool, json!("true"));
}

#[test]
fn test_int_pair_flag() {
    let enabled = ResultShape::IntPair.project(&json!([0, 1])).unwrap();
    assert_eq!(enabled, TypedResult::IntPair(0, 1));
    assert_eq!(enabled.flag(), Some(true));
    assert_eq!(enabled.status(), Some(0));

    let disabled = ResultShape::IntPair.project(&json!([0, 0])).unwrap();
    assert_eq!(disabled.flag(), Some(false));
}

#[test]
fn test_int_pair_boolean_flag() {
    let enabled = ResultShape::IntPair.project(&json!([0, true])).unwrap();
    assert_eq!(enabled, TypedResult::IntPair(0, 1));
    assert_eq!(enabled.flag(), Some(true));

    let disabled = ResultShape::IntPair.project(&json!([3, false])).unwrap();
    assert_eq!(disabled, TypedResult::IntPair(3, 0));
    assert_eq!(disabled.flag(), Some(false));
}

#[test]
fn test_int_pair_second() {
    let single = ResultShape::IntPair.project(&json!([0, 123456789012i64])).unwrap();
    assert_eq!(single.second(), Some(123456789012));
}

#[test]
fn test_int_pair_mismatch() {
    assert_mismatch(ResultShape::IntPair, json!([0]));
    assert_mismatch(ResultShape::IntPair, json!([0, 1, 2]));
    assert_mismatch(ResultShape::IntPair, json!([0, "1"]));
    assert_mismatch(ResultShape::IntPair, json!([0, 1.5]));
    assert_mismatch(ResultShape::IntPair, json!([true, 1]));
    assert_mismatch(ResultShape::IntPair, json!(true));
}

#[test]
fn test_accessors_on_other_shapes() {
    assert_eq!(TypedResult::Bool(true).values(), None);
    assert_eq!(TypedResult::Triple([1, 2, 3]).flag(), None);
    assert_eq!(TypedResult::Triple([1, 2, 3]).second(), None);
}
