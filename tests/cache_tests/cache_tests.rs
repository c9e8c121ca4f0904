//! Value Cache Tests
//!
//! Tests verify:
//! - Applying decoded results per quantity
//! - Stale values are kept when nothing is applied
//! - Field naming and lookup
//! - Cycle counting

use idspoll::cache::{Field, Quantity, Reading, Snapshot, ValueCache};
use idspoll::protocol::{method, TypedResult};
use idspoll::IdsError;

fn status_triple(values: [i64; 3]) -> TypedResult {
    TypedResult::StatusTriple { status: 0, values }
}

// =============================================================================
// Apply Tests
// =============================================================================

#[test]
fn test_new_cache_is_zeroed() {
    let cache = ValueCache::new();
    assert_eq!(cache.snapshot(), Snapshot::default());
    assert_eq!(cache.get(Field::MeasurementEnabled), Some(Reading::Bool(false)));
}

#[test]
fn test_apply_each_quantity() {
    let mut cache = ValueCache::new();

    assert!(cache.apply(Quantity::Displacement, status_triple([1, 2, 3])));
    assert!(cache.apply(Quantity::AbsolutePosition, status_triple([4, 5, 6])));
    assert!(cache.apply(Quantity::ReferencePosition, status_triple([7, 8, 9])));
    assert!(cache.apply(Quantity::MeasurementEnabled, TypedResult::IntPair(0, 1)));

    let snapshot = cache.snapshot();
    assert_eq!(snapshot.displacement, [1, 2, 3]);
    assert_eq!(snapshot.absolute_position, [4, 5, 6]);
    assert_eq!(snapshot.reference_position, [7, 8, 9]);
    assert!(snapshot.measurement_enabled);
}

#[test]
fn test_apply_mismatched_result_keeps_value() {
    let mut cache = ValueCache::new();
    cache.apply(Quantity::Displacement, status_triple([1, 2, 3]));

    assert!(!cache.apply(Quantity::Displacement, TypedResult::Bool(true)));
    assert_eq!(cache.snapshot().displacement, [1, 2, 3]);

    assert!(!cache.apply(Quantity::MeasurementEnabled, status_triple([0, 0, 0])));
    assert!(!cache.snapshot().measurement_enabled);
}

#[test]
fn test_apply_overwrites_previous() {
    let mut cache = ValueCache::new();
    cache.apply(Quantity::Displacement, status_triple([1, 2, 3]));
    cache.apply(Quantity::Displacement, status_triple([-1, -2, -3]));

    assert_eq!(cache.get(Field::Displacement(2)), Some(Reading::Int64(-3)));
}

#[test]
fn test_finish_cycle_counts() {
    let mut cache = ValueCache::new();
    assert_eq!(cache.finish_cycle(), 1);
    assert_eq!(cache.finish_cycle(), 2);
    assert_eq!(cache.snapshot().cycle, 2);
}

// =============================================================================
// Field Tests
// =============================================================================

#[test]
fn test_field_names() {
    assert_eq!(Field::Displacement(0).name(), "AXIS0_DISPLACEMENT");
    assert_eq!(Field::AbsolutePosition(1).name(), "AXIS1_ABSOLUTE_POS");
    assert_eq!(Field::ReferencePosition(2).name(), "AXIS2_REFERENCE_POS");
    assert_eq!(Field::MeasurementEnabled.to_string(), "MEASUREMENT_ENABLED");
}

#[test]
fn test_field_parse_round_trip() {
    for field in Field::ALL {
        assert_eq!(field.name().parse::<Field>().unwrap(), field);
    }
}

#[test]
fn test_field_parse_rejects_unknown() {
    for name in [
        "AXIS3_DISPLACEMENT",
        "AXIS_DISPLACEMENT",
        "AXISx_ABSOLUTE_POS",
        "AXIS0_VELOCITY",
        "axis0_displacement",
        "POLL_PERIOD",
        "",
    ] {
        assert!(
            matches!(name.parse::<Field>(), Err(IdsError::UnknownParameter(_))),
            "accepted {:?}",
            name
        );
    }
}

#[test]
fn test_snapshot_get_out_of_range_axis() {
    let snapshot = Snapshot::default();
    assert_eq!(snapshot.get(Field::Displacement(5)), None);
}

#[test]
fn test_snapshot_get_every_field() {
    let mut cache = ValueCache::new();
    cache.apply(Quantity::Displacement, status_triple([1, 2, 3]));
    cache.apply(Quantity::AbsolutePosition, status_triple([4, 5, 6]));
    cache.apply(Quantity::ReferencePosition, status_triple([7, 8, 9]));

    let values: Vec<Reading> = Field::ALL
        .iter()
        .map(|f| cache.get(*f).unwrap())
        .collect();

    let expected: Vec<Reading> = (1..=9)
        .map(Reading::Int64)
        .chain([Reading::Bool(false)])
        .collect();
    assert_eq!(values, expected);
}

// =============================================================================
// Battery Tests
// =============================================================================

#[test]
fn test_battery_order_and_methods() {
    let methods: Vec<&str> = Quantity::BATTERY.iter().map(|q| q.method()).collect();
    assert_eq!(
        methods,
        vec![
            method::AXES_DISPLACEMENT,
            method::ABSOLUTE_POSITIONS,
            method::REFERENCE_POSITIONS,
            method::MEASUREMENT_ENABLED,
        ]
    );
}
