//! Method names
//!
//! The instrument groups its read-only displacement API under a single
//! vendor namespace.

/// Namespace shared by every displacement getter
pub const NAMESPACE: &str = "com.attocube.ids.displacement";

/// Displacement of one axis, params `[axis]`, reply `[status, value]`
pub const AXIS_DISPLACEMENT: &str = "com.attocube.ids.displacement.getAxisDisplacement";

/// Displacement of all axes, reply `[status, a0, a1, a2]`
pub const AXES_DISPLACEMENT: &str = "com.attocube.ids.displacement.getAxesDisplacement";

/// Absolute position of one axis, params `[axis]`, reply `[status, value]`
pub const ABSOLUTE_POSITION: &str = "com.attocube.ids.displacement.getAbsolutePosition";

/// Absolute positions of all axes, reply `[status, a0, a1, a2]`
pub const ABSOLUTE_POSITIONS: &str = "com.attocube.ids.displacement.getAbsolutePositions";

/// Reference positions of all axes, reply `[status, a0, a1, a2]`
pub const REFERENCE_POSITIONS: &str = "com.attocube.ids.displacement.getReferencePositions";

/// Whether a measurement is running, reply `[status, flag]`
pub const MEASUREMENT_ENABLED: &str = "com.attocube.ids.displacement.getMeasurementEnabled";

/// Number of measurement axes on the instrument
pub const NUM_AXES: usize = 3;

/// Expand a short getter name (`getAxesDisplacement`) into its full method name.
/// Names already containing a dot are returned unchanged.
pub fn qualify(name: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{}.{}", NAMESPACE, name)
    }
}
