//! Value Cache
//!
//! Latest known value of every published quantity.
//!
//! ## Responsibilities
//! - Hold the most recent successful reading per field
//! - Keep the previous value when a refresh fails (stale-on-failure)
//! - Hand out copies (`Snapshot`) so readers never see a half-applied cycle
//!
//! The cache itself is not synchronized; the poller keeps it behind its
//! single state lock.

use std::fmt;
use std::str::FromStr;

use crate::error::IdsError;
use crate::protocol::{method, ResultShape, TypedResult};

// =============================================================================
// Quantities (one per RPC in the poll battery)
// =============================================================================

/// A quantity refreshed by one RPC per poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Displacement,
    AbsolutePosition,
    ReferencePosition,
    MeasurementEnabled,
}

impl Quantity {
    /// The fixed battery issued every cycle, in order
    pub const BATTERY: [Quantity; 4] = [
        Quantity::Displacement,
        Quantity::AbsolutePosition,
        Quantity::ReferencePosition,
        Quantity::MeasurementEnabled,
    ];

    pub fn method(&self) -> &'static str {
        match self {
            Quantity::Displacement => method::AXES_DISPLACEMENT,
            Quantity::AbsolutePosition => method::ABSOLUTE_POSITIONS,
            Quantity::ReferencePosition => method::REFERENCE_POSITIONS,
            Quantity::MeasurementEnabled => method::MEASUREMENT_ENABLED,
        }
    }

    pub fn shape(&self) -> ResultShape {
        match self {
            Quantity::MeasurementEnabled => ResultShape::IntPair,
            _ => ResultShape::StatusTriple,
        }
    }
}

// =============================================================================
// Fields (individually readable values)
// =============================================================================

/// One published value, addressable by its parameter name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Displacement(usize),
    AbsolutePosition(usize),
    ReferencePosition(usize),
    MeasurementEnabled,
}

impl Field {
    /// Every field, in publication order
    pub const ALL: [Field; 10] = [
        Field::Displacement(0),
        Field::Displacement(1),
        Field::Displacement(2),
        Field::AbsolutePosition(0),
        Field::AbsolutePosition(1),
        Field::AbsolutePosition(2),
        Field::ReferencePosition(0),
        Field::ReferencePosition(1),
        Field::ReferencePosition(2),
        Field::MeasurementEnabled,
    ];

    /// Parameter name, e.g. `AXIS1_ABSOLUTE_POS`
    pub fn name(&self) -> String {
        match self {
            Field::Displacement(axis) => format!("AXIS{}_DISPLACEMENT", axis),
            Field::AbsolutePosition(axis) => format!("AXIS{}_ABSOLUTE_POS", axis),
            Field::ReferencePosition(axis) => format!("AXIS{}_REFERENCE_POS", axis),
            Field::MeasurementEnabled => "MEASUREMENT_ENABLED".to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Field {
    type Err = IdsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name == "MEASUREMENT_ENABLED" {
            return Ok(Field::MeasurementEnabled);
        }

        let unknown = || IdsError::UnknownParameter(name.to_string());

        let rest = name.strip_prefix("AXIS").ok_or_else(unknown)?;
        let (axis, suffix) = rest.split_once('_').ok_or_else(unknown)?;
        let axis: usize = axis.parse().map_err(|_| unknown())?;
        if axis >= method::NUM_AXES {
            return Err(unknown());
        }

        match suffix {
            "DISPLACEMENT" => Ok(Field::Displacement(axis)),
            "ABSOLUTE_POS" => Ok(Field::AbsolutePosition(axis)),
            "REFERENCE_POS" => Ok(Field::ReferencePosition(axis)),
            _ => Err(unknown()),
        }
    }
}

/// A cached reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Int64(i64),
    Bool(bool),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Int64(v) => write!(f, "{}", v),
            Reading::Bool(v) => write!(f, "{}", v),
        }
    }
}

// =============================================================================
// Snapshot + Cache
// =============================================================================

/// Copy of every cached value at the end of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub displacement: [i64; 3],
    pub absolute_position: [i64; 3],
    pub reference_position: [i64; 3],
    pub measurement_enabled: bool,

    /// Number of completed poll cycles
    pub cycle: u64,
}

impl Snapshot {
    /// Read one field; `None` for an axis the instrument does not have
    pub fn get(&self, field: Field) -> Option<Reading> {
        let axis_value =
            |values: &[i64; 3], axis: usize| values.get(axis).copied().map(Reading::Int64);

        match field {
            Field::Displacement(axis) => axis_value(&self.displacement, axis),
            Field::AbsolutePosition(axis) => axis_value(&self.absolute_position, axis),
            Field::ReferencePosition(axis) => axis_value(&self.reference_position, axis),
            Field::MeasurementEnabled => Some(Reading::Bool(self.measurement_enabled)),
        }
    }
}

/// Latest-known values, written only by the poll cycle
#[derive(Debug, Default)]
pub struct ValueCache {
    current: Snapshot,
}

impl ValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decoded result for `quantity`
    ///
    /// Returns false (and changes nothing) if the result does not carry the
    /// value the quantity needs.
    pub fn apply(&mut self, quantity: Quantity, result: TypedResult) -> bool {
        match quantity {
            Quantity::Displacement => Self::store(&mut self.current.displacement, result),
            Quantity::AbsolutePosition => Self::store(&mut self.current.absolute_position, result),
            Quantity::ReferencePosition => {
                Self::store(&mut self.current.reference_position, result)
            }
            Quantity::MeasurementEnabled => match result.flag() {
                Some(flag) => {
                    self.current.measurement_enabled = flag;
                    true
                }
                None => false,
            },
        }
    }

    fn store(slot: &mut [i64; 3], result: TypedResult) -> bool {
        match result.values() {
            Some(values) => {
                *slot = values;
                true
            }
            None => false,
        }
    }

    /// Mark the end of a poll cycle
    pub fn finish_cycle(&mut self) -> u64 {
        self.current.cycle += 1;
        self.current.cycle
    }

    /// Read one field
    pub fn get(&self, field: Field) -> Option<Reading> {
        self.current.get(field)
    }

    /// Copy of every value
    pub fn snapshot(&self) -> Snapshot {
        self.current
    }
}
