//! Result shapes
//!
//! Every method has one fixed result shape. The caller names the shape it
//! expects and the payload is projected into it, or rejected whole.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{IdsError, Result};

/// The closed set of result shapes the poller understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// `[a0, a1, a2]`
    Triple,
    /// `[status, a0, a1, a2]`
    StatusTriple,
    /// `true` / `false`
    Bool,
    /// `[first, second]`, e.g. `[status, flag]`; a boolean second element
    /// reads as 0/1
    IntPair,
}

impl ResultShape {
    pub fn name(&self) -> &'static str {
        match self {
            ResultShape::Triple => "array of 3 int64",
            ResultShape::StatusTriple => "array of 4 int64",
            ResultShape::Bool => "bool",
            ResultShape::IntPair => "int pair",
        }
    }

    /// Project a result payload into this shape
    ///
    /// Any mismatch (wrong length, non-integer element, out-of-range value,
    /// wrong JSON type) fails the whole projection.
    pub fn project(self, value: &Value) -> Result<TypedResult> {
        let mismatch = |e: serde_json::Error| IdsError::ResultShapeMismatch {
            shape: self.name(),
            reason: e.to_string(),
        };

        match self {
            ResultShape::Triple => {
                let values = <[i64; 3]>::deserialize(value).map_err(mismatch)?;
                Ok(TypedResult::Triple(values))
            }
            ResultShape::StatusTriple => {
                let [status, a0, a1, a2] = <[i64; 4]>::deserialize(value).map_err(mismatch)?;
                Ok(TypedResult::StatusTriple {
                    status,
                    values: [a0, a1, a2],
                })
            }
            ResultShape::Bool => {
                let flag = bool::deserialize(value).map_err(mismatch)?;
                Ok(TypedResult::Bool(flag))
            }
            ResultShape::IntPair => {
                let (first, second) = <(i64, PairValue)>::deserialize(value).map_err(mismatch)?;
                Ok(TypedResult::IntPair(first, second.into()))
            }
        }
    }
}

/// Second element of a pair: the instrument answers flags as either
/// `[status, 1]` or `[status, true]`
#[derive(Deserialize)]
#[serde(untagged)]
enum PairValue {
    Int(i64),
    Bool(bool),
}

impl From<PairValue> for i64 {
    fn from(value: PairValue) -> Self {
        match value {
            PairValue::Int(v) => v,
            PairValue::Bool(flag) => i64::from(flag),
        }
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A result payload decoded into one of the known shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedResult {
    Triple([i64; 3]),
    StatusTriple { status: i64, values: [i64; 3] },
    Bool(bool),
    IntPair(i64, i64),
}

impl TypedResult {
    /// The per-axis triple. The leading status of a 4-wide reply is dropped.
    pub fn values(&self) -> Option<[i64; 3]> {
        match *self {
            TypedResult::Triple(values) => Some(values),
            TypedResult::StatusTriple { values, .. } => Some(values),
            _ => None,
        }
    }

    /// A boolean reading: the bool itself, or the second element of a pair
    pub fn flag(&self) -> Option<bool> {
        match *self {
            TypedResult::Bool(flag) => Some(flag),
            TypedResult::IntPair(_, flag) => Some(flag != 0),
            _ => None,
        }
    }

    /// The second element of a pair, e.g. a single-axis reading
    pub fn second(&self) -> Option<i64> {
        match *self {
            TypedResult::IntPair(_, value) => Some(value),
            _ => None,
        }
    }

    /// The leading status element, if the shape has one
    pub fn status(&self) -> Option<i64> {
        match *self {
            TypedResult::StatusTriple { status, .. } => Some(status),
            TypedResult::IntPair(status, _) => Some(status),
            _ => None,
        }
    }
}
