//! Element dtype tags.
//!
//! Array payloads are always `f64`; the dtype is a classification tag that
//! travels with a value and is adjusted by casts. Names and matching follow
//! the string convention of the numeric libraries being dispatched to:
//! `matches("int")` is true for every integer dtype.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ExprError;

/// Element dtype of a value. Ordering is promotion order: combining two
/// operands yields the larger tag.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DType {
    Bool,
    Int16,
    Int32,
    Int64,
    Float32,
    #[default]
    Float64,
}

impl DType {
    /// The dtype's canonical name, e.g. `"int32"`.
    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
        }
    }

    /// Substring classification: `Int32.matches("int")` and
    /// `Int32.matches("int32")` are both true.
    pub fn matches(&self, spec: &str) -> bool {
        self.name().contains(spec)
    }

    /// True if `self` matches any of the given specs.
    pub fn matches_any<S: AsRef<str>>(&self, specs: &[S]) -> bool {
        specs.iter().any(|s| self.matches(s.as_ref()))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, DType::Int16 | DType::Int32 | DType::Int64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// The result dtype of combining two operands.
    pub fn promote(a: DType, b: DType) -> DType {
        a.max(b)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => Ok(DType::Bool),
            "int16" => Ok(DType::Int16),
            "int32" => Ok(DType::Int32),
            "int64" => Ok(DType::Int64),
            "float32" => Ok(DType::Float32),
            "float64" => Ok(DType::Float64),
            other => Err(ExprError::UnknownDType(other.to_string())),
        }
    }
}
