//! Operation enums shared by both backends.
//!
//! String parsers accept the spellings callers historically used ("left",
//! "before last", "valid", ...); anything else is an invalid-argument error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ExprError;

/// Elementwise comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
        }
    }

    /// Apply the comparison to a pair of scalars.
    pub fn holds(&self, a: f64, b: f64) -> bool {
        match self {
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
            CmpOp::Eq => a == b,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CmpOp {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lt" | "<" => Ok(CmpOp::Lt),
            "le" | "<=" => Ok(CmpOp::Le),
            "gt" | ">" => Ok(CmpOp::Gt),
            "ge" | ">=" => Ok(CmpOp::Ge),
            "eq" | "==" => Ok(CmpOp::Eq),
            other => Err(ExprError::UnknownCmpOp(other.to_string())),
        }
    }
}

/// Elementwise binary reductions used by `largest`/`smallest`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Maximum,
    Minimum,
}

impl BinaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            BinaryOp::Maximum => "maximum",
            BinaryOp::Minimum => "minimum",
        }
    }
}

/// Elementwise unary operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Abs,
    Neg,
    Round,
}

impl UnaryOp {
    pub fn name(&self) -> &'static str {
        match self {
            UnaryOp::Abs => "abs",
            UnaryOp::Neg => "neg",
            UnaryOp::Round => "round",
        }
    }
}

/// Where `add_axes` inserts singleton dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisSide {
    /// Prepend axes: a 1-D vector becomes a row vector.
    Left,
    /// Append axes: a 1-D vector becomes a column vector.
    Right,
    /// Insert axes in the second-to-last position. Equivalent to `Left`
    /// on vectors and scalars.
    BeforeLast,
}

impl AxisSide {
    pub fn name(&self) -> &'static str {
        match self {
            AxisSide::Left => "left",
            AxisSide::Right => "right",
            AxisSide::BeforeLast => "before last",
        }
    }
}

impl fmt::Display for AxisSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AxisSide {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" | "before" => Ok(AxisSide::Left),
            "right" | "after" => Ok(AxisSide::Right),
            "before last" | "before_last" => Ok(AxisSide::BeforeLast),
            other => Err(ExprError::UnknownAxisSide(other.to_string())),
        }
    }
}

/// Boundary handling for 1-D convolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PadMode {
    /// Only positions where the kernel fits entirely inside the signal.
    Valid,
    /// Every position with any overlap.
    Full,
    /// Centered slice of `Full` with the signal's length.
    Same,
}

impl PadMode {
    pub fn name(&self) -> &'static str {
        match self {
            PadMode::Valid => "valid",
            PadMode::Full => "full",
            PadMode::Same => "same",
        }
    }

    /// Output length of convolving a signal of length `signal` with a kernel
    /// of length `kernel`, or `None` when the kernel does not fit.
    pub fn output_len(&self, signal: usize, kernel: usize) -> Option<usize> {
        if signal == 0 || kernel == 0 {
            return None;
        }
        match self {
            PadMode::Valid => (signal >= kernel).then(|| signal - kernel + 1),
            PadMode::Full => Some(signal + kernel - 1),
            PadMode::Same => Some(signal),
        }
    }
}

impl fmt::Display for PadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PadMode {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(PadMode::Valid),
            "full" => Ok(PadMode::Full),
            "same" => Ok(PadMode::Same),
            other => Err(ExprError::UnknownPadMode(other.to_string())),
        }
    }
}

/// Whether a subtensor update overwrites or accumulates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubtensorKind {
    Set,
    Inc,
}

impl SubtensorKind {
    pub fn name(&self) -> &'static str {
        match self {
            SubtensorKind::Set => "set",
            SubtensorKind::Inc => "inc",
        }
    }
}
