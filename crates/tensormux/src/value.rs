//! The value sum type.
//!
//! Every operand of the dispatch layer is a [`Value`]: either a concrete,
//! already-computed tensor with a dtype tag, or a deferred [`SymExpr`]. The
//! two classifications are mutually exclusive and exhaustive by construction,
//! and dispatch is a pattern match rather than a runtime type probe.

use std::fmt;

use ndarray::{ArrayD, IxDyn};
use tensormux_expr::{DType, SharedVar, SymExpr};

/// A concrete tensor or a deferred expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Concrete { data: ArrayD<f64>, dtype: DType },
    Symbolic(SymExpr),
}

impl Value {
    /// A concrete float64 tensor.
    pub fn concrete(data: ArrayD<f64>) -> Self {
        Value::Concrete {
            data,
            dtype: DType::Float64,
        }
    }

    pub fn concrete_with_dtype(data: ArrayD<f64>, dtype: DType) -> Self {
        Value::Concrete { data, dtype }
    }

    /// A concrete 0-d scalar.
    pub fn scalar(v: f64) -> Self {
        Value::concrete(ArrayD::from_elem(IxDyn(&[]), v))
    }

    pub fn symbolic(expr: SymExpr) -> Self {
        Value::Symbolic(expr)
    }

    /// A symbolic reference to a shared handle.
    pub fn from_shared(var: &SharedVar) -> Self {
        Value::Symbolic(SymExpr::shared(var.clone()))
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, Value::Symbolic(_))
    }

    pub fn is_concrete(&self) -> bool {
        matches!(self, Value::Concrete { .. })
    }

    /// The concrete payload, if this value has one.
    pub fn as_concrete(&self) -> Option<&ArrayD<f64>> {
        match self {
            Value::Concrete { data, .. } => Some(data),
            Value::Symbolic(_) => None,
        }
    }

    /// The element dtype of this value (inferred for expressions).
    pub fn dtype(&self) -> DType {
        match self {
            Value::Concrete { dtype, .. } => *dtype,
            Value::Symbolic(e) => e.dtype(),
        }
    }

    /// Rank, where known. Concrete values always know it; expressions only
    /// when it can be inferred without evaluating.
    pub fn ndim(&self) -> Option<usize> {
        match self {
            Value::Concrete { data, .. } => Some(data.ndim()),
            Value::Symbolic(e) => e.rank(),
        }
    }

    /// True if this value is known to be 0-d.
    pub fn is_scalar(&self) -> bool {
        self.ndim() == Some(0)
    }

    /// Lift into an expression: concrete values become constants.
    pub fn into_expr(self) -> SymExpr {
        match self {
            Value::Concrete { data, dtype } => SymExpr::constant_with_dtype(data, dtype),
            Value::Symbolic(e) => e,
        }
    }
}

impl From<ArrayD<f64>> for Value {
    fn from(data: ArrayD<f64>) -> Self {
        Value::concrete(data)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::scalar(v)
    }
}

impl From<SymExpr> for Value {
    fn from(expr: SymExpr) -> Self {
        Value::Symbolic(expr)
    }
}

impl From<Value> for SymExpr {
    fn from(v: Value) -> Self {
        v.into_expr()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Concrete { data, dtype } => write!(f, "{}{:?}", dtype, data.shape()),
            Value::Symbolic(e) => write!(f, "{}", e),
        }
    }
}

/// Substring dtype classification: `istype(&x, "int")` is true for every
/// integer dtype, `istype(&x, "int32")` only for Int32.
pub fn istype(value: &Value, spec: &str) -> bool {
    value.dtype().matches(spec)
}

/// True if the value's dtype matches any of the given specs.
pub fn istype_any<S: AsRef<str>>(value: &Value, specs: &[S]) -> bool {
    value.dtype().matches_any(specs)
}
