//! The deferred expression tree.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::{AxisSide, BinaryOp, CmpOp, DType, PadMode, Region, SharedVar, SubtensorKind, UnaryOp};

/// A deferred tensor computation, one variant per dispatchable operation.
///
/// Nothing here evaluates; realization happens in the backend crate, which
/// walks the tree and substitutes test values for variables and current
/// contents for shared handles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SymExpr {
    /// A free variable, optionally carrying a concrete test value for
    /// debug evaluation.
    Var {
        name: String,
        dtype: DType,
        test_value: Option<ArrayD<f64>>,
    },

    /// A reference to a shared value handle; evaluates to its current
    /// contents.
    Shared(SharedVar),

    /// An already-materialized constant lifted into the graph.
    Const { value: ArrayD<f64>, dtype: DType },

    /// Elementwise comparison, producing a boolean mask.
    Cmp {
        op: CmpOp,
        lhs: Box<SymExpr>,
        rhs: Box<SymExpr>,
    },

    /// Elementwise maximum/minimum of two operands.
    Binary {
        op: BinaryOp,
        lhs: Box<SymExpr>,
        rhs: Box<SymExpr>,
    },

    /// Elementwise unary operation.
    Unary { op: UnaryOp, input: Box<SymExpr> },

    /// Reinterpret under another dtype; integer targets truncate toward zero.
    Cast { dtype: DType, input: Box<SymExpr> },

    /// Elementwise choice between two same-shaped operands.
    Switch {
        cond: Box<SymExpr>,
        on_true: Box<SymExpr>,
        on_false: Box<SymExpr>,
    },

    /// Lazy branch selection on a scalar condition: only the selected branch
    /// is evaluated.
    IfElse {
        name: Option<String>,
        cond: Box<SymExpr>,
        on_true: Box<SymExpr>,
        on_false: Box<SymExpr>,
    },

    /// Non-destructive subtensor update: the evaluated target with `value`
    /// written (or added) into `region`.
    Subtensor {
        kind: SubtensorKind,
        target: Box<SymExpr>,
        region: Region,
        value: Box<SymExpr>,
    },

    /// Insert singleton axes on the named side.
    AddAxes {
        input: Box<SymExpr>,
        count: usize,
        side: AxisSide,
    },

    /// Relocate one axis, shifting the others.
    MoveAxis {
        input: Box<SymExpr>,
        source: usize,
        destination: usize,
    },

    /// Per-channel-pair 1-D convolution of a (time, from) history against a
    /// (time, to, from) kernel.
    Conv1d {
        history: Box<SymExpr>,
        kernel: Box<SymExpr>,
        mode: PadMode,
    },
}

impl SymExpr {
    /// A float64 variable with no test value.
    pub fn var(name: impl Into<String>) -> Self {
        SymExpr::Var {
            name: name.into(),
            dtype: DType::Float64,
            test_value: None,
        }
    }

    pub fn var_with_dtype(name: impl Into<String>, dtype: DType) -> Self {
        SymExpr::Var {
            name: name.into(),
            dtype,
            test_value: None,
        }
    }

    /// Attach a test value. Only variables carry one; on any other node this
    /// returns the node unchanged.
    pub fn with_test_value(self, value: ArrayD<f64>) -> Self {
        match self {
            SymExpr::Var { name, dtype, .. } => SymExpr::Var {
                name,
                dtype,
                test_value: Some(value),
            },
            other => other,
        }
    }

    pub fn shared(var: SharedVar) -> Self {
        SymExpr::Shared(var)
    }

    pub fn constant(value: ArrayD<f64>) -> Self {
        SymExpr::Const {
            value,
            dtype: DType::Float64,
        }
    }

    pub fn constant_with_dtype(value: ArrayD<f64>, dtype: DType) -> Self {
        SymExpr::Const { value, dtype }
    }

    /// A 0-d float64 constant.
    pub fn scalar(value: f64) -> Self {
        SymExpr::constant(ArrayD::from_elem(ndarray::IxDyn(&[]), value))
    }

    pub fn cmp(op: CmpOp, lhs: SymExpr, rhs: SymExpr) -> Self {
        SymExpr::Cmp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn maximum(lhs: SymExpr, rhs: SymExpr) -> Self {
        SymExpr::Binary {
            op: BinaryOp::Maximum,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn minimum(lhs: SymExpr, rhs: SymExpr) -> Self {
        SymExpr::Binary {
            op: BinaryOp::Minimum,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn unary(op: UnaryOp, input: SymExpr) -> Self {
        SymExpr::Unary {
            op,
            input: Box::new(input),
        }
    }

    pub fn abs(input: SymExpr) -> Self {
        SymExpr::unary(UnaryOp::Abs, input)
    }

    pub fn round(input: SymExpr) -> Self {
        SymExpr::unary(UnaryOp::Round, input)
    }

    pub fn cast(input: SymExpr, dtype: DType) -> Self {
        SymExpr::Cast {
            dtype,
            input: Box::new(input),
        }
    }

    pub fn switch(cond: SymExpr, on_true: SymExpr, on_false: SymExpr) -> Self {
        SymExpr::Switch {
            cond: Box::new(cond),
            on_true: Box::new(on_true),
            on_false: Box::new(on_false),
        }
    }

    pub fn ifelse(
        cond: SymExpr,
        on_true: SymExpr,
        on_false: SymExpr,
        name: Option<String>,
    ) -> Self {
        SymExpr::IfElse {
            name,
            cond: Box::new(cond),
            on_true: Box::new(on_true),
            on_false: Box::new(on_false),
        }
    }

    pub fn set_subtensor(target: SymExpr, region: Region, value: SymExpr) -> Self {
        SymExpr::Subtensor {
            kind: SubtensorKind::Set,
            target: Box::new(target),
            region,
            value: Box::new(value),
        }
    }

    pub fn inc_subtensor(target: SymExpr, region: Region, value: SymExpr) -> Self {
        SymExpr::Subtensor {
            kind: SubtensorKind::Inc,
            target: Box::new(target),
            region,
            value: Box::new(value),
        }
    }

    pub fn add_axes(input: SymExpr, count: usize, side: AxisSide) -> Self {
        SymExpr::AddAxes {
            input: Box::new(input),
            count,
            side,
        }
    }

    pub fn move_axis(input: SymExpr, source: usize, destination: usize) -> Self {
        SymExpr::MoveAxis {
            input: Box::new(input),
            source,
            destination,
        }
    }

    pub fn conv1d(history: SymExpr, kernel: SymExpr, mode: PadMode) -> Self {
        SymExpr::Conv1d {
            history: Box::new(history),
            kernel: Box::new(kernel),
            mode,
        }
    }

    /// The element dtype this expression evaluates to.
    pub fn dtype(&self) -> DType {
        match self {
            SymExpr::Var { dtype, .. } | SymExpr::Const { dtype, .. } => *dtype,
            SymExpr::Shared(_) => DType::Float64,
            SymExpr::Cmp { .. } => DType::Bool,
            SymExpr::Cast { dtype, .. } => *dtype,
            SymExpr::Binary { lhs, rhs, .. } => DType::promote(lhs.dtype(), rhs.dtype()),
            SymExpr::Unary { input, .. } => input.dtype(),
            SymExpr::Switch {
                on_true, on_false, ..
            }
            | SymExpr::IfElse {
                on_true, on_false, ..
            } => DType::promote(on_true.dtype(), on_false.dtype()),
            SymExpr::Subtensor { target, value, .. } => {
                DType::promote(target.dtype(), value.dtype())
            }
            SymExpr::AddAxes { input, .. } | SymExpr::MoveAxis { input, .. } => input.dtype(),
            SymExpr::Conv1d { .. } => DType::Float64,
        }
    }

    /// Rank of the evaluated result, where it can be inferred without
    /// evaluating. Variables without test values have unknown rank.
    pub fn rank(&self) -> Option<usize> {
        match self {
            SymExpr::Var { test_value, .. } => test_value.as_ref().map(|v| v.ndim()),
            SymExpr::Shared(s) => Some(s.ndim()),
            SymExpr::Const { value, .. } => Some(value.ndim()),
            SymExpr::Cmp { lhs, rhs, .. } | SymExpr::Binary { lhs, rhs, .. } => {
                lhs.rank().or_else(|| rhs.rank())
            }
            SymExpr::Unary { input, .. } | SymExpr::Cast { input, .. } => input.rank(),
            SymExpr::Switch {
                on_true, on_false, ..
            }
            | SymExpr::IfElse {
                on_true, on_false, ..
            } => on_true.rank().or_else(|| on_false.rank()),
            SymExpr::Subtensor { target, .. } => target.rank(),
            SymExpr::AddAxes { input, count, .. } => input.rank().map(|r| r + count),
            SymExpr::MoveAxis { input, .. } => input.rank(),
            SymExpr::Conv1d { .. } => Some(3),
        }
    }

    /// Names of free variables, in order of first appearance.
    pub fn free_vars(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_vars(&mut names);
        names
    }

    fn collect_vars(&self, names: &mut Vec<String>) {
        match self {
            SymExpr::Var { name, .. } => {
                if !names.iter().any(|n| n == name) {
                    names.push(name.clone());
                }
            }
            SymExpr::Shared(_) | SymExpr::Const { .. } => {}
            SymExpr::Cmp { lhs, rhs, .. } | SymExpr::Binary { lhs, rhs, .. } => {
                lhs.collect_vars(names);
                rhs.collect_vars(names);
            }
            SymExpr::Unary { input, .. } | SymExpr::Cast { input, .. } => {
                input.collect_vars(names)
            }
            SymExpr::Switch {
                cond,
                on_true,
                on_false,
            }
            | SymExpr::IfElse {
                cond,
                on_true,
                on_false,
                ..
            } => {
                cond.collect_vars(names);
                on_true.collect_vars(names);
                on_false.collect_vars(names);
            }
            SymExpr::Subtensor { target, value, .. } => {
                target.collect_vars(names);
                value.collect_vars(names);
            }
            SymExpr::AddAxes { input, .. } | SymExpr::MoveAxis { input, .. } => {
                input.collect_vars(names)
            }
            SymExpr::Conv1d {
                history, kernel, ..
            } => {
                history.collect_vars(names);
                kernel.collect_vars(names);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn arr1(data: Vec<f64>) -> ArrayD<f64> {
        let len = data.len();
        ArrayD::from_shape_vec(IxDyn(&[len]), data).unwrap()
    }

    #[test]
    fn test_dtype_inference() {
        let x = SymExpr::var_with_dtype("x", DType::Int32);
        let y = SymExpr::var("y");
        assert_eq!(SymExpr::maximum(x.clone(), y.clone()).dtype(), DType::Float64);
        assert_eq!(SymExpr::cmp(CmpOp::Lt, x.clone(), y).dtype(), DType::Bool);
        assert_eq!(SymExpr::cast(x, DType::Int64).dtype(), DType::Int64);
    }

    #[test]
    fn test_rank_inference() {
        let x = SymExpr::var("x");
        assert_eq!(x.rank(), None);

        let x = x.with_test_value(arr1(vec![1.0, 2.0, 3.0]));
        assert_eq!(x.rank(), Some(1));
        assert_eq!(
            SymExpr::add_axes(x.clone(), 2, AxisSide::Left).rank(),
            Some(3)
        );
        assert_eq!(
            SymExpr::conv1d(x.clone(), SymExpr::var("k"), PadMode::Valid).rank(),
            Some(3)
        );
        // Rank flows through from either side of a binary node.
        assert_eq!(SymExpr::maximum(SymExpr::var("u"), x).rank(), Some(1));
    }

    #[test]
    fn test_free_vars_in_order() {
        let e = SymExpr::switch(
            SymExpr::cmp(CmpOp::Gt, SymExpr::var("a"), SymExpr::var("b")),
            SymExpr::var("a"),
            SymExpr::constant(arr1(vec![0.0])),
        );
        assert_eq!(e.free_vars(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_serde_round_trip() {
        let e = SymExpr::ifelse(
            SymExpr::cmp(CmpOp::Le, SymExpr::var("t"), SymExpr::scalar(5.0)),
            SymExpr::abs(SymExpr::var("x")),
            SymExpr::cast(SymExpr::var("x"), DType::Int32),
            Some("clip".to_string()),
        );
        let json = serde_json::to_string(&e).unwrap();
        let back: SymExpr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
