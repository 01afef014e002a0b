//! Realization of deferred expressions.
//!
//! `eval` walks a [`SymExpr`] and computes it with the eager kernels,
//! substituting attached test values for variables and current contents for
//! shared handles. A variable without a test value is an error naming the
//! variable. `IfElse` is lazy: the condition is realized first and only the
//! selected branch is visited.
//!
//! `Conv1d` nodes deliberately lower through the image-convolution routine
//! ([`crate::conv::conv1d_columns`]), not the direct one; see the module
//! notes in `conv` for the divergence this preserves.

use tensormux_expr::{ExprError, SubtensorKind, SymExpr};

use crate::{axes, conv, elemwise, subtensor, BackendError, NdTensor};

/// Truth of an assertion operand: every element nonzero. Matches reduction
/// semantics of `all` on the eager library; an empty tensor is true.
pub fn truthy(x: &NdTensor) -> bool {
    x.iter().all(|&v| v != 0.0)
}

/// Truth of a branch condition, which must hold exactly one element.
pub fn scalar_truth(op: &'static str, x: &NdTensor) -> Result<bool, BackendError> {
    if x.len() != 1 {
        return Err(BackendError::NonScalarCondition {
            op,
            shape: x.shape().to_vec(),
        });
    }
    Ok(x.iter().all(|&v| v != 0.0))
}

/// Realize a deferred expression to a concrete tensor.
pub fn eval(expr: &SymExpr) -> Result<NdTensor, BackendError> {
    match expr {
        SymExpr::Var {
            name, test_value, ..
        } => match test_value {
            Some(v) => Ok(v.clone()),
            None => Err(ExprError::MissingTestValue { name: name.clone() }.into()),
        },
        SymExpr::Shared(s) => Ok(s.get_value().clone()),
        SymExpr::Const { value, .. } => Ok(value.clone()),
        SymExpr::Cmp { op, lhs, rhs } => elemwise::compare(*op, &eval(lhs)?, &eval(rhs)?),
        SymExpr::Binary { op, lhs, rhs } => elemwise::pairwise(*op, &eval(lhs)?, &eval(rhs)?),
        SymExpr::Unary { op, input } => Ok(elemwise::unary(*op, &eval(input)?)),
        SymExpr::Cast { dtype, input } => Ok(elemwise::cast(&eval(input)?, *dtype)),
        SymExpr::Switch {
            cond,
            on_true,
            on_false,
        } => elemwise::switch(&eval(cond)?, &eval(on_true)?, &eval(on_false)?),
        SymExpr::IfElse {
            cond,
            on_true,
            on_false,
            ..
        } => {
            if scalar_truth("ifelse", &eval(cond)?)? {
                eval(on_true)
            } else {
                eval(on_false)
            }
        }
        SymExpr::Subtensor {
            kind,
            target,
            region,
            value,
        } => {
            // Non-destructive: the update lands on the realized copy.
            let mut base = eval(target)?;
            let update = eval(value)?;
            match kind {
                SubtensorKind::Set => subtensor::set_subtensor(&mut base, region, &update)?,
                SubtensorKind::Inc => subtensor::inc_subtensor(&mut base, region, &update)?,
            }
            Ok(base)
        }
        SymExpr::AddAxes { input, count, side } => {
            Ok(axes::add_axes(&eval(input)?, *count, *side))
        }
        SymExpr::MoveAxis {
            input,
            source,
            destination,
        } => axes::move_axis(&eval(input)?, *source, *destination),
        SymExpr::Conv1d {
            history,
            kernel,
            mode,
        } => conv::conv1d_columns(&eval(history)?, &eval(kernel)?, *mode),
    }
}
