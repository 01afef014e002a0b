//! Error type for the dispatch layer.

use tensormux_expr::ExprError;
use tensormux_ndarray_backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MuxError {
    #[error("{op} needs at least two operands, got {got}")]
    NotEnoughOperands { op: &'static str, got: usize },

    #[error("symbolic operand reached {op} while the eager backend is active")]
    SymbolicInEagerMode { op: &'static str },

    #[error("check failed: {stmt}")]
    CheckFailed { stmt: String },

    #[error("update for '{target}' already recorded; a target takes one update per set")]
    DuplicateUpdate { target: String },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Expr(#[from] ExprError),
}
