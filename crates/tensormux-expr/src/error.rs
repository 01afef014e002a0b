//! Error types for the expression crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExprError {
    #[error(
        "variable '{name}' has no test value; attach one with \
         `with_test_value` before evaluating"
    )]
    MissingTestValue { name: String },

    #[error("shared variable '{name}' holds shape {current:?}, new value has shape {new:?}")]
    SharedShapeMismatch {
        name: String,
        current: Vec<usize>,
        new: Vec<usize>,
    },

    #[error("shared variable '{name}' is already borrowed")]
    SharedInUse { name: String },

    #[error("unrecognized axis side '{0}' (expected 'left', 'right' or 'before last')")]
    UnknownAxisSide(String),

    #[error("unrecognized convolution mode '{0}' (expected 'valid', 'full' or 'same')")]
    UnknownPadMode(String),

    #[error("unrecognized comparison '{0}' (expected one of <, <=, >, >=, ==)")]
    UnknownCmpOp(String),

    #[error("unrecognized dtype '{0}'")]
    UnknownDType(String),
}
