//! Error types for the eager backend.

use tensormux_expr::{ExprError, PadMode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{op}: shape mismatch, expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        op: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("{op}: expected a rank-{expected} array, got rank {actual}")]
    RankMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("axis {axis} out of bounds for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("region constrains {region_rank} axes but the target has rank {rank}")]
    RegionRankMismatch { region_rank: usize, rank: usize },

    #[error("region {start}..{end} exceeds axis {axis} of length {len}")]
    RegionOutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("region {start}..{end} on axis {axis} has reversed bounds")]
    RegionReversed {
        axis: usize,
        start: usize,
        end: usize,
    },

    #[error("{op}: condition must reduce to a single element, got shape {shape:?}")]
    NonScalarCondition { op: &'static str, shape: Vec<usize> },

    #[error("{op}: kernel of length {kernel} does not fit signal of length {signal}")]
    KernelTooLong {
        op: &'static str,
        kernel: usize,
        signal: usize,
    },

    #[error("image-convolution route supports only 'valid' and 'full', got '{0}'")]
    UnsupportedPadMode(PadMode),

    #[error("normal stream: invalid standard deviation {0}; must be finite and non-negative")]
    InvalidStd(f64),

    #[error(transparent)]
    Expr(#[from] ExprError),
}
