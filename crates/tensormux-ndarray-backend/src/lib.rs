//! Eager ndarray backend for the tensormux dispatch layer.
//!
//! Everything here computes immediately on `ArrayD<f64>` tensors:
//!
//! - `elemwise`: pairwise max/min, comparison masks, elementwise select,
//!   abs/round/neg, dtype-directed casts
//! - `subtensor`: in-place set/inc of a region of a backing array
//! - `axes`: singleton-axis insertion and axis relocation
//! - `conv`: the two 1-D convolution routines (direct, and the width-1
//!   image-convolution emulation the evaluator lowers through)
//! - `random`: seeded pseudo-random normal stream
//! - `eval`: realization of a deferred [`SymExpr`](tensormux_expr::SymExpr)
//!   from attached test values and shared-variable contents
//!
//! Kernels validate shapes and axes up front and return typed errors; they
//! never panic on bad input.

pub mod axes;
pub mod conv;
pub mod elemwise;
mod error;
pub mod eval;
pub mod random;
pub mod subtensor;

use ndarray::ArrayD;

/// The concrete tensor type of this backend.
pub type NdTensor = ArrayD<f64>;

pub use error::BackendError;
pub use eval::{eval, scalar_truth, truthy};
pub use random::RandomStreams;
