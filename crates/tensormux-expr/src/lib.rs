//! Deferred tensor expressions (SymExpr).
//!
//! This crate is the symbolic half of the tensormux dispatch layer: a value
//! that has not been computed yet is represented as a [`SymExpr`] tree, one
//! variant per dispatchable operation. The tree carries everything a later
//! realization needs (dtypes, axis descriptions, subtensor regions, shared
//! value handles and optional test values) but performs no arithmetic
//! itself. Execution lives in the backend crate.
//!
//! ## Module organization
//!
//! - `expr`: the [`SymExpr`] tree, constructors, dtype/rank inference
//! - `dtype`: numpy-named dtype tags with promotion and substring matching
//! - `ops`: operation enums and their string parsers
//! - `region`: contiguous subtensor regions for set/inc updates
//! - `shared`: identity-compared mutable value handles
//! - `display`: human-readable rendering of expression trees
//! - `error`: error types for this crate

mod display;
mod dtype;
mod error;
mod expr;
mod ops;
mod region;
mod shared;

pub use dtype::DType;
pub use error::ExprError;
pub use expr::SymExpr;
pub use ops::{AxisSide, BinaryOp, CmpOp, PadMode, SubtensorKind, UnaryOp};
pub use region::{DimRange, Region};
pub use shared::SharedVar;
