//! tensormux: run numerical code unmodified against a deferred expression
//! graph or eager ndarray arrays.
//!
//! A [`Mux`] context is built once per computation and passed to every call
//! site. Operands are [`Value`]s, either concrete tensors or deferred
//! [`SymExpr`](tensormux_expr::SymExpr) trees, and each operation routes by
//! pattern match: under [`ExecutionMode::Graph`], an operation touching a
//! deferred operand builds the matching expression node; everything else
//! computes immediately through the ndarray backend. A deferred operand
//! under [`ExecutionMode::Eager`] is a typed error.
//!
//! ```
//! use ndarray::{ArrayD, IxDyn};
//! use tensormux::{Mux, Value};
//!
//! let mut mux = Mux::eager();
//! let a = Value::concrete(ArrayD::from_shape_vec(IxDyn(&[3]), vec![1.0, 5.0, 2.0]).unwrap());
//! let b = Value::concrete(ArrayD::from_shape_vec(IxDyn(&[3]), vec![4.0, 0.0, 2.0]).unwrap());
//! let m = mux.largest(&[a, b]).unwrap();
//! assert_eq!(m.as_concrete().unwrap().as_slice().unwrap(), &[4.0, 5.0, 2.0]);
//! ```
//!
//! # Architecture
//!
//! - **Expression layer**: [`expr`], the deferred tree, dtypes, regions,
//!   shared handles
//! - **Execution layer**: [`backend`], eager kernels, the normal stream,
//!   and the test-value evaluator
//! - **Dispatch layer**: this crate, with [`Value`], [`Mux`], the operation
//!   set, update accumulation, checks, and dispatch tracing

pub use tensormux_expr as expr;
pub use tensormux_ndarray_backend as backend;

mod check;
mod context;
mod error;
mod ops;
mod trace;
mod update;
mod value;

pub use check::CheckOutcome;
pub use context::{ExecutionMode, Mux, Route};
pub use error::MuxError;
pub use trace::{DispatchEvent, DispatchStats, DispatchTracer, TraceLevel};
pub use update::{UpdateBuilder, UpdateSet};
pub use value::{istype, istype_any, Value};

// The types that appear in operation signatures, for call sites that do not
// want to reach into the member crates.
pub use tensormux_expr::{
    AxisSide, CmpOp, DType, DimRange, PadMode, Region, SharedVar, SymExpr,
};
pub use tensormux_ndarray_backend::{NdTensor, RandomStreams};
