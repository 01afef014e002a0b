//! The dispatched operation set.
//!
//! Every method decides its route once, deferred node or eager kernel, and
//! the two routes carry the same operand contract. Eager results keep a
//! dtype tag (comparisons produce Bool, casts re-tag, everything else
//! promotes its operands).

use ndarray::ArrayD;
use tensormux_expr::{AxisSide, BinaryOp, CmpOp, DType, PadMode, Region, SymExpr, UnaryOp};
use tensormux_ndarray_backend::{axes, conv, elemwise, subtensor};

use crate::{Mux, MuxError, Route, Value};

fn concrete<'a>(op: &'static str, v: &'a Value) -> Result<&'a ArrayD<f64>, MuxError> {
    v.as_concrete().ok_or(MuxError::SymbolicInEagerMode { op })
}

impl Mux {
    fn reduce_pairwise(
        &mut self,
        op: &'static str,
        bin: BinaryOp,
        args: &[Value],
    ) -> Result<Value, MuxError> {
        if args.len() < 2 {
            return Err(MuxError::NotEnoughOperands {
                op,
                got: args.len(),
            });
        }
        let refs: Vec<&Value> = args.iter().collect();
        match self.route(op, &refs)? {
            Route::Graph => {
                let mut iter = args.iter().cloned();
                let mut expr = iter
                    .next()
                    .map(Value::into_expr)
                    .unwrap_or_else(|| SymExpr::scalar(0.0));
                for v in iter {
                    expr = SymExpr::Binary {
                        op: bin,
                        lhs: Box::new(expr),
                        rhs: Box::new(v.into_expr()),
                    };
                }
                Ok(Value::Symbolic(expr))
            }
            Route::Eager => {
                // Left-to-right pairwise reduction.
                let mut acc = concrete(op, &args[0])?.clone();
                let mut dtype = args[0].dtype();
                for v in &args[1..] {
                    acc = elemwise::pairwise(bin, &acc, concrete(op, v)?)?;
                    dtype = DType::promote(dtype, v.dtype());
                }
                Ok(Value::Concrete { data: acc, dtype })
            }
        }
    }

    /// Elementwise maximum over two or more operands.
    pub fn largest(&mut self, args: &[Value]) -> Result<Value, MuxError> {
        self.reduce_pairwise("largest", BinaryOp::Maximum, args)
    }

    /// Elementwise minimum over two or more operands.
    pub fn smallest(&mut self, args: &[Value]) -> Result<Value, MuxError> {
        self.reduce_pairwise("smallest", BinaryOp::Minimum, args)
    }

    /// Elementwise comparison; the result dtype is Bool.
    pub fn cmp(&mut self, op: CmpOp, a: &Value, b: &Value) -> Result<Value, MuxError> {
        match self.route(op.symbol(), &[a, b])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::cmp(
                op,
                a.clone().into_expr(),
                b.clone().into_expr(),
            ))),
            Route::Eager => {
                let mask =
                    elemwise::compare(op, concrete(op.symbol(), a)?, concrete(op.symbol(), b)?)?;
                Ok(Value::Concrete {
                    data: mask,
                    dtype: DType::Bool,
                })
            }
        }
    }

    pub fn lt(&mut self, a: &Value, b: &Value) -> Result<Value, MuxError> {
        self.cmp(CmpOp::Lt, a, b)
    }

    pub fn le(&mut self, a: &Value, b: &Value) -> Result<Value, MuxError> {
        self.cmp(CmpOp::Le, a, b)
    }

    pub fn gt(&mut self, a: &Value, b: &Value) -> Result<Value, MuxError> {
        self.cmp(CmpOp::Gt, a, b)
    }

    pub fn ge(&mut self, a: &Value, b: &Value) -> Result<Value, MuxError> {
        self.cmp(CmpOp::Ge, a, b)
    }

    pub fn eq(&mut self, a: &Value, b: &Value) -> Result<Value, MuxError> {
        self.cmp(CmpOp::Eq, a, b)
    }

    /// Branch selection. A deferred condition builds a lazy node; a concrete
    /// condition must hold exactly one element and selects a branch now,
    /// returning it unevaluated.
    pub fn ifelse(
        &mut self,
        cond: &Value,
        on_true: Value,
        on_false: Value,
        name: Option<&str>,
    ) -> Result<Value, MuxError> {
        match self.route("ifelse", &[cond])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::ifelse(
                cond.clone().into_expr(),
                on_true.into_expr(),
                on_false.into_expr(),
                name.map(str::to_string),
            ))),
            Route::Eager => {
                let data = concrete("ifelse", cond)?;
                if tensormux_ndarray_backend::scalar_truth("ifelse", data)? {
                    Ok(on_true)
                } else {
                    Ok(on_false)
                }
            }
        }
    }

    /// Elementwise choice between two same-shaped operands.
    pub fn switch(
        &mut self,
        cond: &Value,
        on_true: &Value,
        on_false: &Value,
    ) -> Result<Value, MuxError> {
        match self.route("switch", &[cond, on_true, on_false])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::switch(
                cond.clone().into_expr(),
                on_true.clone().into_expr(),
                on_false.clone().into_expr(),
            ))),
            Route::Eager => {
                let data = elemwise::switch(
                    concrete("switch", cond)?,
                    concrete("switch", on_true)?,
                    concrete("switch", on_false)?,
                )?;
                Ok(Value::Concrete {
                    data,
                    dtype: DType::promote(on_true.dtype(), on_false.dtype()),
                })
            }
        }
    }

    /// Overwrite `region` of `target` with `value`. Eagerly this writes into
    /// the backing allocation and returns it; deferred it is a
    /// non-destructive update node.
    pub fn set_subtensor(
        &mut self,
        target: Value,
        region: Region,
        value: &Value,
    ) -> Result<Value, MuxError> {
        self.subtensor_update("set_subtensor", target, region, value, false)
    }

    /// Add `value` into `region` of `target`.
    pub fn inc_subtensor(
        &mut self,
        target: Value,
        region: Region,
        value: &Value,
    ) -> Result<Value, MuxError> {
        self.subtensor_update("inc_subtensor", target, region, value, true)
    }

    fn subtensor_update(
        &mut self,
        op: &'static str,
        target: Value,
        region: Region,
        value: &Value,
        increment: bool,
    ) -> Result<Value, MuxError> {
        match self.route(op, &[&target, value])? {
            Route::Graph => {
                let target = target.into_expr();
                let value = value.clone().into_expr();
                Ok(Value::Symbolic(if increment {
                    SymExpr::inc_subtensor(target, region, value)
                } else {
                    SymExpr::set_subtensor(target, region, value)
                }))
            }
            Route::Eager => {
                let Value::Concrete { mut data, dtype } = target else {
                    return Err(MuxError::SymbolicInEagerMode { op });
                };
                let update = concrete(op, value)?;
                if increment {
                    subtensor::inc_subtensor(&mut data, &region, update)?;
                } else {
                    subtensor::set_subtensor(&mut data, &region, update)?;
                }
                Ok(Value::Concrete { data, dtype })
            }
        }
    }

    /// Insert `count` singleton axes on the named side.
    pub fn add_axes(
        &mut self,
        x: &Value,
        count: usize,
        side: AxisSide,
    ) -> Result<Value, MuxError> {
        match self.route("add_axes", &[x])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::add_axes(
                x.clone().into_expr(),
                count,
                side,
            ))),
            Route::Eager => Ok(Value::Concrete {
                data: axes::add_axes(concrete("add_axes", x)?, count, side),
                dtype: x.dtype(),
            }),
        }
    }

    /// Relocate axis `source` to `destination`. Axis bounds are validated
    /// now whenever the operand's rank is known.
    pub fn move_axis(
        &mut self,
        x: &Value,
        source: usize,
        destination: usize,
    ) -> Result<Value, MuxError> {
        if let Some(rank) = x.ndim() {
            for axis in [source, destination] {
                if axis >= rank {
                    return Err(
                        tensormux_ndarray_backend::BackendError::InvalidAxis { axis, rank }.into(),
                    );
                }
            }
        }
        match self.route("moveaxis", &[x])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::move_axis(
                x.clone().into_expr(),
                source,
                destination,
            ))),
            Route::Eager => Ok(Value::Concrete {
                data: axes::move_axis(concrete("moveaxis", x)?, source, destination)?,
                dtype: x.dtype(),
            }),
        }
    }

    /// Per-channel-pair 1-D convolution of a (time, from) history against a
    /// (time, to, from) kernel; output `[t][to][from]`.
    ///
    /// The history must be 2-D. Like [`Mux::check`], the precondition can
    /// only be enforced when the rank is knowable: a deferred history of
    /// unknown rank passes through here and fails at realization instead.
    /// The eager route and the deferred route use structurally different
    /// convolution routines and are not guaranteed interchangeable beyond
    /// the modes both define; see the backend's `conv` module.
    pub fn conv1d(
        &mut self,
        history: &Value,
        kernel: &Value,
        mode: PadMode,
    ) -> Result<Value, MuxError> {
        if let Some(rank) = history.ndim() {
            if rank != 2 {
                return Err(tensormux_ndarray_backend::BackendError::RankMismatch {
                    op: "conv1d",
                    expected: 2,
                    actual: rank,
                }
                .into());
            }
        }
        match self.route("conv1d", &[history, kernel])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::conv1d(
                history.clone().into_expr(),
                kernel.clone().into_expr(),
                mode,
            ))),
            Route::Eager => {
                let out = conv::conv1d_direct(
                    concrete("conv1d", history)?,
                    concrete("conv1d", kernel)?,
                    mode,
                )?;
                Ok(Value::concrete(out))
            }
        }
    }

    /// Elementwise absolute value.
    pub fn abs(&mut self, x: &Value) -> Result<Value, MuxError> {
        self.unary(UnaryOp::Abs, x)
    }

    /// Elementwise rounding to the nearest integer, dtype unchanged.
    pub fn round(&mut self, x: &Value) -> Result<Value, MuxError> {
        self.unary(UnaryOp::Round, x)
    }

    fn unary(&mut self, op: UnaryOp, x: &Value) -> Result<Value, MuxError> {
        match self.route(op.name(), &[x])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::unary(op, x.clone().into_expr()))),
            Route::Eager => Ok(Value::Concrete {
                data: elemwise::unary(op, concrete(op.name(), x)?),
                dtype: x.dtype(),
            }),
        }
    }

    /// Re-tag under `dtype`; integer targets truncate toward zero.
    pub fn cast(&mut self, x: &Value, dtype: DType) -> Result<Value, MuxError> {
        match self.route("cast", &[x])? {
            Route::Graph => Ok(Value::Symbolic(SymExpr::cast(x.clone().into_expr(), dtype))),
            Route::Eager => Ok(Value::Concrete {
                data: elemwise::cast(concrete("cast", x)?, dtype),
                dtype,
            }),
        }
    }

    pub fn cast_int16(&mut self, x: &Value) -> Result<Value, MuxError> {
        self.cast(x, DType::Int16)
    }

    pub fn cast_int32(&mut self, x: &Value) -> Result<Value, MuxError> {
        self.cast(x, DType::Int32)
    }

    pub fn cast_int64(&mut self, x: &Value) -> Result<Value, MuxError> {
        self.cast(x, DType::Int64)
    }

    /// Promote a value into the active backend's preferred form: under the
    /// graph backend a concrete value is lifted to a constant node;
    /// everything else passes through unchanged.
    pub fn as_variable(&self, x: Value) -> Value {
        match (self.mode(), x) {
            (crate::ExecutionMode::Graph, Value::Concrete { data, dtype }) => {
                Value::Symbolic(SymExpr::constant_with_dtype(data, dtype))
            }
            (_, other) => other,
        }
    }
}
