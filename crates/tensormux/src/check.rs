//! Backend-aware assertions and test-value retrieval.

use ndarray::ArrayD;
use tensormux_ndarray_backend::{eval, truthy};

use crate::{Mux, MuxError, Value};

/// What a [`Mux::check`] call established.
///
/// A deferred statement without test values cannot be decided; that case is
/// reported explicitly rather than silently passing.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The statement was evaluated and holds.
    Passed,
    /// The statement is deferred and the context carries no test values;
    /// nothing was established.
    Unverified,
}

impl CheckOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, CheckOutcome::Passed)
    }
}

impl Mux {
    /// Backend-aware assertion: a concrete statement is truthy iff every
    /// element is nonzero, and a falsy statement is a [`MuxError::CheckFailed`].
    /// A deferred statement is evaluated through test values when the
    /// context carries them, and reported [`CheckOutcome::Unverified`]
    /// otherwise.
    pub fn check(&mut self, stmt: &Value) -> Result<CheckOutcome, MuxError> {
        self.route("check", &[stmt])?;
        match stmt {
            Value::Concrete { data, .. } => {
                if truthy(data) {
                    Ok(CheckOutcome::Passed)
                } else {
                    Err(MuxError::CheckFailed {
                        stmt: stmt.to_string(),
                    })
                }
            }
            Value::Symbolic(expr) => {
                if !self.computes_test_values() {
                    return Ok(CheckOutcome::Unverified);
                }
                if truthy(&eval(expr)?) {
                    Ok(CheckOutcome::Passed)
                } else {
                    Err(MuxError::CheckFailed {
                        stmt: stmt.to_string(),
                    })
                }
            }
        }
    }

    /// The concrete realization of a value: the value itself when concrete,
    /// the test-value evaluation otherwise. A variable with no test value
    /// fails with an error naming it.
    pub fn test_value(&self, x: &Value) -> Result<ArrayD<f64>, MuxError> {
        match x {
            Value::Concrete { data, .. } => Ok(data.clone()),
            Value::Symbolic(expr) => Ok(eval(expr)?),
        }
    }
}
