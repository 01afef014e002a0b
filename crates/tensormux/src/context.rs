//! The dispatch context.
//!
//! A [`Mux`] is the capability object every operation takes `&mut`: it holds
//! the selected execution mode, whether symbolic checks may fall back to test
//! values, and the dispatch tracer. There is no process-wide state; two
//! computations may hold contexts with different modes side by side.
//! A context never retroactively converts values or shared handles built
//! under another context.

use crate::trace::{DispatchTracer, TraceLevel};
use crate::{MuxError, Value};

/// Which backend a context routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Operations execute immediately on concrete arrays.
    #[default]
    Eager,
    /// Operations on symbolic operands build deferred expression nodes.
    Graph,
}

impl ExecutionMode {
    pub fn is_eager(&self) -> bool {
        matches!(self, ExecutionMode::Eager)
    }

    pub fn is_graph(&self) -> bool {
        matches!(self, ExecutionMode::Graph)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Eager => write!(f, "eager"),
            ExecutionMode::Graph => write!(f, "graph"),
        }
    }
}

/// The route a single dispatched operation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Computed now on concrete arrays.
    Eager,
    /// Deferred into an expression node.
    Graph,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Route::Eager => write!(f, "eager"),
            Route::Graph => write!(f, "graph"),
        }
    }
}

/// Dispatch context: execution mode, test-value policy, tracer.
pub struct Mux {
    mode: ExecutionMode,
    compute_test_values: bool,
    tracer: DispatchTracer,
}

impl Mux {
    pub fn new(mode: ExecutionMode) -> Self {
        Mux {
            mode,
            compute_test_values: false,
            tracer: DispatchTracer::disabled(),
        }
    }

    /// A context over the eager backend.
    pub fn eager() -> Self {
        Mux::new(ExecutionMode::Eager)
    }

    /// A context over the deferred-expression backend.
    pub fn graph() -> Self {
        Mux::new(ExecutionMode::Graph)
    }

    /// Let symbolic checks evaluate through attached test values instead of
    /// reporting [`CheckOutcome::Unverified`](crate::CheckOutcome).
    pub fn with_test_values(mut self, enabled: bool) -> Self {
        self.compute_test_values = enabled;
        self
    }

    pub fn with_trace_level(mut self, level: TraceLevel) -> Self {
        self.tracer = DispatchTracer::new(level);
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn computes_test_values(&self) -> bool {
        self.compute_test_values
    }

    /// The "effectively infinite" sentinel for this mode: a true infinity
    /// eagerly, a large finite stand-in for the deferred backend, which
    /// cannot carry infinities through its graphs.
    pub fn inf(&self) -> f64 {
        match self.mode {
            ExecutionMode::Eager => f64::INFINITY,
            ExecutionMode::Graph => 1e12,
        }
    }

    pub fn tracer(&self) -> &DispatchTracer {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut DispatchTracer {
        &mut self.tracer
    }

    /// Decide the route for an operation over `operands`. Graph mode defers
    /// only when a symbolic operand is present; eager mode refuses symbolic
    /// operands outright.
    pub(crate) fn route(
        &mut self,
        op: &'static str,
        operands: &[&Value],
    ) -> Result<Route, MuxError> {
        let any_symbolic = operands.iter().any(|v| v.is_symbolic());
        let route = match (self.mode, any_symbolic) {
            (ExecutionMode::Graph, true) => Route::Graph,
            (ExecutionMode::Eager, true) => {
                return Err(MuxError::SymbolicInEagerMode { op });
            }
            (_, false) => Route::Eager,
        };
        self.tracer.record_dispatch(op, route, operands);
        Ok(route)
    }
}

impl Default for Mux {
    fn default() -> Self {
        Mux::eager()
    }
}
