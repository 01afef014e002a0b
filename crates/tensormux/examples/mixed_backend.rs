//! Drive the same leaky-integrator step through both backends.
//!
//! ```bash
//! cargo run -p tensormux --example mixed_backend
//! ```

use ndarray::{ArrayD, IxDyn};
use tensormux::{
    CmpOp, Mux, Region, SharedVar, SymExpr, TraceLevel, UpdateBuilder, Value,
};
use tensormux_ndarray_backend::eval;

fn arr(data: Vec<f64>) -> ArrayD<f64> {
    let len = data.len();
    ArrayD::from_shape_vec(IxDyn(&[len]), data).expect("shape matches data")
}

fn step(mux: &mut Mux, u: &Value, threshold: &Value) -> Value {
    // Clamp membrane values above threshold back to zero, keep the rest.
    let mask = mux.ge(u, threshold).expect("comparison dispatches");
    let reset = mux
        .switch(&mask, &Value::concrete(arr(vec![0.0; 4])), u)
        .expect("switch dispatches");
    mux.round(&reset).expect("round dispatches")
}

fn main() {
    let u0 = arr(vec![0.2, 1.4, 0.7, 2.2]);
    let threshold = Value::concrete(arr(vec![1.0; 4]));

    // Eager: everything computes immediately.
    let mut eager = Mux::eager().with_trace_level(TraceLevel::Ops);
    let eager_out = step(&mut eager, &Value::concrete(u0.clone()), &threshold);
    println!("eager result:    {}", eager_out);
    println!("{}", eager.tracer().format_trace());

    // Graph: the identical call sites build a deferred expression instead.
    let mut graph = Mux::graph().with_trace_level(TraceLevel::Ops);
    let u = Value::symbolic(SymExpr::var("u").with_test_value(u0.clone()));
    let graph_out = step(&mut graph, &u, &threshold);
    println!("graph result:    {}", graph_out);

    if let Value::Symbolic(expr) = &graph_out {
        println!("realized:        {:?}", eval(expr).expect("test values attached"));
    }

    // Shared state advanced through a committed update set.
    let state = SharedVar::with_name(u0, "u");
    let decayed = SymExpr::set_subtensor(
        SymExpr::shared(state.clone()),
        Region::range(0, 2),
        SymExpr::constant(arr(vec![0.0, 0.0])),
    );
    let mut updates = UpdateBuilder::new();
    updates.insert(&state, decayed).expect("first update for u");
    updates.commit().apply().expect("shapes line up");
    println!("state after apply: {:?}", *state.get_value());

    // The check that guards conv preconditions is mode-aware.
    let mut checked = Mux::graph();
    let stmt = Value::symbolic(SymExpr::cmp(
        CmpOp::Gt,
        SymExpr::var("dim"),
        SymExpr::scalar(0.0),
    ));
    println!("deferred check:  {:?}", checked.check(&stmt).expect("no failure"));
}
