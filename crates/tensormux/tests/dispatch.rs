//! Integration tests: the same call sites against both backends.

use ndarray::{ArrayD, IxDyn};
use tensormux::{
    istype, AxisSide, CheckOutcome, DType, ExecutionMode, Mux, MuxError, PadMode, Region, Route,
    SharedVar, SymExpr, TraceLevel, Value,
};
use tensormux_ndarray_backend::eval;

fn arr(data: Vec<f64>) -> ArrayD<f64> {
    let len = data.len();
    ArrayD::from_shape_vec(IxDyn(&[len]), data).unwrap()
}

fn value(data: Vec<f64>) -> Value {
    Value::concrete(arr(data))
}

#[test]
fn test_largest_smallest_elementwise() {
    let mut mux = Mux::eager();
    let a = value(vec![1.0, 5.0, 2.0]);
    let b = value(vec![4.0, 0.0, 2.0]);
    let c = value(vec![3.0, 3.0, 3.0]);

    let max = mux.largest(&[a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(*max.as_concrete().unwrap(), arr(vec![4.0, 5.0, 3.0]));

    let min = mux.smallest(&[a, b, c]).unwrap();
    assert_eq!(*min.as_concrete().unwrap(), arr(vec![1.0, 0.0, 2.0]));
}

#[test]
fn test_largest_needs_two_operands() {
    let mut mux = Mux::eager();
    let err = mux.largest(&[value(vec![1.0])]).unwrap_err();
    assert!(matches!(
        err,
        MuxError::NotEnoughOperands { op: "largest", got: 1 }
    ));
}

#[test]
fn test_graph_route_builds_deferred_nodes() {
    let mut mux = Mux::graph();
    let x = Value::symbolic(SymExpr::var("x").with_test_value(arr(vec![1.0, 5.0, 2.0])));
    let b = value(vec![4.0, 0.0, 2.0]);

    let out = mux.largest(&[x, b]).unwrap();
    assert!(out.is_symbolic());
    let Value::Symbolic(expr) = out else {
        unreachable!()
    };
    // Realizing the deferred node gives the eager answer.
    assert_eq!(eval(&expr).unwrap(), arr(vec![4.0, 5.0, 2.0]));
}

#[test]
fn test_graph_mode_stays_eager_on_concrete_operands() {
    let mut mux = Mux::graph();
    let out = mux
        .largest(&[value(vec![1.0, 5.0]), value(vec![2.0, 3.0])])
        .unwrap();
    assert!(out.is_concrete());
    assert_eq!(*out.as_concrete().unwrap(), arr(vec![2.0, 5.0]));
}

#[test]
fn test_eager_mode_rejects_symbolic_operands() {
    let mut mux = Mux::eager();
    let err = mux
        .largest(&[Value::symbolic(SymExpr::var("x")), value(vec![1.0])])
        .unwrap_err();
    assert!(matches!(err, MuxError::SymbolicInEagerMode { op: "largest" }));
}

#[test]
fn test_comparisons_produce_bool_masks() {
    let mut mux = Mux::eager();
    let a = value(vec![1.0, 2.0, 3.0]);
    let b = value(vec![2.0, 2.0, 2.0]);

    let lt = mux.lt(&a, &b).unwrap();
    assert_eq!(lt.dtype(), DType::Bool);
    assert_eq!(*lt.as_concrete().unwrap(), arr(vec![1.0, 0.0, 0.0]));

    let eq = mux.eq(&a, &b).unwrap();
    assert_eq!(*eq.as_concrete().unwrap(), arr(vec![0.0, 1.0, 0.0]));
}

#[test]
fn test_ifelse_concrete_condition_selects_now() {
    let mut mux = Mux::graph();
    let taken = value(vec![1.0, 2.0]);
    let untaken = Value::symbolic(SymExpr::var("never"));

    // A concrete condition picks a branch immediately, even in graph mode,
    // and returns it unevaluated.
    let out = mux
        .ifelse(&Value::scalar(1.0), taken.clone(), untaken, None)
        .unwrap();
    assert_eq!(out, taken);

    let err = mux
        .ifelse(&value(vec![1.0, 0.0]), taken.clone(), taken, None)
        .unwrap_err();
    assert!(matches!(err, MuxError::Backend(_)));
}

#[test]
fn test_ifelse_symbolic_condition_is_lazy() {
    let mut mux = Mux::graph();
    let cond = Value::symbolic(SymExpr::cmp(
        tensormux::CmpOp::Gt,
        SymExpr::var("t").with_test_value(ArrayD::from_elem(IxDyn(&[]), 3.0)),
        SymExpr::scalar(0.0),
    ));
    // The untaken branch has no test value; laziness means realization
    // never touches it.
    let out = mux
        .ifelse(
            &cond,
            value(vec![7.0]),
            Value::symbolic(SymExpr::var("unset")),
            Some("gate"),
        )
        .unwrap();
    let Value::Symbolic(expr) = out else {
        unreachable!()
    };
    assert_eq!(eval(&expr).unwrap(), arr(vec![7.0]));
}

#[test]
fn test_switch_elementwise() {
    let mut mux = Mux::eager();
    let cond = value(vec![1.0, 0.0, 1.0]);
    let t = value(vec![10.0, 20.0, 30.0]);
    let f = value(vec![-1.0, -2.0, -3.0]);
    let out = mux.switch(&cond, &t, &f).unwrap();
    assert_eq!(*out.as_concrete().unwrap(), arr(vec![10.0, -2.0, 30.0]));
}

#[test]
fn test_set_subtensor_returns_mutated_backing() {
    let mut mux = Mux::eager();
    let x = value(vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    let out = mux
        .set_subtensor(x, Region::range(1, 3), &value(vec![10.0, 20.0]))
        .unwrap();
    // The whole backing array comes back, with the region overwritten.
    assert_eq!(
        *out.as_concrete().unwrap(),
        arr(vec![0.0, 10.0, 20.0, 3.0, 4.0])
    );

    let out = mux
        .inc_subtensor(out, Region::range(3, 5), &value(vec![1.0, 1.0]))
        .unwrap();
    assert_eq!(
        *out.as_concrete().unwrap(),
        arr(vec![0.0, 10.0, 20.0, 4.0, 5.0])
    );
}

#[test]
fn test_set_subtensor_graph_is_non_destructive() {
    let mut mux = Mux::graph();
    let state = SharedVar::with_name(arr(vec![0.0, 1.0, 2.0]), "state");
    let out = mux
        .set_subtensor(
            Value::from_shared(&state),
            Region::range(0, 1),
            &Value::scalar(9.0),
        )
        .unwrap();
    let Value::Symbolic(expr) = out else {
        unreachable!()
    };
    assert_eq!(eval(&expr).unwrap(), arr(vec![9.0, 1.0, 2.0]));
    assert_eq!(*state.get_value(), arr(vec![0.0, 1.0, 2.0]));
}

#[test]
fn test_add_axes_shapes() {
    let mut mux = Mux::eager();
    let x = value(vec![1.0, 2.0, 3.0]);

    let left = mux.add_axes(&x, 1, AxisSide::Left).unwrap();
    assert_eq!(left.as_concrete().unwrap().shape(), &[1, 3]);

    let right = mux.add_axes(&x, 1, AxisSide::Right).unwrap();
    assert_eq!(right.as_concrete().unwrap().shape(), &[3, 1]);

    // Unknown side strings fail at parse time.
    assert!("sideways".parse::<AxisSide>().is_err());
}

#[test]
fn test_move_axis_validates_known_ranks_on_both_routes() {
    let mut mux = Mux::graph();
    let x = Value::symbolic(
        SymExpr::var("x").with_test_value(ArrayD::zeros(IxDyn(&[2, 3, 4]))),
    );
    let moved = mux.move_axis(&x, 0, 2).unwrap();
    let Value::Symbolic(expr) = moved else {
        unreachable!()
    };
    assert_eq!(eval(&expr).unwrap().shape(), &[3, 4, 2]);

    assert!(mux.move_axis(&x, 7, 0).is_err());
}

#[test]
fn test_conv1d_shape_and_rank_precondition() {
    let mut mux = Mux::eager();
    let history = Value::concrete(
        ArrayD::from_shape_vec(IxDyn(&[10, 2]), (0..20).map(|i| i as f64).collect()).unwrap(),
    );
    let kernel = Value::concrete(
        ArrayD::from_shape_vec(IxDyn(&[3, 2, 2]), (0..12).map(|i| i as f64).collect()).unwrap(),
    );
    let out = mux.conv1d(&history, &kernel, PadMode::Valid).unwrap();
    assert_eq!(out.as_concrete().unwrap().shape(), &[8, 2, 2]);

    let flat = value(vec![0.0; 10]);
    assert!(mux.conv1d(&flat, &kernel, PadMode::Valid).is_err());
}

#[test]
fn test_conv1d_routes_agree_on_valid() {
    let history_data: Vec<f64> = (0..20).map(|i| (i as f64) * 0.25 - 2.0).collect();
    let kernel_data: Vec<f64> = (0..12).map(|i| ((i % 4) as f64) - 1.5).collect();
    let history = ArrayD::from_shape_vec(IxDyn(&[10, 2]), history_data).unwrap();
    let kernel = ArrayD::from_shape_vec(IxDyn(&[3, 2, 2]), kernel_data).unwrap();

    let mut eager = Mux::eager();
    let direct = eager
        .conv1d(
            &Value::concrete(history.clone()),
            &Value::concrete(kernel.clone()),
            PadMode::Valid,
        )
        .unwrap();

    let mut graph = Mux::graph();
    let deferred = graph
        .conv1d(
            &Value::symbolic(SymExpr::var("h").with_test_value(history)),
            &Value::concrete(kernel),
            PadMode::Valid,
        )
        .unwrap();
    let Value::Symbolic(expr) = deferred else {
        unreachable!()
    };
    let realized = eval(&expr).unwrap();
    let direct = direct.as_concrete().unwrap();
    assert_eq!(direct.shape(), realized.shape());
    for (a, b) in direct.iter().zip(realized.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_cast_and_istype() {
    let mut mux = Mux::eager();
    let x = mux.cast_int32(&Value::scalar(5.7)).unwrap();
    assert!(istype(&x, "int32"));
    assert!(istype(&x, "int"));
    assert!(!istype(&x, "float"));
    assert_eq!(*x.as_concrete().unwrap(), ArrayD::from_elem(IxDyn(&[]), 5.0));

    let f = Value::scalar(5.0);
    assert!(!istype(&f, "int32"));
    assert!(istype(&f, "float64"));
}

#[test]
fn test_round_and_abs() {
    let mut mux = Mux::eager();
    let x = value(vec![-1.6, 2.4]);
    assert_eq!(
        *mux.abs(&x).unwrap().as_concrete().unwrap(),
        arr(vec![1.6, 2.4])
    );
    assert_eq!(
        *mux.round(&x).unwrap().as_concrete().unwrap(),
        arr(vec![-2.0, 2.0])
    );
}

#[test]
fn test_check_outcomes_across_modes() {
    let mut eager = Mux::eager();
    assert_eq!(
        eager.check(&value(vec![1.0, 2.0])).unwrap(),
        CheckOutcome::Passed
    );

    let mut graph = Mux::graph();
    let stmt = Value::symbolic(SymExpr::var("cond"));
    let outcome = graph.check(&stmt).unwrap();
    assert_eq!(outcome, CheckOutcome::Unverified);
    assert!(!outcome.is_verified());
}

#[test]
fn test_inf_sentinel() {
    assert!(Mux::eager().inf().is_infinite());
    let graph_inf = Mux::graph().inf();
    assert!(graph_inf.is_finite() && graph_inf >= 1e12);
}

#[test]
fn test_as_variable_lifts_only_under_graph() {
    let graph = Mux::graph();
    let lifted = graph.as_variable(value(vec![1.0]));
    assert!(lifted.is_symbolic());

    let eager = Mux::eager();
    let kept = eager.as_variable(value(vec![1.0]));
    assert!(kept.is_concrete());
}

#[test]
fn test_tracer_records_routes() {
    let mut mux = Mux::graph().with_trace_level(TraceLevel::Ops);
    let a = value(vec![1.0, 2.0]);
    let b = Value::symbolic(SymExpr::var("b"));

    mux.largest(&[a.clone(), a.clone()]).unwrap();
    mux.largest(&[a.clone(), b]).unwrap();
    mux.lt(&a, &a).unwrap();

    let stats = mux.tracer().stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.eager, 2);
    assert_eq!(stats.graph, 1);
    assert_eq!(stats.per_op.get("largest"), Some(&2));
    assert_eq!(mux.tracer().events()[1].route, Route::Graph);
}

#[test]
fn test_contexts_are_independent() {
    // Two contexts with different modes coexist; nothing is process-wide.
    let mut eager = Mux::eager();
    let mut graph = Mux::graph();
    assert_eq!(eager.mode(), ExecutionMode::Eager);
    assert_eq!(graph.mode(), ExecutionMode::Graph);

    let sym = Value::symbolic(SymExpr::var("x"));
    assert!(graph.largest(&[sym.clone(), Value::scalar(0.0)]).is_ok());
    assert!(eager.largest(&[sym, Value::scalar(0.0)]).is_err());
}
