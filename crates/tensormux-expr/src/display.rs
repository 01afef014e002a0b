//! Human-readable rendering of expression trees.

use std::fmt;

use crate::{BinaryOp, SubtensorKind, SymExpr, UnaryOp};

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymExpr::Var { name, .. } => f.write_str(name),
            SymExpr::Shared(s) => f.write_str(&s.display_name()),
            SymExpr::Const { value, dtype } => {
                write!(f, "const({}{:?})", dtype, value.shape())
            }
            SymExpr::Cmp { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
            SymExpr::Binary { op, lhs, rhs } => {
                let name = match op {
                    BinaryOp::Maximum => "max",
                    BinaryOp::Minimum => "min",
                };
                write!(f, "{}({}, {})", name, lhs, rhs)
            }
            SymExpr::Unary { op, input } => {
                let name = match op {
                    UnaryOp::Abs => "abs",
                    UnaryOp::Neg => "neg",
                    UnaryOp::Round => "round",
                };
                write!(f, "{}({})", name, input)
            }
            SymExpr::Cast { dtype, input } => write!(f, "{}({})", dtype, input),
            SymExpr::Switch {
                cond,
                on_true,
                on_false,
            } => write!(f, "switch({}, {}, {})", cond, on_true, on_false),
            SymExpr::IfElse {
                name,
                cond,
                on_true,
                on_false,
            } => {
                if let Some(n) = name {
                    write!(f, "{}: ", n)?;
                }
                write!(f, "ifelse({}, {}, {})", cond, on_true, on_false)
            }
            SymExpr::Subtensor {
                kind,
                target,
                region,
                value,
            } => {
                let name = match kind {
                    SubtensorKind::Set => "set_subtensor",
                    SubtensorKind::Inc => "inc_subtensor",
                };
                write!(f, "{}({}{}, {})", name, target, region, value)
            }
            SymExpr::AddAxes { input, count, side } => {
                write!(f, "add_axes({}, {}, {})", input, count, side)
            }
            SymExpr::MoveAxis {
                input,
                source,
                destination,
            } => write!(f, "moveaxis({}, {}, {})", input, source, destination),
            SymExpr::Conv1d {
                history,
                kernel,
                mode,
            } => write!(f, "conv1d({}, {}, {})", history, kernel, mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{CmpOp, DType, PadMode, Region, SymExpr};

    #[test]
    fn test_render_composite() {
        let e = SymExpr::switch(
            SymExpr::cmp(CmpOp::Ge, SymExpr::var("u"), SymExpr::var("theta")),
            SymExpr::var("spike"),
            SymExpr::cast(SymExpr::var("rest"), DType::Int32),
        );
        assert_eq!(e.to_string(), "switch((u >= theta), spike, int32(rest))");
    }

    #[test]
    fn test_render_subtensor_and_conv() {
        let e = SymExpr::set_subtensor(
            SymExpr::var("x"),
            Region::range(1, 3),
            SymExpr::var("y"),
        );
        assert_eq!(e.to_string(), "set_subtensor(x[1:3], y)");

        let c = SymExpr::conv1d(SymExpr::var("h"), SymExpr::var("k"), PadMode::Valid);
        assert_eq!(c.to_string(), "conv1d(h, k, valid)");
    }
}
