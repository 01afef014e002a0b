//! Elementwise kernels.
//!
//! Binary kernels require equal shapes, with the one exception of a 0-d
//! operand, which broadcasts against the other side. Comparison kernels
//! produce 0.0/1.0 masks under native (exact) float semantics.

use ndarray::Zip;
use tensormux_expr::{BinaryOp, CmpOp, DType, UnaryOp};

use crate::{BackendError, NdTensor};

fn zip_binary(
    op: &'static str,
    a: &NdTensor,
    b: &NdTensor,
    f: impl Fn(f64, f64) -> f64,
) -> Result<NdTensor, BackendError> {
    if a.ndim() == 0 && b.ndim() != 0 {
        let Some(&av) = a.first() else {
            return Err(BackendError::ShapeMismatch {
                op,
                expected: b.shape().to_vec(),
                actual: a.shape().to_vec(),
            });
        };
        return Ok(b.mapv(|y| f(av, y)));
    }
    if b.ndim() == 0 && a.ndim() != 0 {
        let Some(&bv) = b.first() else {
            return Err(BackendError::ShapeMismatch {
                op,
                expected: a.shape().to_vec(),
                actual: b.shape().to_vec(),
            });
        };
        return Ok(a.mapv(|x| f(x, bv)));
    }
    if a.shape() != b.shape() {
        return Err(BackendError::ShapeMismatch {
            op,
            expected: a.shape().to_vec(),
            actual: b.shape().to_vec(),
        });
    }
    Ok(Zip::from(a).and(b).map_collect(|&x, &y| f(x, y)))
}

/// Elementwise maximum/minimum of a pair of tensors.
pub fn pairwise(op: BinaryOp, a: &NdTensor, b: &NdTensor) -> Result<NdTensor, BackendError> {
    match op {
        BinaryOp::Maximum => zip_binary("maximum", a, b, f64::max),
        BinaryOp::Minimum => zip_binary("minimum", a, b, f64::min),
    }
}

/// Elementwise comparison mask: 1.0 where the comparison holds, else 0.0.
pub fn compare(op: CmpOp, a: &NdTensor, b: &NdTensor) -> Result<NdTensor, BackendError> {
    zip_binary(op.symbol(), a, b, |x, y| {
        if op.holds(x, y) {
            1.0
        } else {
            0.0
        }
    })
}

/// Elementwise choice: where `cond` is nonzero take `on_true`, else
/// `on_false`. All three operands must share one shape.
pub fn switch(
    cond: &NdTensor,
    on_true: &NdTensor,
    on_false: &NdTensor,
) -> Result<NdTensor, BackendError> {
    if cond.shape() != on_true.shape() {
        return Err(BackendError::ShapeMismatch {
            op: "switch",
            expected: cond.shape().to_vec(),
            actual: on_true.shape().to_vec(),
        });
    }
    if cond.shape() != on_false.shape() {
        return Err(BackendError::ShapeMismatch {
            op: "switch",
            expected: cond.shape().to_vec(),
            actual: on_false.shape().to_vec(),
        });
    }
    Ok(Zip::from(cond)
        .and(on_true)
        .and(on_false)
        .map_collect(|&c, &t, &f| if c != 0.0 { t } else { f }))
}

/// Elementwise unary operation.
pub fn unary(op: UnaryOp, x: &NdTensor) -> NdTensor {
    match op {
        UnaryOp::Abs => x.mapv(f64::abs),
        UnaryOp::Neg => x.mapv(|v| -v),
        UnaryOp::Round => x.mapv(f64::round),
    }
}

/// Rewrite the payload for a cast to `dtype`: integer targets truncate
/// toward zero, Bool collapses to 0/1, Float32 drops precision through a
/// round trip, Float64 is the identity.
pub fn cast(x: &NdTensor, dtype: DType) -> NdTensor {
    match dtype {
        DType::Bool => x.mapv(|v| if v != 0.0 { 1.0 } else { 0.0 }),
        DType::Int16 | DType::Int32 | DType::Int64 => x.mapv(f64::trunc),
        DType::Float32 => x.mapv(|v| v as f32 as f64),
        DType::Float64 => x.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn arr(data: Vec<f64>) -> NdTensor {
        let len = data.len();
        ArrayD::from_shape_vec(IxDyn(&[len]), data).unwrap()
    }

    fn scalar(v: f64) -> NdTensor {
        ArrayD::from_elem(IxDyn(&[]), v)
    }

    #[test]
    fn test_pairwise_max_min() {
        let a = arr(vec![1.0, 5.0, 3.0]);
        let b = arr(vec![4.0, 2.0, 3.0]);
        assert_eq!(
            pairwise(BinaryOp::Maximum, &a, &b).unwrap(),
            arr(vec![4.0, 5.0, 3.0])
        );
        assert_eq!(
            pairwise(BinaryOp::Minimum, &a, &b).unwrap(),
            arr(vec![1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn test_scalar_broadcast() {
        let a = arr(vec![1.0, 5.0, 3.0]);
        let s = scalar(2.0);
        assert_eq!(
            pairwise(BinaryOp::Maximum, &a, &s).unwrap(),
            arr(vec![2.0, 5.0, 3.0])
        );
        assert_eq!(
            pairwise(BinaryOp::Minimum, &s, &a).unwrap(),
            arr(vec![1.0, 2.0, 2.0])
        );
    }

    #[test]
    fn test_compare_masks() {
        let a = arr(vec![1.0, 2.0, 3.0]);
        let b = arr(vec![2.0, 2.0, 2.0]);
        assert_eq!(compare(CmpOp::Lt, &a, &b).unwrap(), arr(vec![1.0, 0.0, 0.0]));
        assert_eq!(compare(CmpOp::Ge, &a, &b).unwrap(), arr(vec![0.0, 1.0, 1.0]));
        assert_eq!(compare(CmpOp::Eq, &a, &b).unwrap(), arr(vec![0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_shape_mismatch() {
        let a = arr(vec![1.0, 2.0]);
        let b = arr(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            pairwise(BinaryOp::Maximum, &a, &b),
            Err(BackendError::ShapeMismatch { op: "maximum", .. })
        ));
    }

    #[test]
    fn test_switch() {
        let cond = arr(vec![1.0, 0.0, 2.0]);
        let t = arr(vec![10.0, 20.0, 30.0]);
        let f = arr(vec![-1.0, -2.0, -3.0]);
        assert_eq!(
            switch(&cond, &t, &f).unwrap(),
            arr(vec![10.0, -2.0, 30.0])
        );
        let bad = arr(vec![1.0, 0.0]);
        assert!(switch(&cond, &t, &bad).is_err());
    }

    #[test]
    fn test_unary_and_cast() {
        let x = arr(vec![-1.5, 2.5, -3.0]);
        assert_eq!(unary(UnaryOp::Abs, &x), arr(vec![1.5, 2.5, 3.0]));
        assert_eq!(unary(UnaryOp::Neg, &x), arr(vec![1.5, -2.5, 3.0]));
        assert_eq!(cast(&x, DType::Int32), arr(vec![-1.0, 2.0, -3.0]));
        assert_eq!(cast(&x, DType::Bool), arr(vec![1.0, 1.0, 1.0]));
    }
}
