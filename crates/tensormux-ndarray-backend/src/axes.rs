//! Axis manipulation.

use ndarray::Axis;
use tensormux_expr::AxisSide;

use crate::{BackendError, NdTensor};

/// Insert `count` singleton axes on the named side. `BeforeLast` inserts in
/// the second-to-last position, which on vectors and scalars coincides with
/// `Left`.
pub fn add_axes(x: &NdTensor, count: usize, side: AxisSide) -> NdTensor {
    let mut out = x.clone();
    for _ in 0..count {
        let pos = match side {
            AxisSide::Left => 0,
            AxisSide::Right => out.ndim(),
            AxisSide::BeforeLast => out.ndim().saturating_sub(1),
        };
        out = out.insert_axis(Axis(pos));
    }
    out
}

/// Relocate axis `source` to position `destination`, shifting the axes in
/// between.
pub fn move_axis(
    x: &NdTensor,
    source: usize,
    destination: usize,
) -> Result<NdTensor, BackendError> {
    let rank = x.ndim();
    if source >= rank {
        return Err(BackendError::InvalidAxis { axis: source, rank });
    }
    if destination >= rank {
        return Err(BackendError::InvalidAxis {
            axis: destination,
            rank,
        });
    }
    let mut order: Vec<usize> = (0..rank).filter(|&a| a != source).collect();
    order.insert(destination, source);
    Ok(x.clone().permuted_axes(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn filled(shape: &[usize]) -> NdTensor {
        let len: usize = shape.iter().product();
        ArrayD::from_shape_vec(IxDyn(shape), (0..len).map(|i| i as f64).collect()).unwrap()
    }

    #[test]
    fn test_add_axes_left_right() {
        let x = filled(&[3, 4]);
        assert_eq!(add_axes(&x, 1, AxisSide::Left).shape(), &[1, 3, 4]);
        assert_eq!(add_axes(&x, 2, AxisSide::Left).shape(), &[1, 1, 3, 4]);
        assert_eq!(add_axes(&x, 1, AxisSide::Right).shape(), &[3, 4, 1]);
        assert_eq!(add_axes(&x, 2, AxisSide::Right).shape(), &[3, 4, 1, 1]);
    }

    #[test]
    fn test_add_axes_before_last() {
        let x = filled(&[3, 4]);
        assert_eq!(add_axes(&x, 2, AxisSide::BeforeLast).shape(), &[3, 1, 1, 4]);
        // On vectors this coincides with Left.
        let v = filled(&[5]);
        assert_eq!(add_axes(&v, 1, AxisSide::BeforeLast).shape(), &[1, 5]);
        let s = filled(&[]);
        assert_eq!(add_axes(&s, 1, AxisSide::BeforeLast).shape(), &[1]);
    }

    #[test]
    fn test_add_axes_preserves_indexing() {
        let x = filled(&[2, 3]);
        let lifted = add_axes(&x, 1, AxisSide::Left);
        assert_eq!(lifted.index_axis(Axis(0), 0), x);
    }

    #[test]
    fn test_move_axis() {
        let x = filled(&[2, 3, 4]);
        let moved = move_axis(&x, 0, 2).unwrap();
        assert_eq!(moved.shape(), &[3, 4, 2]);
        assert_eq!(moved[[1, 2, 0]], x[[0, 1, 2]]);

        let back = move_axis(&moved, 2, 0).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn test_move_axis_bounds() {
        let x = filled(&[2, 3]);
        assert!(matches!(
            move_axis(&x, 2, 0),
            Err(BackendError::InvalidAxis { axis: 2, rank: 2 })
        ));
        assert!(matches!(
            move_axis(&x, 0, 5),
            Err(BackendError::InvalidAxis { axis: 5, rank: 2 })
        ));
    }
}
