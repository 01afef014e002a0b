//! In-place subtensor updates.
//!
//! The update addresses its target as a `(backing array, region)` pair and
//! writes through a mutable sub-view, so the mutation is visible in the
//! original allocation. Regions are validated before any write: rank and
//! bounds failures are precondition errors and leave the target untouched.

use ndarray::SliceInfoElem;
use tensormux_expr::Region;

use crate::{BackendError, NdTensor};

/// Resolve `region` against `shape` into one slice element per axis.
/// Trailing axes the region does not constrain are selected in full.
pub fn resolve_region(
    region: &Region,
    shape: &[usize],
) -> Result<Vec<SliceInfoElem>, BackendError> {
    if region.rank() > shape.len() {
        return Err(BackendError::RegionRankMismatch {
            region_rank: region.rank(),
            rank: shape.len(),
        });
    }
    let mut elems = Vec::with_capacity(shape.len());
    for (axis, &len) in shape.iter().enumerate() {
        let (start, end) = match region.dims().get(axis) {
            Some(d) => (d.start, d.end.unwrap_or(len)),
            None => (0, len),
        };
        if start > end {
            return Err(BackendError::RegionReversed { axis, start, end });
        }
        if end > len {
            return Err(BackendError::RegionOutOfBounds {
                axis,
                start,
                end,
                len,
            });
        }
        elems.push(SliceInfoElem::Slice {
            start: start as isize,
            end: Some(end as isize),
            step: 1,
        });
    }
    Ok(elems)
}

/// Shape of the sub-view `region` selects out of `shape`.
pub fn region_shape(region: &Region, shape: &[usize]) -> Result<Vec<usize>, BackendError> {
    let elems = resolve_region(region, shape)?;
    Ok(elems
        .iter()
        .zip(shape)
        .map(|(e, &len)| match e {
            SliceInfoElem::Slice { start, end, .. } => {
                end.map(|e| e as usize).unwrap_or(len) - *start as usize
            }
            _ => len,
        })
        .collect())
}

fn apply(
    op: &'static str,
    x: &mut NdTensor,
    region: &Region,
    value: &NdTensor,
    f: impl Fn(&mut f64, f64),
) -> Result<(), BackendError> {
    let elems = resolve_region(region, x.shape())?;
    let mut view = x.slice_mut(elems.as_slice());
    if value.ndim() == 0 {
        let Some(&v) = value.first() else {
            return Err(BackendError::ShapeMismatch {
                op,
                expected: view.shape().to_vec(),
                actual: value.shape().to_vec(),
            });
        };
        view.map_inplace(|a| f(a, v));
        return Ok(());
    }
    if view.shape() != value.shape() {
        return Err(BackendError::ShapeMismatch {
            op,
            expected: view.shape().to_vec(),
            actual: value.shape().to_vec(),
        });
    }
    view.zip_mut_with(value, |a, &b| f(a, b));
    Ok(())
}

/// Overwrite the region of `x` with `value`. `value` must match the region's
/// shape, or be 0-d to fill it.
pub fn set_subtensor(
    x: &mut NdTensor,
    region: &Region,
    value: &NdTensor,
) -> Result<(), BackendError> {
    apply("set_subtensor", x, region, value, |a, b| *a = b)
}

/// Add `value` into the region of `x`.
pub fn inc_subtensor(
    x: &mut NdTensor,
    region: &Region,
    value: &NdTensor,
) -> Result<(), BackendError> {
    apply("inc_subtensor", x, region, value, |a, b| *a += b)
}
