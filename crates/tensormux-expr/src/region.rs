//! Subtensor regions.
//!
//! A [`Region`] names a contiguous block of an array: one half-open range per
//! leading axis, with omitted trailing axes selected in full. Updates address
//! their target through a `(target, region)` pair, so the target is always
//! the backing allocation and the sub-view cannot outlive or detach from it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Half-open selection on a single axis; `end == None` runs to the axis end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl DimRange {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        DimRange { start, end }
    }

    /// The whole axis.
    pub fn full() -> Self {
        DimRange {
            start: 0,
            end: None,
        }
    }
}

impl fmt::Display for DimRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (0, None) => f.write_str(":"),
            (s, None) => write!(f, "{}:", s),
            (s, Some(e)) => write!(f, "{}:{}", s, e),
        }
    }
}

/// A contiguous sub-block of an array, one [`DimRange`] per leading axis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    dims: Vec<DimRange>,
}

impl Region {
    /// The entire array.
    pub fn all() -> Self {
        Region { dims: Vec::new() }
    }

    pub fn new(dims: Vec<DimRange>) -> Self {
        Region { dims }
    }

    /// A range on the leading axis, remaining axes in full.
    pub fn range(start: usize, end: usize) -> Self {
        Region {
            dims: vec![DimRange::new(start, Some(end))],
        }
    }

    /// A range from `start` to the end of the leading axis.
    pub fn from_start(start: usize) -> Self {
        Region {
            dims: vec![DimRange::new(start, None)],
        }
    }

    /// Append a range for the next axis.
    pub fn then_range(mut self, start: usize, end: usize) -> Self {
        self.dims.push(DimRange::new(start, Some(end)));
        self
    }

    /// Append a full selection for the next axis.
    pub fn then_full(mut self) -> Self {
        self.dims.push(DimRange::full());
        self
    }

    pub fn dims(&self) -> &[DimRange] {
        &self.dims
    }

    /// Number of axes the region explicitly constrains.
    pub fn rank(&self) -> usize {
        self.dims.len()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.dims.is_empty() {
            f.write_str("...")?;
        }
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", d)?;
        }
        f.write_str("]")
    }
}
