//! Pseudo-random normal stream.
//!
//! The stream always samples concretely, regardless of which dispatch route
//! the surrounding computation takes; a draw that must participate in a
//! deferred graph enters it as a constant.

use ndarray::IxDyn;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::{BackendError, NdTensor};

/// A seeded stream of normally distributed samples.
pub struct RandomStreams {
    rng: StdRng,
}

impl RandomStreams {
    /// A stream seeded from the operating system.
    pub fn new() -> Self {
        RandomStreams {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A reproducible stream.
    pub fn from_seed(seed: u64) -> Self {
        RandomStreams {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a tensor of the given shape from N(avg, std^2). An empty shape
    /// draws a 0-d scalar.
    pub fn normal(
        &mut self,
        shape: &[usize],
        avg: f64,
        std: f64,
    ) -> Result<NdTensor, BackendError> {
        let dist = Normal::new(avg, std).map_err(|_| BackendError::InvalidStd(std))?;
        let len: usize = shape.iter().product();
        let data: Vec<f64> = (0..len).map(|_| dist.sample(&mut self.rng)).collect();
        NdTensor::from_shape_vec(IxDyn(shape), data).map_err(|_| BackendError::ShapeMismatch {
            op: "normal",
            expected: shape.to_vec(),
            actual: vec![len],
        })
    }
}

impl Default for RandomStreams {
    fn default() -> Self {
        Self::new()
    }
}
