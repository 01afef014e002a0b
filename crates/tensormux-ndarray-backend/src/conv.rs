//! 1-D convolution kernels.
//!
//! Two routines with the same channel contract but different internal
//! structure, and they are NOT interchangeable across all modes:
//!
//! - [`conv1d_direct`] runs a true 1-D convolution per channel pair and
//!   supports every [`PadMode`]. This is the eager dispatch route.
//! - [`conv1d_columns`] lowers each channel pair through a width-1 image
//!   (2-D) convolution, the structure the deferred evaluator uses. The image
//!   primitive only defines `valid` and `full` borders, so `same` is
//!   rejected here.
//!
//! The two agree numerically on the modes both support, but that agreement
//! is a property of this backend, not a contract of the dispatch layer.
//!
//! Layout contract: the history is (time, channel_from), the kernel is
//! (time, channel_to, channel_from), and the output is indexed
//! `[t][to][from]`, so time stays the outer axis.

use ndarray::{Axis, IxDyn};
use tensormux_expr::PadMode;

use crate::{BackendError, NdTensor};

/// True 1-D convolution of a signal with a kernel, full mode:
/// `out[k] = sum_j signal[j] * kernel[k - j]`.
fn convolve_full(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let m = kernel.len();
    let mut out = vec![0.0; n + m - 1];
    for (k, o) in out.iter_mut().enumerate() {
        let j_lo = k.saturating_sub(m - 1);
        let j_hi = k.min(n - 1);
        let mut acc = 0.0;
        for j in j_lo..=j_hi {
            acc += signal[j] * kernel[k - j];
        }
        *o = acc;
    }
    out
}

/// 1-D convolution under the requested boundary mode.
pub fn convolve_1d(
    signal: &[f64],
    kernel: &[f64],
    mode: PadMode,
) -> Result<Vec<f64>, BackendError> {
    let n = signal.len();
    let m = kernel.len();
    let out_len = mode
        .output_len(n, m)
        .ok_or(BackendError::KernelTooLong {
            op: "convolve_1d",
            kernel: m,
            signal: n,
        })?;
    let full = convolve_full(signal, kernel);
    let offset = match mode {
        PadMode::Full => 0,
        PadMode::Valid => m - 1,
        PadMode::Same => (m - 1) / 2,
    };
    Ok(full[offset..offset + out_len].to_vec())
}

/// True 2-D (image) convolution. The image primitive defines only `valid`
/// and `full` borders.
pub fn conv2d(
    image: &NdTensor,
    filter: &NdTensor,
    mode: PadMode,
) -> Result<NdTensor, BackendError> {
    if image.ndim() != 2 {
        return Err(BackendError::RankMismatch {
            op: "conv2d",
            expected: 2,
            actual: image.ndim(),
        });
    }
    if filter.ndim() != 2 {
        return Err(BackendError::RankMismatch {
            op: "conv2d",
            expected: 2,
            actual: filter.ndim(),
        });
    }
    if mode == PadMode::Same {
        return Err(BackendError::UnsupportedPadMode(mode));
    }
    let (n1, n2) = (image.shape()[0], image.shape()[1]);
    let (m1, m2) = (filter.shape()[0], filter.shape()[1]);
    let (o1, o2) = match mode {
        PadMode::Full => match (
            PadMode::Full.output_len(n1, m1),
            PadMode::Full.output_len(n2, m2),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(BackendError::KernelTooLong {
                    op: "conv2d",
                    kernel: m1.max(m2),
                    signal: n1.min(n2),
                })
            }
        },
        _ => match (
            PadMode::Valid.output_len(n1, m1),
            PadMode::Valid.output_len(n2, m2),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(BackendError::KernelTooLong {
                    op: "conv2d",
                    kernel: m1.max(m2),
                    signal: n1.min(n2),
                })
            }
        },
    };
    // Offsets into the full-mode result.
    let (off1, off2) = match mode {
        PadMode::Full => (0, 0),
        _ => (m1 - 1, m2 - 1),
    };
    let mut out = NdTensor::zeros(IxDyn(&[o1, o2]));
    for k1 in 0..o1 {
        for k2 in 0..o2 {
            let (f1, f2) = (k1 + off1, k2 + off2);
            let mut acc = 0.0;
            for j1 in f1.saturating_sub(m1 - 1)..=f1.min(n1 - 1) {
                for j2 in f2.saturating_sub(m2 - 1)..=f2.min(n2 - 1) {
                    acc += image[[j1, j2]] * filter[[f1 - j1, f2 - j2]];
                }
            }
            out[[k1, k2]] = acc;
        }
    }
    Ok(out)
}

fn validate_channels(
    op: &'static str,
    history: &NdTensor,
    kernel: &NdTensor,
) -> Result<(usize, usize, usize, usize), BackendError> {
    if history.ndim() != 2 {
        return Err(BackendError::RankMismatch {
            op,
            expected: 2,
            actual: history.ndim(),
        });
    }
    if kernel.ndim() != 3 {
        return Err(BackendError::RankMismatch {
            op,
            expected: 3,
            actual: kernel.ndim(),
        });
    }
    let (n, from) = (history.shape()[0], history.shape()[1]);
    let (m, to, k_from) = (kernel.shape()[0], kernel.shape()[1], kernel.shape()[2]);
    if from != k_from {
        return Err(BackendError::ShapeMismatch {
            op,
            expected: vec![m, to, from],
            actual: kernel.shape().to_vec(),
        });
    }
    Ok((n, m, to, from))
}

fn history_column(history: &NdTensor, from: usize) -> Vec<f64> {
    history.index_axis(Axis(1), from).iter().copied().collect()
}

fn kernel_column(kernel: &NdTensor, to: usize, from: usize) -> Vec<f64> {
    kernel
        .index_axis(Axis(2), from)
        .index_axis(Axis(1), to)
        .iter()
        .copied()
        .collect()
}

/// Per-channel-pair 1-D convolution through the direct routine.
/// Output `[t][to][from]` is the convolution of `history[:, from]` with
/// `kernel[:, to, from]` at `t`.
pub fn conv1d_direct(
    history: &NdTensor,
    kernel: &NdTensor,
    mode: PadMode,
) -> Result<NdTensor, BackendError> {
    let (n, m, to_ch, from_ch) = validate_channels("conv1d", history, kernel)?;
    let out_len = mode.output_len(n, m).ok_or(BackendError::KernelTooLong {
        op: "conv1d",
        kernel: m,
        signal: n,
    })?;
    let mut out = NdTensor::zeros(IxDyn(&[out_len, to_ch, from_ch]));
    for from in 0..from_ch {
        let signal = history_column(history, from);
        for to in 0..to_ch {
            let column = convolve_1d(&signal, &kernel_column(kernel, to, from), mode)?;
            for (t, &v) in column.iter().enumerate() {
                out[[t, to, from]] = v;
            }
        }
    }
    Ok(out)
}

/// Per-channel-pair 1-D convolution lowered through width-1 image
/// convolutions. Rejects `same` (the image primitive has no such border).
pub fn conv1d_columns(
    history: &NdTensor,
    kernel: &NdTensor,
    mode: PadMode,
) -> Result<NdTensor, BackendError> {
    let (n, m, to_ch, from_ch) = validate_channels("conv1d", history, kernel)?;
    if mode == PadMode::Same {
        return Err(BackendError::UnsupportedPadMode(mode));
    }
    let out_len = mode.output_len(n, m).ok_or(BackendError::KernelTooLong {
        op: "conv1d",
        kernel: m,
        signal: n,
    })?;
    let mut out = NdTensor::zeros(IxDyn(&[out_len, to_ch, from_ch]));
    for from in 0..from_ch {
        let image = NdTensor::from_shape_vec(IxDyn(&[n, 1]), history_column(history, from))
            .map_err(|_| BackendError::RankMismatch {
                op: "conv1d",
                expected: 2,
                actual: history.ndim(),
            })?;
        for to in 0..to_ch {
            let filter =
                NdTensor::from_shape_vec(IxDyn(&[m, 1]), kernel_column(kernel, to, from))
                    .map_err(|_| BackendError::RankMismatch {
                        op: "conv1d",
                        expected: 3,
                        actual: kernel.ndim(),
                    })?;
            let column = conv2d(&image, &filter, mode)?;
            for t in 0..out_len {
                out[[t, to, from]] = column[[t, 0]];
            }
        }
    }
    Ok(out)
}
