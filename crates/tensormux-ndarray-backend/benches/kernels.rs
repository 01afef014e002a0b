//! Benchmarks for the eager kernels.
//!
//! Run with:
//! ```bash
//! cargo bench -p tensormux-ndarray-backend
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::ArrayD;
use std::hint::black_box;
use tensormux_expr::{BinaryOp, PadMode};
use tensormux_ndarray_backend::{conv, elemwise};

fn create_tensor(shape: &[usize]) -> ArrayD<f64> {
    let size: usize = shape.iter().product();
    ArrayD::from_shape_vec(shape.to_vec(), (0..size).map(|i| i as f64 * 0.01).collect()).unwrap()
}

fn bench_pairwise_max(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise_max");

    for size in [1_000, 10_000, 100_000] {
        let a = create_tensor(&[size]);
        let b = create_tensor(&[size]);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |bench, _| {
            bench.iter(|| {
                elemwise::pairwise(BinaryOp::Maximum, black_box(&a), black_box(&b)).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_conv1d(c: &mut Criterion) {
    let mut group = c.benchmark_group("conv1d_valid");

    for time in [64, 256, 1024] {
        let history = create_tensor(&[time, 4]);
        let kernel = create_tensor(&[16, 4, 4]);

        group.throughput(Throughput::Elements((time * 4 * 4) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(time), &time, |bench, _| {
            bench.iter(|| {
                conv::conv1d_direct(black_box(&history), black_box(&kernel), PadMode::Valid)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pairwise_max, bench_conv1d);
criterion_main!(benches);
