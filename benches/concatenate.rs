#![allow(dead_code)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use windowr::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SIZES: [usize; 3] = [64, 256, 1024];

fn qinfo(scale: f32, zero_point: i32) -> QuantizationInfo {
    QuantizationInfo::new(scale, zero_point).unwrap()
}

fn random_tensor(info: TensorInfo, rng: &mut StdRng) -> Tensor {
    let mut data = vec![0u8; info.total_size()];
    rng.fill(data.as_mut_slice());
    Tensor::from_bytes(info, data).unwrap()
}

/// Input of `n x n` placed in the second half of an `n x 2n` output
fn height_operands(n: usize, requantize: bool) -> (TensorInfo, TensorInfo) {
    let from = qinfo(0.05, 10);
    let to = if requantize { qinfo(0.08, 128) } else { from };
    (
        TensorInfo::new([n, n], DType::QAsymm8).unwrap().with_quantization(from),
        TensorInfo::new([n, 2 * n], DType::QAsymm8).unwrap().with_quantization(to),
    )
}

/// Input of `n x n` placed in the right half of a `2n x n` output
fn width_operands(n: usize, requantize: bool) -> (TensorInfo, TensorInfo) {
    let from = qinfo(0.05, -3);
    let to = if requantize { qinfo(0.08, 40) } else { from };
    (
        TensorInfo::new([n, n], DType::QAsymm8Signed).unwrap().with_quantization(from),
        TensorInfo::new([2 * n, n], DType::QAsymm8Signed).unwrap().with_quantization(to),
    )
}

// ---------------------------------------------------------------------------
// Group 1: single kernel, single thread, copy vs requantize
// ---------------------------------------------------------------------------

fn bench_height(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_concatenate");
    let mut rng = StdRng::seed_from_u64(42);
    let scheduler = CpuScheduler::new().with_parallelism(ParallelismConfig::new(Some(1), None));

    for n in SIZES {
        group.throughput(Throughput::Bytes((n * n) as u64));
        for (label, requantize) in [("copy", false), ("requantize", true)] {
            let (in_info, out_info) = height_operands(n, requantize);
            let input = random_tensor(in_info.clone(), &mut rng);
            let mut output = Tensor::zeros(out_info.clone());
            let mut kernel = HeightConcatenateKernel::new();
            kernel.configure(&in_info, n, &out_info);

            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| {
                    let pack = TensorPack::new(input.view(), output.view_mut());
                    scheduler.schedule(black_box(&kernel), &pack);
                })
            });
        }
    }
    group.finish();
}

fn bench_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("width_concatenate");
    let mut rng = StdRng::seed_from_u64(7);
    let scheduler = CpuScheduler::new().with_parallelism(ParallelismConfig::new(Some(1), None));

    for n in SIZES {
        group.throughput(Throughput::Bytes((n * n) as u64));
        for (label, requantize) in [("copy", false), ("requantize", true)] {
            let (in_info, out_info) = width_operands(n, requantize);
            let input = random_tensor(in_info.clone(), &mut rng);
            let mut output = Tensor::zeros(out_info.clone());
            let mut kernel = WidthConcatenateKernel::new();
            kernel.configure(&in_info, n, &out_info);

            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, _| {
                b.iter(|| {
                    let pack = TensorPack::new(input.view(), output.view_mut());
                    scheduler.schedule(black_box(&kernel), &pack);
                })
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Group 2: thread scaling (1024 x 1024 requantize)
// ---------------------------------------------------------------------------

fn bench_threads(c: &mut Criterion) {
    let mut group = c.benchmark_group("height_requantize_threads_1024");
    let mut rng = StdRng::seed_from_u64(1);
    let (in_info, out_info) = height_operands(1024, true);
    let input = random_tensor(in_info.clone(), &mut rng);
    let mut output = Tensor::zeros(out_info.clone());
    let mut kernel = HeightConcatenateKernel::new();
    kernel.configure(&in_info, 1024, &out_info);

    for threads in [1, 2, 4, 8] {
        let scheduler =
            CpuScheduler::new().with_parallelism(ParallelismConfig::new(Some(threads), None));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, _| {
            b.iter(|| {
                let pack = TensorPack::new(input.view(), output.view_mut());
                scheduler.schedule(black_box(&kernel), &pack);
            })
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Group 3: raw slice transform
// ---------------------------------------------------------------------------

fn bench_requantize_slice(c: &mut Criterion) {
    use windowr::runtime::cpu::kernels::requantize_qasymm8_slice;

    let mut group = c.benchmark_group("requantize_slice");
    let mut rng = StdRng::seed_from_u64(3);
    let from = qinfo(0.05, 10);
    let to = qinfo(0.08, 128);

    for len in [1000, 65536] {
        let mut src = vec![0u8; len];
        rng.fill(src.as_mut_slice());
        let mut dst = vec![0u8; len];
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| requantize_qasymm8_slice(black_box(&src), &mut dst, &from, &to))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_height,
    bench_width,
    bench_threads,
    bench_requantize_slice
);
criterion_main!(benches);
