//! Waveshapers and bit reduction.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use edm_forge::dsp::distortion::{bit_reduce, chebyshev, foldback_buffer, soft_clip_buffer};

use crate::BLOCK_SIZES;

pub fn bench_shaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/shaping");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = input.clone();

        group.bench_with_input(BenchmarkId::new("soft_clip", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                soft_clip_buffer(black_box(&mut buffer), black_box(4.0));
            })
        });

        group.bench_with_input(BenchmarkId::new("foldback", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                foldback_buffer(black_box(&mut buffer), black_box(6.0), black_box(0.5));
            })
        });

        group.bench_with_input(BenchmarkId::new("chebyshev_4", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = chebyshev(black_box(x), 4);
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("bit_reduce_4", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(&input) {
                    *out = bit_reduce(black_box(x), 4);
                }
            })
        });
    }

    group.finish();
}
