//! Bus compressor, per sample.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use edm_forge::dsp::dynamics::Compressor;

use crate::BLOCK_SIZES;

pub fn bench_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dynamics");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.05).sin() * if i % 64 < 8 { 1.0 } else { 0.2 })
            .collect();

        let mut compressor = Compressor::new(-30.0, 3.0, 0.003, 0.25, 44_100.0).with_makeup_db(6.0);
        group.bench_with_input(BenchmarkId::new("compressor", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0;
                for &sample in &input {
                    sum += compressor.process(black_box(sample));
                }
                sum
            })
        });
    }

    group.finish();
}
