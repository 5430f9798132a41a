//! Schroeder reverb across the room sizes variations nudge between.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use edm_forge::dsp::reverb::SchroederReverb;

use crate::BLOCK_SIZES;

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        // Impulse into a quiet tail
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - i as f32 / 10.0
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        for room in [0.3, 0.6, 0.9] {
            let mut reverb = SchroederReverb::new(44_100.0);
            reverb.set_room_size(room);
            reverb.set_damping(0.5);

            let name = format!("room_{}", (room * 10.0) as u32);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        sum += reverb.process(black_box(sample));
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
