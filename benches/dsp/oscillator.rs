//! Oscillator waveforms and the 7-saw stack.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use edm_forge::dsp::oscillator::OscillatorBlock;
use edm_forge::graph::{node::RenderCtx, oscillator::SupersawNode, GraphNode};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let ctx = RenderCtx::from_freq(44_100.0, 440.0, 100.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, mut osc) in [
            ("sine", OscillatorBlock::sine()),
            ("sawtooth", OscillatorBlock::sawtooth()),
            ("square", OscillatorBlock::square()),
            // Pcg32 per sample
            ("noise", OscillatorBlock::noise().with_noise_seed(7)),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    osc.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }

        let mut supersaw = SupersawNode::new(7, 40.0);
        group.bench_with_input(BenchmarkId::new("supersaw_7", size), &size, |b, _| {
            b.iter(|| {
                supersaw.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    group.finish();
}
