//! State-variable filter at the Q values the voices use.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use edm_forge::dsp::filter::SVFilter;
use edm_forge::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(44_100.0, 440.0, 100.0);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        for (name, mut filter) in [
            ("lowpass_q15", SVFilter::lowpass(300.0).with_q(15.0)),
            ("highpass_q2", SVFilter::highpass(200.0).with_q(2.0)),
            ("bandpass_q12", SVFilter::bandpass(2_000.0).with_q(12.0)),
        ] {
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
