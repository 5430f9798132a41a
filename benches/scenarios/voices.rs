//! Every voice role, one held note each.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use edm_forge::graph::{GraphNode, RenderCtx};
use edm_forge::voices::VoiceRole;

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::from_freq(44_100.0, 110.0, 100.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for role in VoiceRole::MELODIC.into_iter().chain(VoiceRole::DRUMS) {
            let mut voice = role.build();
            voice.note_on(&ctx);
            group.bench_with_input(BenchmarkId::new(role.name(), size), &size, |b, _| {
                b.iter(|| {
                    voice.render_block(black_box(&mut buffer), black_box(&ctx));
                })
            });
        }
    }

    group.finish();
}
