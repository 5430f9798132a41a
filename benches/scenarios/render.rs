//! Whole-engine renders: voices, both buses, effects and WAV encoding.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use edm_forge::arrange::Arrangement;
use edm_forge::compose::Composer;
use edm_forge::render::AudioEngine;
use edm_forge::theory::{ArrangementStyle, Complexity, Genre, Mood};
use edm_forge::{GenerationRequest, GeneratorConfig};

/// Seconds of audio per iteration
const SECTION_SECS: f64 = 4.0;

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");
    group.sample_size(10);

    for complexity in [Complexity::Simple, Complexity::Experimental] {
        let request = GenerationRequest::builder(Genre::Techno, Mood::Energetic)
            .prompt("peak time")
            .duration_secs(SECTION_SECS)
            .complexity(complexity)
            .build();
        let template = Composer::new(&request, 4_242, 1).compose();
        let arrangement = Arrangement::schedule(ArrangementStyle::ContinuousMix, SECTION_SECS);

        for block_size in [128, 512] {
            let config = GeneratorConfig::default().block_size(block_size);
            let Ok((mut engine, _remote)) = AudioEngine::new(&config) else {
                continue;
            };

            let id = BenchmarkId::new(format!("{}_4s", complexity), block_size);
            group.bench_with_input(id, &block_size, |b, _| {
                b.iter(|| {
                    engine
                        .render(black_box(&template), black_box(&arrangement), SECTION_SECS, 1)
                        .map(|output| output.asset.frames)
                })
            });
        }
    }

    group.finish();
}
