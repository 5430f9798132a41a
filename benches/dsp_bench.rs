//! Benchmarks for DSP primitives and the offline renderer.
//!
//! Run with: cargo bench
//!
//! Rendering is offline, so these measure throughput rather than deadlines.
//! For reference, at 44.1kHz a 256-sample block is 5.8ms of audio.
//!
//! Benchmark groups:
//!   - dsp/*        Low-level primitives (oscillator, filter, shaping, etc.)
//!   - scenarios/*  Voice roles and whole-engine renders

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    // Low-level DSP primitives
    dsp::bench_oscillator,
    dsp::bench_filter,
    dsp::bench_shaping,
    dsp::bench_reverb,
    dsp::bench_dynamics,
    // Real-world scenarios
    scenarios::bench_voices,
    scenarios::bench_render,
);
criterion_main!(benches);
