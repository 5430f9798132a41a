//! Benchmarks for low-level DSP primitives.

mod dynamics;
mod filter;
mod oscillator;
mod reverb;
mod shaping;

pub use dynamics::bench_dynamics;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
pub use reverb::bench_reverb;
pub use shaping::bench_shaping;
