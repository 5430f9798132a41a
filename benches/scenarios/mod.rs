//! Real-world scenario benchmarks: single voices and full engine renders.

mod render;
mod voices;

pub use render::bench_render;
pub use voices::bench_voices;
