//! Block-rate modulation helpers.
//!
//! A modulator (LFO, envelope) renders a whole block; its average over the
//! block becomes a single offset `base + avg·depth` applied to the target
//! parameter for that block. With 256-sample blocks at 44.1 kHz that is a
//! ~170 Hz control rate, plenty for filter sweeps and tremolo-speed LFOs.
//! Targets clamp the result to their own valid range.

#[inline]
pub fn apply_modulation(base_value: f32, modulator: f32, depth: f32) -> f32 {
    base_value + modulator * depth
}

#[inline]
pub fn block_average(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f32>() / samples.len() as f32
}
