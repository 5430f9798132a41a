//! Waveshaping and bit reduction.
//!
//! Every shaper is a memoryless transfer function applied per sample:
//!
//! ```text
//! soft       x / (1 + |x|)                     warm, peaks bend over gradually
//! hard       clamp(x, -t, t)                   buzzy, odd harmonics
//! foldback   reflect about ±t until inside     metallic
//! chebyshev  T_n(x)                            adds exactly the n-th harmonic
//! ```
//!
//! with `x = input * drive`. Drive 1.0 is (nearly) clean; 3-4 is warm; 10+ is
//! heavy.
//!
//! Bit reduction quantizes amplitude to `2^bits` levels. Sample-rate reduction
//! (the other half of a "bitcrusher") holds samples and lives in the node,
//! since it needs state.

#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    let x = sample * drive;
    x / (1.0 + x.abs())
}

#[inline]
pub fn hard_clip(sample: f32, drive: f32, threshold: f32) -> f32 {
    (sample * drive).clamp(-threshold, threshold)
}

#[inline]
pub fn foldback(sample: f32, drive: f32, threshold: f32) -> f32 {
    let mut x = sample * drive;
    // Bounded: each reflection moves x at least 2t closer, and
    // extreme inputs are wrapped first
    if x.abs() > threshold * 64.0 {
        x = x.rem_euclid(4.0 * threshold);
    }
    while x > threshold || x < -threshold {
        if x > threshold {
            x = 2.0 * threshold - x;
        } else {
            x = -2.0 * threshold - x;
        }
    }
    x
}

/// Chebyshev polynomial of the first kind, `T_order(x)`, on a clamped input.
///
/// For a full-scale sine input, `T_n` outputs a pure n-th harmonic; for
/// ordinary program material it adds a bright, synthetic edge.
#[inline]
pub fn chebyshev(sample: f32, order: u32) -> f32 {
    let x = sample.clamp(-1.0, 1.0);
    match order {
        0 => 1.0,
        1 => x,
        _ => {
            let (mut prev, mut current) = (1.0, x);
            for _ in 1..order {
                let next = 2.0 * x * current - prev;
                prev = current;
                current = next;
            }
            current
        }
    }
}

/// Quantize to `bits` of resolution (1 - 16).
#[inline]
pub fn bit_reduce(sample: f32, bits: u32) -> f32 {
    let levels = (1u32 << bits.clamp(1, 16)) as f32 / 2.0;
    (sample.clamp(-1.0, 1.0) * levels).round() / levels
}

pub fn soft_clip_buffer(buffer: &mut [f32], drive: f32) {
    for sample in buffer.iter_mut() {
        *sample = soft_clip(*sample, drive);
    }
}

pub fn hard_clip_buffer(buffer: &mut [f32], drive: f32, threshold: f32) {
    for sample in buffer.iter_mut() {
        *sample = hard_clip(*sample, drive, threshold);
    }
}

pub fn foldback_buffer(buffer: &mut [f32], drive: f32, threshold: f32) {
    for sample in buffer.iter_mut() {
        *sample = foldback(*sample, drive, threshold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_clip_is_nearly_linear_for_small_input() {
        let out = soft_clip(0.01, 1.0);
        assert!((out - 0.01).abs() < 1e-3);
    }

    #[test]
    fn soft_clip_never_reaches_one() {
        assert!(soft_clip(100.0, 10.0) < 1.0);
        assert!(soft_clip(-100.0, 10.0) > -1.0);
    }

    #[test]
    fn foldback_stays_inside_threshold_for_huge_input() {
        for input in [0.3, 1.0, 7.5, -42.0, 1.0e6] {
            let out = foldback(input, 3.0, 0.5);
            assert!(out.abs() <= 0.5 + 1e-4, "{} folded to {}", input, out);
        }
    }

    #[test]
    fn chebyshev_matches_closed_forms() {
        let x = 0.6f32;
        assert!((chebyshev(x, 2) - (2.0 * x * x - 1.0)).abs() < 1e-6);
        assert!((chebyshev(x, 3) - (4.0 * x.powi(3) - 3.0 * x)).abs() < 1e-6);
    }

    #[test]
    fn bit_reduce_snaps_to_grid() {
        // 2 bits: steps of 0.5
        assert_eq!(bit_reduce(0.3, 2), 0.5);
        assert_eq!(bit_reduce(-0.2, 2), 0.0);
        assert_eq!(bit_reduce(0.9, 2), 1.0);
    }
}
