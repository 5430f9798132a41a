//! Reproducible randomness.
//!
//! A request is folded into one 32-bit seed; every random decision after
//! that is a pure function of `(seed, index)`:
//!
//! ```text
//! next(index) = frac(sin(seed + index) · 10000)
//! ```
//!
//! Statistically this is weak. What it guarantees is that the same seed and
//! index give the same value on every run, which is the only property the
//! composer relies on. Call sites pick fixed, disjoint index ranges (see the
//! composer) so adding a new draw never shifts an existing one.

use crate::theory::{Complexity, Genre, Mood};

/// Offset between consecutive variations of one request.
pub const VARIATION_STRIDE: i32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeededRandom {
    seed: i32,
}

impl SeededRandom {
    pub fn new(seed: i32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    /// Value in [0, 1) for `index`.
    pub fn next(&self, index: u64) -> f64 {
        let x = (self.seed as f64 + index as f64).sin() * 10_000.0;
        let fraction = x - x.floor();
        // frac of a tiny negative rounds up to exactly 1.0
        fraction.min(1.0 - f64::EPSILON)
    }

    /// Index into a collection of `len` items.
    pub fn below(&self, index: u64, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next(index) * len as f64) as usize).min(len - 1)
    }

    /// True with probability `p`.
    pub fn chance(&self, index: u64, p: f64) -> bool {
        self.next(index) < p
    }

    /// Value in [-1, 1).
    pub fn bipolar(&self, index: u64) -> f64 {
        self.next(index) * 2.0 - 1.0
    }
}

/// Base seed of a request.
///
/// Folds the UTF-8 bytes of `genre + mood + prompt + complexity (+ salt)`
/// as `h = h·31 + byte`, wrapping to 32 bits, then scales the hash once by
/// the complexity multiplier (1, 1.5, 2 or 3). The result is made
/// non-negative.
///
/// The fold stays invertible per byte, so every input byte reaches the
/// seed however long the prompt is.
pub fn request_seed(
    genre: Genre,
    mood: Mood,
    prompt: &str,
    complexity: Complexity,
    salt: Option<&str>,
) -> i32 {
    let numerator = complexity.seed_numerator();
    let bytes = genre
        .slug()
        .bytes()
        .chain(mood.slug().bytes())
        .chain(prompt.bytes())
        .chain(complexity.slug().bytes())
        .chain(salt.unwrap_or_default().bytes());

    let hash = bytes.fold(0_i32, |h, b| h.wrapping_mul(31).wrapping_add(b as i32));
    // Truncating cast wraps to 32 bits
    let scaled = (hash as i64 * numerator / 2) as i32;

    scaled.checked_abs().unwrap_or(i32::MAX)
}

/// Seed of the 1-based variation `number` of a request with `base` seed.
pub fn variation_seed(base: i32, number: u32) -> i32 {
    let offset = (number.saturating_sub(1) as i32).wrapping_mul(VARIATION_STRIDE);
    base.wrapping_add(offset)
}
