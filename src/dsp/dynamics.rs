//! Dynamics: envelope follower and feed-forward compressor.
//!
//! ```text
//! x ──┬───────────────────────────────(×)──→ y
//!     └─→ |x| → follower → dB → gain curve ─┘
//! ```
//!
//! The follower is a one-pole smoother with separate attack and release
//! coefficients, `coef = exp(-1 / (time * fs))`. The gain curve is a hard knee:
//! above `threshold_db`, every `ratio` dB of input yields 1 dB of output.
//!
//! The auto-wah reuses the follower on its own to drive a filter cutoff.

#[inline]
fn time_coefficient(seconds: f32, sample_rate: f32) -> f32 {
    if seconds <= 0.0 {
        0.0
    } else {
        (-1.0 / (seconds * sample_rate)).exp()
    }
}

#[inline]
pub fn linear_to_db(value: f32) -> f32 {
    20.0 * value.max(1.0e-6).log10()
}

#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

pub struct EnvelopeFollower {
    attack: f32,
    release: f32,
    level: f32,
}

impl EnvelopeFollower {
    pub fn new(attack_secs: f32, release_secs: f32, sample_rate: f32) -> Self {
        Self {
            attack: time_coefficient(attack_secs, sample_rate),
            release: time_coefficient(release_secs, sample_rate),
            level: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let rectified = input.abs();
        let coef = if rectified > self.level {
            self.attack
        } else {
            self.release
        };
        self.level = rectified + coef * (self.level - rectified);
        self.level
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

pub struct Compressor {
    follower: EnvelopeFollower,
    threshold_db: f32,
    ratio: f32,
    makeup: f32,
}

impl Compressor {
    pub fn new(
        threshold_db: f32,
        ratio: f32,
        attack_secs: f32,
        release_secs: f32,
        sample_rate: f32,
    ) -> Self {
        Self {
            follower: EnvelopeFollower::new(attack_secs, release_secs, sample_rate),
            threshold_db,
            ratio: ratio.max(1.0),
            makeup: 1.0,
        }
    }

    pub fn with_makeup_db(mut self, db: f32) -> Self {
        self.makeup = db_to_linear(db);
        self
    }

    /// Static gain (linear) applied for a detected level (linear).
    #[inline]
    pub fn gain_for(&self, level: f32) -> f32 {
        let level_db = linear_to_db(level);
        if level_db <= self.threshold_db {
            return 1.0;
        }
        let over = level_db - self.threshold_db;
        let reduced = over / self.ratio;
        db_to_linear(reduced - over)
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = self.follower.process(input);
        input * self.gain_for(level) * self.makeup
    }

    pub fn set_threshold_db(&mut self, db: f32) {
        self.threshold_db = db;
    }

    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio.max(1.0);
    }

    pub fn reset(&mut self) {
        self.follower.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_tracks_a_step() {
        let mut follower = EnvelopeFollower::new(0.001, 0.1, 48_000.0);
        for _ in 0..2_000 {
            follower.process(0.8);
        }
        assert!((follower.level() - 0.8).abs() < 0.01);
    }

    #[test]
    fn below_threshold_is_unity() {
        let comp = Compressor::new(-12.0, 4.0, 0.005, 0.1, 48_000.0);
        assert_eq!(comp.gain_for(db_to_linear(-20.0)), 1.0);
    }

    #[test]
    fn ratio_shrinks_overshoot() {
        let comp = Compressor::new(-12.0, 4.0, 0.005, 0.1, 48_000.0);
        // 12 dB over threshold at 4:1 leaves 3 dB over, i.e. 9 dB of reduction
        let gain = comp.gain_for(db_to_linear(0.0));
        assert!((linear_to_db(gain) + 9.0).abs() < 0.01, "gain {} dB", linear_to_db(gain));
    }

    #[test]
    fn loud_input_comes_out_quieter() {
        let mut comp = Compressor::new(-18.0, 6.0, 0.001, 0.05, 48_000.0);
        let mut last = 0.0;
        for _ in 0..4_800 {
            last = comp.process(0.9);
        }
        assert!(last < 0.5, "compressed level {}", last);
    }
}
