//! Frequency/dynamics summary attached to every variation.
//!
//! Two modes. `Heuristic` is a cheap genre-shaped estimate with a seeded
//! wobble and never looks at the audio. `Spectral` averages Hann-windowed
//! FFT frames of the rendered take and measures it.

use std::f32::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::dsp::mix::{peak, rms};
use crate::seed::SeededRandom;
use crate::theory::Genre;

/// FFT size for spectral analysis
const FRAME: usize = 2048;
const BASS_SPLIT_HZ: f32 = 250.0;
const HIGH_SPLIT_HZ: f32 = 4_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisMode {
    #[default]
    Heuristic,
    Spectral,
}

/// Every field is in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyAnalysis {
    pub bass_energy: f32,
    pub mid_energy: f32,
    pub high_energy: f32,
    pub dynamic_range: f32,
}

impl FrequencyAnalysis {
    fn clamped(self) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            bass_energy: unit(self.bass_energy),
            mid_energy: unit(self.mid_energy),
            high_energy: unit(self.high_energy),
            dynamic_range: unit(self.dynamic_range),
        }
    }

    /// Genre base values plus `(r(variation) - 0.5) * 0.2`.
    pub fn heuristic(genre: Genre, random: &SeededRandom, variation_number: u32) -> Self {
        let (mut bass, mut mid, mut high, mut dr) = (0.7, 0.6, 0.5, 0.8);
        match genre {
            Genre::Dubstep | Genre::Hardstyle => {
                bass += 0.2;
                dr += 0.1;
            }
            Genre::Trance | Genre::ProgressiveHouse => {
                mid += 0.2;
                high += 0.1;
            }
            Genre::Techno => {
                bass += 0.1;
                mid += 0.1;
            }
            _ => {}
        }

        let jitter = ((random.next(variation_number as u64) - 0.5) * 0.2) as f32;
        Self {
            bass_energy: bass + jitter,
            mid_energy: mid + jitter,
            high_energy: high + jitter,
            dynamic_range: dr + jitter,
        }
        .clamped()
    }

    /// Band power shares of the averaged spectrum plus `1 - rms/peak`.
    pub fn spectral(tape: &[f32], sample_rate: f32) -> Self {
        let peak_level = peak(tape);
        let dynamic_range = if peak_level > 0.0 {
            1.0 - rms(tape) / peak_level
        } else {
            0.0
        };

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FRAME);

        // Hann window - reduces spectral leakage
        let window: Vec<f32> = (0..FRAME)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (FRAME - 1) as f32).cos()))
            .collect();

        let half = FRAME / 2;
        let mut power = vec![0.0_f32; half];
        let mut scratch = vec![Complex::new(0.0, 0.0); FRAME];

        for frame in tape.chunks_exact(FRAME) {
            for (slot, (sample, w)) in scratch.iter_mut().zip(frame.iter().zip(&window)) {
                *slot = Complex::new(sample * w, 0.0);
            }
            fft.process(&mut scratch);
            for (bin, value) in power.iter_mut().zip(&scratch[..half]) {
                *bin += value.norm_sqr();
            }
        }

        let bin_hz = sample_rate / FRAME as f32;
        let (mut bass, mut mid, mut high) = (0.0_f32, 0.0_f32, 0.0_f32);
        // Skip DC
        for (index, p) in power.iter().enumerate().skip(1) {
            let freq = index as f32 * bin_hz;
            if freq < BASS_SPLIT_HZ {
                bass += p;
            } else if freq < HIGH_SPLIT_HZ {
                mid += p;
            } else {
                high += p;
            }
        }

        let total = bass + mid + high;
        let share = |band: f32| if total > 0.0 { band / total } else { 0.0 };
        Self {
            bass_energy: share(bass),
            mid_energy: share(mid),
            high_energy: share(high),
            dynamic_range,
        }
        .clamped()
    }
}
