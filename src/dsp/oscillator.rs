use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Phase-Accumulator Oscillator
============================

Every periodic waveform here is driven by the same normalized phase in [0, 1):

    phase[n+1] = frac(phase[n] + frequency / sample_rate)

The waveform is then a pure function of the phase:

    sine      sin(2π·phase)
    saw       2·phase - 1
    square    +1 for phase < 0.5, -1 otherwise
    triangle  1 - 4·|phase - 0.5|      (starts at -1, peaks at phase 0.5)

Aliasing
--------

Saw and square jump instantly, which folds energy above Nyquist back into the
audible band. A PolyBLEP residual is subtracted around each discontinuity:

    t < dt        t/dt·2 - t²/dt² - 1
    t > 1 - dt    (t-1)²/dt² + (t-1)/dt·2 + 1

where dt is the per-sample phase increment. Cheap, and good enough for
leads and basses an octave or two above the keyboard's low end.

Noise
-----

Noise comes from a PCG32 stream so two renders of the same track are
bit-identical. Each block owns its stream; voices that want independent noise
pass a different seed.
*/

/// Waveform produced by an [`OscillatorBlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OscillatorWaveform {
    Sine,
    Saw,
    Square,
    Triangle,
    Noise,
}

const DEFAULT_NOISE_SEED: u64 = 0x0ED0_F0A6_E5EE_D001;

pub struct OscillatorBlock {
    waveform: OscillatorWaveform,
    phase: f32,
    start_phase: f32,
    noise: Pcg32,
    noise_seed: u64,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
            start_phase: 0.0,
            noise: Pcg32::seed_from_u64(DEFAULT_NOISE_SEED),
            noise_seed: DEFAULT_NOISE_SEED,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Saw)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn noise() -> Self {
        Self::new(OscillatorWaveform::Noise)
    }

    /// Start at a given phase (0.0 - 1.0). Detuned stacks use this so their
    /// partials don't all line up on the first cycle.
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase.rem_euclid(1.0);
        self.start_phase = self.phase;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise = Pcg32::seed_from_u64(seed);
        self.noise_seed = seed;
        self
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.waveform
    }

    /// Back to the starting phase and the start of the noise stream, so a
    /// reset block replays exactly what a fresh one would.
    pub fn reset(&mut self) {
        self.phase = self.start_phase;
        self.noise = Pcg32::seed_from_u64(self.noise_seed);
    }

    /// Produce one sample and advance the phase by `increment` (cycles per sample).
    #[inline]
    pub fn next_sample(&mut self, increment: f32) -> f32 {
        let t = self.phase;
        let value = match self.waveform {
            OscillatorWaveform::Sine => (TAU * t).sin(),
            OscillatorWaveform::Saw => 2.0 * t - 1.0 - poly_blep(t, increment),
            OscillatorWaveform::Square => {
                let naive = if t < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(t, increment) - poly_blep((t + 0.5).rem_euclid(1.0), increment)
            }
            OscillatorWaveform::Triangle => 1.0 - 4.0 * (t - 0.5).abs(),
            OscillatorWaveform::Noise => self.noise.gen_range(-1.0..1.0),
        };

        self.phase += increment;
        if self.phase >= 1.0 {
            self.phase -= self.phase.floor();
        }

        value
    }

    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // Above Nyquist there is nothing meaningful to produce
        let increment = (ctx.frequency / ctx.sample_rate).clamp(0.0, 0.5);
        for sample in out.iter_mut() {
            *sample = self.next_sample(increment);
        }
    }
}

#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let x = t / dt;
        x + x - x * x - 1.0
    } else if t > 1.0 - dt {
        let x = (t - 1.0) / dt;
        x * x + x + x + 1.0
    } else {
        0.0
    }
}
