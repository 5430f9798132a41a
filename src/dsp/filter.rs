use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::graph::node::RenderCtx;

/*
Topology-Preserving State-Variable Filter
=========================================

One two-integrator loop yields every response at once; the filter type only
picks which tap becomes the output.

| type     | tap                 | passes          |
| -------- | ------------------- | --------------- |
| lowpass  | v2                  | below cutoff    |
| highpass | x - k·v1 - v2       | above cutoff    |
| bandpass | v1                  | around cutoff   |
| notch    | x - k·v1            | all but cutoff  |

Damping
-------

`k = 1/Q`. Q = 0.707 is the flat Butterworth response; larger Q rings at the
cutoff. Voice presets are written in Q (e.g. "lowpass 300 Hz, Q 15") so the
filter accepts Q directly and clamps it to [`MIN_Q`, `MAX_Q`]. Past `MAX_Q`
the resonant peak (≈ Q× gain) swamps the rest of the mix.

Coefficient `g = tan(π·fc/fs)` is recomputed only when the cutoff or sample
rate changes; automation moves the cutoff at block rate at most.
*/

pub const MIN_Q: f32 = 0.1;
pub const MAX_Q: f32 = 10.0;
const BUTTERWORTH_Q: f32 = std::f32::consts::FRAC_1_SQRT_2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    cutoff_hz: f32,
    q: f32,
    filter_type: FilterType,

    // (cutoff, sample_rate) the cached g was computed for
    cached_for: (f32, f32),
    g: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: BUTTERWORTH_Q,
            filter_type,
            cached_for: (f32::NAN, f32::NAN),
            g: 0.0,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz)
    }

    pub fn notch(cutoff_hz: f32) -> Self {
        Self::new(FilterType::Notch, cutoff_hz)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.set_q(q);
        self
    }

    #[inline]
    fn coefficient(&mut self, sample_rate: f32) -> f32 {
        if self.cached_for != (self.cutoff_hz, sample_rate) {
            // Keep the prewarp below Nyquist or tan() blows up
            let fc = self.cutoff_hz.clamp(10.0, sample_rate * 0.49);
            self.g = (PI * fc / sample_rate).tan();
            self.cached_for = (self.cutoff_hz, sample_rate);
        }
        self.g
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    pub fn process(&mut self, sample: f32, sample_rate: f32) -> f32 {
        let g = self.coefficient(sample_rate);
        let k = 1.0 / self.q;
        let outputs = self.next_sample(sample, k, g);
        self.select(outputs)
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        let g = self.coefficient(ctx.sample_rate);
        let k = 1.0 / self.q;

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);
            *sample = self.select(outputs);
        }
    }

    #[inline]
    fn select(&self, outputs: FilterOutputs) -> f32 {
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass,
            FilterType::Notch => outputs.notch,
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn q(&self) -> f32 {
        self.q
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.clamp(MIN_Q, MAX_Q);
    }

    /// Resonance as a 0.0 - 1.0 amount, mapped onto Q in [Butterworth, MAX_Q].
    pub fn set_resonance(&mut self, resonance: f32) {
        let r = resonance.clamp(0.0, 1.0);
        self.set_q(BUTTERWORTH_Q + r * (MAX_Q - BUTTERWORTH_Q));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SR: f32 = 48_000.0;

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len).map(|n| (TAU * freq * n as f32 / SR).sin()).collect()
    }

    fn steady_peak(buffer: &[f32]) -> f32 {
        buffer[buffer.len() / 2..]
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn run(mut filter: SVFilter, input: &[f32]) -> Vec<f32> {
        let ctx = RenderCtx::from_freq(SR, 440.0, 100.0);
        let mut out = input.to_vec();
        filter.render(&mut out, &ctx);
        out
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let low = run(SVFilter::lowpass(500.0), &sine(100.0, 4800));
        let high = run(SVFilter::lowpass(500.0), &sine(8_000.0, 4800));

        assert!(steady_peak(&low) > 0.9, "passband lost level: {}", steady_peak(&low));
        assert!(steady_peak(&high) < 0.05, "stopband leaked: {}", steady_peak(&high));
    }

    #[test]
    fn highpass_attenuates_below_cutoff() {
        let low = run(SVFilter::highpass(2_000.0), &sine(60.0, 9600));
        let high = run(SVFilter::highpass(2_000.0), &sine(10_000.0, 4800));

        assert!(steady_peak(&low) < 0.05);
        assert!(steady_peak(&high) > 0.9);
    }

    #[test]
    fn resonance_boosts_cutoff_region() {
        let flat = run(SVFilter::lowpass(1_000.0), &sine(1_000.0, 4800));
        let peaky = run(SVFilter::lowpass(1_000.0).with_q(8.0), &sine(1_000.0, 4800));

        assert!(steady_peak(&peaky) > 4.0 * steady_peak(&flat));
    }

    #[test]
    fn q_is_clamped() {
        assert_eq!(SVFilter::lowpass(300.0).with_q(20.0).q(), MAX_Q);
        assert_eq!(SVFilter::lowpass(300.0).with_q(0.0).q(), MIN_Q);
    }
}
