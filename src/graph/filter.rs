use crate::{
    dsp::filter::{FilterType, SVFilter},
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/*
State-Variable Filter (SVF)
===========================

Subtractive synthesis starts from a harmonically rich waveform and removes
what it doesn't want. Every melodic voice role carries one of these, and the
melodic bus runs through one more whose cutoff follows the automation lane.

Filter Types:
-------------

  Lowpass    passes below the cutoff     pads, acid and wobble bass, bus sweeps
  Highpass   passes above the cutoff     plucks, arps, hats
  Bandpass   passes around the cutoff    leads, stabs, wah
  Notch      removes around the cutoff   phaser stages

Parameters:
-----------

Cutoff (Hz): clamped to 20 Hz - 20 kHz when modulated.

Q: emphasis at the cutoff. 0.707 is flat (Butterworth); values towards 10
get squelchy. The underlying filter clamps Q to [0.1, 10], so a voice table
asking for Q 15 or 20 gets the maximum.

Resonance (modulation only): 0.0 - 1.0 mapped onto the Q range.

Example usage:
  // Wobble: LFO sweeping a lowpass
  OscNode::sawtooth()
      .through(FilterNode::lowpass(200.0).with_q(20.0)
          .modulate(LfoNode::sine(4.0), FilterParam::Cutoff, 600.0))
*/

#[derive(Clone, Copy, Debug)]
pub enum FilterParam {
    Cutoff,
    Resonance,
}

pub struct FilterNode {
    filter: SVFilter,
    base_cutoff: f32,
    base_resonance: f32,
}

impl FilterNode {
    pub fn new(filter_type: FilterType, cutoff_hz: f32) -> Self {
        FilterNode {
            filter: SVFilter::new(filter_type, cutoff_hz),
            base_cutoff: cutoff_hz,
            base_resonance: 0.0,
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
        self.filter.set_q(q);
        self
    }

    /// Move the cutoff outright (automation, per-variation nudges).
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        let cutoff = cutoff_hz.clamp(20.0, 20_000.0);
        self.base_cutoff = cutoff;
        self.filter.set_cutoff(cutoff);
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }

    pub fn q(&self) -> f32 {
        self.filter.q()
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter.filter_type()
    }
}

impl Modulatable for FilterNode {
    type Param = FilterParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            FilterParam::Cutoff => self.base_cutoff,
            FilterParam::Resonance => self.base_resonance,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        let final_value = base + modulation;
        match param {
            FilterParam::Cutoff => {
                self.base_cutoff = base;
                self.filter.set_cutoff(final_value.clamp(20.0, 20_000.0));
            }
            FilterParam::Resonance => {
                self.base_resonance = base;
                self.filter.set_resonance(final_value.clamp(0.0, 1.0));
            }
        }
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::filter::MAX_Q;

    #[test]
    fn high_q_is_clamped() {
        let filter = FilterNode::lowpass(200.0).with_q(20.0);
        assert_eq!(filter.q(), MAX_Q);
    }

    #[test]
    fn modulation_keeps_base_cutoff() {
        let mut filter = FilterNode::lowpass(1_000.0);
        filter.apply_modulation(FilterParam::Cutoff, 1_000.0, 500.0);

        assert_eq!(filter.get_param(FilterParam::Cutoff), 1_000.0);
        assert_eq!(filter.cutoff(), 1_500.0);
    }

    #[test]
    fn set_cutoff_clamps_to_audio_band() {
        let mut filter = FilterNode::highpass(500.0);
        filter.set_cutoff(5.0);
        assert_eq!(filter.cutoff(), 20.0);
        filter.set_cutoff(96_000.0);
        assert_eq!(filter.cutoff(), 20_000.0);
    }

    #[test]
    fn lowpass_darkens_noise() {
        let ctx = RenderCtx::from_freq(48_000.0, 0.0, 100.0);
        let mut noise: Vec<f32> = (0..4_096)
            .map(|i| if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let before = crate::dsp::mix::rms(&noise);

        let mut filter = FilterNode::lowpass(300.0);
        filter.render_block(&mut noise, &ctx);

        assert!(crate::dsp::mix::rms(&noise) < before * 0.1);
    }
}
