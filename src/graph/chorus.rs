use crate::dsp::delay::DelayLine;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};
use std::f32::consts::TAU;

/*
Chorus Effect
=============

Mixes the dry signal with a copy read from a short delay whose time is swept
by a sine LFO. The moving read head bends the pitch slightly up and down, so
one voice sounds like several.

  in ──┬──────────────────────────(dry)──→ (+) ──→ out
       └──→ [delay 20ms ± depth] ─(wet)───↗
                    ↑
                  LFO (rate)

Parameters
----------

Rate (0.1 - 10 Hz):   LFO speed. The per-variation nudge lands in 2 - 8 Hz.
Depth (0.5 - 10 ms):  delay swing around the base delay.
Mix (0.0 - 1.0):      dry/wet.
Base delay (5 - 50 ms, default 20): shorter combs, longer slaps back.
*/

#[derive(Clone, Copy, Debug)]
pub enum ChorusParam {
    Rate,
    Depth,
    Mix,
}

pub struct ChorusNode {
    delay_line: DelayLine,
    lfo_phase: f32,
    rate: f32,
    depth_ms: f32,
    mix: f32,
    base_delay_ms: f32,
}

impl ChorusNode {
    /// - `rate`: LFO speed in Hz
    /// - `depth_ms`: modulation depth in milliseconds
    /// - `mix`: dry/wet blend
    pub fn new(rate: f32, depth_ms: f32, mix: f32) -> Self {
        Self {
            delay_line: DelayLine::new(),
            lfo_phase: 0.0,
            rate: rate.clamp(0.1, 10.0),
            depth_ms: depth_ms.clamp(0.5, 10.0),
            mix: mix.clamp(0.0, 1.0),
            base_delay_ms: 20.0,
        }
    }

    pub fn with_base_delay(mut self, ms: f32) -> Self {
        self.base_delay_ms = ms.clamp(5.0, 50.0);
        self
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate.clamp(0.1, 10.0);
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for ChorusNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sample_rate = ctx.sample_rate;
        let phase_inc = TAU * self.rate / sample_rate;

        for sample in out.iter_mut() {
            let lfo_value = self.lfo_phase.sin();
            let delay_ms = self.base_delay_ms + lfo_value * self.depth_ms;
            let delay_samples = (delay_ms * sample_rate / 1000.0).max(1.0);

            let wet = self.delay_line.read_interpolated(delay_samples);
            let dry = *sample;
            self.delay_line.write(dry);
            *sample = dry * (1.0 - self.mix) + wet * self.mix;

            self.lfo_phase += phase_inc;
            if self.lfo_phase >= TAU {
                self.lfo_phase -= TAU;
            }
        }
    }

    fn reset(&mut self) {
        self.delay_line.reset();
        self.lfo_phase = 0.0;
    }
}

impl Modulatable for ChorusNode {
    type Param = ChorusParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            ChorusParam::Rate => self.rate,
            ChorusParam::Depth => self.depth_ms,
            ChorusParam::Mix => self.mix,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            ChorusParam::Rate => self.set_rate(base + modulation),
            ChorusParam::Depth => {
                self.depth_ms = (base + modulation).clamp(0.5, 10.0);
            }
            ChorusParam::Mix => self.set_mix(base + modulation),
        }
    }
}
