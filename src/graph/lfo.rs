use crate::{
    dsp::oscillator::OscillatorBlock,
    graph::node::{GraphNode, RenderCtx},
};

/*
LFO (Low Frequency Oscillator)
==============================

A sub-audio oscillator (0.01 - 20 Hz) used as a modulation source. It ignores
the note frequency in the render context and runs at its own rate, output in
[-1, +1].

Where the renderer uses them:

  Wobble bass   LFO → filter cutoff, retriggered on each note
  Tremolo       LFO → amplitude
  Phaser        LFO → allpass break frequency
  Auto-filter   LFO → filter cutoff ("filter" effect slot)

`retrigger()` restarts the cycle on every note-on so a wobble always starts
on the same part of its sweep; without it the LFO free-runs across notes.
*/

pub struct LfoNode {
    osc: OscillatorBlock,
    frequency: f32,
    retrigger: bool,
}

impl LfoNode {
    fn new(osc: OscillatorBlock, frequency: f32) -> Self {
        Self {
            osc,
            frequency,
            retrigger: false,
        }
    }

    pub fn sine(frequency: f32) -> Self {
        Self::new(OscillatorBlock::sine(), frequency)
    }

    pub fn sawtooth(frequency: f32) -> Self {
        Self::new(OscillatorBlock::sawtooth(), frequency)
    }

    pub fn square(frequency: f32) -> Self {
        Self::new(OscillatorBlock::square(), frequency)
    }

    pub fn triangle(frequency: f32) -> Self {
        Self::new(OscillatorBlock::triangle(), frequency)
    }

    pub fn retrigger(mut self) -> Self {
        self.retrigger = true;
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.clamp(0.0, 50.0);
    }

    #[inline]
    pub fn next_value(&mut self, sample_rate: f32) -> f32 {
        self.osc.next_sample(self.frequency / sample_rate)
    }
}

impl GraphNode for LfoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let lfo_ctx = RenderCtx::from_freq(ctx.sample_rate, self.frequency, 1.0);
        self.osc.render(out, &lfo_ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        if self.retrigger {
            self.osc.reset();
        }
    }

    fn reset(&mut self) {
        self.osc.reset();
    }
}
