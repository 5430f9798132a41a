use crate::dsp::dynamics::EnvelopeFollower;
use crate::dsp::filter::SVFilter;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Auto-Wah
========

An envelope follower on the input opens a resonant bandpass: louder input,
higher cutoff.

  in ──┬──────────────────→ [bandpass] ──→ wet
       └──→ follower ──→ cutoff = base + level·range

The cutoff is updated every 16 samples, which is plenty for a wah and keeps
the filter's tan() off the per-sample path.
*/

const CONTROL_INTERVAL: usize = 16;

pub struct AutoWahNode {
    base_hz: f32,
    range_hz: f32,
    sensitivity: f32,
    mix: f32,
    filter: SVFilter,
    follower: Option<(EnvelopeFollower, f32)>,
}

impl AutoWahNode {
    pub fn new(base_hz: f32, range_hz: f32, sensitivity: f32, mix: f32) -> Self {
        Self {
            base_hz: base_hz.max(20.0),
            range_hz: range_hz.max(0.0),
            sensitivity: sensitivity.max(0.0),
            mix: mix.clamp(0.0, 1.0),
            filter: SVFilter::bandpass(base_hz).with_q(4.0),
            follower: None,
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff()
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for AutoWahNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sample_rate = ctx.sample_rate;
        if !matches!(&self.follower, Some((_, rate)) if *rate == sample_rate) {
            self.follower = None;
        }
        let (follower, _) = self
            .follower
            .get_or_insert_with(|| (EnvelopeFollower::new(0.005, 0.12, sample_rate), sample_rate));

        for chunk in out.chunks_mut(CONTROL_INTERVAL) {
            for sample in chunk.iter() {
                follower.process(*sample);
            }
            let level = (follower.level() * self.sensitivity).min(1.0);
            self.filter.set_cutoff(self.base_hz + level * self.range_hz);

            for sample in chunk.iter_mut() {
                let dry = *sample;
                let wet = self.filter.process(dry, sample_rate);
                *sample = dry * (1.0 - self.mix) + wet * self.mix;
            }
        }
    }

    fn reset(&mut self) {
        self.filter.reset();
        self.filter.set_cutoff(self.base_hz);
        if let Some((follower, _)) = &mut self.follower {
            follower.reset();
        }
    }
}
