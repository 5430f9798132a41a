use std::f32::consts::{PI, TAU};

use crate::graph::node::{GraphNode, RenderCtx};

/*
Phaser
======

Four first-order allpass stages in series; their common break frequency is
swept by a sine LFO between `min_hz` and `max_hz`. Summed with the dry
signal, every 180° of phase shift becomes a notch, and the notches sweep.

  in ──┬──→ AP → AP → AP → AP ──┬──(wet)──→ (+) ──→ out
       │     ↑                  │            ↑
       │     └── feedback ──────┘            │
       └───────────────────────────(dry)─────┘
*/

const STAGES: usize = 4;

pub struct PhaserNode {
    rate: f32,
    min_hz: f32,
    max_hz: f32,
    feedback: f32,
    mix: f32,
    lfo_phase: f32,
    stages: [f32; STAGES],
    last: f32,
}

impl PhaserNode {
    pub fn new(rate: f32, feedback: f32, mix: f32) -> Self {
        Self {
            rate: rate.clamp(0.01, 10.0),
            min_hz: 300.0,
            max_hz: 3_000.0,
            feedback: feedback.clamp(0.0, 0.9),
            mix: mix.clamp(0.0, 1.0),
            lfo_phase: 0.0,
            stages: [0.0; STAGES],
            last: 0.0,
        }
    }

    pub fn with_range(mut self, min_hz: f32, max_hz: f32) -> Self {
        self.min_hz = min_hz.min(max_hz);
        self.max_hz = max_hz.max(min_hz);
        self
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for PhaserNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let phase_inc = TAU * self.rate / ctx.sample_rate;

        for sample in out.iter_mut() {
            let sweep = 0.5 + 0.5 * self.lfo_phase.sin();
            let freq = self.min_hz + (self.max_hz - self.min_hz) * sweep;
            let t = (PI * freq / ctx.sample_rate).tan();
            let a = (t - 1.0) / (t + 1.0);

            let dry = *sample;
            let mut x = dry + self.last * self.feedback;
            for state in &mut self.stages {
                // y = a·x + s;  s' = x - a·y
                let y = a * x + *state;
                *state = x - a * y;
                x = y;
            }
            self.last = x;

            *sample = dry * (1.0 - self.mix) + x * self.mix;

            self.lfo_phase += phase_inc;
            if self.lfo_phase >= TAU {
                self.lfo_phase -= TAU;
            }
        }
    }

    fn reset(&mut self) {
        self.stages = [0.0; STAGES];
        self.last = 0.0;
        self.lfo_phase = 0.0;
    }
}
