use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};
use crate::MAX_BLOCK_SIZE;

/*
Audio Oscillators
=================

The raw material of every voice. Waveform choice sets the harmonic budget the
filter then carves into:

  sine       fundamental only          pads, sub, 808 body
  saw        all harmonics, 1/n        acid bass, arps, supersaw
  square     odd harmonics, 1/n        plucks, leads, stabs
  triangle   odd harmonics, 1/n²       soft tones, toms
  noise      everything, unpitched     hats, claps, snare wires, sweeps

OscNode tracks the note pitch unless it is given a fixed frequency (drums),
in which case the frequency can be swept with `.modulate()`.

SupersawNode stacks N detuned saws spread symmetrically across `spread`
cents. Each saw starts at its own phase so the stack does not begin with a
single phase-aligned spike.

Example:
  // Tuned membrane: 50 Hz body, +120 Hz pitch drop at the start
  OscNode::sine()
      .with_frequency(50.0)
      .modulate(EnvNode::adsr(0.001, 0.08, 0.0, 0.0), OscParam::Frequency, 120.0)
*/

pub struct OscNode {
    osc: OscillatorBlock,
    /// Fixed frequency (Hz). If Some, ignores ctx.frequency.
    base_frequency: Option<f32>,
    /// Current frequency after modulation (only with a fixed base)
    current_frequency: f32,
    detune_cents: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum OscParam {
    Frequency,
    Detune,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            base_frequency: None,
            current_frequency: 440.0,
            detune_cents: 0.0,
        }
    }

    pub fn from_waveform(waveform: OscillatorWaveform) -> Self {
        Self::new(OscillatorBlock::new(waveform))
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn square() -> Self {
        Self::new(OscillatorBlock::square())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn noise() -> Self {
        Self::new(OscillatorBlock::noise())
    }

    /// Noise with its own stream, so layered noise sources don't cancel.
    pub fn noise_seeded(seed: u64) -> Self {
        Self::new(OscillatorBlock::noise().with_noise_seed(seed))
    }

    /// Ignore the note pitch and run at `freq` Hz.
    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.base_frequency = Some(freq);
        self.current_frequency = freq;
        self
    }

    /// Detune in cents (100 cents = 1 semitone).
    pub fn with_detune(mut self, cents: f32) -> Self {
        self.detune_cents = cents;
        self
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.osc = self.osc.with_phase(phase);
        self
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let base_freq = if self.base_frequency.is_some() {
            self.current_frequency
        } else {
            ctx.frequency
        };

        let frequency = if self.detune_cents != 0.0 {
            base_freq * 2.0_f32.powf(self.detune_cents / 1200.0)
        } else {
            base_freq
        };

        self.osc.render(out, &RenderCtx { frequency, ..*ctx });
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        if let Some(base) = self.base_frequency {
            self.current_frequency = base;
        }
    }

    fn reset(&mut self) {
        self.osc.reset();
    }
}

impl Modulatable for OscNode {
    type Param = OscParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            OscParam::Frequency => self.base_frequency.unwrap_or(440.0),
            OscParam::Detune => self.detune_cents,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            OscParam::Frequency => {
                self.current_frequency = (base + modulation).clamp(20.0, 20_000.0);
            }
            OscParam::Detune => {
                self.detune_cents = (base + modulation).clamp(-200.0, 200.0);
            }
        }
    }
}

/// Stack of detuned sawtooth oscillators.
pub struct SupersawNode {
    saws: Vec<(OscillatorBlock, f32)>,
    scratch: Vec<f32>,
}

impl SupersawNode {
    /// `count` saws spread evenly over ±`spread_cents / 2`.
    pub fn new(count: usize, spread_cents: f32) -> Self {
        let count = count.max(1);
        let saws = (0..count)
            .map(|i| {
                let position = if count == 1 {
                    0.0
                } else {
                    i as f32 / (count - 1) as f32 - 0.5
                };
                let ratio = 2.0_f32.powf(position * spread_cents / 1200.0);
                // Golden-ratio phase offsets keep the stack decorrelated
                let phase = (i as f32 * 0.618_034).fract();
                (OscillatorBlock::sawtooth().with_phase(phase), ratio)
            })
            .collect();

        Self {
            saws,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn voices(&self) -> usize {
        self.saws.len()
    }
}

impl GraphNode for SupersawNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        out.fill(0.0);
        let norm = 1.0 / (self.saws.len() as f32).sqrt();
        let scratch = &mut self.scratch[..out.len()];

        for (saw, ratio) in &mut self.saws {
            let saw_ctx = RenderCtx {
                frequency: ctx.frequency * *ratio,
                ..*ctx
            };
            saw.render(scratch, &saw_ctx);
            crate::dsp::mix::accumulate(out, scratch, norm);
        }
    }

    fn reset(&mut self) {
        for (saw, _) in &mut self.saws {
            saw.reset();
        }
    }
}
