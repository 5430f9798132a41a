use serde::{Deserialize, Serialize};

use crate::{graph::node::RenderCtx, MIN_TIME};

/*
ADSR Envelope
=============

Linear attack/decay/sustain/release generator. Every voice role in the
generator is described by one of these shapes, so the parameters live in a
plain serializable struct (`Adsr`) that the voice tables can hold as data.

    Level
      1.0 ┐     ╱╲
          │    ╱  ╲___________
      S   │   ╱               ╲
          │  ╱                 ╲
      0.0 └─╱───────────────────╲──→ Time
            A    D      S        R

Stages are a small state machine:

    Idle ──note_on──→ Attack ──1.0──→ Decay ──S──→ Sustain
      ↑                  │              │            │
      └──── 0.0 ──── Release ←──────note_off─────────┘

Retriggering
------------

A retrigger while the envelope is still sounding ramps the attack up from the
CURRENT level instead of snapping to zero. Step sequencers retrigger the same
voice every eighth note; snapping to zero would click on every step.

Release always starts from the current level and lands exactly on zero after
`release * sample_rate` samples, so a note released mid-attack fades out
smoothly as well.
*/

/// Envelope shape in seconds (sustain is a level, 0.0 - 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adsr {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Adsr {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    stage: EnvelopeState,
    level: f32,

    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl Envelope {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self::from_shape(Adsr::new(attack, decay, sustain, release))
    }

    pub fn from_shape(shape: Adsr) -> Self {
        Self {
            attack_time: shape.attack.max(MIN_TIME),
            decay_time: shape.decay.max(MIN_TIME),
            sustain_level: shape.sustain.clamp(0.0, 1.0),
            release_time: shape.release.max(MIN_TIME),
            stage: EnvelopeState::Idle,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 1,
            release_elapsed_samples: 0,
        }
    }

    pub fn shape(&self) -> Adsr {
        Adsr::new(
            self.attack_time,
            self.decay_time,
            self.sustain_level,
            self.release_time,
        )
    }

    /// Gate high. Ramps up from wherever the level currently is.
    pub fn note_on(&mut self, _ctx: &RenderCtx) {
        self.stage = EnvelopeState::Attack;
        self.release_elapsed_samples = 0;
    }

    /// Gate low. Ramps from the current level down to zero.
    pub fn note_off(&mut self, ctx: &RenderCtx) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * ctx.sample_rate).round().max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = EnvelopeState::Release;
    }

    #[inline]
    pub fn next_sample(&mut self, ctx: &RenderCtx) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }
            EnvelopeState::Attack => {
                self.level += 1.0 / (self.attack_time * ctx.sample_rate);
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                let drop = (1.0 - self.sustain_level) / (self.decay_time * ctx.sample_rate);
                self.level -= drop;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = if self.sustain_level > 0.0 {
                        EnvelopeState::Sustain
                    } else {
                        // Percussive shapes have nothing to hold
                        EnvelopeState::Idle
                    };
                }
            }
            EnvelopeState::Sustain => {
                self.level = self.sustain_level;
            }
            EnvelopeState::Release => {
                let progress =
                    self.release_elapsed_samples as f32 / self.release_total_samples as f32;
                self.level = (self.release_start_level * (1.0 - progress)).max(0.0);
                self.release_elapsed_samples = self.release_elapsed_samples.saturating_add(1);

                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    pub fn render(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(ctx);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.release_start_level = 0.0;
        self.release_elapsed_samples = 0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(SAMPLE_RATE, 440.0, 100.0)
    }

    fn run(env: &mut Envelope, samples: usize) {
        let ctx = ctx();
        for _ in 0..samples {
            env.next_sample(&ctx);
        }
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Envelope::adsr(0.01, 0.1, 0.7, 0.2);
        env.note_on(&ctx());
        run(&mut env, 12);

        assert!(env.level() > 0.99, "attack stopped at {}", env.level());
        assert_ne!(env.state(), EnvelopeState::Attack);
    }

    #[test]
    fn sustain_holds_target_level() {
        let mut env = Envelope::adsr(0.01, 0.05, 0.6, 0.2);
        env.note_on(&ctx());
        run(&mut env, 70);

        assert_eq!(env.state(), EnvelopeState::Sustain);
        assert!((env.level() - 0.6).abs() < 1e-4);
    }

    #[test]
    fn release_lands_on_idle() {
        let mut env = Envelope::adsr(0.01, 0.05, 0.6, 0.03);
        env.note_on(&ctx());
        run(&mut env, 70);
        env.note_off(&ctx());
        run(&mut env, 30);

        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(env.level(), 0.0);
        assert!(!env.is_active());
    }

    #[test]
    fn zero_sustain_shape_goes_idle_after_decay() {
        let mut env = Envelope::adsr(0.001, 0.05, 0.0, 0.1);
        env.note_on(&ctx());
        run(&mut env, 60);

        assert!(!env.is_active(), "percussive envelope should free itself");
    }

    #[test]
    fn retrigger_starts_from_current_level() {
        let mut env = Envelope::adsr(0.1, 0.1, 0.8, 0.5);
        env.note_on(&ctx());
        run(&mut env, 50);
        let before = env.level();

        env.note_on(&ctx());
        let after = env.next_sample(&ctx());

        assert!(after >= before, "retrigger dropped from {} to {}", before, after);
    }
}
