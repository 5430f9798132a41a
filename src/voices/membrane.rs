//! Pitched percussion body.
//!
//! Every drum role is built on the same shape: an oscillator at a fixed
//! frequency whose pitch starts `octaves` above the base and falls back to it
//! over `pitch_decay` seconds, under a percussive amplitude envelope.
//!
//! The sweep is applied at block rate through `.modulate()`, so very short
//! pitch decays land on the first block or two. That is the click at the front
//! of the hit.

use crate::dsp::envelope::Adsr;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    oscillator::{OscNode, OscParam},
    GraphNode,
};

/// Highest frequency the pitch sweep may start from.
pub const MAX_SWEEP_HZ: f32 = 8_000.0;

/// Tunable description of one drum body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Membrane {
    pub waveform: OscillatorWaveform,
    pub base_hz: f32,
    pub pitch_decay: f32,
    pub octaves: f32,
    pub envelope: Adsr,
}

impl Membrane {
    /// Sweep depth in Hz, capped so the start frequency stays below
    /// [`MAX_SWEEP_HZ`].
    pub fn sweep_depth(&self) -> f32 {
        let start = (self.base_hz * 2.0_f32.powf(self.octaves)).min(MAX_SWEEP_HZ);
        (start - self.base_hz).max(0.0)
    }

    pub fn build(self) -> impl GraphNode {
        let pitch = EnvNode::adsr(0.001, self.pitch_decay, 0.0, 0.0);

        OscNode::from_waveform(self.waveform)
            .with_frequency(self.base_hz)
            .modulate(pitch, OscParam::Frequency, self.sweep_depth())
            .amplify(EnvNode::from_shape(self.envelope))
    }
}
