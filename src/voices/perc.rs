//! Percussion voice: a small triangle membrane, somewhere between a tom and
//! a conga. Plays the syncopated `perc` channel and the 16-step percussion
//! layer.

use crate::dsp::envelope::Adsr;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{extensions::NodeExt, filter::FilterNode, GraphNode};

use super::membrane::Membrane;

pub const PERC: Membrane = Membrane {
    waveform: OscillatorWaveform::Triangle,
    base_hz: 260.0,
    pitch_decay: 0.01,
    octaves: 3.0,
    envelope: Adsr::new(0.001, 0.1, 0.02, 0.15),
};

pub fn perc() -> impl GraphNode {
    PERC.build().through(FilterNode::bandpass(600.0).with_q(1.2))
}
