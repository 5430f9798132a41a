//! Kick drum voices.
//!
//! Both kicks are a membrane: a low oscillator with a fast downward pitch
//! sweep. The pitch sweep is the "punch", the amplitude decay the "boom".
//!
//! - `kick_808`: sine body, ten-octave sweep (capped), long boomy tail. Hip-hop,
//!   trap and dubstep low end.
//! - `kick_punch`: triangle body, short sweep, tight decay. Four-on-the-floor
//!   house, techno and trance.
//!
//! The note pitch is ignored; kicks are tuned by the voice.

use crate::dsp::envelope::Adsr;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{extensions::NodeExt, filter::FilterNode, GraphNode};

use super::membrane::Membrane;

pub const KICK_808: Membrane = Membrane {
    waveform: OscillatorWaveform::Sine,
    base_hz: 45.0,
    pitch_decay: 0.08,
    octaves: 10.0,
    envelope: Adsr::new(0.001, 0.6, 0.01, 1.8),
};

pub const KICK_PUNCH: Membrane = Membrane {
    waveform: OscillatorWaveform::Triangle,
    base_hz: 55.0,
    pitch_decay: 0.02,
    octaves: 6.0,
    envelope: Adsr::new(0.001, 0.3, 0.01, 0.8),
};

/// Long, deep 808-style kick.
pub fn kick_808() -> impl GraphNode {
    KICK_808.build().through(FilterNode::lowpass(180.0))
}

/// Short, punchy club kick.
pub fn kick_punch() -> impl GraphNode {
    // Triangle harmonics give the click; keep them below 1 kHz
    KICK_PUNCH.build().through(FilterNode::lowpass(900.0))
}
