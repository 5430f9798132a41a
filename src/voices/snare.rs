//! Snare voices.
//!
//! - `snare_clap`: a square membrane, two octaves of sweep, blended with a
//!   band-passed noise burst for the hand-clap crack.
//! - `snare_rim`: a noise membrane through a tight bandpass. Very short, used
//!   in low-energy sections where a full clap is too much.

use crate::dsp::envelope::Adsr;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

use super::membrane::Membrane;

pub const SNARE_CLAP: Membrane = Membrane {
    waveform: OscillatorWaveform::Square,
    base_hz: 180.0,
    pitch_decay: 0.01,
    octaves: 2.0,
    envelope: Adsr::new(0.001, 0.1, 0.01, 0.2),
};

pub const SNARE_RIM: Membrane = Membrane {
    waveform: OscillatorWaveform::Noise,
    base_hz: 400.0,
    pitch_decay: 0.005,
    octaves: 1.0,
    envelope: Adsr::new(0.001, 0.05, 0.01, 0.1),
};

/// Clap-style snare.
pub fn snare_clap() -> impl GraphNode {
    let body = SNARE_CLAP.build().through(FilterNode::lowpass(1_200.0));

    let crack = OscNode::noise_seeded(0x5A4E)
        .amplify(EnvNode::from_shape(SNARE_CLAP.envelope))
        .through(FilterNode::bandpass(1_500.0).with_q(1.5));

    body.mix(crack, 0.6)
}

/// Rim shot.
pub fn snare_rim() -> impl GraphNode {
    SNARE_RIM
        .build()
        .through(FilterNode::bandpass(2_500.0).with_q(4.0))
}
