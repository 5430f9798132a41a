//! Hi-hat voices.
//!
//! A bright saw membrane at a fixed high pitch, blended with noise and
//! high-passed. The saw gives a metallic ring the noise alone lacks.
//!
//! - `hihat_closed`: square-edged, 30 ms decay. The backbone of most patterns.
//! - `hihat_open`: same body, 200 ms decay with a short hold.

use crate::dsp::envelope::Adsr;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

use super::membrane::Membrane;

pub const HIHAT_OPEN: Membrane = Membrane {
    waveform: OscillatorWaveform::Saw,
    base_hz: 3_200.0,
    pitch_decay: 0.001,
    octaves: 1.0,
    envelope: Adsr::new(0.001, 0.2, 0.05, 0.3),
};

pub const HIHAT_CLOSED: Membrane = Membrane {
    waveform: OscillatorWaveform::Square,
    base_hz: 3_200.0,
    pitch_decay: 0.001,
    octaves: 1.0,
    envelope: Adsr::new(0.001, 0.03, 0.01, 0.05),
};

fn hat(membrane: Membrane, noise_seed: u64) -> impl GraphNode {
    let sizzle = OscNode::noise_seeded(noise_seed).amplify(EnvNode::from_shape(membrane.envelope));

    membrane
        .build()
        .mix(sizzle, 0.7)
        .through(FilterNode::highpass(7_000.0))
}

/// Open hi-hat.
pub fn hihat_open() -> impl GraphNode {
    hat(HIHAT_OPEN, 0x0BE7)
}

/// Closed hi-hat.
pub fn hihat_closed() -> impl GraphNode {
    hat(HIHAT_CLOSED, 0xC105)
}
