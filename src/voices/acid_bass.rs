//! Acid bass - a 303-flavoured saw through a screaming lowpass.
//!
//! The resonance asks for Q 15; the filter clamps it to its stable maximum,
//! which still rings hard at 300 Hz.

use crate::dsp::envelope::Adsr;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub const ACID_BASS_ENVELOPE: Adsr = Adsr::new(0.01, 0.2, 0.3, 0.1);

pub fn acid_bass() -> impl GraphNode {
    OscNode::sawtooth()
        .amplify(EnvNode::from_shape(ACID_BASS_ENVELOPE))
        .through(FilterNode::lowpass(300.0).with_q(15.0))
}
