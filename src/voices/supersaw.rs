//! Supersaw - the trance and big-room lead.
//!
//! Seven sawtooth oscillators spread across 40 cents, a slow-ish attack and a
//! long release, through a resonant lowpass at 1.2 kHz. Plays the lead layer
//! (the melody an octave up) on complex and experimental tracks.

use crate::dsp::envelope::Adsr;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::SupersawNode,
    GraphNode,
};

pub const SUPERSAW_ENVELOPE: Adsr = Adsr::new(0.1, 0.3, 0.5, 0.8);

pub fn supersaw() -> impl GraphNode {
    SupersawNode::new(7, 40.0)
        .amplify(EnvNode::from_shape(SUPERSAW_ENVELOPE))
        .through(FilterNode::lowpass(1_200.0).with_q(8.0))
}
