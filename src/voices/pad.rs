//! Pad voice - sustained chord bed.
//!
//! A sine with an 800 ms swell and 1.2 s release, lowpassed at 800 Hz. The
//! pad layer plays one triad per bar, so the long envelope overlaps bar
//! boundaries and the chords blur into each other.

use crate::dsp::envelope::Adsr;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub const PAD_ENVELOPE: Adsr = Adsr::new(0.8, 0.5, 0.7, 1.2);

pub fn pad() -> impl GraphNode {
    OscNode::sine()
        .amplify(EnvNode::from_shape(PAD_ENVELOPE))
        .through(FilterNode::lowpass(800.0).with_q(4.0))
        // Three notes per chord, overlapping across bars
        .gain(0.6)
}
