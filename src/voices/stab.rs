//! Stab - a 1 ms attack, 50 ms square blip through a narrow 2 kHz bandpass.
//! Marks fx impacts together with the 808 kick.

use crate::dsp::envelope::Adsr;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub const STAB_ENVELOPE: Adsr = Adsr::new(0.001, 0.05, 0.01, 0.1);

pub fn stab() -> impl GraphNode {
    OscNode::square()
        .amplify(EnvNode::from_shape(STAB_ENVELOPE))
        .through(FilterNode::bandpass(2_000.0).with_q(12.0))
}
