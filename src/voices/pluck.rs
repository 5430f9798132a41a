//! Pluck voice - short, percussive melodic sound.
//!
//! Square wave, 10 ms attack and a fast decay to a low sustain, high-passed
//! at 200 Hz so it sits above the bass. Used for granular grains.

use crate::dsp::envelope::Adsr;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub const PLUCK_ENVELOPE: Adsr = Adsr::new(0.01, 0.1, 0.1, 0.5);

pub fn pluck() -> impl GraphNode {
    OscNode::square()
        .amplify(EnvNode::from_shape(PLUCK_ENVELOPE))
        .through(FilterNode::highpass(200.0).with_q(2.0))
}
