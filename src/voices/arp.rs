//! Arpeggio voice: bright, short saw notes high-passed at 500 Hz.

use crate::dsp::envelope::Adsr;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub const ARP_ENVELOPE: Adsr = Adsr::new(0.01, 0.1, 0.2, 0.3);

pub fn arp() -> impl GraphNode {
    OscNode::sawtooth()
        .amplify(EnvNode::from_shape(ARP_ENVELOPE))
        .through(FilterNode::highpass(500.0).with_q(4.0))
}
