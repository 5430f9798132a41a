//! Wobble bass - the dubstep bass and the fx sweep.
//!
//! A sustained saw into a very resonant 200 Hz lowpass whose cutoff is swung
//! by a sine LFO. The LFO retriggers on every note so each hit starts its
//! wobble from the same place.
//!
//!   [saw] → [env] → [lowpass 200 Hz] → out
//!                         ↑
//!                  [lfo 4 Hz] · 600 Hz

use crate::dsp::envelope::Adsr;
use crate::graph::{
    envelope::EnvNode,
    extensions::NodeExt,
    filter::{FilterNode, FilterParam},
    lfo::LfoNode,
    oscillator::OscNode,
    GraphNode,
};

pub const WOBBLE_ENVELOPE: Adsr = Adsr::new(0.01, 0.05, 0.9, 0.1);
pub const WOBBLE_RATE_HZ: f32 = 4.0;

pub fn wobble() -> impl GraphNode {
    let filter = FilterNode::lowpass(200.0).with_q(20.0).modulate(
        LfoNode::sine(WOBBLE_RATE_HZ).retrigger(),
        FilterParam::Cutoff,
        600.0,
    );

    OscNode::sawtooth()
        .amplify(EnvNode::from_shape(WOBBLE_ENVELOPE))
        .through(filter)
}
