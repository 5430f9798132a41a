//! Lead voice - carries the melody.
//!
//! By default a square wave through a 1.5 kHz bandpass: hollow and nasal,
//! cuts through a busy mix without the low end fighting the bass. A style
//! template can swap in its own [`LeadPatch`].

use serde::Serialize;

use crate::dsp::envelope::Adsr;
use crate::dsp::filter::FilterType;
use crate::dsp::oscillator::OscillatorWaveform;
use crate::graph::{
    envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode, GraphNode,
};

pub const LEAD_ENVELOPE: Adsr = Adsr::new(0.05, 0.1, 0.6, 0.4);

/// Oscillator, filter and envelope of the lead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    pub waveform: OscillatorWaveform,
    pub detune_cents: f32,
    pub filter: FilterType,
    pub cutoff_hz: f32,
    pub q: f32,
    pub envelope: Adsr,
}

impl LeadPatch {
    pub const DEFAULT: LeadPatch = LeadPatch {
        waveform: OscillatorWaveform::Square,
        detune_cents: 0.0,
        filter: FilterType::BandPass,
        cutoff_hz: 1_500.0,
        q: 8.0,
        envelope: LEAD_ENVELOPE,
    };

    /// Lowpass patch whose brightness and length follow `energy` (1-10).
    pub fn for_energy(waveform: OscillatorWaveform, detune_cents: f32, energy: u8) -> Self {
        let e = energy.clamp(1, 10) as f32;
        LeadPatch {
            waveform,
            detune_cents,
            filter: FilterType::LowPass,
            cutoff_hz: 800.0 + 200.0 * e,
            q: 1.0 + 0.5 * e,
            envelope: Adsr::new(0.1 / e, 0.2, (0.3 + 0.1 * e).min(1.0), 0.5 + 0.2 * e),
        }
    }
}

impl Default for LeadPatch {
    fn default() -> Self {
        Self::DEFAULT
    }
}

pub fn lead() -> impl GraphNode {
    lead_with(LeadPatch::DEFAULT)
}

pub fn lead_with(patch: LeadPatch) -> impl GraphNode {
    OscNode::from_waveform(patch.waveform)
        .with_detune(patch.detune_cents)
        .amplify(EnvNode::from_shape(patch.envelope))
        .through(FilterNode::new(patch.filter, patch.cutoff_hz).with_q(patch.q))
}
