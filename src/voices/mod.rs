//! Voice roles and the node graphs that play them.
//!
//! Every instrument the renderer triggers is one of fifteen fixed roles:
//! eight melodic voices and seven drum voices. Each role has its own module
//! with a constructor returning `impl GraphNode`; [`VoiceRole::build`] boxes
//! them so a bank can hold every role side by side.
//!
//! # Example
//!
//! ```ignore
//! use edm_forge::voices::{self, VoiceRole};
//!
//! let lead = voices::lead();
//! let kick = VoiceRole::Kick808.build();
//! ```

use std::fmt;

use serde::Serialize;

use crate::dsp::envelope::Adsr;
use crate::graph::{extensions::NodeExt, GraphNode};

mod acid_bass;
mod arp;
mod hihat;
mod kick;
mod lead;
mod membrane;
mod pad;
mod perc;
mod pluck;
mod snare;
mod stab;
mod supersaw;
mod wobble;

pub use acid_bass::acid_bass;
pub use arp::arp;
pub use hihat::{hihat_closed, hihat_open};
pub use kick::{kick_808, kick_punch};
pub use lead::{lead, lead_with, LeadPatch};
pub use membrane::Membrane;
pub use pad::pad;
pub use perc::perc;
pub use pluck::pluck;
pub use snare::{snare_clap, snare_rim};
pub use stab::stab;
pub use supersaw::supersaw;
pub use wobble::wobble;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceRole {
    Supersaw,
    Pluck,
    Pad,
    AcidBass,
    Lead,
    Arp,
    Wobble,
    Stab,
    Kick808,
    KickPunch,
    SnareClap,
    SnareRim,
    HihatOpen,
    HihatClosed,
    Perc,
}

impl VoiceRole {
    pub const MELODIC: [VoiceRole; 8] = [
        VoiceRole::Supersaw,
        VoiceRole::Pluck,
        VoiceRole::Pad,
        VoiceRole::AcidBass,
        VoiceRole::Lead,
        VoiceRole::Arp,
        VoiceRole::Wobble,
        VoiceRole::Stab,
    ];

    pub const DRUMS: [VoiceRole; 7] = [
        VoiceRole::Kick808,
        VoiceRole::KickPunch,
        VoiceRole::SnareClap,
        VoiceRole::SnareRim,
        VoiceRole::HihatOpen,
        VoiceRole::HihatClosed,
        VoiceRole::Perc,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VoiceRole::Supersaw => "supersaw",
            VoiceRole::Pluck => "pluck",
            VoiceRole::Pad => "pad",
            VoiceRole::AcidBass => "acid-bass",
            VoiceRole::Lead => "lead",
            VoiceRole::Arp => "arp",
            VoiceRole::Wobble => "wobble",
            VoiceRole::Stab => "stab",
            VoiceRole::Kick808 => "kick-808",
            VoiceRole::KickPunch => "kick-punch",
            VoiceRole::SnareClap => "snare-clap",
            VoiceRole::SnareRim => "snare-rim",
            VoiceRole::HihatOpen => "hihat-open",
            VoiceRole::HihatClosed => "hihat-closed",
            VoiceRole::Perc => "perc",
        }
    }

    pub fn is_drum(self) -> bool {
        Self::DRUMS.contains(&self)
    }

    /// Amplitude envelope of the role.
    pub fn envelope(self) -> Adsr {
        match self {
            VoiceRole::Supersaw => supersaw::SUPERSAW_ENVELOPE,
            VoiceRole::Pluck => pluck::PLUCK_ENVELOPE,
            VoiceRole::Pad => pad::PAD_ENVELOPE,
            VoiceRole::AcidBass => acid_bass::ACID_BASS_ENVELOPE,
            VoiceRole::Lead => lead::LEAD_ENVELOPE,
            VoiceRole::Arp => arp::ARP_ENVELOPE,
            VoiceRole::Wobble => wobble::WOBBLE_ENVELOPE,
            VoiceRole::Stab => stab::STAB_ENVELOPE,
            VoiceRole::Kick808 => kick::KICK_808.envelope,
            VoiceRole::KickPunch => kick::KICK_PUNCH.envelope,
            VoiceRole::SnareClap => snare::SNARE_CLAP.envelope,
            VoiceRole::SnareRim => snare::SNARE_RIM.envelope,
            VoiceRole::HihatOpen => hihat::HIHAT_OPEN.envelope,
            VoiceRole::HihatClosed => hihat::HIHAT_CLOSED.envelope,
            VoiceRole::Perc => perc::PERC.envelope,
        }
    }

    /// Voices allocated per role. Pads hold three-note chords that overlap
    /// across bars; drums rarely need more than a couple of tails.
    pub fn polyphony(self) -> usize {
        match self {
            VoiceRole::Pad => 8,
            VoiceRole::Supersaw | VoiceRole::Arp | VoiceRole::Pluck => 6,
            VoiceRole::Kick808 | VoiceRole::HihatOpen => 3,
            role if role.is_drum() => 2,
            _ => 4,
        }
    }

    pub fn build(self) -> Box<dyn GraphNode> {
        match self {
            VoiceRole::Supersaw => supersaw().boxed(),
            VoiceRole::Pluck => pluck().boxed(),
            VoiceRole::Pad => pad().boxed(),
            VoiceRole::AcidBass => acid_bass().boxed(),
            VoiceRole::Lead => lead().boxed(),
            VoiceRole::Arp => arp().boxed(),
            VoiceRole::Wobble => wobble().boxed(),
            VoiceRole::Stab => stab().boxed(),
            VoiceRole::Kick808 => kick_808().boxed(),
            VoiceRole::KickPunch => kick_punch().boxed(),
            VoiceRole::SnareClap => snare_clap().boxed(),
            VoiceRole::SnareRim => snare_rim().boxed(),
            VoiceRole::HihatOpen => hihat_open().boxed(),
            VoiceRole::HihatClosed => hihat_closed().boxed(),
            VoiceRole::Perc => perc().boxed(),
        }
    }
}

/// What a bank builds a role's voices from: the role's stock graph, or the
/// lead under a specific patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Patch {
    Stock(VoiceRole),
    Lead(LeadPatch),
}

impl Patch {
    pub fn role(&self) -> VoiceRole {
        match self {
            Patch::Stock(role) => *role,
            Patch::Lead(_) => VoiceRole::Lead,
        }
    }

    pub fn build(&self) -> Box<dyn GraphNode> {
        match self {
            Patch::Stock(role) => role.build(),
            Patch::Lead(patch) => lead_with(*patch).boxed(),
        }
    }
}

impl fmt::Display for VoiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
