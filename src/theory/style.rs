use serde::Serialize;

use super::effects::EffectKind;
use super::slug_enum;

slug_enum! {
    /// How much material a track carries.
    pub enum Complexity ("complexity") {
        Simple => "simple",
        Medium => "medium",
        Complex => "complex",
        Experimental => "experimental",
    }
}

slug_enum! {
    /// Master treatment, as an effect preset plus bus inserts.
    pub enum MixingStyle ("mixing style") {
        Clean => "clean",
        Compressed => "compressed",
        Saturated => "saturated",
        Vintage => "vintage",
    }
}

slug_enum! {
    pub enum ArrangementStyle ("arrangement style") {
        IntroBuildupDropOutro => "intro-buildup-drop-outro",
        VerseChorus => "verse-chorus",
        ContinuousMix => "continuous-mix",
        Experimental => "experimental",
    }
}

slug_enum! {
    /// Optional layers above melody, bass and drums.
    pub enum LayerKind ("layer") {
        Arpeggio => "arpeggio",
        Pad => "pad",
        Lead => "lead",
        Percussion => "percussion",
        Fx => "fx",
        Granular => "granular",
    }
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::Medium
    }
}

impl Default for MixingStyle {
    fn default() -> Self {
        MixingStyle::Clean
    }
}

impl Default for ArrangementStyle {
    fn default() -> Self {
        ArrangementStyle::IntroBuildupDropOutro
    }
}

impl Complexity {
    /// Seed fold multiplier as a fraction over two: 1, 1.5, 2, 3.
    pub fn seed_numerator(self) -> i64 {
        match self {
            Complexity::Simple => 2,
            Complexity::Medium => 3,
            Complexity::Complex => 4,
            Complexity::Experimental => 6,
        }
    }

    /// Largest BPM offset either side of the base tempo.
    pub fn bpm_jitter(self) -> u32 {
        match self {
            Complexity::Simple => 0,
            Complexity::Medium => 3,
            Complexity::Complex => 5,
            Complexity::Experimental => 10,
        }
    }

    /// Arpeggio contour in scale degrees.
    pub fn arpeggio(self) -> &'static [i32] {
        match self {
            Complexity::Simple => &[0, 2, 4, 2],
            Complexity::Medium => &[0, 2, 4, 6, 4, 2],
            Complexity::Complex => &[0, 2, 4, 6, 4, 2, 0, 4],
            Complexity::Experimental => &[0, 3, 1, 4, 2, 5, 1, 3],
        }
    }

    /// Layers generated at this tier. Each tier adds one set to the last.
    pub fn layers(self) -> &'static [LayerKind] {
        use LayerKind::*;

        match self {
            Complexity::Simple => &[],
            Complexity::Medium => &[Arpeggio, Pad],
            Complexity::Complex => &[Arpeggio, Pad, Lead, Percussion],
            Complexity::Experimental => &[Arpeggio, Pad, Lead, Percussion, Fx, Granular],
        }
    }

    /// Effects appended to a generated chain.
    pub fn extra_effects(self) -> &'static [EffectKind] {
        use EffectKind::*;

        match self {
            Complexity::Simple | Complexity::Medium => &[],
            Complexity::Complex => &[Tremolo, AutoWah],
            Complexity::Experimental => &[Tremolo, AutoWah, PitchShift, Waveshaper],
        }
    }

    /// Whether the extra `kick808` and `perc` drum lanes are added.
    pub fn extra_drum_lanes(self) -> bool {
        matches!(self, Complexity::Complex | Complexity::Experimental)
    }
}

impl MixingStyle {
    pub fn preset(self) -> &'static [EffectKind] {
        use EffectKind::*;

        match self {
            MixingStyle::Clean => &[Reverb, Chorus],
            MixingStyle::Compressed => &[Compressor, Reverb, Chorus],
            MixingStyle::Saturated => &[Distortion, Compressor, Reverb],
            MixingStyle::Vintage => &[Bitcrusher, Filter, Reverb, Delay],
        }
    }

    /// Drum bus chain.
    pub fn drum_chain(self) -> &'static [EffectKind] {
        use EffectKind::*;

        match self {
            MixingStyle::Saturated => &[Compressor, Distortion],
            MixingStyle::Vintage => &[Compressor, Bitcrusher],
            MixingStyle::Clean | MixingStyle::Compressed => &[Compressor],
        }
    }
}

/// One section of an arrangement template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionTemplate {
    pub name: &'static str,
    pub duration_secs: f64,
    /// 0.0 - 1.0
    pub energy: f32,
}

const fn section(name: &'static str, duration_secs: f64, energy: f32) -> SectionTemplate {
    SectionTemplate {
        name,
        duration_secs,
        energy,
    }
}

impl ArrangementStyle {
    pub fn sections(self) -> &'static [SectionTemplate] {
        const INTRO_BUILDUP_DROP_OUTRO: [SectionTemplate; 7] = [
            section("intro", 8.0, 0.2),
            section("buildup", 16.0, 0.7),
            section("drop", 32.0, 1.0),
            section("breakdown", 16.0, 0.4),
            section("buildup2", 16.0, 0.8),
            section("drop2", 32.0, 1.0),
            section("outro", 16.0, 0.1),
        ];
        const VERSE_CHORUS: [SectionTemplate; 8] = [
            section("intro", 8.0, 0.3),
            section("verse1", 16.0, 0.5),
            section("chorus1", 16.0, 0.9),
            section("verse2", 16.0, 0.6),
            section("chorus2", 16.0, 1.0),
            section("bridge", 8.0, 0.4),
            section("chorus3", 16.0, 1.0),
            section("outro", 8.0, 0.2),
        ];
        const CONTINUOUS_MIX: [SectionTemplate; 5] = [
            section("phase1", 20.0, 0.6),
            section("phase2", 20.0, 0.8),
            section("phase3", 20.0, 1.0),
            section("phase4", 20.0, 0.9),
            section("phase5", 20.0, 0.7),
        ];
        const EXPERIMENTAL: [SectionTemplate; 6] = [
            section("glitch-intro", 6.0, 0.3),
            section("texture", 12.0, 0.5),
            section("chaos", 16.0, 0.9),
            section("void", 10.0, 0.2),
            section("climax", 20.0, 1.0),
            section("dissolve", 8.0, 0.15),
        ];

        match self {
            ArrangementStyle::IntroBuildupDropOutro => &INTRO_BUILDUP_DROP_OUTRO,
            ArrangementStyle::VerseChorus => &VERSE_CHORUS,
            ArrangementStyle::ContinuousMix => &CONTINUOUS_MIX,
            ArrangementStyle::Experimental => &EXPERIMENTAL,
        }
    }

    pub fn nominal_secs(self) -> f64 {
        self.sections().iter().map(|s| s.duration_secs).sum()
    }
}
