use std::collections::BTreeMap;

use serde::Serialize;

use super::catalogue::StyleTemplate;
use crate::sequencing::{Pitch, StepPattern};
use crate::theory::{
    ChordDegree, Complexity, DrumPattern, EffectKind, Genre, Key, LayerKind, MixingStyle, Mood,
};
use crate::voices::LeadPatch;

/// Bus parameters the automation lanes drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutomationTarget {
    FilterCutoff,
    Volume,
    DelaySend,
    ReverbSend,
}

/// Breakpoint relative to the start of each section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AutomationPoint {
    pub time: f64,
    pub value: f32,
}

impl AutomationPoint {
    pub fn new(time: f64, value: f32) -> Self {
        Self { time, value }
    }
}

/// One step of the fx layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FxHit {
    Sweep,
    Impact,
    Rest,
}

/// Optional layer material. Pitched layers are pitch sequences; the pad is
/// one root-position triad the renderer moves along the progression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Layer {
    Arpeggio(Vec<Pitch>),
    Pad(Vec<Pitch>),
    Lead(Vec<Pitch>),
    Percussion(StepPattern),
    Fx(Vec<FxHit>),
    Granular(Vec<Pitch>),
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Arpeggio(_) => LayerKind::Arpeggio,
            Layer::Pad(_) => LayerKind::Pad,
            Layer::Lead(_) => LayerKind::Lead,
            Layer::Percussion(_) => LayerKind::Percussion,
            Layer::Fx(_) => LayerKind::Fx,
            Layer::Granular(_) => LayerKind::Granular,
        }
    }
}

/// Reshaping applied to a generated melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MelodyVariant {
    Original,
    OctaveUp,
    Reversed,
    /// Even steps first, then odd steps.
    Interleaved,
}

impl MelodyVariant {
    pub const ALL: [MelodyVariant; 4] = [
        MelodyVariant::Original,
        MelodyVariant::OctaveUp,
        MelodyVariant::Reversed,
        MelodyVariant::Interleaved,
    ];

    pub fn apply(self, notes: &[Pitch]) -> Vec<Pitch> {
        match self {
            MelodyVariant::Original => notes.to_vec(),
            MelodyVariant::OctaveUp => notes.iter().map(|p| p.shift_octaves(1)).collect(),
            MelodyVariant::Reversed => notes.iter().rev().copied().collect(),
            MelodyVariant::Interleaved => notes
                .iter()
                .step_by(2)
                .chain(notes.iter().skip(1).step_by(2))
                .copied()
                .collect(),
        }
    }
}

/// An effect in the routed chain with its per-variation nudge in [0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectSlot {
    pub kind: EffectKind,
    pub nudge: f32,
}

/// Everything composed for one variation. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicalTemplate {
    pub genre: Genre,
    pub mood: Mood,
    pub complexity: Complexity,
    pub mixing: MixingStyle,
    pub seed: i32,
    pub bpm: u32,
    pub key: Key,
    pub chord_progression: Vec<ChordDegree>,
    pub melody: Vec<Pitch>,
    pub melody_variant: MelodyVariant,
    pub bass: Vec<Pitch>,
    pub drums: DrumPattern,
    pub layers: BTreeMap<LayerKind, Layer>,
    pub effects: Vec<EffectSlot>,
    pub drum_effects: Vec<EffectKind>,
    pub automation: BTreeMap<AutomationTarget, Vec<AutomationPoint>>,
    /// Prompt keyword whose motif opened the melody.
    pub motif: Option<&'static str>,
    /// Catalogue entry the variation was styled after.
    pub style: Option<StyleTemplate>,
    pub lead_patch: LeadPatch,
}

impl MusicalTemplate {
    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.get(&kind)
    }

    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.layers.contains_key(&kind)
    }

    /// Melody, bass and drums plus every optional layer.
    pub fn layer_count(&self) -> usize {
        3 + self.layers.len()
    }

    pub fn effect_chain(&self) -> Vec<EffectKind> {
        self.effects.iter().map(|slot| slot.kind).collect()
    }

    pub fn curve(&self, target: AutomationTarget) -> &[AutomationPoint] {
        self.automation.get(&target).map(Vec::as_slice).unwrap_or(&[])
    }
}
