//! Sequence composer: request + seed → [`MusicalTemplate`].
//!
//! Every decision is a draw from [`SeededRandom`] at a fixed index, so a
//! template is a pure function of the request and the variation seed.
//! `var` below is the 1-based variation number.
//!
//! | Draw | Index |
//! | --- | --- |
//! | base tempo, tempo jitter | 0, 1 |
//! | key | 10 |
//! | progression | var |
//! | melody length | var + 50 |
//! | melody degree / octave of note i | i + var / i + var + 100 |
//! | bass octave shift of step i | i + var + 200 |
//! | aggressive kick fill, chill hat thinning | i + 500, i + 600 |
//! | drum flip of step i | i + var + channel name length |
//! | percussion, fx sweep, fx impact | i + var + 1000 / 2000 / 3000 |
//! | granular degree / octave | var + 4000 + i / var + 4100 + i |
//! | effect nudge of slot k | var + k |
//! | filter / volume automation | i + var / i + var + 100 |
//! | melody variant | var + 4200 |
//! | catalogue style | var + 4300 |

pub mod catalogue;
pub mod template;

use std::collections::BTreeMap;

use log::debug;

pub use catalogue::{Catalogue, StyleQuery, StyleTemplate};
pub use template::{
    AutomationPoint, AutomationTarget, EffectSlot, FxHit, Layer, MelodyVariant, MusicalTemplate,
};

use crate::generate::GenerationRequest;
use crate::seed::SeededRandom;
use crate::sequencing::{Pitch, StepPattern};
use crate::theory::{
    motif::prompt_motif, ChordDegree, DrumChannel, DrumPattern, EffectKind, Key, LayerKind,
    MixingStyle, Mood,
};
use crate::voices::LeadPatch;

pub const MIN_BPM: u32 = 60;
pub const MAX_BPM: u32 = 220;

/// Composes one variation of a request.
pub struct Composer<'a> {
    request: &'a GenerationRequest,
    catalogue: Option<&'a Catalogue>,
    random: SeededRandom,
    var: u64,
}

impl<'a> Composer<'a> {
    pub fn new(request: &'a GenerationRequest, seed: i32, variation_number: u32) -> Self {
        Self {
            request,
            catalogue: None,
            random: SeededRandom::new(seed),
            var: variation_number.max(1) as u64,
        }
    }

    /// Pick a style from `catalogue` for this variation.
    pub fn with_catalogue(mut self, catalogue: &'a Catalogue) -> Self {
        self.catalogue = Some(catalogue);
        self
    }

    fn r(&self, index: u64) -> f64 {
        self.random.next(index)
    }

    pub fn compose(&self) -> MusicalTemplate {
        let key = self.key();
        let melody = self.melody(&key);
        let motif = prompt_motif(&self.request.prompt).map(|(keyword, _)| keyword);
        let style = self.style().cloned();

        let template = MusicalTemplate {
            genre: self.request.genre,
            mood: self.request.mood,
            complexity: self.request.complexity,
            mixing: self.request.mixing,
            seed: self.random.seed(),
            bpm: self.bpm(),
            key,
            chord_progression: self.progression(),
            bass: self.bass(&key),
            drums: self.drums(),
            layers: self.layers(&key, &melody),
            effects: self.effects(),
            drum_effects: self.request.mixing.drum_chain().to_vec(),
            automation: self.automation(),
            melody,
            melody_variant: self.melody_variant(),
            motif,
            lead_patch: style.as_ref().map_or(LeadPatch::DEFAULT, |s| s.synthesis),
            style,
        };

        debug!(
            "composed seed {}: {} bpm, {}, progression {:?}, {} layers, effects {:?}, style {:?}",
            template.seed,
            template.bpm,
            template.key,
            template
                .chord_progression
                .iter()
                .map(ChordDegree::to_string)
                .collect::<Vec<_>>(),
            template.layer_count(),
            template.effect_chain(),
            template.style.as_ref().map(|s| &s.name)
        );

        template
    }

    /// Genre range base plus complexity jitter, unless overridden.
    pub fn bpm(&self) -> u32 {
        if let Some(bpm) = self.request.bpm {
            return bpm.clamp(MIN_BPM, MAX_BPM);
        }

        let (min, max) = self.request.genre.bpm_range();
        let base = min as f64 + (self.r(0) * (max - min) as f64).floor();

        let jitter = self.request.complexity.bpm_jitter() as f64;
        let offset = (self.random.bipolar(1) * jitter).round();

        ((base + offset) as u32).clamp(MIN_BPM, MAX_BPM)
    }

    /// Explicit key if given, otherwise one of the mood's candidates.
    pub fn key(&self) -> Key {
        if let Some(key) = self.request.key {
            return key;
        }
        let candidates = self.request.mood.candidate_keys();
        candidates[self.random.below(10, candidates.len())]
    }

    pub fn progression(&self) -> Vec<ChordDegree> {
        let progressions = self.request.genre.progressions();
        progressions[self.random.below(self.var, progressions.len())].to_vec()
    }

    /// 8 to 15 notes, reshaped by the variation's [`MelodyVariant`]. A
    /// prompt keyword motif, if any, then sets the opening.
    pub fn melody(&self, key: &Key) -> Vec<Pitch> {
        let length = 8 + (self.r(self.var + 50) * 8.0).floor() as usize;
        let degrees = key.scale().len();

        let generated: Vec<Pitch> = (0..length)
            .map(|i| {
                let index = i as u64 + self.var;
                let degree = self.random.below(index, degrees) as i32;
                let octave = 4 + (self.r(index + 100) * 2.0).floor() as i32;
                key.pitch(degree, octave)
            })
            .collect();
        let mut melody = self.melody_variant().apply(&generated);

        if let Some((_, motif)) = prompt_motif(&self.request.prompt) {
            for (note, (degree, octave)) in melody.iter_mut().zip(motif.iter()) {
                *note = key.pitch(*degree, 4 + octave);
            }
        }
        melody
    }

    pub fn melody_variant(&self) -> MelodyVariant {
        MelodyVariant::ALL[self.random.below(self.var + 4200, MelodyVariant::ALL.len())]
    }

    /// Catalogue entry for this variation, narrowed by the request's genre,
    /// mood, explicit tempo and energy.
    pub fn style(&self) -> Option<&'a StyleTemplate> {
        let query = StyleQuery {
            genre: Some(self.request.genre),
            mood: Some(self.request.mood),
            bpm: self.request.bpm,
            energy: self.request.energy,
        };
        self.catalogue?.select(&query, &self.random, self.var + 4300)
    }

    /// Genre template in the key, with seeded octave jumps.
    pub fn bass(&self, key: &Key) -> Vec<Pitch> {
        let shift = if self.var % 2 == 0 { 1 } else { -1 };

        self.request
            .genre
            .bass_template()
            .iter()
            .enumerate()
            .map(|(i, &(degree, octave))| {
                let jump = self.r(i as u64 + self.var + 200) > 0.8;
                let octave = if jump { octave + shift } else { octave };
                key.pitch(degree, octave.clamp(1, 6))
            })
            .collect()
    }

    pub fn drums(&self) -> DrumPattern {
        let mut lanes: Vec<(DrumChannel, &str)> = self.request.genre.drum_template().to_vec();
        if self.request.complexity.extra_drum_lanes() {
            lanes.push((DrumChannel::Kick808, "x..x..x."));
            lanes.push((DrumChannel::Perc, ".x..x..x"));
        }

        let mut pattern = DrumPattern::new();
        for (channel, steps) in lanes {
            // Templates are covered by tests; a bad one would come out silent
            let mut lane: StepPattern = steps.parse().unwrap_or_else(|_| StepPattern::silent(8));
            self.bias_for_mood(channel, &mut lane);
            self.flip_steps(channel, &mut lane);
            pattern.insert(channel, lane);
        }
        pattern
    }

    fn bias_for_mood(&self, channel: DrumChannel, lane: &mut StepPattern) {
        for i in 0..lane.len() {
            let step = i as u64;
            match (self.request.mood, channel) {
                (Mood::Aggressive, DrumChannel::Kick) if !lane.is_hit(i) => {
                    if self.random.chance(step + 500, 0.2) {
                        lane.set(i, true);
                    }
                }
                (Mood::Chill, DrumChannel::Hihat) if lane.is_hit(i) => {
                    if self.random.chance(step + 600, 0.3) {
                        lane.set(i, false);
                    }
                }
                _ => {}
            }
        }
    }

    fn flip_steps(&self, channel: DrumChannel, lane: &mut StepPattern) {
        let offset = self.var + channel.slug().len() as u64;
        for i in 0..lane.len() {
            let draw = self.r(i as u64 + offset);
            let hit = lane.is_hit(i);
            if (!hit && draw > 0.9) || (hit && draw < 0.1) {
                lane.toggle(i);
            }
        }
    }

    pub fn layers(&self, key: &Key, melody: &[Pitch]) -> BTreeMap<LayerKind, Layer> {
        self.request
            .complexity
            .layers()
            .iter()
            .map(|kind| (*kind, self.layer(*kind, key, melody)))
            .collect()
    }

    fn layer(&self, kind: LayerKind, key: &Key, melody: &[Pitch]) -> Layer {
        let var = self.var;
        match kind {
            LayerKind::Arpeggio => {
                let octave = 4 + (var % 2) as i32;
                Layer::Arpeggio(
                    self.request
                        .complexity
                        .arpeggio()
                        .iter()
                        .map(|degree| key.pitch(*degree, octave))
                        .collect(),
                )
            }
            LayerKind::Pad => {
                let octave = (3 + (var / 2) as i32).min(5);
                Layer::Pad([0, 2, 4].iter().map(|d| key.pitch(*d, octave)).collect())
            }
            LayerKind::Lead => Layer::Lead(melody.iter().map(|p| p.shift_octaves(1)).collect()),
            LayerKind::Percussion => Layer::Percussion(StepPattern::from_steps(
                (0..16).map(|i| self.r(i + var + 1000) > 0.7).collect(),
            )),
            LayerKind::Fx => Layer::Fx(
                (0..8)
                    .map(|i| {
                        if self.r(i + var + 2000) > 0.8 {
                            FxHit::Sweep
                        } else if self.r(i + var + 3000) > 0.9 {
                            FxHit::Impact
                        } else {
                            FxHit::Rest
                        }
                    })
                    .collect(),
            ),
            LayerKind::Granular => Layer::Granular(
                (0..4)
                    .map(|i| {
                        let degree = self.random.below(var + 4000 + i, key.scale().len()) as i32;
                        let octave = 5 + (self.r(var + 4100 + i) * 2.0).floor() as i32;
                        key.pitch(degree, octave)
                    })
                    .collect(),
            ),
        }
    }

    /// Explicit list as given, or preset + genre defaults + complexity
    /// extras with the mixing-style inserts applied.
    pub fn effects(&self) -> Vec<EffectSlot> {
        let chain = match &self.request.effects {
            Some(explicit) => explicit.clone(),
            None => generated_chain(self.request),
        };

        chain
            .into_iter()
            .enumerate()
            .map(|(k, kind)| EffectSlot {
                kind,
                nudge: self.r(self.var + k as u64) as f32,
            })
            .collect()
    }

    pub fn automation(&self) -> BTreeMap<AutomationTarget, Vec<AutomationPoint>> {
        let var = self.var;
        let filter = (0..8)
            .map(|i| AutomationPoint::new(i as f64 * 0.5, (200.0 + 2000.0 * self.r(i + var)) as f32))
            .collect();
        let volume = (0..4)
            .map(|i| AutomationPoint::new(i as f64, (0.5 + 0.5 * self.r(i + var + 100)) as f32))
            .collect();
        let delay = vec![
            AutomationPoint::new(0.0, 0.0),
            AutomationPoint::new(2.0, 0.3),
            AutomationPoint::new(4.0, 0.0),
        ];
        let reverb = vec![
            AutomationPoint::new(0.0, 0.2),
            AutomationPoint::new(3.0, 0.8),
            AutomationPoint::new(6.0, 0.2),
        ];

        BTreeMap::from([
            (AutomationTarget::FilterCutoff, filter),
            (AutomationTarget::Volume, volume),
            (AutomationTarget::DelaySend, delay),
            (AutomationTarget::ReverbSend, reverb),
        ])
    }
}

fn generated_chain(request: &GenerationRequest) -> Vec<EffectKind> {
    let mut chain: Vec<EffectKind> = Vec::new();
    let sources = [
        request.mixing.preset(),
        request.genre.default_effects(),
        request.complexity.extra_effects(),
    ];
    for kind in sources.iter().flat_map(|s| s.iter()) {
        if !chain.contains(kind) {
            chain.push(*kind);
        }
    }

    let mut move_to = |kind: EffectKind, front: bool| {
        chain.retain(|k| *k != kind);
        if front {
            chain.insert(0, kind);
        } else {
            chain.push(kind);
        }
    };

    match request.mixing {
        MixingStyle::Compressed => move_to(EffectKind::Compressor, true),
        MixingStyle::Saturated => move_to(EffectKind::Waveshaper, true),
        MixingStyle::Vintage => move_to(EffectKind::Bitcrusher, false),
        MixingStyle::Clean => {}
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theory::{ArrangementStyle, Complexity, Genre};
    use pretty_assertions::assert_eq;

    fn request(genre: Genre, mood: Mood, complexity: Complexity) -> GenerationRequest {
        GenerationRequest::builder(genre, mood)
            .prompt("underground minimal")
            .duration_secs(30.0)
            .complexity(complexity)
            .build()
    }

    #[test]
    fn same_inputs_same_template() {
        let req = request(Genre::Techno, Mood::Dark, Complexity::Complex);
        let a = Composer::new(&req, 1234, 1).compose();
        let b = Composer::new(&req, 1234, 1).compose();
        assert_eq!(a, b);
    }

    #[test]
    fn bpm_stays_in_range_plus_jitter() {
        for genre in Genre::ALL {
            for complexity in Complexity::ALL {
                let req = request(*genre, Mood::Energetic, *complexity);
                let (min, max) = genre.bpm_range();
                let jitter = complexity.bpm_jitter();
                for seed in [1, 77, 9_999, 123_456_789] {
                    let bpm = Composer::new(&req, seed, 1).bpm();
                    assert!(bpm + jitter >= min && bpm <= max + jitter, "{} {}", genre, bpm);
                }
            }
        }
    }

    #[test]
    fn simple_has_no_jitter() {
        let req = request(Genre::Trance, Mood::Uplifting, Complexity::Simple);
        for seed in 0..50 {
            let bpm = Composer::new(&req, seed, 1).bpm();
            assert!((132..=140).contains(&bpm));
        }
    }

    #[test]
    fn explicit_bpm_and_key_win() {
        let key: Key = "D dorian".parse().unwrap();
        let req = GenerationRequest::builder(Genre::Techno, Mood::Dark)
            .bpm(174)
            .key(key)
            .build();
        let template = Composer::new(&req, 5, 1).compose();
        assert_eq!(template.bpm, 174);
        assert_eq!(template.key, key);
    }

    #[test]
    fn key_comes_from_mood() {
        let req = request(Genre::Techno, Mood::Dark, Complexity::Simple);
        for seed in [3, 30, 300, 3_000] {
            let key = Composer::new(&req, seed, 1).key();
            assert!(Mood::Dark.candidate_keys().contains(&key));
        }
    }

    #[test]
    fn melody_length_and_motif() {
        let req = GenerationRequest::builder(Genre::Trance, Mood::Uplifting)
            .prompt("massive ANTHEM")
            .build();
        let composer = Composer::new(&req, 42, 1);
        let key = Key::sharp(0, crate::theory::Scale::Major);
        let melody = composer.melody(&key);

        assert!((8..16).contains(&melody.len()));
        let opening: Vec<String> = melody[..4].iter().map(Pitch::to_string).collect();
        assert_eq!(opening, vec!["C4", "E4", "G4", "C5"]);
        assert_eq!(composer.compose().motif, Some("anthem"));
    }

    #[test]
    fn bass_stays_in_octave_bounds() {
        let req = request(Genre::Techno, Mood::Dark, Complexity::Simple);
        for var in 1..6 {
            let composer = Composer::new(&req, 2024, var);
            let bass = composer.bass(&composer.key());
            assert_eq!(bass.len(), 8);
            assert!(bass.iter().all(|p| (1..=6).contains(&p.octave())));
        }
    }

    #[test]
    fn complexity_tiers_add_layers() {
        let simple = Composer::new(&request(Genre::Trance, Mood::Chill, Complexity::Simple), 7, 1)
            .compose();
        let experimental = Composer::new(
            &request(Genre::Trance, Mood::Chill, Complexity::Experimental),
            7,
            1,
        )
        .compose();

        assert_eq!(simple.layers.len(), Complexity::Simple.layers().len());
        assert_eq!(experimental.layers.len(), 6);
        assert!(experimental.layer_count() > simple.layer_count());
        assert!(experimental.drums.get(DrumChannel::Kick808).is_some());
        assert!(simple.drums.get(DrumChannel::Perc).is_none());
    }

    #[test]
    fn drums_stay_close_to_the_template() {
        let req = request(Genre::Techno, Mood::Energetic, Complexity::Simple);
        let template: StepPattern = "x...x...".parse().unwrap();
        let mut differing = 0;
        for seed in 0..20 {
            let drums = Composer::new(&req, seed * 97, 1).drums();
            let kick = drums.get(DrumChannel::Kick).unwrap();
            assert_eq!(kick.len(), 8);
            differing += (0..8).filter(|i| kick.is_hit(*i) != template.is_hit(*i)).count();
        }
        // Roughly one step in ten flips
        assert!(differing < 60, "{} of 160 steps flipped", differing);
    }

    #[test]
    fn generated_chain_order() {
        let req = GenerationRequest::builder(Genre::Techno, Mood::Dark)
            .complexity(Complexity::Complex)
            .mixing(MixingStyle::Vintage)
            .build();
        use EffectKind::*;
        assert_eq!(
            generated_chain(&req),
            vec![Filter, Reverb, Delay, Distortion, Compressor, Tremolo, AutoWah, Bitcrusher]
        );

        let req = GenerationRequest::builder(Genre::Dubstep, Mood::Dark)
            .complexity(Complexity::Experimental)
            .mixing(MixingStyle::Saturated)
            .build();
        let chain = generated_chain(&req);
        assert_eq!(chain[0], Waveshaper);
        assert_eq!(chain.iter().filter(|k| **k == Distortion).count(), 1);
    }

    #[test]
    fn explicit_effects_are_kept_verbatim() {
        let req = GenerationRequest::builder(Genre::Trance, Mood::Uplifting)
            .effects(vec![EffectKind::Granular, EffectKind::Delay])
            .mixing(MixingStyle::Compressed)
            .arrangement(ArrangementStyle::ContinuousMix)
            .build();
        let slots = Composer::new(&req, 11, 2).effects();
        let kinds: Vec<_> = slots.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![EffectKind::Granular, EffectKind::Delay]);
        assert!(slots.iter().all(|s| (0.0..1.0).contains(&s.nudge)));
    }

    #[test]
    fn automation_lanes() {
        let req = request(Genre::Trance, Mood::Uplifting, Complexity::Medium);
        let template = Composer::new(&req, 8, 1).compose();
        assert_eq!(template.curve(AutomationTarget::FilterCutoff).len(), 8);
        assert_eq!(template.curve(AutomationTarget::Volume).len(), 4);
        assert!(template
            .curve(AutomationTarget::FilterCutoff)
            .iter()
            .all(|p| (200.0..2200.0).contains(&p.value)));
    }
}
