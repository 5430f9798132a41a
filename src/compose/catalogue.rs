//! Style catalogue.
//!
//! A fixed set of [`StyleTemplate`]s generated from one seed, so every
//! process sees the same catalogue. A request narrows it with a
//! [`StyleQuery`] and the composer picks one survivor per variation. The
//! chosen style sets the lead's patch from its energy level.

use serde::Serialize;

use crate::dsp::oscillator::OscillatorWaveform;
use crate::seed::SeededRandom;
use crate::theory::{EffectKind, Genre, Mood};
use crate::voices::{LeadPatch, VoiceRole};

pub const CATALOGUE_SEED: i32 = 7_919;
pub const DEFAULT_CATALOGUE_SIZE: usize = 1_000;

/// Lowest and highest energy level.
pub const ENERGY_RANGE: (u8, u8) = (1, 10);

/// Draws per catalogue entry.
const ENTRY_STRIDE: u64 = 8;

const EFFECT_ORDER: [EffectKind; 6] = [
    EffectKind::Reverb,
    EffectKind::Delay,
    EffectKind::Distortion,
    EffectKind::Filter,
    EffectKind::Chorus,
    EffectKind::Phaser,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTemplate {
    /// 1-based.
    pub id: u32,
    pub name: String,
    pub genre: Genre,
    pub sub_genre: &'static str,
    pub mood: Mood,
    pub bpm: u32,
    pub energy: u8,
    pub instruments: Vec<VoiceRole>,
    pub effects: Vec<EffectKind>,
    /// 0 to 99.
    pub popularity: u8,
    pub synthesis: LeadPatch,
}

/// Filter over the catalogue. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleQuery {
    pub genre: Option<Genre>,
    pub mood: Option<Mood>,
    /// Matches within 10 BPM.
    pub bpm: Option<u32>,
    /// Matches within 2 levels.
    pub energy: Option<u8>,
}

impl StyleQuery {
    pub fn matches(&self, style: &StyleTemplate) -> bool {
        self.genre.map_or(true, |genre| style.genre == genre)
            && self.mood.map_or(true, |mood| style.mood == mood)
            && self.bpm.map_or(true, |bpm| style.bpm.abs_diff(bpm) <= 10)
            && self.energy.map_or(true, |energy| style.energy.abs_diff(energy) <= 2)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    templates: Vec<StyleTemplate>,
}

impl Catalogue {
    /// `size` entries drawn from `seed`.
    pub fn generate(seed: i32, size: usize) -> Self {
        let random = SeededRandom::new(seed);
        let templates = (0..size)
            .map(|i| entry(&random, i as u64 * ENTRY_STRIDE, i as u32 + 1))
            .collect();
        Self { templates }
    }

    pub fn standard() -> Self {
        Self::generate(CATALOGUE_SEED, DEFAULT_CATALOGUE_SIZE)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleTemplate> {
        self.templates.iter()
    }

    pub fn get(&self, id: u32) -> Option<&StyleTemplate> {
        let index = (id as usize).checked_sub(1)?;
        self.templates.get(index)
    }

    /// Entries matching `query`, or the whole catalogue when none do.
    pub fn candidates(&self, query: &StyleQuery) -> Vec<&StyleTemplate> {
        let matching: Vec<_> = self.templates.iter().filter(|t| query.matches(t)).collect();
        if matching.is_empty() {
            self.templates.iter().collect()
        } else {
            matching
        }
    }

    /// One candidate picked by draw `index` of `random`. `None` only for an
    /// empty catalogue.
    pub fn select(
        &self,
        query: &StyleQuery,
        random: &SeededRandom,
        index: u64,
    ) -> Option<&StyleTemplate> {
        let candidates = self.candidates(query);
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[random.below(index, candidates.len())])
    }

    /// The `limit` most popular entries, ties broken by id.
    pub fn popular(&self, limit: usize) -> Vec<&StyleTemplate> {
        let mut ranked: Vec<_> = self.templates.iter().collect();
        ranked.sort_by(|a, b| b.popularity.cmp(&a.popularity).then(a.id.cmp(&b.id)));
        ranked.truncate(limit);
        ranked
    }
}

fn entry(random: &SeededRandom, base: u64, id: u32) -> StyleTemplate {
    let genre = Genre::ALL[random.below(base, Genre::ALL.len())];
    let mood = Mood::ALL[random.below(base + 1, Mood::ALL.len())];

    let (min, max) = genre.bpm_range();
    let bpm = min + random.below(base + 2, (max - min + 1) as usize) as u32;
    let (low, high) = ENERGY_RANGE;
    let energy = low + random.below(base + 3, (high - low + 1) as usize) as u8;
    let popularity = random.below(base + 4, 100) as u8;

    let subs = sub_genres(genre);
    let sub_genre = subs[random.below(base + 5, subs.len())];

    let (waveform, detune) = oscillator(genre);
    let roles = instruments(genre);

    StyleTemplate {
        id,
        name: format!("{} {} {}", genre, mood, id),
        genre,
        sub_genre,
        mood,
        bpm,
        energy,
        instruments: roles[..roles.len().min(energy as usize + 2)].to_vec(),
        effects: EFFECT_ORDER[..EFFECT_ORDER.len().min(energy as usize + 1)].to_vec(),
        popularity,
        synthesis: LeadPatch::for_energy(waveform, detune, energy),
    }
}

fn sub_genres(genre: Genre) -> &'static [&'static str] {
    match genre {
        Genre::ProgressiveHouse => &["progressive house", "melodic house", "tropical house"],
        Genre::DeepHouse => &["deep house", "tech house", "lo-fi house"],
        Genre::BigRoom => &["big room", "festival house"],
        Genre::Electro => &["electro house", "complextro", "fidget house"],
        Genre::Techno => &[
            "minimal techno",
            "detroit techno",
            "acid techno",
            "hard techno",
            "melodic techno",
        ],
        Genre::Dubstep => &[
            "melodic dubstep",
            "riddim",
            "future riddim",
            "experimental dubstep",
            "chillstep",
        ],
        Genre::Trance => &[
            "progressive trance",
            "uplifting trance",
            "psytrance",
            "vocal trance",
            "acid trance",
        ],
        Genre::Trap => &["future trap", "hybrid trap", "chill trap", "hard trap", "melodic trap"],
        Genre::FutureBass => &["future bass", "kawaii future bass", "wave"],
        Genre::Hardstyle => &["euphoric hardstyle", "rawstyle"],
    }
}

/// Lead waveform and detune in cents.
fn oscillator(genre: Genre) -> (OscillatorWaveform, f32) {
    match genre {
        Genre::Techno | Genre::Electro => (OscillatorWaveform::Square, 7.0),
        Genre::Dubstep => (OscillatorWaveform::Saw, -7.0),
        Genre::Trance => (OscillatorWaveform::Sine, 0.0),
        _ => (OscillatorWaveform::Saw, 0.0),
    }
}

/// Instruments in the order a style adds them as its energy rises.
fn instruments(genre: Genre) -> &'static [VoiceRole] {
    use VoiceRole::*;
    match genre {
        Genre::Techno | Genre::Electro => {
            &[KickPunch, HihatClosed, SnareRim, AcidBass, Lead, Perc, Stab, Arp]
        }
        Genre::Dubstep => &[KickPunch, SnareClap, Wobble, Lead, Stab, Perc, HihatClosed, Pad],
        Genre::Trance => &[KickPunch, HihatOpen, AcidBass, Lead, Pad, Arp, Supersaw, Pluck],
        Genre::Trap | Genre::FutureBass | Genre::Hardstyle => {
            &[Kick808, SnareClap, HihatClosed, Supersaw, Lead, Pluck, Pad, Perc]
        }
        _ => &[KickPunch, HihatClosed, SnareClap, AcidBass, Pad, Lead, Arp, Supersaw],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn same_seed_same_catalogue() {
        let a = Catalogue::generate(CATALOGUE_SEED, 200);
        assert_eq!(a, Catalogue::generate(CATALOGUE_SEED, 200));
        assert_ne!(a, Catalogue::generate(CATALOGUE_SEED + 1, 200));
        assert_eq!(Catalogue::standard().len(), DEFAULT_CATALOGUE_SIZE);
    }

    #[test]
    fn entries_follow_their_genre_and_energy() {
        let catalogue = Catalogue::standard();
        for style in catalogue.iter() {
            let (min, max) = style.genre.bpm_range();
            assert!((min..=max).contains(&style.bpm), "{}", style.name);
            assert!((1..=10).contains(&style.energy));
            assert!(style.popularity < 100);
            assert_eq!(style.instruments.len(), (style.energy as usize + 2).min(8));
            assert_eq!(style.effects.len(), (style.energy as usize + 1).min(6));
            assert_eq!(style.synthesis.cutoff_hz, 800.0 + 200.0 * style.energy as f32);
            assert!(sub_genres(style.genre).contains(&style.sub_genre));
        }
        assert_eq!(catalogue.get(1).map(|s| s.id), Some(1));
        assert!(catalogue.get(0).is_none());
    }

    #[test]
    fn query_narrows_by_genre_mood_bpm_and_energy() {
        let catalogue = Catalogue::standard();
        let query = StyleQuery {
            genre: Some(Genre::Techno),
            bpm: Some(130),
            energy: Some(8),
            ..StyleQuery::default()
        };
        let candidates = catalogue.candidates(&query);
        assert!(!candidates.is_empty());
        assert!(candidates.len() < catalogue.len());
        for style in candidates {
            assert_eq!(style.genre, Genre::Techno);
            assert!((120..=140).contains(&style.bpm));
            assert!((6..=10).contains(&style.energy));
        }

        let dark = StyleQuery {
            mood: Some(Mood::Dark),
            ..StyleQuery::default()
        };
        assert!(catalogue.candidates(&dark).iter().all(|s| s.mood == Mood::Dark));
    }

    #[test]
    fn impossible_query_falls_back_to_everything() {
        let catalogue = Catalogue::generate(CATALOGUE_SEED, 50);
        let query = StyleQuery {
            bpm: Some(20),
            ..StyleQuery::default()
        };
        assert_eq!(catalogue.candidates(&query).len(), 50);

        let random = SeededRandom::new(3);
        assert!(catalogue.select(&query, &random, 0).is_some());
        assert!(Catalogue::default().select(&query, &random, 0).is_none());
    }

    #[test]
    fn selection_is_seeded() {
        let catalogue = Catalogue::standard();
        let query = StyleQuery {
            genre: Some(Genre::Trance),
            ..StyleQuery::default()
        };
        let pick = |seed: i32| {
            catalogue
                .select(&query, &SeededRandom::new(seed), 4_300)
                .map(|s| s.id)
        };
        assert_eq!(pick(11), pick(11));
        let distinct: std::collections::BTreeSet<_> = (0..20).map(pick).collect();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn popular_is_ranked() {
        let catalogue = Catalogue::standard();
        let top = catalogue.popular(10);
        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].popularity >= w[1].popularity));
        let best = catalogue.iter().map(|s| s.popularity).max();
        assert_eq!(Some(top[0].popularity), best);
        assert_eq!(catalogue.popular(5_000).len(), catalogue.len());
    }
}
