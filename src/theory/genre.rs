use super::chord::ChordDegree;
use super::drums::DrumChannel;
use super::effects::EffectKind;
use super::slug_enum;

slug_enum! {
    /// Supported EDM subgenres.
    pub enum Genre ("genre") {
        ProgressiveHouse => "progressive-house",
        FutureBass => "future-bass",
        BigRoom => "big-room",
        Techno => "techno",
        Trance => "trance",
        Dubstep => "dubstep",
        Trap => "trap",
        Hardstyle => "hardstyle",
        DeepHouse => "deep-house",
        Electro => "electro",
    }
}

/// Four-chord loop.
pub type Progression = [ChordDegree; 4];

/// Scale degree and octave of one bass step, written in the key's frame.
pub type BassStep = (i32, i32);

impl Default for Genre {
    fn default() -> Self {
        Genre::ProgressiveHouse
    }
}

impl Genre {
    /// Inclusive tempo range in BPM.
    pub fn bpm_range(self) -> (u32, u32) {
        match self {
            Genre::ProgressiveHouse => (126, 134),
            Genre::FutureBass => (140, 160),
            Genre::BigRoom => (128, 132),
            Genre::Techno => (125, 150),
            Genre::Trance => (132, 140),
            Genre::Dubstep => (140, 150),
            Genre::Trap => (140, 180),
            Genre::Hardstyle => (150, 165),
            Genre::DeepHouse => (120, 126),
            Genre::Electro => (128, 135),
        }
    }

    /// Six progression templates. Big room borrows progressive house's set,
    /// electro borrows techno's.
    pub fn progressions(self) -> &'static [Progression; 6] {
        use super::chord::roman::*;

        const PROGRESSIVE_HOUSE: [Progression; 6] = [
            [vi, IV, I, V],
            [I, vi, IV, V],
            [vi, V, I, IV],
            [ii, V, I, vi],
            [I, V, vi, iii],
            [vi, ii, V, I],
        ];
        const FUTURE_BASS: [Progression; 6] = [
            [vi, IV, I, V],
            [I, vi, ii, V],
            [vi, ii, V, I],
            [I, V, vi, iii],
            [iv, I, V, vi],
            [vi, iii, IV, I],
        ];
        const TECHNO: [Progression; 6] = [
            [i, iv, VI, VII],
            [i, VI, III, VII],
            [i, v, i, v],
            [i, iv, v, i],
            [i, VII, iv, i],
            [i, ii_dim, V, i],
        ];
        const TRANCE: [Progression; 6] = [
            [vi, IV, I, V],
            [I, vi, IV, V],
            [vi, V, I, IV],
            [I, V, vi, IV],
            [ii, V, I, vi],
            [vi, ii, V, I],
        ];
        const DUBSTEP: [Progression; 6] = [
            [i, VI, III, VII],
            [i, iv, VI, v],
            [i, v, VI, iv],
            [i, VII, VI, v],
            [i, iv, v, VI],
            [i, III, VII, iv],
        ];
        const HARDSTYLE: [Progression; 6] = [
            [i, VI, III, VII],
            [i, iv, v, i],
            [i, v, VI, iv],
            [i, VII, VI, v],
            [i, iv, VII, VI],
            [i, v, iv, VII],
        ];
        const TRAP: [Progression; 6] = [
            [i, VI, iv, V],
            [i, III, VI, VII],
            [i, iv, v, VI],
            [i, VII, VI, iv],
            [i, v, VII, VI],
            [i, iv, III, VII],
        ];
        const DEEP_HOUSE: [Progression; 6] = [
            [vi, IV, I, V],
            [I, vi, IV, V],
            [ii, V, I, vi],
            [vi, ii, V, I],
            [I, iii, vi, IV],
            [vi, V, IV, I],
        ];

        match self {
            Genre::ProgressiveHouse | Genre::BigRoom => &PROGRESSIVE_HOUSE,
            Genre::FutureBass => &FUTURE_BASS,
            Genre::Techno | Genre::Electro => &TECHNO,
            Genre::Trance => &TRANCE,
            Genre::Dubstep => &DUBSTEP,
            Genre::Hardstyle => &HARDSTYLE,
            Genre::Trap => &TRAP,
            Genre::DeepHouse => &DEEP_HOUSE,
        }
    }

    /// Eight-step drum template per channel. Genres without their own
    /// template play progressive house's.
    pub fn drum_template(self) -> &'static [(DrumChannel, &'static str)] {
        use DrumChannel::*;

        match self {
            Genre::FutureBass => &[(Kick, "x.x.x..."), (Snare, "....x..."), (Hihat, "xxxxxxxx")],
            Genre::Techno | Genre::Hardstyle => {
                &[(Kick, "x...x..."), (Snare, "..x...x."), (Hihat, "xxxxxxxx")]
            }
            Genre::Dubstep => &[(Kick, "x......."), (Snare, "....x..."), (Hihat, "x.x.x.x.")],
            Genre::ProgressiveHouse
            | Genre::Trance
            | Genre::BigRoom
            | Genre::Trap
            | Genre::DeepHouse
            | Genre::Electro => &[(Kick, "x...x..."), (Snare, "..x...x."), (Hihat, ".x.x.x.x")],
        }
    }

    /// Eight-step bassline as (degree, octave) pairs.
    pub fn bass_template(self) -> &'static [BassStep; 8] {
        match self {
            Genre::FutureBass => &[(0, 2), (0, 3), (3, 2), (3, 3), (4, 2), (4, 3), (5, 2), (5, 3)],
            Genre::Techno => &[(0, 1), (0, 1), (0, 1), (0, 1), (3, 1), (3, 1), (3, 1), (3, 1)],
            Genre::Trance => &[(0, 2), (2, 2), (4, 2), (0, 3), (3, 2), (5, 2), (0, 3), (3, 3)],
            Genre::Dubstep => &[(0, 1), (0, 2), (0, 1), (0, 2), (3, 1), (3, 2), (3, 1), (3, 2)],
            Genre::Hardstyle => &[(0, 2), (0, 2), (0, 2), (0, 2), (3, 2), (3, 2), (4, 2), (4, 2)],
            Genre::ProgressiveHouse
            | Genre::BigRoom
            | Genre::Trap
            | Genre::DeepHouse
            | Genre::Electro => &[(0, 2), (0, 2), (3, 2), (3, 2), (4, 2), (4, 2), (5, 2), (5, 2)],
        }
    }

    /// Effects a track of this genre gets when the caller names none.
    pub fn default_effects(self) -> &'static [EffectKind] {
        use EffectKind::*;

        match self {
            Genre::FutureBass => &[Chorus, Delay, Distortion, Phaser],
            Genre::Techno => &[Filter, Distortion, Delay, Compressor],
            Genre::Trance => &[Reverb, Chorus, Delay, Phaser],
            Genre::Dubstep => &[Distortion, Filter, Bitcrusher],
            Genre::Hardstyle => &[Distortion, Reverb, Compressor],
            Genre::ProgressiveHouse
            | Genre::BigRoom
            | Genre::Trap
            | Genre::DeepHouse
            | Genre::Electro => &[Reverb, Chorus, Delay],
        }
    }

    /// Bass voice and kick voice lean on the 808 for these genres.
    pub fn is_808_genre(self) -> bool {
        matches!(self, Genre::Trap | Genre::Dubstep | Genre::FutureBass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::StepPattern;

    #[test]
    fn every_genre_resolves_every_table() {
        for genre in Genre::ALL {
            let (min, max) = genre.bpm_range();
            assert!(min < max, "{}", genre);
            assert_eq!(genre.progressions().len(), 6);
            assert!(!genre.default_effects().is_empty());

            for (channel, steps) in genre.drum_template() {
                let pattern: StepPattern = steps.parse().unwrap();
                assert_eq!(pattern.len(), 8, "{} {:?}", genre, channel);
            }
        }
    }

    #[test]
    fn slugs_round_trip_through_from_str() {
        for genre in Genre::ALL {
            assert_eq!(genre.slug().parse::<Genre>(), Ok(*genre));
        }
        assert_eq!("Big Room".parse::<Genre>(), Ok(Genre::BigRoom));
        assert!("polka".parse::<Genre>().is_err());
    }

    #[test]
    fn borrowed_progressions() {
        assert_eq!(Genre::BigRoom.progressions(), Genre::ProgressiveHouse.progressions());
        assert_eq!(Genre::Electro.progressions(), Genre::Techno.progressions());
        assert_eq!(Genre::Techno.progressions()[5][1].to_string(), "ii°");
    }
}
