use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::{normalize, slug_enum};
use crate::error::ParseError;
use crate::sequencing::pitch::{letter_semitone, Pitch};

/*
Scales and Keys
===============

A key is a root pitch class plus a scale. Melodies, basslines and chords are
written in scale degrees (0 = root) and only become pitches through a key:

    degree d, octave o  →  pitch class (root + steps[d mod n]) mod 12
                           octave      o + floor(d / n)

Degrees past the top of the scale carry into the next octave; a pitch class
that wraps past B does NOT, so in A minor degree 2 at octave 4 is C4, not C5.
That keeps every voice of one layer inside the same named octave.
*/

slug_enum! {
    pub enum Scale ("scale") {
        Major => "major",
        Minor => "minor",
        Dorian => "dorian",
        Phrygian => "phrygian",
        HarmonicMinor => "harmonic-minor",
        Pentatonic => "pentatonic",
    }
}

impl Scale {
    /// Semitone steps above the root.
    pub fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major => &[0, 2, 4, 5, 7, 9, 11],
            Scale::Minor => &[0, 2, 3, 5, 7, 8, 10],
            Scale::Dorian => &[0, 2, 3, 5, 7, 9, 10],
            Scale::Phrygian => &[0, 1, 3, 5, 7, 8, 10],
            Scale::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            Scale::Pentatonic => &[0, 2, 4, 7, 9],
        }
    }

    pub fn len(self) -> usize {
        self.intervals().len()
    }

    /// Name as written in a key: "harmonic minor".
    pub fn display_name(self) -> &'static str {
        match self {
            Scale::HarmonicMinor => "harmonic minor",
            other => other.slug(),
        }
    }
}

/// How accidentals are written when a key is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spelling {
    Sharp,
    Flat,
}

const SHARPS: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLATS: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    root: u8,
    scale: Scale,
    spelling: Spelling,
}

impl Key {
    pub const fn new(root: u8, scale: Scale, spelling: Spelling) -> Self {
        Key {
            root: root % 12,
            scale,
            spelling,
        }
    }

    pub const fn sharp(root: u8, scale: Scale) -> Self {
        Key::new(root, scale, Spelling::Sharp)
    }

    pub const fn flat(root: u8, scale: Scale) -> Self {
        Key::new(root, scale, Spelling::Flat)
    }

    pub fn root(&self) -> u8 {
        self.root
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn root_name(&self) -> &'static str {
        match self.spelling {
            Spelling::Sharp => SHARPS[self.root as usize],
            Spelling::Flat => FLATS[self.root as usize],
        }
    }

    /// Pitch of scale `degree` (any integer) in `octave`.
    pub fn pitch(&self, degree: i32, octave: i32) -> Pitch {
        let steps = self.scale.intervals();
        let len = steps.len() as i32;
        let index = degree.rem_euclid(len) as usize;
        let carry = degree.div_euclid(len);

        let pitch_class = (self.root + steps[index]) % 12;
        Pitch::from_parts(pitch_class, octave + carry)
    }

    /// Scale degree of a pitch class, if it belongs to the scale.
    pub fn degree_of(&self, pitch_class: u8) -> Option<usize> {
        let offset = (pitch_class % 12 + 12 - self.root) % 12;
        self.scale.intervals().iter().position(|s| *s == offset)
    }
}

impl FromStr for Key {
    type Err = ParseError;

    /// "F# minor", "Bb major", "C harmonic minor". A bare root means major.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Invalid {
            kind: "key",
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let (root_text, scale_text) = match trimmed.split_once(char::is_whitespace) {
            Some((root, scale)) => (root, scale.trim()),
            None => (trimmed, "major"),
        };

        let mut chars = root_text.chars();
        let letter = chars.next().and_then(letter_semitone).ok_or_else(invalid)?;
        let (root, spelling) = match chars.as_str() {
            "" => (letter, Spelling::Sharp),
            "#" => ((letter + 1) % 12, Spelling::Sharp),
            "b" => ((letter + 11) % 12, Spelling::Flat),
            _ => return Err(invalid()),
        };

        let scale = match normalize(scale_text).as_str() {
            "harmonic" => Scale::HarmonicMinor,
            other => other.parse().map_err(|_| invalid())?,
        };

        Ok(Key::new(root, scale, spelling))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.root_name(), self.scale.display_name())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_keys() {
        for text in ["F# minor", "Bb major", "C# minor", "Ab major", "C harmonic minor"] {
            let key: Key = text.parse().unwrap();
            assert_eq!(key.to_string(), text);
        }
        assert_eq!("G".parse::<Key>().unwrap().to_string(), "G major");
    }

    #[test]
    fn rejects_bad_keys() {
        assert!("H minor".parse::<Key>().is_err());
        assert!("C mixolydian".parse::<Key>().is_err());
        assert!("C## major".parse::<Key>().is_err());
    }

    #[test]
    fn degrees_carry_into_the_next_octave() {
        let c_major = Key::sharp(0, Scale::Major);
        assert_eq!(c_major.pitch(0, 4).to_string(), "C4");
        assert_eq!(c_major.pitch(7, 4).to_string(), "C5");
        assert_eq!(c_major.pitch(-1, 4).to_string(), "B3");
    }

    #[test]
    fn pitch_class_wrap_keeps_the_octave() {
        let a_minor = Key::sharp(9, Scale::Minor);
        assert_eq!(a_minor.pitch(0, 4).to_string(), "A4");
        assert_eq!(a_minor.pitch(2, 4).to_string(), "C4");
    }

    #[test]
    fn pentatonic_has_five_degrees() {
        let key = Key::sharp(0, Scale::Pentatonic);
        assert_eq!(key.pitch(5, 3).to_string(), "C4");
        assert_eq!(key.degree_of(7), Some(3));
        assert_eq!(key.degree_of(5), None);
    }
}
