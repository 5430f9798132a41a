use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ParseError;
use crate::graph::midi_note_to_freq;

/*
Pitch Symbols
=============

Templates carry notes as scientific pitch names ("C4", "F#2", "Bb3"), which
is what ends up in metadata. Internally a pitch is just its MIDI number:

    midi = 12·(octave + 1) + semitone

    C=0 C#/Db=1 D=2 D#/Eb=3 E=4 F=5 F#/Gb=6 G=7 G#/Ab=8 A=9 A#/Bb=10 B=11

Middle C (C4) is 60. Display always spells with sharps.
*/

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pitch(u8);

impl Pitch {
    pub const MIDDLE_C: Pitch = Pitch(60);

    pub fn from_midi(note: u8) -> Option<Self> {
        (note <= 127).then_some(Pitch(note))
    }

    /// Pitch class (0 - 11) and octave, clamped into the MIDI range.
    pub fn from_parts(pitch_class: u8, octave: i32) -> Self {
        let midi = 12 * (octave + 1) + (pitch_class % 12) as i32;
        Pitch(midi.clamp(0, 127) as u8)
    }

    pub fn midi(self) -> u8 {
        self.0
    }

    pub fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    pub fn octave(self) -> i32 {
        (self.0 / 12) as i32 - 1
    }

    pub fn frequency(self) -> f32 {
        midi_note_to_freq(self.0)
    }

    /// Shift by whole octaves, clamped into the MIDI range.
    pub fn shift_octaves(self, octaves: i32) -> Self {
        Pitch((self.0 as i32 + 12 * octaves).clamp(0, 127) as u8)
    }
}

/// Semitone offset of a note letter from C.
pub(crate) fn letter_semitone(letter: char) -> Option<u8> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

impl FromStr for Pitch {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Invalid {
            kind: "pitch",
            value: s.to_string(),
        };

        let mut chars = s.trim().chars().peekable();
        let letter = chars.next().and_then(letter_semitone).ok_or_else(invalid)?;

        let accidental: i32 = match chars.peek() {
            Some('#') => {
                chars.next();
                1
            }
            Some('b') => {
                chars.next();
                -1
            }
            _ => 0,
        };

        let octave: i32 = chars.collect::<String>().parse().map_err(|_| invalid())?;
        let midi = 12 * (octave + 1) + letter as i32 + accidental;
        u8::try_from(midi)
            .ok()
            .and_then(Pitch::from_midi)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            SHARP_NAMES[self.pitch_class() as usize],
            self.octave()
        )
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scientific_names() {
        assert_eq!("C4".parse::<Pitch>().map(Pitch::midi), Ok(60));
        assert_eq!("A4".parse::<Pitch>().map(Pitch::midi), Ok(69));
        assert_eq!("F#2".parse::<Pitch>().map(Pitch::midi), Ok(42));
        assert_eq!("Bb3".parse::<Pitch>().map(Pitch::midi), Ok(58));
        assert_eq!("C-1".parse::<Pitch>().map(Pitch::midi), Ok(0));
    }

    #[test]
    fn rejects_garbage() {
        assert!("H2".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("A9".parse::<Pitch>().is_err());
        assert!("Cb-1".parse::<Pitch>().is_err());
    }

    #[test]
    fn displays_with_sharps() {
        let bb3: Pitch = "Bb3".parse().unwrap_or(Pitch::MIDDLE_C);
        assert_eq!(bb3.to_string(), "A#3");
        assert_eq!(Pitch::from_parts(1, 4).to_string(), "C#4");
    }

    #[test]
    fn a4_is_440() {
        let a4 = Pitch::from_parts(9, 4);
        assert!((a4.frequency() - 440.0).abs() < 1e-3);
    }

    #[test]
    fn serializes_as_symbol() {
        let json = serde_json::to_string(&vec![Pitch::MIDDLE_C, Pitch::from_parts(6, 2)]);
        assert_eq!(json.ok().as_deref(), Some(r#"["C4","F#2"]"#));
    }
}
