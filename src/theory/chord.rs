use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

/// Roman-numeral chord: a scale degree plus the quality its case implies.
///
/// Upper case is major (`IV`), lower case minor (`vi`), a trailing `°`
/// diminished (`ii°`). The degree is what the renderer uses; quality is
/// carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChordDegree {
    degree: u8,
    quality: ChordQuality,
}

const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

impl ChordDegree {
    pub const fn new(degree: u8, quality: ChordQuality) -> Self {
        ChordDegree {
            degree: degree % 7,
            quality,
        }
    }

    /// Zero-based scale degree of the chord root.
    pub fn degree(&self) -> usize {
        self.degree as usize
    }

    pub fn quality(&self) -> ChordQuality {
        self.quality
    }
}

/// Chord constants named as they are written, for the progression tables.
#[allow(non_upper_case_globals)]
pub mod roman {
    use super::{ChordDegree, ChordQuality::*};

    pub const I: ChordDegree = ChordDegree::new(0, Major);
    pub const i: ChordDegree = ChordDegree::new(0, Minor);
    pub const ii: ChordDegree = ChordDegree::new(1, Minor);
    pub const ii_dim: ChordDegree = ChordDegree::new(1, Diminished);
    pub const III: ChordDegree = ChordDegree::new(2, Major);
    pub const iii: ChordDegree = ChordDegree::new(2, Minor);
    pub const IV: ChordDegree = ChordDegree::new(3, Major);
    pub const iv: ChordDegree = ChordDegree::new(3, Minor);
    pub const V: ChordDegree = ChordDegree::new(4, Major);
    pub const v: ChordDegree = ChordDegree::new(4, Minor);
    pub const VI: ChordDegree = ChordDegree::new(5, Major);
    pub const vi: ChordDegree = ChordDegree::new(5, Minor);
    pub const VII: ChordDegree = ChordDegree::new(6, Major);
}

impl FromStr for ChordDegree {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Invalid {
            kind: "chord",
            value: s.to_string(),
        };

        let trimmed = s.trim();
        let (numeral, diminished) = match trimmed.strip_suffix('°') {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };

        let upper = numeral.to_ascii_uppercase();
        let degree = NUMERALS
            .iter()
            .position(|n| *n == upper)
            .ok_or_else(invalid)?;

        let quality = match (diminished, numeral == upper) {
            (true, _) => ChordQuality::Diminished,
            (false, true) => ChordQuality::Major,
            (false, false) if numeral.to_ascii_lowercase() == numeral => ChordQuality::Minor,
            _ => return Err(invalid()),
        };

        Ok(ChordDegree::new(degree as u8, quality))
    }
}

impl fmt::Display for ChordDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numeral = NUMERALS[self.degree as usize];
        match self.quality {
            ChordQuality::Major => f.write_str(numeral),
            ChordQuality::Minor => f.write_str(&numeral.to_ascii_lowercase()),
            ChordQuality::Diminished => write!(f, "{}°", numeral.to_ascii_lowercase()),
        }
    }
}

impl Serialize for ChordDegree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::roman::*;
    use super::*;

    #[test]
    fn parses_case_and_diminished() {
        assert_eq!("vi".parse::<ChordDegree>(), Ok(vi));
        assert_eq!("IV".parse::<ChordDegree>(), Ok(IV));
        assert_eq!("ii°".parse::<ChordDegree>(), Ok(ii_dim));
        assert_eq!("VII".parse::<ChordDegree>().map(|c| c.degree()), Ok(6));
    }

    #[test]
    fn rejects_mixed_case_and_unknown() {
        assert!("Iv".parse::<ChordDegree>().is_err());
        assert!("VIII".parse::<ChordDegree>().is_err());
    }

    #[test]
    fn displays_as_written() {
        let written: Vec<String> = [i, ii_dim, V, i].iter().map(|c| c.to_string()).collect();
        assert_eq!(written, vec!["i", "ii°", "V", "i"]);
    }
}
