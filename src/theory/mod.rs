//! Static music-theory tables.
//!
//! Everything the composer looks up lives here as closed enums with
//! exhaustive `match` tables: genres and their tempo ranges, progressions,
//! drum and bass templates; moods and their candidate keys; scales; effect
//! presets; arrangement templates. Nothing in this module allocates or
//! mutates, so the tables are shared freely.
//!
//! Strings only enter at the edge. Every enum parses from its kebab-case slug
//! (case and separators are forgiving: `"Future Bass"`, `"future_bass"` and
//! `"future-bass"` are the same genre) and displays as that slug.

/// Lowercase, trim, and turn spaces and underscores into dashes.
pub(crate) fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '_' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Closed enum with a kebab-case slug, `ALL`, `FromStr`, `Display` and a
/// string `Serialize`.
macro_rules! slug_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $($(#[$vmeta:meta])* $variant:ident => $slug:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn slug(self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = $crate::theory::normalize(s);
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.slug() == wanted)
                    .ok_or_else(|| $crate::error::ParseError::Unknown {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.slug())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.slug())
            }
        }
    };
}

pub(crate) use slug_enum;

pub mod chord;
pub mod drums;
pub mod effects;
pub mod genre;
pub mod mood;
pub mod motif;
pub mod scale;
pub mod style;

pub use chord::{ChordDegree, ChordQuality};
pub use drums::{DrumChannel, DrumPattern};
pub use effects::EffectKind;
pub use genre::Genre;
pub use mood::Mood;
pub use scale::{Key, Scale, Spelling};
pub use style::{ArrangementStyle, Complexity, LayerKind, MixingStyle, SectionTemplate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_accepts_loose_spelling() {
        assert_eq!(normalize("  Future Bass "), "future-bass");
        assert_eq!(normalize("DEEP_HOUSE"), "deep-house");
    }
}
