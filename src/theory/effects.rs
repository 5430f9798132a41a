use super::slug_enum;
use crate::error::ParseError;

slug_enum! {
    /// Effect units a chain can name.
    pub enum EffectKind ("effect") {
        Reverb => "reverb",
        Delay => "delay",
        Chorus => "chorus",
        Distortion => "distortion",
        Filter => "filter",
        Compressor => "compressor",
        Phaser => "phaser",
        Tremolo => "tremolo",
        AutoWah => "auto-wah",
        Bitcrusher => "bitcrusher",
        PitchShift => "pitch-shift",
        Waveshaper => "waveshaper",
        Granular => "granular",
    }
}

impl EffectKind {
    /// `granular` is a chain entry with no processing unit behind it; the
    /// renderer skips it.
    pub fn has_unit(self) -> bool {
        !matches!(self, EffectKind::Granular)
    }

    /// Forgiving parse for effect lists typed by people: ignores case and
    /// separators (`autoWah`, `auto_wah`, `AutoWah`) and accepts
    /// `chebyshev` for the waveshaper.
    pub fn parse_loose(name: &str) -> Result<Self, ParseError> {
        let squashed: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if squashed == "chebyshev" {
            return Ok(EffectKind::Waveshaper);
        }

        EffectKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.slug().replace('-', "") == squashed)
            .ok_or_else(|| ParseError::Unknown {
                kind: "effect",
                value: name.to_string(),
            })
    }
}

/// Preset reachable only through an explicit effect list.
pub const EXPERIMENTAL_PRESET: &[EffectKind] = &[
    EffectKind::Granular,
    EffectKind::PitchShift,
    EffectKind::Reverb,
    EffectKind::Tremolo,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_names() {
        assert_eq!(EffectKind::parse_loose("autoWah"), Ok(EffectKind::AutoWah));
        assert_eq!(EffectKind::parse_loose("pitchShift"), Ok(EffectKind::PitchShift));
        assert_eq!(EffectKind::parse_loose("Chebyshev"), Ok(EffectKind::Waveshaper));
        assert_eq!(EffectKind::parse_loose("BIT_CRUSHER"), Ok(EffectKind::Bitcrusher));
        assert!(EffectKind::parse_loose("flanger").is_err());
    }

    #[test]
    fn only_granular_lacks_a_unit() {
        let missing: Vec<_> = EffectKind::ALL.iter().filter(|k| !k.has_unit()).collect();
        assert_eq!(missing, vec![&EffectKind::Granular]);
    }
}
