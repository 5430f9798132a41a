use super::scale::{Key, Scale};
use super::slug_enum;

slug_enum! {
    pub enum Mood ("mood") {
        Uplifting => "uplifting",
        Dark => "dark",
        Chill => "chill",
        Energetic => "energetic",
        Ethereal => "ethereal",
        Aggressive => "aggressive",
    }
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Uplifting
    }
}

impl Mood {
    /// Five candidate keys; the composer picks one per variation.
    pub fn candidate_keys(self) -> &'static [Key; 5] {
        use Scale::{Major, Minor};

        const UPLIFTING: [Key; 5] = [
            Key::sharp(0, Major),
            Key::sharp(7, Major),
            Key::sharp(2, Major),
            Key::sharp(9, Major),
            Key::sharp(4, Major),
        ];
        const DARK: [Key; 5] = [
            Key::sharp(9, Minor),
            Key::sharp(4, Minor),
            Key::sharp(11, Minor),
            Key::sharp(6, Minor),
            Key::sharp(1, Minor),
        ];
        const CHILL: [Key; 5] = [
            Key::flat(5, Major),
            Key::flat(10, Major),
            Key::flat(3, Major),
            Key::flat(8, Major),
            Key::flat(1, Major),
        ];
        const ENERGETIC: [Key; 5] = [
            Key::sharp(4, Major),
            Key::sharp(11, Major),
            Key::sharp(6, Major),
            Key::sharp(1, Major),
            Key::sharp(8, Major),
        ];
        const ETHEREAL: [Key; 5] = [
            Key::sharp(6, Major),
            Key::sharp(1, Major),
            Key::sharp(8, Major),
            Key::sharp(3, Major),
            Key::sharp(10, Major),
        ];
        const AGGRESSIVE: [Key; 5] = [
            Key::sharp(2, Minor),
            Key::sharp(7, Minor),
            Key::sharp(0, Minor),
            Key::flat(5, Minor),
            Key::flat(10, Minor),
        ];

        match self {
            Mood::Uplifting => &UPLIFTING,
            Mood::Dark => &DARK,
            Mood::Chill => &CHILL,
            Mood::Energetic => &ENERGETIC,
            Mood::Ethereal => &ETHEREAL,
            Mood::Aggressive => &AGGRESSIVE,
        }
    }
}
