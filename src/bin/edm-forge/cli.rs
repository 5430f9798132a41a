//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use edm_forge::{AnalysisMode, GeneratorConfig, RawRequest};

/// Render procedural EDM variations to WAV files
#[derive(Parser, Debug)]
#[command(name = "edm-forge")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// EDM subgenre, e.g. techno, future-bass, deep-house
    #[arg(short, long, default_value = "progressive-house")]
    pub genre: String,

    /// uplifting, dark, chill, energetic, ethereal or aggressive
    #[arg(short, long, default_value = "uplifting")]
    pub mood: String,

    /// Free text folded into the seed; some keywords pick a melody motif
    #[arg(short, long, default_value = "")]
    pub prompt: String,

    /// Length of each variation in seconds
    #[arg(short, long, default_value_t = 30.0)]
    pub duration: f64,

    /// simple, medium, complex or experimental
    #[arg(short, long, default_value = "medium")]
    pub complexity: String,

    /// Number of variations to render
    #[arg(short, long, default_value_t = 1)]
    pub variations: u32,

    /// clean, compressed, saturated or vintage
    #[arg(long, default_value = "clean")]
    pub mixing: String,

    /// intro-buildup-drop-outro, verse-chorus, continuous-mix or experimental
    #[arg(long, default_value = "intro-buildup-drop-outro")]
    pub arrangement: String,

    /// Effect to use instead of the generated chain (repeatable)
    #[arg(long = "effect")]
    pub effects: Vec<String>,

    /// Fixed tempo
    #[arg(long)]
    pub bpm: Option<u32>,

    /// Fixed key, e.g. "F# minor"
    #[arg(long)]
    pub key: Option<String>,

    /// Energy level 1-10; picks catalogue styles within two levels
    #[arg(short, long)]
    pub energy: Option<u8>,

    /// List the N most popular catalogue styles and exit
    #[arg(long, value_name = "N")]
    pub popular: Option<usize>,

    /// Generator config file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output sample rate, overrides the config file
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Measure the rendered audio instead of estimating the analysis
    #[arg(long)]
    pub spectral: bool,

    /// Extra seed text; different salts give different tracks
    #[arg(long)]
    pub salt: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Play the first variation on the default output device
    #[arg(long)]
    pub play: bool,
}

impl Cli {
    pub fn request(&self) -> RawRequest {
        RawRequest {
            genre: Some(self.genre.clone()),
            mood: Some(self.mood.clone()),
            prompt: Some(self.prompt.clone()),
            duration: Some(self.duration),
            bpm: self.bpm,
            key: self.key.clone(),
            complexity: Some(self.complexity.clone()),
            variations: Some(self.variations),
            effects: (!self.effects.is_empty()).then(|| self.effects.clone()),
            mixing_style: Some(self.mixing.clone()),
            arrange_style: Some(self.arrangement.clone()),
            energy: self.energy,
        }
    }

    /// Apply flag overrides on top of `config`.
    pub fn apply(&self, mut config: GeneratorConfig) -> GeneratorConfig {
        if let Some(sample_rate) = self.sample_rate {
            config = config.sample_rate(sample_rate);
        }
        if self.spectral {
            config = config.analysis(AnalysisMode::Spectral);
        }
        if let Some(salt) = &self.salt {
            config = config.seed_salt(salt.clone());
        }
        config
    }
}
