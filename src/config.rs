use serde::{Deserialize, Serialize};

use crate::compose::catalogue::{CATALOGUE_SEED, DEFAULT_CATALOGUE_SIZE};
use crate::error::GenerateError;
use crate::render::AnalysisMode;
use crate::MAX_BLOCK_SIZE;

/// Generator settings. Every field has a default, so a partial JSON file is
/// a valid config.
///
/// ```
/// use edm_forge::config::GeneratorConfig;
///
/// let config = GeneratorConfig::default().sample_rate(48_000).channels(1);
/// assert_eq!(config.block_size, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorConfig {
    pub sample_rate: u32,
    pub channels: u16,
    /// Frames per render block, at most [`MAX_BLOCK_SIZE`].
    pub block_size: usize,
    /// Transport resolution in ticks per quarter note.
    pub ppq: u32,
    /// Longest duration a request may ask for.
    pub max_duration_secs: f64,
    pub analysis: AnalysisMode,
    /// Extra text folded into every seed. `None` keeps seeds reproducible
    /// across runs.
    pub seed_salt: Option<String>,
    /// Retry a failed variation once before giving up on the call.
    pub retry_failed_variation: bool,
    pub model_name: String,
    /// Seed of the style catalogue.
    pub catalogue_seed: i32,
    /// Styles in the catalogue. 0 disables styling.
    pub catalogue_size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            block_size: 256,
            ppq: 480,
            max_duration_secs: 600.0,
            analysis: AnalysisMode::Heuristic,
            seed_salt: None,
            retry_failed_variation: true,
            model_name: "Procedural EDM Engine".to_string(),
            catalogue_seed: CATALOGUE_SEED,
            catalogue_size: DEFAULT_CATALOGUE_SIZE,
        }
    }
}

impl GeneratorConfig {
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn ppq(mut self, ppq: u32) -> Self {
        self.ppq = ppq;
        self
    }

    pub fn max_duration_secs(mut self, secs: f64) -> Self {
        self.max_duration_secs = secs;
        self
    }

    pub fn analysis(mut self, analysis: AnalysisMode) -> Self {
        self.analysis = analysis;
        self
    }

    pub fn seed_salt(mut self, salt: impl Into<String>) -> Self {
        self.seed_salt = Some(salt.into());
        self
    }

    pub fn retry_failed_variation(mut self, retry: bool) -> Self {
        self.retry_failed_variation = retry;
        self
    }

    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    pub fn catalogue_seed(mut self, seed: i32) -> Self {
        self.catalogue_seed = seed;
        self
    }

    pub fn catalogue_size(mut self, size: usize) -> Self {
        self.catalogue_size = size;
        self
    }

    /// Check the engine can run with these settings.
    pub fn validate(&self) -> Result<(), GenerateError> {
        let unavailable = |why: String| Err(GenerateError::EngineUnavailable(why));

        if !(8_000..=192_000).contains(&self.sample_rate) {
            return unavailable(format!("unsupported sample rate {} Hz", self.sample_rate));
        }
        if self.channels == 0 || self.channels > 8 {
            return unavailable(format!("unsupported channel count {}", self.channels));
        }
        if self.block_size == 0 || self.block_size > MAX_BLOCK_SIZE {
            return unavailable(format!(
                "block size {} outside 1..={}",
                self.block_size, MAX_BLOCK_SIZE
            ));
        }
        if self.ppq < 4 {
            return unavailable(format!("ppq {} is too coarse for sixteenth notes", self.ppq));
        }
        if !self.max_duration_secs.is_finite() || self.max_duration_secs <= 0.0 {
            return unavailable(format!("invalid maximum duration {}", self.max_duration_secs));
        }
        Ok(())
    }
}
