//! Generation facade.
//!
//! ```text
//! request ─→ seed(n) ─→ Composer ─→ MusicalTemplate ─┐
//!                       Arrangement::schedule ───────┴─→ AudioEngine ─→ Variation n
//! ```
//!
//! Variations render one after another on the generator's single engine.
//! [`Generator::generate`] is all-or-nothing; [`Generator::variations`]
//! hands them out as they finish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::arrange::Arrangement;
use crate::compose::catalogue::ENERGY_RANGE;
use crate::compose::{Catalogue, Composer, MelodyVariant, MusicalTemplate, StyleTemplate};
use crate::config::GeneratorConfig;
use crate::error::{GenerateError, RenderError, Result};
use crate::render::{AudioAsset, AudioEngine, EngineRemote, FrequencyAnalysis};
use crate::seed::{request_seed, variation_seed};
use crate::theory::{
    ArrangementStyle, Complexity, EffectKind, Genre, Key, MixingStyle, Mood,
};

pub const DEFAULT_DURATION_SECS: f64 = 30.0;

/// A validated generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub genre: Genre,
    pub mood: Mood,
    pub prompt: String,
    /// Overrides the genre tempo range.
    pub bpm: Option<u32>,
    /// Overrides the mood's key list.
    pub key: Option<Key>,
    pub duration_secs: f64,
    pub complexity: Complexity,
    pub variations: u32,
    /// Used verbatim instead of the generated chain.
    pub effects: Option<Vec<EffectKind>>,
    pub mixing: MixingStyle,
    pub arrangement: ArrangementStyle,
    /// Narrows the style catalogue to entries within two levels (1-10).
    pub energy: Option<u8>,
}

impl GenerationRequest {
    pub fn builder(genre: Genre, mood: Mood) -> GenerationRequestBuilder {
        GenerationRequestBuilder {
            request: GenerationRequest {
                genre,
                mood,
                prompt: String::new(),
                bpm: None,
                key: None,
                duration_secs: DEFAULT_DURATION_SECS,
                complexity: Complexity::default(),
                variations: 1,
                effects: None,
                mixing: MixingStyle::default(),
                arrangement: ArrangementStyle::default(),
                energy: None,
            },
        }
    }

    pub fn validate(&self, max_duration_secs: f64) -> Result<()> {
        let invalid = |why: String| Err(GenerateError::InvalidRequest(why));

        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return invalid(format!("duration must be positive, got {}", self.duration_secs));
        }
        if self.duration_secs > max_duration_secs {
            return invalid(format!(
                "duration {} s exceeds the {} s limit",
                self.duration_secs, max_duration_secs
            ));
        }
        if self.variations == 0 {
            return invalid("at least one variation is required".to_string());
        }
        if let Some(energy) = self.energy {
            let (low, high) = ENERGY_RANGE;
            if !(low..=high).contains(&energy) {
                return invalid(format!("energy {} outside {}..={}", energy, low, high));
            }
        }
        Ok(())
    }

    /// Seed shared by every variation before the per-variation offset.
    pub fn base_seed(&self, salt: Option<&str>) -> i32 {
        request_seed(self.genre, self.mood, &self.prompt, self.complexity, salt)
    }
}

pub struct GenerationRequestBuilder {
    request: GenerationRequest,
}

impl GenerationRequestBuilder {
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.request.prompt = prompt.into();
        self
    }

    pub fn bpm(mut self, bpm: u32) -> Self {
        self.request.bpm = Some(bpm);
        self
    }

    pub fn key(mut self, key: Key) -> Self {
        self.request.key = Some(key);
        self
    }

    pub fn duration_secs(mut self, secs: f64) -> Self {
        self.request.duration_secs = secs;
        self
    }

    pub fn complexity(mut self, complexity: Complexity) -> Self {
        self.request.complexity = complexity;
        self
    }

    pub fn variations(mut self, count: u32) -> Self {
        self.request.variations = count;
        self
    }

    pub fn effects(mut self, effects: Vec<EffectKind>) -> Self {
        self.request.effects = Some(effects);
        self
    }

    pub fn mixing(mut self, mixing: MixingStyle) -> Self {
        self.request.mixing = mixing;
        self
    }

    pub fn arrangement(mut self, arrangement: ArrangementStyle) -> Self {
        self.request.arrangement = arrangement;
        self
    }

    pub fn energy(mut self, energy: u8) -> Self {
        self.request.energy = Some(energy);
        self
    }

    pub fn build(self) -> GenerationRequest {
        self.request
    }
}

/// Unvalidated request as it arrives from outside, e.g. JSON.
///
/// ```
/// use edm_forge::generate::RawRequest;
/// use edm_forge::theory::Genre;
///
/// let raw: RawRequest = serde_json::from_str(r#"{ "genre": "polka", "mood": "dark" }"#).unwrap();
/// assert_eq!(raw.resolve().genre, Genre::ProgressiveHouse);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRequest {
    pub genre: Option<String>,
    pub mood: Option<String>,
    pub prompt: Option<String>,
    pub duration: Option<f64>,
    pub bpm: Option<u32>,
    pub key: Option<String>,
    pub complexity: Option<String>,
    pub variations: Option<u32>,
    pub effects: Option<Vec<String>>,
    pub mixing_style: Option<String>,
    #[serde(alias = "arrangement")]
    pub arrange_style: Option<String>,
    #[serde(alias = "energyLevel")]
    pub energy: Option<u8>,
}

/// Parse `value`, or warn and fall back to the default.
fn or_default<T>(value: Option<&str>) -> T
where
    T: std::str::FromStr<Err = crate::error::ParseError> + Default + std::fmt::Display,
{
    let Some(value) = value else {
        return T::default();
    };
    value.parse().unwrap_or_else(|err| {
        let fallback = T::default();
        warn!("{}, using {}", err, fallback);
        fallback
    })
}

impl RawRequest {
    /// Convert to a [`GenerationRequest`]. Never fails; anything unknown
    /// falls back to its default.
    pub fn resolve(&self) -> GenerationRequest {
        let genre: Genre = or_default(self.genre.as_deref());
        let mood: Mood = or_default(self.mood.as_deref());

        let mut builder = GenerationRequest::builder(genre, mood)
            .prompt(self.prompt.clone().unwrap_or_default())
            .complexity(or_default(self.complexity.as_deref()))
            .mixing(or_default(self.mixing_style.as_deref()))
            .arrangement(or_default(self.arrange_style.as_deref()));

        if let Some(duration) = self.duration {
            builder = builder.duration_secs(duration);
        }
        if let Some(variations) = self.variations {
            builder = builder.variations(variations);
        }
        if let Some(bpm) = self.bpm {
            builder = builder.bpm(bpm);
        }
        if let Some(energy) = self.energy {
            let (low, high) = ENERGY_RANGE;
            if (low..=high).contains(&energy) {
                builder = builder.energy(energy);
            } else {
                warn!("energy {} outside {}..={}, ignored", energy, low, high);
            }
        }
        if let Some(key) = &self.key {
            match key.parse() {
                Ok(key) => builder = builder.key(key),
                Err(err) => warn!("{}, picking a key from the mood", err),
            }
        }
        if let Some(names) = &self.effects {
            let effects = names
                .iter()
                .filter_map(|name| match name.parse::<EffectKind>() {
                    Ok(kind) => Some(kind),
                    Err(err) => {
                        debug!("{}, skipped", err);
                        None
                    }
                })
                .collect();
            builder = builder.effects(effects);
        }

        builder.build()
    }
}

/// Descriptive metadata of one variation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationMetadata {
    pub bpm: u32,
    pub key: String,
    pub genre: Genre,
    pub mood: Mood,
    pub model_tag: String,
    pub unique_id: String,
    pub complexity: Complexity,
    pub arrangement: Vec<String>,
    pub effects_chain: Vec<EffectKind>,
    pub frequency_analysis: FrequencyAnalysis,
    pub seed: i32,
    pub chord_progression: Vec<String>,
    pub melody_variant: MelodyVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleTemplate>,
}

/// One rendered take. Owned entirely by the caller.
#[derive(Debug, Clone)]
pub struct Variation {
    /// 1-based.
    pub variation_number: u32,
    pub duration_secs: f64,
    pub audio: AudioAsset,
    pub metadata: VariationMetadata,
    pub template: MusicalTemplate,
}

impl Variation {
    pub fn metadata_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.metadata)
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Takes rendered by this process so far.
static TAKES: AtomicU64 = AtomicU64::new(0);

/// `edm_{seed}_{unix_ms}_{pid}-{take}_{n}`. The process id and take
/// counter keep ids apart when the same request renders twice in one
/// millisecond.
fn unique_id(seed: i32, number: u32) -> String {
    let take = TAKES.fetch_add(1, Ordering::Relaxed);
    format!(
        "edm_{}_{}_{}-{}_{}",
        seed,
        unix_millis(),
        std::process::id(),
        take,
        number
    )
}

fn is_retryable(err: &RenderError) -> bool {
    !matches!(err, RenderError::Cancelled | RenderError::EngineDisposed)
}

/// Map a render failure of variation `number` to what the caller sees.
fn variation_error(number: u32, err: RenderError) -> GenerateError {
    match err {
        RenderError::Cancelled => GenerateError::Cancelled,
        RenderError::EngineDisposed => {
            GenerateError::EngineUnavailable("audio engine has been disposed".to_string())
        }
        source => GenerateError::VariationFailed {
            variation: number,
            source,
        },
    }
}

/// Generation entry point. Owns one [`AudioEngine`].
pub struct Generator {
    config: GeneratorConfig,
    engine: AudioEngine,
    catalogue: Catalogue,
}

impl Generator {
    /// Fails with [`GenerateError::EngineUnavailable`] if the engine cannot
    /// run with `config`. The returned remote cancels renders in flight.
    pub fn new(config: GeneratorConfig) -> Result<(Self, EngineRemote)> {
        let (engine, remote) = AudioEngine::new(&config)?;
        let catalogue = Catalogue::generate(config.catalogue_seed, config.catalogue_size);
        info!(
            "generator ready: {} Hz, {} ch, block {}, {} catalogue styles",
            config.sample_rate,
            config.channels,
            config.block_size,
            catalogue.len()
        );
        Ok((
            Self {
                config,
                engine,
                catalogue,
            },
            remote,
        ))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn engine(&self) -> &AudioEngine {
        &self.engine
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// The `limit` most popular catalogue styles.
    pub fn popular_templates(&self, limit: usize) -> Vec<&StyleTemplate> {
        self.catalogue.popular(limit)
    }

    /// Render every variation of `request`. Either all of them come back or
    /// the call fails.
    pub fn generate(&mut self, request: &GenerationRequest) -> Result<Vec<Variation>> {
        let started = std::time::Instant::now();
        let variations = self.variations(request)?.collect::<Result<Vec<_>>>()?;
        info!(
            "generated {} variation(s) of {}/{} in {:.2?}",
            variations.len(),
            request.genre,
            request.mood,
            started.elapsed()
        );
        Ok(variations)
    }

    /// Variations of `request`, rendered one per `next()`. The iterator
    /// stops after the first error.
    pub fn variations<'a>(&'a mut self, request: &'a GenerationRequest) -> Result<Variations<'a>> {
        if self.engine.is_disposed() {
            return Err(GenerateError::EngineUnavailable(
                "audio engine has been disposed".to_string(),
            ));
        }
        request.validate(self.config.max_duration_secs)?;

        let base_seed = request.base_seed(self.config.seed_salt.as_deref());
        info!(
            "generating {} x {:.1} s of {} / {} ({}), base seed {}",
            request.variations,
            request.duration_secs,
            request.genre,
            request.mood,
            request.complexity,
            base_seed
        );

        Ok(Variations {
            generator: self,
            request,
            base_seed,
            next: 1,
            done: false,
        })
    }

    /// Compose, schedule and render variation `number` of `request`.
    pub fn render_variation(
        &mut self,
        request: &GenerationRequest,
        base_seed: i32,
        number: u32,
    ) -> Result<Variation> {
        let seed = variation_seed(base_seed, number);
        debug!("variation {} seed {}", number, seed);

        let template = Composer::new(request, seed, number)
            .with_catalogue(&self.catalogue)
            .compose();
        let arrangement = Arrangement::schedule(request.arrangement, request.duration_secs);

        let output = match self
            .engine
            .render(&template, &arrangement, request.duration_secs, number)
        {
            Ok(output) => output,
            Err(err) if self.config.retry_failed_variation && is_retryable(&err) => {
                warn!("variation {} failed ({}), retrying once", number, err);
                self.engine.reset();
                self.engine
                    .render(&template, &arrangement, request.duration_secs, number)
                    .map_err(|err| {
                        error!("variation {} failed again: {}", number, err);
                        variation_error(number, err)
                    })?
            }
            Err(err) => {
                if !err.is_cancelled() {
                    error!("variation {} failed: {}", number, err);
                }
                return Err(variation_error(number, err));
            }
        };

        let metadata = VariationMetadata {
            bpm: template.bpm,
            key: template.key.to_string(),
            genre: template.genre,
            mood: template.mood,
            model_tag: format!("{} v4.{}", self.config.model_name, number),
            unique_id: unique_id(seed, number),
            complexity: template.complexity,
            arrangement: arrangement.names(),
            effects_chain: template.effect_chain(),
            frequency_analysis: output.analysis,
            seed,
            chord_progression: template
                .chord_progression
                .iter()
                .map(ToString::to_string)
                .collect(),
            melody_variant: template.melody_variant,
            style: template.style.clone(),
        };

        Ok(Variation {
            variation_number: number,
            duration_secs: output.asset.duration_secs(),
            audio: output.asset,
            metadata,
            template,
        })
    }

    /// Release the engine. Idempotent; later calls fail with
    /// [`GenerateError::EngineUnavailable`].
    pub fn dispose(&mut self) {
        self.engine.dispose();
    }
}

/// Iterator returned by [`Generator::variations`].
pub struct Variations<'a> {
    generator: &'a mut Generator,
    request: &'a GenerationRequest,
    base_seed: i32,
    next: u32,
    done: bool,
}

impl Iterator for Variations<'_> {
    type Item = Result<Variation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.next > self.request.variations {
            return None;
        }
        let number = self.next;
        self.next += 1;

        let result = self
            .generator
            .render_variation(self.request, self.base_seed, number);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let left = (self.request.variations + 1).saturating_sub(self.next) as usize;
        (0, Some(left))
    }
}
