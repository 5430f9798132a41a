//! Deterministic procedural EDM generator.
//!
//! A [`GenerationRequest`] (genre, mood, prompt, complexity, ...) is folded
//! into a seed, composed into a [`MusicalTemplate`](compose::MusicalTemplate),
//! laid over an [`Arrangement`](arrange::Arrangement) and rendered offline to
//! 16-bit WAV. The same request always yields the same audio.
//!
//! ```no_run
//! use edm_forge::{GenerationRequest, Generator, GeneratorConfig};
//! use edm_forge::theory::{Complexity, Genre, Mood};
//!
//! let (mut generator, _remote) = Generator::new(GeneratorConfig::default())?;
//! let request = GenerationRequest::builder(Genre::Techno, Mood::Dark)
//!     .prompt("underground minimal")
//!     .duration_secs(30.0)
//!     .complexity(Complexity::Simple)
//!     .variations(2)
//!     .build();
//!
//! for variation in generator.generate(&request)? {
//!     println!("{} ({} bytes)", variation.metadata.unique_id, variation.audio.bytes.len());
//! }
//! # Ok::<(), edm_forge::GenerateError>(())
//! ```

pub mod arrange; // Section scheduling
pub mod compose; // Seeded composition
pub mod config;
pub mod dsp;
pub mod error;
pub mod generate;
pub mod graph; // Composable audio graph nodes
pub mod record;
pub mod render; // Offline engine, transport, recorder
pub mod seed;
pub mod sequencing; // Musical timing and patterns
pub mod synth; // Voice management and polyphony
pub mod theory; // Static music-theory tables
pub mod voices; // Instrument and drum voices

pub use config::GeneratorConfig;
pub use error::{GenerateError, ParseError, RenderError};
pub use generate::{GenerationRequest, Generator, RawRequest, Variation, VariationMetadata};
pub use render::{AnalysisMode, AudioAsset, EngineRemote, FrequencyAnalysis};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
