//! Offline renderer: template + arrangement → WAV bytes.
//!
//! [`AudioEngine`] owns the voice bank, both effect banks and the control
//! queue. A render builds a [`Sequence`](crate::sequencing::Sequence) from
//! the template, plays it through a [`Transport`] into a [`Recorder`], and
//! summarizes the result with a [`FrequencyAnalysis`].

pub mod analysis;
pub mod effects;
pub mod engine;
pub mod recorder;
pub mod timeline;
pub mod transport;
pub mod voice_bank;

pub use analysis::{AnalysisMode, FrequencyAnalysis};
pub use effects::{EffectBank, EffectUnit};
pub use engine::{AudioEngine, EngineMessage, EngineRemote, RenderOutput};
pub use recorder::{AudioAsset, Recorder, RecorderState};
pub use timeline::build_sequence;
pub use transport::{Transport, TransportEvent};
pub use voice_bank::VoiceBank;
