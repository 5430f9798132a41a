use thiserror::Error;

use crate::sequencing::SequenceError;

/// A string did not name a known value of a closed enum, or did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown {kind} `{value}`")]
    Unknown { kind: &'static str, value: String },
    #[error("invalid {kind} `{value}`")]
    Invalid { kind: &'static str, value: String },
}

/// Failure while rendering one variation.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("recorder already started")]
    RecorderAlreadyStarted,
    #[error("recorder not started")]
    RecorderNotStarted,
    #[error("recorder already finalized")]
    RecorderAlreadyFinalized,
    #[error("transport not started")]
    TransportNotStarted,
    #[error("transport stalled at tick {tick}")]
    TransportStalled { tick: u64 },
    #[error("invalid event timeline: {0}")]
    Sequence(#[from] SequenceError),
    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),
    #[error("audio engine has been disposed")]
    EngineDisposed,
    #[error("render cancelled")]
    Cancelled,
}

impl RenderError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RenderError::Cancelled)
    }
}

/// Failure of a whole `generate` call. One variant per user-facing message.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("audio engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("generation failed for variation {variation}, please retry")]
    VariationFailed {
        variation: u32,
        #[source]
        source: RenderError,
    },
    #[error("generation cancelled")]
    Cancelled,
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
