use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::error::RenderError;

/*
Recorder
========

Captures the master bus and packages it as a 16-bit PCM WAV held in memory.
The master is mono until the very end; `finalize` fans each frame out to
every channel while encoding.

  Idle ──start──→ Recording ──finalize──→ Finalized
   ↑                  │
   └────discard───────┘

The transport refuses to start against a recorder that is not Recording, and
finalizing twice is an error rather than a second copy of the same take.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Finalized,
}

/// A finished take: WAV container bytes plus the format they describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioAsset {
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: usize,
}

impl AudioAsset {
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate.max(1) as f64
    }

    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }
}

pub struct Recorder {
    sample_rate: u32,
    channels: u16,
    tape: Vec<f32>,
    state: RecorderState,
}

impl Recorder {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels: channels.max(1),
            tape: Vec::new(),
            state: RecorderState::Idle,
        }
    }

    /// Arm the recorder. `expected_frames` only sizes the tape up front.
    pub fn start(&mut self, expected_frames: usize) -> Result<(), RenderError> {
        match self.state {
            RecorderState::Recording => Err(RenderError::RecorderAlreadyStarted),
            RecorderState::Finalized => Err(RenderError::RecorderAlreadyFinalized),
            RecorderState::Idle => {
                self.tape.clear();
                self.tape.reserve(expected_frames);
                self.state = RecorderState::Recording;
                Ok(())
            }
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Append a block of master output.
    pub fn push(&mut self, block: &[f32]) -> Result<(), RenderError> {
        match self.state {
            RecorderState::Recording => {
                self.tape.extend_from_slice(block);
                Ok(())
            }
            RecorderState::Idle => Err(RenderError::RecorderNotStarted),
            RecorderState::Finalized => Err(RenderError::RecorderAlreadyFinalized),
        }
    }

    pub fn frames(&self) -> usize {
        self.tape.len()
    }

    /// The mono take, valid while recording and after finalizing.
    pub fn tape(&self) -> &[f32] {
        &self.tape
    }

    /// Stop recording and encode the take.
    pub fn finalize(&mut self) -> Result<AudioAsset, RenderError> {
        match self.state {
            RecorderState::Idle => return Err(RenderError::RecorderNotStarted),
            RecorderState::Finalized => return Err(RenderError::RecorderAlreadyFinalized),
            RecorderState::Recording => {}
        }

        let bytes = encode_wav(&self.tape, self.sample_rate, self.channels)?;
        self.state = RecorderState::Finalized;

        Ok(AudioAsset {
            bytes,
            sample_rate: self.sample_rate,
            channels: self.channels,
            frames: self.tape.len(),
        })
    }

    /// Throw the take away and return to Idle.
    pub fn discard(&mut self) {
        self.tape.clear();
        self.state = RecorderState::Idle;
    }
}

fn encode_wav(tape: &[f32], sample_rate: u32, channels: u16) -> Result<Vec<u8>, RenderError> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + tape.len() * 2 * channels as usize));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in tape {
            let quantized = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
            for _ in 0..channels {
                writer.write_sample(quantized)?;
            }
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
