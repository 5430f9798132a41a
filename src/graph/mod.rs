//! Composable building blocks for constructing audio-processing graphs.
//!
//! Graph nodes wrap the low-level DSP primitives with ergonomics needed for
//! instrument design: note events, modulation, and block-based rendering. The
//! `extensions` module adds fluent helpers so voices can be authored with a
//! clear, chainable API, and every effect unit the renderer routes is a node
//! here.

/// Multiply two signals together (amplitude or ring modulation).
pub mod amplify;
/// Envelope-driven bandpass wah.
pub mod autowah;
/// Modulated short delay for thickening.
pub mod chorus;
/// Bus compressor.
pub mod compressor;
/// Feedback echo.
pub mod delay;
/// Clip curves, Chebyshev waveshaper and bitcrusher.
pub mod distortion;
/// Envelope generator node exposing ADSR state.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.mix()`, etc.).
pub mod extensions;
/// Topology-preserving filter node with multiple responses.
pub mod filter;
/// Fixed gain stage.
pub mod gain;
/// Low frequency oscillators for parameter modulation.
pub mod lfo;
/// Linear wet/dry mixing for parallel graphs.
pub mod mix;
/// Connect modulation sources to node parameters.
pub mod modulate;
/// Core traits shared by all graph nodes.
pub mod node;
/// Audio-band oscillators, noise sources and the supersaw stack.
pub mod oscillator;
/// Swept allpass phaser.
pub mod phaser;
/// Delay-line pitch shifter.
pub mod pitch_shift;
/// Schroeder reverb node.
pub mod reverb;
/// Serial chaining of two nodes (source → effect).
pub mod through;
/// Amplitude LFO.
pub mod tremolo;

pub use extensions::NodeExt;
pub use node::{midi_note_to_freq, GraphNode, Modulatable, RenderCtx};
