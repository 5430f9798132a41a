//! Low-level DSP primitives used by the graph nodes.
//!
//! Nothing here knows about notes, voices or tracks: each type is a small
//! piece of signal math with explicit state, sized once at construction.

/// Circular delay line with fractional reads.
pub mod delay;
/// Waveshapers and bit reduction.
pub mod distortion;
/// Envelope follower and compressor.
pub mod dynamics;
/// Linear ADSR envelope.
pub mod envelope;
/// Topology-preserving state-variable filter.
pub mod filter;
/// Crossfade, summing and metering helpers.
pub mod mix;
/// Block-rate modulation math.
pub mod modulate;
/// Phase-accumulator oscillator and seeded noise.
pub mod oscillator;
/// Schroeder reverb.
pub mod reverb;

pub use envelope::{Adsr, EnvelopeState};
