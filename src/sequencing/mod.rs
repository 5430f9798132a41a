//! Musical time: durations and tempo, pitch symbols, step grids, and the
//! tick-stamped event timeline the transport plays.

pub mod duration;
pub mod pitch;
pub mod sequence;
pub mod step;

pub use duration::{Duration, Tempo};
pub use pitch::Pitch;
pub use sequence::{EventKind, Sequence, SequenceBuilder, SequenceError, SequenceEvent};
pub use step::StepPattern;
