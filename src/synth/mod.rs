// Purpose: voice management and polyphony
// This layer sits above graph nodes and owns many copies of one voice graph

pub mod factory;
pub mod poly;
pub mod voice;

pub use factory::VoiceFactory;
pub use poly::PolySynth;
pub use voice::{Voice, VoiceState};
