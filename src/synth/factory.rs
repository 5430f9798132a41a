use crate::graph::node::GraphNode;
use crate::voices::{Patch, VoiceRole};

/// Factory for creating voices with a specific patch/sound design
///
/// This is the "instrument design" layer - you configure your sound once,
/// then PolySynth uses this factory to create identical voices.
pub trait VoiceFactory: Send {
    type Voice: GraphNode;

    fn create_voice(&self) -> Self::Voice;
}

impl<F, T> VoiceFactory for F
where
    F: Fn() -> T + Send,
    T: GraphNode,
{
    type Voice = T;

    fn create_voice(&self) -> Self::Voice {
        self()
    }
}

/// A role is its own factory: every voice is a fresh copy of the role's graph.
impl VoiceFactory for VoiceRole {
    type Voice = Box<dyn GraphNode>;

    fn create_voice(&self) -> Self::Voice {
        self.build()
    }
}

impl VoiceFactory for Patch {
    type Voice = Box<dyn GraphNode>;

    fn create_voice(&self) -> Self::Voice {
        self.build()
    }
}
