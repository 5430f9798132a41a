use crate::graph::node::{GraphNode, RenderCtx};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Playing, envelope in attack/decay/sustain
    Releasing, // Key released, envelope in release phase
}

/// A single voice that can play any GraphNode
///
/// Velocity is normalized to 0.0 - 1.0 and applied as output gain; the graph
/// also sees it MIDI-scaled in its [`RenderCtx`].
pub struct Voice<T: GraphNode> {
    note: u8,
    velocity: f32,
    state: VoiceState,
    age: u64,
    sample_rate: f32,
    graph: T,
}

impl<T: GraphNode> Voice<T> {
    pub fn new(graph: T, sample_rate: f32) -> Self {
        Self {
            note: 0,
            velocity: 0.0,
            state: VoiceState::Free,
            age: 0,
            sample_rate,
            graph,
        }
    }

    fn ctx(&self) -> RenderCtx {
        RenderCtx::from_note(self.sample_rate, self.note, self.velocity * 127.0)
    }

    pub fn start(&mut self, note: u8, velocity: f32, age: u64) {
        self.note = note;
        self.velocity = velocity.clamp(0.0, 1.0);
        self.state = VoiceState::Active;
        self.age = age;

        let ctx = self.ctx();
        self.graph.note_on(&ctx);
    }

    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;

            let ctx = self.ctx();
            self.graph.note_off(&ctx);
        }
    }

    /// Render into `out`, overwriting it.
    pub fn render(&mut self, out: &mut [f32]) {
        let ctx = self.ctx();
        self.graph.render_block(out, &ctx);

        for sample in out.iter_mut() {
            *sample *= self.velocity;
        }

        // Envelope finished: give the voice back
        if self.state != VoiceState::Free && !self.graph.is_active() {
            self.free();
        }
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn get_envelope_level(&self) -> Option<f32> {
        self.graph.get_envelope_level()
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.note = 0;
        self.velocity = 0.0;
    }

    /// Silence the graph and free the voice. Used on cancellation, where
    /// tails must not leak into the next render.
    pub fn reset(&mut self) {
        self.graph.reset();
        self.free();
    }

    pub fn note(&self) -> u8 {
        self.note
    }

    pub fn age(&self) -> u64 {
        self.age
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    fn voice() -> Voice<impl GraphNode> {
        Voice::new(
            OscNode::sine().amplify(EnvNode::adsr(0.001, 0.01, 0.5, 0.01)),
            48_000.0,
        )
    }

    #[test]
    fn release_then_silence_frees_the_voice() {
        let mut v = voice();
        v.start(60, 1.0, 0);
        let mut out = vec![0.0; 256];
        v.render(&mut out);
        assert_eq!(v.state(), VoiceState::Active);

        v.release();
        assert_eq!(v.state(), VoiceState::Releasing);
        for _ in 0..4 {
            v.render(&mut out);
        }
        assert!(v.is_free());
    }

    #[test]
    fn velocity_scales_output() {
        let mut loud = voice();
        let mut soft = voice();
        loud.start(60, 1.0, 0);
        soft.start(60, 0.25, 0);

        let mut a = vec![0.0; 512];
        let mut b = vec![0.0; 512];
        loud.render(&mut a);
        soft.render(&mut b);

        for (x, y) in a.iter().zip(&b) {
            assert!((x * 0.25 - y).abs() < 1e-6);
        }
    }

    #[test]
    fn reset_frees_immediately() {
        let mut v = voice();
        v.start(64, 0.8, 0);
        v.reset();
        assert!(v.is_free());
        assert_eq!(v.get_envelope_level(), Some(0.0));
    }
}
