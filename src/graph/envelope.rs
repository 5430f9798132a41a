use crate::dsp::envelope::{Adsr, Envelope};
use crate::graph::node::{GraphNode, RenderCtx};

/// ADSR envelope as a graph node.
///
/// Renders the envelope level itself; combine with `.amplify()` to gate a
/// source, or with `.modulate()` to sweep a parameter. This is the node that
/// keeps a voice alive: a voice counts as sounding while any envelope inside
/// it is not idle.
pub struct EnvNode {
    env: Envelope,
}

impl EnvNode {
    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            env: Envelope::adsr(attack, decay, sustain, release),
        }
    }

    pub fn from_shape(shape: Adsr) -> Self {
        Self {
            env: Envelope::from_shape(shape),
        }
    }

    pub fn shape(&self) -> Adsr {
        self.env.shape()
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.env.render(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.env.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.env.note_off(ctx);
    }

    fn get_envelope_level(&self) -> Option<f32> {
        Some(self.env.level())
    }

    fn is_active(&self) -> bool {
        self.env.is_active()
    }

    fn reset(&mut self) {
        self.env.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_controls_activity() {
        let ctx = RenderCtx::from_note(48_000.0, 60, 100.0);
        let mut env = EnvNode::adsr(0.001, 0.01, 0.5, 0.01);
        assert!(!env.is_active());

        env.note_on(&ctx);
        let mut buffer = vec![0.0; 1_024];
        env.render_block(&mut buffer, &ctx);
        assert!(env.is_active());
        assert!((env.get_envelope_level().unwrap_or(0.0) - 0.5).abs() < 1e-3);

        env.note_off(&ctx);
        env.render_block(&mut buffer, &ctx);
        assert!(!env.is_active(), "release of 480 samples should finish in 1024");
    }

    #[test]
    fn reset_returns_to_idle() {
        let ctx = RenderCtx::from_note(48_000.0, 60, 100.0);
        let mut env = EnvNode::adsr(0.5, 0.5, 0.8, 0.5);
        env.note_on(&ctx);
        let mut buffer = vec![0.0; 64];
        env.render_block(&mut buffer, &ctx);

        env.reset();
        assert!(!env.is_active());
        assert_eq!(env.get_envelope_level(), Some(0.0));
    }
}
