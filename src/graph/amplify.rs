use crate::{
    graph::node::{GraphNode, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Amplify: signal × modulator
===========================

    [signal] ──┬──→ (×) ──→ out
    [mod]    ──┘

With an envelope as the modulator this is a VCA, the usual way a voice gets
its amplitude shape. With an audio-rate oscillator it is ring modulation.

The node is active while either side is; in practice that is the envelope.
*/

pub struct Amplify<N, M> {
    pub signal: N,
    pub modulator: M,
    temp_buffer: Vec<f32>,
}

impl<N, M> Amplify<N, M> {
    pub fn new(signal: N, modulator: M) -> Self {
        Self {
            signal,
            modulator,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<N: GraphNode, M: GraphNode> GraphNode for Amplify<N, M> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.signal.render_block(out, ctx);

        let frames = &mut self.temp_buffer[..out.len()];
        frames.fill(0.0);
        self.modulator.render_block(frames, ctx);

        for (o, m) in out.iter_mut().zip(frames.iter()) {
            *o *= *m;
        }
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.signal.note_on(ctx);
        self.modulator.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.signal.note_off(ctx);
        self.modulator.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.signal.is_active() || self.modulator.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.modulator
            .get_envelope_level()
            .or_else(|| self.signal.get_envelope_level())
    }

    fn reset(&mut self) {
        self.signal.reset();
        self.modulator.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    #[test]
    fn idle_envelope_silences_signal() {
        let mut node = OscNode::sawtooth().amplify(EnvNode::adsr(0.01, 0.1, 0.5, 0.1));
        let mut buffer = vec![1.0; 256];
        node.render_block(&mut buffer, &RenderCtx::from_freq(48_000.0, 220.0, 100.0));

        assert!(buffer.iter().all(|&s| s == 0.0));
        assert!(!node.is_active());
    }

    #[test]
    fn gated_envelope_lets_signal_through() {
        let ctx = RenderCtx::from_freq(48_000.0, 220.0, 100.0);
        let mut node = OscNode::sawtooth().amplify(EnvNode::adsr(0.001, 0.1, 0.5, 0.1));
        node.note_on(&ctx);

        let mut buffer = vec![0.0; 512];
        node.render_block(&mut buffer, &ctx);

        assert!(buffer.iter().any(|s| s.abs() > 0.1));
        assert!(node.is_active());
    }
}
