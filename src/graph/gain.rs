use crate::graph::node::{GraphNode, RenderCtx};

/// Fixed gain stage. Voices use it to level-match presets against each other.
pub struct Gain<N> {
    source: N,
    gain: f32,
}

impl<N> Gain<N> {
    pub fn new(source: N, gain: f32) -> Self {
        Self { source, gain }
    }
}

impl<N: GraphNode> GraphNode for Gain<N> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        crate::dsp::mix::apply_gain(out, self.gain);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source.get_envelope_level()
    }

    fn reset(&mut self) {
        self.source.reset();
    }
}
