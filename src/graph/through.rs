use crate::graph::node::{GraphNode, RenderCtx};

/*
Through: serial chaining
========================

    [source] ──→ [effect] ──→ out

The source renders into the buffer, the effect processes it in place. Voices
are built from these links (osc → filter, osc·env → filter), and so are the
bus effect chains in the renderer.
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }

    pub fn effect_mut(&mut self) -> &mut F {
        &mut self.filter
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.filter.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.filter.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() || self.filter.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source.get_envelope_level()
    }

    fn reset(&mut self) {
        self.source.reset();
        self.filter.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        envelope::EnvNode, extensions::NodeExt, filter::FilterNode, oscillator::OscNode,
    };

    fn ctx() -> RenderCtx {
        RenderCtx::from_freq(48_000.0, 440.0, 100.0)
    }

    #[test]
    fn stays_active_while_envelope_releases() {
        let mut node = OscNode::sine()
            .amplify(EnvNode::adsr(0.01, 0.05, 0.6, 0.2))
            .through(FilterNode::lowpass(2_000.0));

        node.note_on(&ctx());
        node.note_off(&ctx());

        assert!(node.is_active());
        assert!(node.get_envelope_level().is_some());
    }

    #[test]
    fn filter_alone_does_not_hold_voice() {
        let node = OscNode::sine().through(FilterNode::lowpass(2_000.0));
        assert!(!node.is_active());
    }
}
