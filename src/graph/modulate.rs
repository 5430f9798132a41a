use crate::{
    dsp::modulate::{apply_modulation, block_average},
    graph::node::{GraphNode, Modulatable, RenderCtx},
    MAX_BLOCK_SIZE,
};

/*
Modulate: control signal → parameter
====================================

    [modulator] ──avg──→ base + avg·depth ──→ param of [source]
    [source]    ─────────────────────────────────────────→ out

Examples in this crate:

    kick pitch drop   OscNode.modulate(EnvNode, OscParam::Frequency, 120.0)
    wobble bass       FilterNode.modulate(LfoNode, FilterParam::Cutoff, 600.0)
    auto-filter       FilterNode.modulate(LfoNode, FilterParam::Cutoff, depth)

The base value is read once at construction, so automation that later moves
the source's own parameter should not be combined with a Modulate wrapper.
*/

pub struct Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    source: S,
    lfo: L,
    param: S::Param,
    base: f32,
    depth: f32,
    lfo_buffer: Vec<f32>,
}

impl<S, L> Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    pub fn new(source: S, lfo: L, param: S::Param, depth: f32) -> Self {
        let base = source.get_param(param);
        Self {
            source,
            lfo,
            param,
            base,
            depth,
            lfo_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl<S, L> GraphNode for Modulate<S, L>
where
    S: GraphNode + Modulatable,
    L: GraphNode,
{
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len();
        self.lfo.render_block(&mut self.lfo_buffer[..len], ctx);

        let avg = block_average(&self.lfo_buffer[..len]);
        let target = apply_modulation(self.base, avg, self.depth);
        self.source
            .apply_modulation(self.param, self.base, target - self.base);

        self.source.render_block(out, ctx);
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        self.source.note_on(ctx);
        self.lfo.note_on(ctx);
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        self.source.note_off(ctx);
        self.lfo.note_off(ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active()
    }

    fn get_envelope_level(&self) -> Option<f32> {
        self.source.get_envelope_level()
    }

    fn reset(&mut self) {
        self.source.reset();
        self.lfo.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{
        extensions::NodeExt,
        filter::{FilterNode, FilterParam},
        lfo::LfoNode,
    };

    #[test]
    fn extreme_depth_stays_finite() {
        let mut node =
            FilterNode::lowpass(1_000.0).modulate(LfoNode::square(1.0), FilterParam::Cutoff, 1.0e5);
        let mut buffer: Vec<f32> = (0..1024).map(|i| ((i % 7) as f32 - 3.0) / 3.0).collect();
        node.render_block(&mut buffer, &RenderCtx::from_freq(48_000.0, 440.0, 100.0));

        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn base_value_is_captured_from_source() {
        let node = FilterNode::lowpass(750.0).modulate(LfoNode::sine(2.0), FilterParam::Cutoff, 100.0);
        assert_eq!(node.base, 750.0);
    }
}
