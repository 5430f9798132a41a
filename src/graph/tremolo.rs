use std::f32::consts::TAU;

use crate::graph::node::{GraphNode, RenderCtx};

/// Amplitude LFO. Depth 1.0 swings the gain all the way to silence.
pub struct TremoloNode {
    rate: f32,
    depth: f32,
    phase: f32,
}

impl TremoloNode {
    pub fn new(rate: f32, depth: f32) -> Self {
        Self {
            rate: rate.clamp(0.01, 40.0),
            depth: depth.clamp(0.0, 1.0),
            phase: 0.0,
        }
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.0, 1.0);
    }
}

impl GraphNode for TremoloNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let phase_inc = TAU * self.rate / ctx.sample_rate;

        for sample in out.iter_mut() {
            let lfo = 0.5 + 0.5 * self.phase.sin();
            *sample *= 1.0 - self.depth * lfo;

            self.phase += phase_inc;
            if self.phase >= TAU {
                self.phase -= TAU;
            }
        }
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_is_transparent() {
        let ctx = RenderCtx::from_freq(48_000.0, 0.0, 100.0);
        let mut node = TremoloNode::new(5.0, 0.0);
        let mut buffer = vec![0.5; 512];
        node.render_block(&mut buffer, &ctx);
        assert!(buffer.iter().all(|s| *s == 0.5));
    }

    #[test]
    fn full_depth_reaches_silence() {
        let ctx = RenderCtx::from_freq(48_000.0, 0.0, 100.0);
        let mut node = TremoloNode::new(10.0, 1.0);
        let mut buffer = vec![1.0; 4_800];
        node.render_block(&mut buffer, &ctx);

        let min = buffer.iter().cloned().fold(f32::MAX, f32::min);
        let max = buffer.iter().cloned().fold(f32::MIN, f32::max);
        assert!(min < 0.01, "min {}", min);
        assert!(max > 0.99, "max {}", max);
    }
}
