use crate::dsp::dynamics::Compressor;
use crate::graph::node::{GraphNode, RenderCtx};

/// Feed-forward compressor on a bus.
///
/// The follower coefficients depend on the sample rate, so the compressor is
/// built on the first block.
pub struct CompressorNode {
    threshold_db: f32,
    ratio: f32,
    attack: f32,
    release: f32,
    makeup_db: f32,
    compressor: Option<(Compressor, f32)>,
}

impl CompressorNode {
    pub fn new(threshold_db: f32, ratio: f32, attack: f32, release: f32) -> Self {
        Self {
            threshold_db,
            ratio: ratio.max(1.0),
            attack,
            release,
            makeup_db: 0.0,
            compressor: None,
        }
    }

    /// Bus glue: -18 dB, 4:1, fast attack.
    pub fn glue() -> Self {
        Self::new(-18.0, 4.0, 0.003, 0.25).with_makeup_db(4.0)
    }

    pub fn with_makeup_db(mut self, db: f32) -> Self {
        self.makeup_db = db;
        self.compressor = None;
        self
    }

    pub fn set_threshold_db(&mut self, db: f32) {
        self.threshold_db = db;
        if let Some((compressor, _)) = &mut self.compressor {
            compressor.set_threshold_db(db);
        }
    }

    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }
}

impl GraphNode for CompressorNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sample_rate = ctx.sample_rate;
        if !matches!(&self.compressor, Some((_, rate)) if *rate == sample_rate) {
            self.compressor = None;
        }

        let (threshold, ratio, attack, release, makeup) = (
            self.threshold_db,
            self.ratio,
            self.attack,
            self.release,
            self.makeup_db,
        );
        let (compressor, _) = self.compressor.get_or_insert_with(|| {
            let compressor = Compressor::new(threshold, ratio, attack, release, sample_rate)
                .with_makeup_db(makeup);
            (compressor, sample_rate)
        });

        for sample in out.iter_mut() {
            *sample = compressor.process(*sample);
        }
    }

    fn reset(&mut self) {
        if let Some((compressor, _)) = &mut self.compressor {
            compressor.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::mix::peak;

    #[test]
    fn squashes_loud_bus() {
        let ctx = RenderCtx::from_freq(48_000.0, 0.0, 100.0);
        let mut node = CompressorNode::new(-20.0, 8.0, 0.001, 0.1);

        let mut buffer = vec![0.9; 2_048];
        node.render_block(&mut buffer, &ctx);

        assert!(peak(&buffer[1_024..]) < 0.3, "peak {}", peak(&buffer[1_024..]));
    }

    #[test]
    fn quiet_signal_passes() {
        let ctx = RenderCtx::from_freq(48_000.0, 0.0, 100.0);
        let mut node = CompressorNode::new(-6.0, 4.0, 0.001, 0.1);

        let mut buffer = vec![0.05; 256];
        node.render_block(&mut buffer, &ctx);

        assert!(buffer.iter().all(|s| (*s - 0.05).abs() < 1e-6));
    }
}
