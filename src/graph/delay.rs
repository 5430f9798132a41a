use crate::{
    dsp::delay::DelayLine,
    graph::node::{GraphNode, Modulatable, RenderCtx},
};

/// Feedback echo.
///
/// ```text
/// in ──┬────────────────────────────(dry)──→ (+) ──→ out
///      └─→ (+) ──→ [delay] ──┬──────(wet)───↗
///           ↑                │
///           └── feedback ────┘
/// ```
///
/// The delay time is in seconds so it can be nudged per variation; the line
/// is sized for two seconds at 96 kHz and the time is clamped to fit.
pub struct DelayNode {
    delay_line: DelayLine,
    time_secs: f32,
    feedback: f32,
    mix: f32,
}

#[derive(Clone, Copy, Debug)]
pub enum DelayParam {
    Time,
    Feedback,
    Mix,
}

impl DelayNode {
    pub fn new(time_secs: f32, feedback: f32, mix: f32) -> Self {
        Self {
            delay_line: DelayLine::new(),
            time_secs: time_secs.max(0.0),
            feedback: feedback.clamp(0.0, 0.95),
            mix: mix.clamp(0.0, 1.0),
        }
    }

    pub fn time(&self) -> f32 {
        self.time_secs
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn set_time(&mut self, secs: f32) {
        self.time_secs = secs.max(0.0);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.95);
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for DelayNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let delay_samples = ((self.time_secs * ctx.sample_rate) as usize).max(1);

        for sample in out.iter_mut() {
            let dry = *sample;
            let wet = self.delay_line.read(delay_samples);
            self.delay_line.write(dry + wet * self.feedback);
            *sample = dry * (1.0 - self.mix) + wet * self.mix;
        }
    }

    fn reset(&mut self) {
        self.delay_line.reset();
    }
}

impl Modulatable for DelayNode {
    type Param = DelayParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            DelayParam::Time => self.time_secs,
            DelayParam::Feedback => self.feedback,
            DelayParam::Mix => self.mix,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            DelayParam::Time => self.set_time(base + modulation),
            DelayParam::Feedback => self.set_feedback(base + modulation),
            DelayParam::Mix => self.set_mix(base + modulation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_arrives_after_delay_time() {
        let ctx = RenderCtx::from_freq(1_000.0, 0.0, 100.0);
        // 10 ms at 1 kHz = 10 samples
        let mut delay = DelayNode::new(0.01, 0.0, 1.0);

        let mut buffer = vec![0.0; 32];
        buffer[0] = 1.0;
        delay.render_block(&mut buffer, &ctx);

        assert_eq!(buffer[0], 0.0);
        assert!((buffer[10] - 1.0).abs() < 1e-6, "echo at {:?}", buffer);
        assert!(buffer[20].abs() < 1e-6, "no feedback requested");
    }

    #[test]
    fn feedback_repeats_and_decays() {
        let ctx = RenderCtx::from_freq(1_000.0, 0.0, 100.0);
        let mut delay = DelayNode::new(0.01, 0.5, 1.0);

        let mut buffer = vec![0.0; 32];
        buffer[0] = 1.0;
        delay.render_block(&mut buffer, &ctx);

        assert!((buffer[20] - 0.5).abs() < 1e-6);
        assert!((buffer[30] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn reset_drops_pending_echoes() {
        let ctx = RenderCtx::from_freq(1_000.0, 0.0, 100.0);
        let mut delay = DelayNode::new(0.01, 0.5, 1.0);
        let mut buffer = vec![0.0; 4];
        buffer[0] = 1.0;
        delay.render_block(&mut buffer, &ctx);

        delay.reset();
        let mut silence = vec![0.0; 64];
        delay.render_block(&mut silence, &ctx);
        assert!(silence.iter().all(|s| *s == 0.0));
    }
}
