use crate::dsp::delay::DelayLine;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Pitch Shifter
=============

Delay-line pitch shifting: two read heads sweep through a short window at a
rate set by the pitch ratio, half a window apart. Each head fades in and out
with a triangular window so the jump back to the start of the window is
never heard.

  ratio = 2^(semitones / 12)
  head delay moves by (1 - ratio) samples per sample, wrapped to the window
*/

const WINDOW_SECS: f32 = 0.05;

pub struct PitchShiftNode {
    semitones: f32,
    mix: f32,
    delay_line: DelayLine,
    position: f32,
}

impl PitchShiftNode {
    pub fn new(semitones: f32, mix: f32) -> Self {
        Self {
            semitones: semitones.clamp(-24.0, 24.0),
            mix: mix.clamp(0.0, 1.0),
            delay_line: DelayLine::with_capacity(16_384),
            position: 0.0,
        }
    }

    pub fn semitones(&self) -> f32 {
        self.semitones
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for PitchShiftNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let window = (WINDOW_SECS * ctx.sample_rate).min(self.delay_line.capacity() as f32 - 4.0);
        let ratio = 2.0_f32.powf(self.semitones / 12.0);

        for sample in out.iter_mut() {
            let dry = *sample;
            self.delay_line.write(dry);

            self.position = (self.position + 1.0 - ratio).rem_euclid(window);
            let other = (self.position + window * 0.5).rem_euclid(window);

            let gain_a = 1.0 - (2.0 * self.position / window - 1.0).abs();
            let gain_b = 1.0 - (2.0 * other / window - 1.0).abs();

            let wet = self.delay_line.read_interpolated(self.position + 1.0) * gain_a
                + self.delay_line.read_interpolated(other + 1.0) * gain_b;

            *sample = dry * (1.0 - self.mix) + wet * self.mix;
        }
    }

    fn reset(&mut self) {
        self.delay_line.reset();
        self.position = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::mix::rms;
    use std::f32::consts::TAU;

    fn zero_crossings(buffer: &[f32]) -> usize {
        buffer.windows(2).filter(|w| w[0] <= 0.0 && w[1] > 0.0).count()
    }

    #[test]
    fn octave_up_doubles_the_crossings() {
        let sr = 48_000.0;
        let ctx = RenderCtx::from_freq(sr, 0.0, 100.0);
        let mut shifter = PitchShiftNode::new(12.0, 1.0);

        let mut buffer: Vec<f32> = (0..48_000).map(|n| (TAU * 200.0 * n as f32 / sr).sin()).collect();
        for chunk in buffer.chunks_mut(256) {
            shifter.render_block(chunk, &ctx);
        }

        let settled = &buffer[4_800..];
        let crossings = zero_crossings(settled) as f32;
        let expected = 400.0 * settled.len() as f32 / sr;
        assert!(
            (crossings - expected).abs() / expected < 0.15,
            "{} crossings, expected about {}",
            crossings,
            expected
        );
        assert!(rms(settled) > 0.3);
    }
}
