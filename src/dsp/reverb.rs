//! Schroeder reverb.
//!
//! Four damped feedback combs in parallel feed two allpass diffusers in series:
//!
//! ```text
//! in ──┬──→ [comb 29.7ms] ──┐
//!      ├──→ [comb 37.1ms] ──┤
//!      ├──→ [comb 41.1ms] ──┼──→ (+)/4 ──→ [allpass 5.0ms] ──→ [allpass 1.7ms] ──→ out
//!      └──→ [comb 43.7ms] ──┘
//! ```
//!
//! Comb lengths are mutually prime in samples at common rates so their echoes
//! don't stack into a pitched ring. Buffers are sized from the sample rate once,
//! at construction.
//!
//! `room_size` maps onto comb feedback (0.70 - 0.98); `damping` is the
//! coefficient of the one-pole lowpass inside each comb's feedback path.

const COMB_TUNING_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_TUNING_MS: [f32; 2] = [5.0, 1.7];

fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    ((ms * sample_rate / 1000.0) as usize).max(1)
}

/// Feedback comb with a damped (lowpassed) feedback path.
pub struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            pos: 0,
            feedback: 0.5,
            damp: 0.5,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.pos];
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;
        self.buffer[self.pos] = input + self.filter_state * self.feedback;
        self.pos = (self.pos + 1) % self.buffer.len();
        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.filter_state = 0.0;
        self.pos = 0;
    }
}

/// Schroeder allpass diffuser.
pub struct AllpassFilter {
    buffer: Vec<f32>,
    pos: usize,
    gain: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            pos: 0,
            gain: 0.5,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let output = -self.gain * input + delayed;
        self.buffer[self.pos] = input + self.gain * output;
        self.pos = (self.pos + 1) % self.buffer.len();
        output
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
}

impl SchroederReverb {
    pub fn new(sample_rate: f32) -> Self {
        let combs = COMB_TUNING_MS.map(|ms| CombFilter::new(ms_to_samples(ms, sample_rate)));
        let allpasses =
            ALLPASS_TUNING_MS.map(|ms| AllpassFilter::new(ms_to_samples(ms, sample_rate)));

        let mut reverb = Self { combs, allpasses };
        reverb.set_room_size(0.5);
        reverb.set_damping(0.5);
        reverb
    }

    pub fn set_room_size(&mut self, size: f32) {
        let feedback = 0.7 + size.clamp(0.0, 1.0) * 0.28;
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    pub fn set_damping(&mut self, damp: f32) {
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input);
        }
        output *= 0.25;

        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }
        output
    }

    pub fn reset(&mut self) {
        self.combs.iter_mut().for_each(CombFilter::reset);
        self.allpasses.iter_mut().for_each(AllpassFilter::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comb_echoes_after_its_length() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);

        assert_eq!(comb.process(1.0), 0.0);
        for _ in 0..9 {
            comb.process(0.0);
        }
        assert!((comb.process(0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn impulse_leaves_a_decaying_tail() {
        let mut reverb = SchroederReverb::new(44_100.0);
        reverb.process(1.0);

        let early: f32 = (0..4_410).map(|_| reverb.process(0.0).powi(2)).sum();
        let late: f32 = (0..4_410).map(|_| reverb.process(0.0).powi(2)).sum();

        assert!(early > 0.0, "no tail at all");
        assert!(late < early, "tail should decay ({} vs {})", late, early);
    }

    #[test]
    fn reset_silences_tail() {
        let mut reverb = SchroederReverb::new(44_100.0);
        reverb.process(1.0);
        for _ in 0..100 {
            reverb.process(0.0);
        }
        reverb.reset();

        assert!((0..4_000).all(|_| reverb.process(0.0) == 0.0));
    }
}
