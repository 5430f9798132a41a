use crate::{
    dsp::mix::sum_in_place,
    synth::{
        factory::VoiceFactory,
        voice::{Voice, VoiceState},
    },
    MAX_BLOCK_SIZE,
};

/*
Polyphony
=========

A fixed pool of identical voices built from one factory. Note events come in
directly from the renderer, which has already split the block at event
boundaries, so every call here is sample-accurate.

Allocation on note_on:

  1. any free voice
  2. the oldest voice in its release tail
  3. the oldest voice still held

Step three only happens when a pattern outruns the pool; cutting the oldest
note is the least audible choice.
*/

pub struct PolySynth<F: VoiceFactory> {
    voices: Vec<Voice<F::Voice>>,
    temp_buffer: Vec<f32>,
    frame_counter: u64,
}

impl<F: VoiceFactory> PolySynth<F> {
    pub fn new(factory: &F, sample_rate: f32, max_voices: usize) -> Self {
        let voices = (0..max_voices.max(1))
            .map(|_| Voice::new(factory.create_voice(), sample_rate))
            .collect();

        Self {
            voices,
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: f32) {
        let age = self.frame_counter;
        let voice = self.allocate_voice();
        if voice.is_active() {
            // Stolen: drop the old tail before the new attack
            voice.reset();
        }
        voice.start(note, velocity, age);
    }

    pub fn note_off(&mut self, note: u8) {
        if let Some(voice) = self
            .voices
            .iter_mut()
            .filter(|v| v.note() == note && v.state() == VoiceState::Active)
            .min_by_key(|v| v.age())
        {
            voice.release();
        }
    }

    pub fn release_all(&mut self) {
        for voice in &mut self.voices {
            voice.release();
        }
    }

    /// Hard stop: every voice is silenced and freed.
    pub fn reset(&mut self) {
        for voice in &mut self.voices {
            voice.reset();
        }
        self.frame_counter = 0;
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn is_silent(&self) -> bool {
        self.active_voices() == 0
    }

    /// Render the sum of all sounding voices into `out`, overwriting it.
    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for voice in &mut self.voices {
            if voice.is_active() {
                let temp = &mut self.temp_buffer[..out.len()];
                voice.render(temp);
                sum_in_place(out, temp);
            }
        }

        self.frame_counter += out.len() as u64;
    }

    fn allocate_voice(&mut self) -> &mut Voice<F::Voice> {
        let index = self
            .voices
            .iter()
            .position(|v| v.is_free())
            .or_else(|| self.oldest_in(VoiceState::Releasing))
            .or_else(|| self.oldest_in(VoiceState::Active))
            .unwrap_or(0);

        &mut self.voices[index]
    }

    fn oldest_in(&self, state: VoiceState) -> Option<usize> {
        self.voices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.state() == state)
            .min_by_key(|(_, v)| v.age())
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{envelope::EnvNode, extensions::NodeExt, oscillator::OscNode};

    fn synth(voices: usize) -> PolySynth<impl VoiceFactory> {
        let factory = || OscNode::sine().amplify(EnvNode::adsr(0.001, 0.01, 0.8, 0.05));
        PolySynth::new(&factory, 48_000.0, voices)
    }

    #[test]
    fn chord_uses_three_voices() {
        let mut poly = synth(4);
        for note in [60, 64, 67] {
            poly.note_on(note, 0.8);
        }
        assert_eq!(poly.active_voices(), 3);
    }

    #[test]
    fn full_pool_steals_oldest_releasing_first() {
        let mut poly = synth(2);
        let mut out = vec![0.0; 64];

        poly.note_on(60, 1.0);
        poly.render_block(&mut out);
        poly.note_on(62, 1.0);
        poly.render_block(&mut out);
        poly.note_off(62);

        poly.note_on(64, 1.0);
        let notes: Vec<u8> = poly.voices.iter().map(|v| v.note()).collect();
        assert!(notes.contains(&60));
        assert!(notes.contains(&64));
        assert!(!notes.contains(&62));
    }

    #[test]
    fn full_pool_steals_oldest_held_last() {
        let mut poly = synth(2);
        let mut out = vec![0.0; 64];

        poly.note_on(60, 1.0);
        poly.render_block(&mut out);
        poly.note_on(62, 1.0);
        poly.render_block(&mut out);
        poly.note_on(64, 1.0);

        let notes: Vec<u8> = poly.voices.iter().map(|v| v.note()).collect();
        assert_eq!(notes, vec![64, 62]);
    }

    #[test]
    fn reset_silences_everything() {
        let mut poly = synth(4);
        poly.note_on(60, 1.0);
        poly.note_on(67, 1.0);
        poly.reset();

        let mut out = vec![1.0; 128];
        poly.render_block(&mut out);
        assert!(poly.is_silent());
        assert!(out.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn released_notes_return_to_the_pool() {
        let mut poly = synth(4);
        let mut out = vec![0.0; 256];
        poly.note_on(60, 1.0);
        poly.render_block(&mut out);
        poly.release_all();

        for _ in 0..16 {
            poly.render_block(&mut out);
        }
        assert!(poly.is_silent());
    }

    #[test]
    fn boxed_role_voices_render() {
        let mut poly = PolySynth::new(&crate::voices::VoiceRole::Stab, 44_100.0, 2);
        let mut out = vec![0.0; 256];
        poly.note_on(72, 1.0);
        poly.render_block(&mut out);
        assert!(out.iter().any(|s| *s != 0.0));
    }
}
