use std::collections::BTreeMap;

use crate::dsp::mix::sum_in_place;
use crate::synth::PolySynth;
use crate::voices::{LeadPatch, Patch, VoiceRole};
use crate::MAX_BLOCK_SIZE;

/// One polyphonic synth per voice role, built on first use and reused by
/// every render until the bank is cleared.
pub struct VoiceBank {
    sample_rate: f32,
    synths: BTreeMap<VoiceRole, PolySynth<Patch>>,
    lead: LeadPatch,
    scratch: Vec<f32>,
}

impl VoiceBank {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            synths: BTreeMap::new(),
            lead: LeadPatch::DEFAULT,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    fn patch(&self, role: VoiceRole) -> Patch {
        match role {
            VoiceRole::Lead => Patch::Lead(self.lead),
            role => Patch::Stock(role),
        }
    }

    fn build(&self, role: VoiceRole) -> PolySynth<Patch> {
        PolySynth::new(&self.patch(role), self.sample_rate, role.polyphony())
    }

    /// Build every role that is not built yet.
    pub fn build_all(&mut self) {
        for role in VoiceRole::MELODIC.into_iter().chain(VoiceRole::DRUMS) {
            if !self.synths.contains_key(&role) {
                let synth = self.build(role);
                self.synths.insert(role, synth);
            }
        }
    }

    pub fn lead_patch(&self) -> LeadPatch {
        self.lead
    }

    /// Play the lead through `patch` from now on. A built lead synth is
    /// rebuilt only when the patch actually changes.
    pub fn set_lead_patch(&mut self, patch: LeadPatch) {
        if patch == self.lead {
            return;
        }
        self.lead = patch;
        if self.synths.contains_key(&VoiceRole::Lead) {
            let synth = self.build(VoiceRole::Lead);
            self.synths.insert(VoiceRole::Lead, synth);
        }
    }

    /// Roles built so far.
    pub fn built(&self) -> usize {
        self.synths.len()
    }

    fn synth(&mut self, role: VoiceRole) -> &mut PolySynth<Patch> {
        let patch = self.patch(role);
        let sample_rate = self.sample_rate;
        self.synths
            .entry(role)
            .or_insert_with(|| PolySynth::new(&patch, sample_rate, role.polyphony()))
    }

    pub fn note_on(&mut self, role: VoiceRole, note: u8, velocity: f32) {
        self.synth(role).note_on(note, velocity);
    }

    pub fn note_off(&mut self, role: VoiceRole, note: u8) {
        if let Some(synth) = self.synths.get_mut(&role) {
            synth.note_off(note);
        }
    }

    pub fn release_all(&mut self) {
        for synth in self.synths.values_mut() {
            synth.release_all();
        }
    }

    /// Hard-stop every voice.
    pub fn reset(&mut self) {
        for synth in self.synths.values_mut() {
            synth.reset();
        }
    }

    /// Drop every synth.
    pub fn clear(&mut self) {
        self.synths.clear();
    }

    pub fn active_voices(&self) -> usize {
        self.synths.values().map(PolySynth::active_voices).sum()
    }

    /// Render melodic roles into `melodic` and drum roles into `drums`,
    /// overwriting both. The buffers must be the same length.
    pub fn render(&mut self, melodic: &mut [f32], drums: &mut [f32]) {
        melodic.fill(0.0);
        drums.fill(0.0);

        let frames = melodic.len().min(drums.len());
        for (role, synth) in self.synths.iter_mut() {
            if synth.is_silent() {
                continue;
            }
            let temp = &mut self.scratch[..frames];
            synth.render_block(temp);

            let bus = if role.is_drum() {
                &mut drums[..frames]
            } else {
                &mut melodic[..frames]
            };
            sum_in_place(bus, temp);
        }
    }
}
