use log::debug;
use rtrb::{Consumer, Producer, RingBuffer};

use crate::arrange::Arrangement;
use crate::compose::{AutomationTarget, MusicalTemplate};
use crate::config::GeneratorConfig;
use crate::dsp::distortion::soft_clip_buffer;
use crate::dsp::mix::{apply_gain, sum_in_place};
use crate::error::{GenerateError, RenderError};
use crate::graph::{filter::FilterNode, GraphNode, RenderCtx};
use crate::render::analysis::{AnalysisMode, FrequencyAnalysis};
use crate::render::effects::EffectBank;
use crate::render::recorder::{AudioAsset, Recorder};
use crate::render::timeline::build_sequence;
use crate::render::transport::{Transport, TransportEvent};
use crate::render::voice_bank::VoiceBank;
use crate::seed::SeededRandom;
use crate::sequencing::Tempo;
use crate::MAX_BLOCK_SIZE;

/*
Audio Engine
============

Offline renderer for one variation at a time.

  transport ──events──→ voice bank ─┬─ melodic bus → bus filter → fx chain → volume ─┐
                                    └─ drum bus    → drum chain ─────────────────────┴→ (+) → limiter → recorder

The voice bank and both effect banks are built on the first render and kept
until `dispose`. Every render starts by silencing them, so nothing from a
previous (or cancelled) render leaks into the next.

Each block is split at the frames the transport stamps on its events; the
segment before an event renders with the old state, the event is applied,
and rendering resumes. Note timing is therefore sample-accurate whatever the
block size.

Cancellation arrives over a lock-free queue from an [`EngineRemote`] and is
checked once per block.
*/

const MESSAGE_CAPACITY: usize = 16;
const MELODIC_GAIN: f32 = 0.35;
const DRUM_GAIN: f32 = 0.6;
/// Bus filter cutoff before any automation arrives.
const BUS_CUTOFF_OPEN: f32 = 18_000.0;

/// Control messages for a running engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMessage {
    Cancel,
}

/// Send side of the engine's control queue. Safe to move to another thread.
pub struct EngineRemote {
    producer: Producer<EngineMessage>,
}

impl EngineRemote {
    /// Ask the render in flight to stop. Returns `false` if the queue is full,
    /// in which case a cancel is already pending.
    pub fn cancel(&mut self) -> bool {
        self.producer.push(EngineMessage::Cancel).is_ok()
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub asset: AudioAsset,
    pub analysis: FrequencyAnalysis,
    /// Note events the transport dispatched.
    pub notes: usize,
}

/// Voices, effects and bus state, built lazily.
struct Banks {
    voices: VoiceBank,
    melodic_fx: EffectBank,
    drum_fx: EffectBank,
    bus_filter: FilterNode,
    volume: f32,
    melodic: Vec<f32>,
    drums: Vec<f32>,
    master: Vec<f32>,
}

impl Banks {
    fn new(sample_rate: f32) -> Self {
        let mut voices = VoiceBank::new(sample_rate);
        voices.build_all();
        Self {
            voices,
            melodic_fx: EffectBank::new(),
            drum_fx: EffectBank::new(),
            bus_filter: FilterNode::lowpass(BUS_CUTOFF_OPEN),
            volume: 1.0,
            melodic: vec![0.0; MAX_BLOCK_SIZE],
            drums: vec![0.0; MAX_BLOCK_SIZE],
            master: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Hard stop: voices, tails and bus state back to rest.
    fn silence(&mut self) {
        self.voices.reset();
        self.melodic_fx.reset();
        self.drum_fx.reset();
        self.bus_filter.reset();
        self.bus_filter.set_cutoff(BUS_CUTOFF_OPEN);
        self.volume = 1.0;
    }

    fn apply(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::NoteOn {
                role,
                note,
                velocity,
            } => self.voices.note_on(role, note, velocity),
            TransportEvent::NoteOff { role, note } => self.voices.note_off(role, note),
            TransportEvent::Automation { target, value } => match target {
                AutomationTarget::FilterCutoff => self.bus_filter.set_cutoff(value),
                AutomationTarget::Volume => self.volume = value.clamp(0.0, 1.5),
                AutomationTarget::DelaySend | AutomationTarget::ReverbSend => {
                    self.melodic_fx.set_send(target, value)
                }
            },
        }
    }

    /// Render `start..end` of the current block into `master`.
    fn render(&mut self, start: usize, end: usize, ctx: &RenderCtx) {
        if start >= end {
            return;
        }
        let melodic = &mut self.melodic[start..end];
        let drums = &mut self.drums[start..end];
        self.voices.render(melodic, drums);

        self.bus_filter.render_block(melodic, ctx);
        self.melodic_fx.process(melodic, ctx);
        apply_gain(melodic, MELODIC_GAIN * self.volume);

        self.drum_fx.process(drums, ctx);
        apply_gain(drums, DRUM_GAIN);

        let master = &mut self.master[start..end];
        master.copy_from_slice(melodic);
        sum_in_place(master, drums);
        soft_clip_buffer(master, 1.0);
    }
}

/// The renderer. One per concurrent render; see the module notes.
pub struct AudioEngine {
    sample_rate: u32,
    channels: u16,
    block_size: usize,
    ppq: u32,
    analysis: AnalysisMode,
    banks: Option<Banks>,
    messages: Consumer<EngineMessage>,
    disposed: bool,
}

impl AudioEngine {
    pub fn new(config: &GeneratorConfig) -> Result<(Self, EngineRemote), GenerateError> {
        config.validate()?;

        let (producer, messages) = RingBuffer::new(MESSAGE_CAPACITY);
        let engine = Self {
            sample_rate: config.sample_rate,
            channels: config.channels,
            block_size: config.block_size,
            ppq: config.ppq,
            analysis: config.analysis,
            banks: None,
            messages,
            disposed: false,
        };

        Ok((engine, EngineRemote { producer }))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Whether the voice and effect banks exist yet.
    pub fn is_warm(&self) -> bool {
        self.banks.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Voices still sounding. Zero between renders.
    pub fn active_voices(&self) -> usize {
        self.banks.as_ref().map_or(0, |b| b.voices.active_voices())
    }

    /// Silence everything without dropping the banks.
    pub fn reset(&mut self) {
        if let Some(banks) = &mut self.banks {
            banks.silence();
        }
    }

    /// Drop the banks and any queued messages. Safe to call more than once;
    /// the engine refuses to render afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.banks = None;
        while self.messages.pop().is_ok() {}
        self.disposed = true;
        debug!("audio engine disposed");
    }

    /// Render `duration_secs` of `template` laid over `arrangement`.
    pub fn render(
        &mut self,
        template: &MusicalTemplate,
        arrangement: &Arrangement,
        duration_secs: f64,
        variation_number: u32,
    ) -> Result<RenderOutput, RenderError> {
        if self.disposed {
            return Err(RenderError::EngineDisposed);
        }

        // A cancel sent while idle is not meant for this render
        while self.messages.pop().is_ok() {}

        let result = self.render_take(template, arrangement, duration_secs);
        let take = match result {
            Ok(take) => take,
            Err(err) => {
                self.reset();
                return Err(err);
            }
        };

        let (asset, tape, notes) = take;
        let analysis = match self.analysis {
            AnalysisMode::Heuristic => FrequencyAnalysis::heuristic(
                template.genre,
                &SeededRandom::new(template.seed),
                variation_number,
            ),
            AnalysisMode::Spectral => FrequencyAnalysis::spectral(&tape, self.sample_rate as f32),
        };

        Ok(RenderOutput {
            asset,
            analysis,
            notes,
        })
    }

    fn render_take(
        &mut self,
        template: &MusicalTemplate,
        arrangement: &Arrangement,
        duration_secs: f64,
    ) -> Result<(AudioAsset, Vec<f32>, usize), RenderError> {
        let sample_rate = self.sample_rate as f32;
        let block_size = self.block_size;
        let total_frames = (duration_secs * self.sample_rate as f64).round() as usize;

        let banks = self.banks.get_or_insert_with(|| Banks::new(sample_rate));
        banks.voices.set_lead_patch(template.lead_patch);
        banks.silence();
        banks.melodic_fx.route_slots(&template.effects);
        banks.drum_fx.route_kinds(&template.drum_effects);

        let tempo = Tempo::new(template.bpm as f64, self.ppq);
        let sequence = build_sequence(template, arrangement, tempo, duration_secs)?;
        let notes = sequence.notes().count();
        debug!(
            "rendering {} frames: {} events at {} bpm, fx {:?}",
            total_frames,
            sequence.events.len(),
            template.bpm,
            banks.melodic_fx.routed()
        );

        // Recorder first, then the transport
        let mut recorder = Recorder::new(self.sample_rate, self.channels);
        recorder.start(total_frames)?;
        let mut transport = Transport::new(sequence, tempo, sample_rate as f64);
        transport.start(&recorder)?;

        let mut events = Vec::with_capacity(256);
        let mut rendered = 0;
        while rendered < total_frames {
            if cancel_requested(&mut self.messages) {
                transport.stop();
                recorder.discard();
                banks.silence();
                debug!("render cancelled at frame {}", rendered);
                return Err(RenderError::Cancelled);
            }

            let frames = block_size.min(total_frames - rendered);
            let ctx = RenderCtx::from_freq(sample_rate, 0.0, 127.0)
                .at_time(rendered as f64 / sample_rate as f64);

            events.clear();
            transport.process_block(frames, &mut events)?;

            let mut cursor = 0;
            for &(offset, event) in &events {
                banks.render(cursor, offset, &ctx);
                cursor = cursor.max(offset);
                banks.apply(event);
            }
            banks.render(cursor, frames, &ctx);

            recorder.push(&banks.master[..frames])?;
            rendered += frames;
        }

        // Stop and drain before finalizing
        for event in transport.stop() {
            banks.apply(event);
        }
        let asset = recorder.finalize()?;
        let tape = match self.analysis {
            AnalysisMode::Spectral => recorder.tape().to_vec(),
            AnalysisMode::Heuristic => Vec::new(),
        };
        banks.silence();

        Ok((asset, tape, notes))
    }
}

fn cancel_requested(messages: &mut Consumer<EngineMessage>) -> bool {
    let mut cancel = false;
    while let Ok(message) = messages.pop() {
        match message {
            EngineMessage::Cancel => cancel = true,
        }
    }
    cancel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Composer;
    use crate::generate::GenerationRequest;
    use crate::theory::{ArrangementStyle, Complexity, Genre, Mood};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    fn template(complexity: Complexity) -> MusicalTemplate {
        let request = GenerationRequest::builder(Genre::Techno, Mood::Dark)
            .prompt("warehouse")
            .complexity(complexity)
            .build();
        Composer::new(&request, 99, 1).compose()
    }

    fn engine() -> (AudioEngine, EngineRemote) {
        AudioEngine::new(&GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn renders_exactly_the_requested_frames() {
        let (mut engine, _remote) = engine();
        let template = template(Complexity::Medium);
        let arrangement = Arrangement::schedule(ArrangementStyle::IntroBuildupDropOutro, 2.5);

        let output = engine.render(&template, &arrangement, 2.5, 1).unwrap();
        assert_eq!(output.asset.frames, 110_250);
        assert_eq!(output.asset.channels, 2);
        assert!(output.notes > 0);
        assert_eq!(engine.active_voices(), 0);
    }

    #[test]
    fn same_inputs_same_bytes() {
        let (mut engine, _remote) = engine();
        let template = template(Complexity::Complex);
        let arrangement = Arrangement::schedule(ArrangementStyle::VerseChorus, 1.5);

        let first = engine.render(&template, &arrangement, 1.5, 1).unwrap();
        let second = engine.render(&template, &arrangement, 1.5, 1).unwrap();
        assert_eq!(first.asset, second.asset);
        assert_eq!(first.analysis, second.analysis);
    }

    #[test]
    fn lead_patch_changes_the_take() {
        let (mut engine, _remote) = engine();
        let stock = template(Complexity::Simple);
        let mut styled = stock.clone();
        styled.lead_patch = crate::voices::LeadPatch::for_energy(
            crate::dsp::oscillator::OscillatorWaveform::Saw,
            -7.0,
            9,
        );
        let arrangement = Arrangement::schedule(ArrangementStyle::ContinuousMix, 1.0);

        let a = engine.render(&stock, &arrangement, 1.0, 1).unwrap();
        let b = engine.render(&styled, &arrangement, 1.0, 1).unwrap();
        let c = engine.render(&stock, &arrangement, 1.0, 1).unwrap();
        assert_ne!(a.asset, b.asset);
        assert_eq!(a.asset, c.asset);
    }

    #[test]
    fn stale_cancel_is_ignored() {
        let (mut engine, mut remote) = engine();
        assert!(remote.cancel());

        let template = template(Complexity::Simple);
        let arrangement = Arrangement::schedule(ArrangementStyle::ContinuousMix, 0.5);
        assert!(engine.render(&template, &arrangement, 0.5, 1).is_ok());
    }

    #[test]
    fn cancel_stops_the_render_and_the_next_one_succeeds() {
        let (mut engine, mut remote) = engine();
        let template = template(Complexity::Experimental);
        let long = Arrangement::schedule(ArrangementStyle::IntroBuildupDropOutro, 600.0);

        let done = Arc::new(AtomicBool::new(false));
        let canceller = {
            let done = done.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    remote.cancel();
                    thread::sleep(std::time::Duration::from_millis(5));
                }
                remote
            })
        };

        let result = engine.render(&template, &long, 600.0, 1);
        done.store(true, Ordering::Release);
        let _remote = canceller.join().unwrap();

        assert!(matches!(result, Err(RenderError::Cancelled)));
        assert_eq!(engine.active_voices(), 0);

        let short = Arrangement::schedule(ArrangementStyle::IntroBuildupDropOutro, 1.0);
        let output = engine.render(&template, &short, 1.0, 1).unwrap();
        assert_eq!(output.asset.frames, 44_100);
    }

    #[test]
    fn dispose_is_idempotent_and_final() {
        let (mut engine, _remote) = engine();
        let template = template(Complexity::Simple);
        let arrangement = Arrangement::schedule(ArrangementStyle::ContinuousMix, 0.25);
        engine.render(&template, &arrangement, 0.25, 1).unwrap();
        assert!(engine.is_warm());

        engine.dispose();
        engine.dispose();
        assert!(engine.is_disposed());
        assert!(!engine.is_warm());
        assert!(matches!(
            engine.render(&template, &arrangement, 0.25, 1),
            Err(RenderError::EngineDisposed)
        ));
    }

    #[test]
    fn spectral_mode_measures_the_take() {
        let config = GeneratorConfig::default().analysis(AnalysisMode::Spectral);
        let (mut engine, _remote) = AudioEngine::new(&config).unwrap();
        let template = template(Complexity::Simple);
        let arrangement = Arrangement::schedule(ArrangementStyle::ContinuousMix, 1.0);

        let analysis = engine.render(&template, &arrangement, 1.0, 1).unwrap().analysis;
        let total = analysis.bass_energy + analysis.mid_energy + analysis.high_energy;
        assert!((total - 1.0).abs() < 1e-3, "{:?}", analysis);
    }
}
