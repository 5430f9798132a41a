//! Transport - sample-accurate timeline playback
//!
//! The transport turns a tick-based [`Sequence`] into note and automation
//! events stamped with the frame they land on inside the current block. The
//! renderer splits its block at those offsets, so every event sounds on the
//! exact sample its tick maps to.

use crate::compose::AutomationTarget;
use crate::error::RenderError;
use crate::render::recorder::Recorder;
use crate::sequencing::{EventKind, Sequence, Tempo};
use crate::voices::VoiceRole;

/// Something the renderer must do at a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    NoteOn {
        role: VoiceRole,
        note: u8,
        velocity: f32,
    },
    NoteOff {
        role: VoiceRole,
        note: u8,
    },
    Automation {
        target: AutomationTarget,
        value: f32,
    },
}

pub struct Transport {
    sequence: Sequence,
    /// Samples per tick (computed from bpm, ppq, sample_rate)
    samples_per_tick: f64,
    /// Frames rendered since start; the tick position is derived from it so
    /// long renders do not accumulate rounding drift
    frame_position: u64,
    /// Last whole tick whose events have been dispatched
    dispatched_tick: Option<u64>,
    /// Index of the next undispatched sequence event
    event_index: usize,
    /// Held notes: (role, note, end_tick)
    active_notes: Vec<(VoiceRole, u8, u64)>,
    running: bool,
}

impl Transport {
    pub fn new(sequence: Sequence, tempo: Tempo, sample_rate: f64) -> Self {
        Self {
            sequence,
            samples_per_tick: tempo.samples_per_tick(sample_rate),
            frame_position: 0,
            dispatched_tick: None,
            event_index: 0,
            active_notes: Vec::with_capacity(64),
            running: false,
        }
    }

    /// Start playback from tick 0. The recorder has to be rolling first so
    /// the opening events land on tape.
    pub fn start(&mut self, recorder: &Recorder) -> Result<(), RenderError> {
        if !recorder.is_recording() {
            return Err(RenderError::RecorderNotStarted);
        }

        self.frame_position = 0;
        self.dispatched_tick = None;
        self.event_index = 0;
        self.active_notes.clear();
        self.running = true;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick(&self) -> u64 {
        self.tick_at(self.frame_position)
    }

    fn tick_at(&self, frame: u64) -> u64 {
        (frame as f64 / self.samples_per_tick) as u64
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Sequence events not yet dispatched.
    pub fn pending_events(&self) -> usize {
        self.sequence.events.len() - self.event_index
    }

    pub fn held_notes(&self) -> usize {
        self.active_notes.len()
    }

    /// Advance by `frames` samples, appending `(frame_offset, event)` pairs to
    /// `out` in the order they must be applied.
    pub fn process_block(
        &mut self,
        frames: usize,
        out: &mut Vec<(usize, TransportEvent)>,
    ) -> Result<(), RenderError> {
        if !self.running {
            return Err(RenderError::TransportNotStarted);
        }
        if !self.samples_per_tick.is_finite() || self.samples_per_tick <= 0.0 {
            return Err(RenderError::TransportStalled { tick: self.tick() });
        }

        for offset in 0..frames {
            let current_tick = self.tick_at(self.frame_position);
            if self.dispatched_tick != Some(current_tick) {
                self.dispatch(current_tick, offset, out);
                self.dispatched_tick = Some(current_tick);
            }
            self.frame_position += 1;
        }

        Ok(())
    }

    /// Stop playback. Undispatched events are dropped and every held note is
    /// returned as a note-off so nothing is left sounding.
    pub fn stop(&mut self) -> Vec<TransportEvent> {
        self.running = false;
        self.event_index = self.sequence.events.len();
        self.active_notes
            .drain(..)
            .map(|(role, note, _)| TransportEvent::NoteOff { role, note })
            .collect()
    }

    fn dispatch(
        &mut self,
        current_tick: u64,
        offset: usize,
        out: &mut Vec<(usize, TransportEvent)>,
    ) {
        // Note-offs first, so a retrigger on the same tick is not cut by its
        // predecessor's release
        self.active_notes.retain(|&(role, note, end_tick)| {
            if current_tick >= end_tick {
                out.push((offset, TransportEvent::NoteOff { role, note }));
                false
            } else {
                true
            }
        });

        while let Some(event) = self.sequence.events.get(self.event_index) {
            if event.tick > current_tick {
                break;
            }
            match event.kind {
                EventKind::Note {
                    role,
                    pitch,
                    velocity,
                    gate_ticks,
                } => {
                    let note = pitch.midi();
                    out.push((
                        offset,
                        TransportEvent::NoteOn {
                            role,
                            note,
                            velocity,
                        },
                    ));
                    self.active_notes.push((role, note, event.tick + gate_ticks));
                }
                EventKind::Automation { target, value } => {
                    out.push((offset, TransportEvent::Automation { target, value }));
                }
            }
            self.event_index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::Pitch;

    const SR: f64 = 48_000.0;

    // 120 BPM at 4 ppq: one tick is 6000 samples
    fn tempo() -> Tempo {
        Tempo::new(120.0, 4)
    }

    fn rolling_recorder() -> Recorder {
        let mut recorder = Recorder::new(48_000, 2);
        recorder.start(0).unwrap();
        recorder
    }

    fn two_notes() -> Sequence {
        let mut builder = Sequence::new(4, 16);
        builder
            .note(0, VoiceRole::KickPunch, Pitch::MIDDLE_C, 1.0, 1)
            .note(1, VoiceRole::KickPunch, Pitch::MIDDLE_C, 0.5, 2);
        builder.build().unwrap()
    }

    #[test]
    fn refuses_to_start_before_recorder() {
        let mut transport = Transport::new(two_notes(), tempo(), SR);
        let recorder = Recorder::new(48_000, 2);

        assert!(matches!(
            transport.start(&recorder),
            Err(RenderError::RecorderNotStarted)
        ));

        let mut events = Vec::new();
        assert!(matches!(
            transport.process_block(64, &mut events),
            Err(RenderError::TransportNotStarted)
        ));
    }

    #[test]
    fn events_land_on_their_sample() {
        let mut transport = Transport::new(two_notes(), tempo(), SR);
        transport.start(&rolling_recorder()).unwrap();

        let mut events = Vec::new();
        transport.process_block(8_000, &mut events).unwrap();

        // First note at frame 0, its release and the second note at 6000
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].0, 0);
        assert!(matches!(events[0].1, TransportEvent::NoteOn { velocity, .. } if velocity == 1.0));
        assert_eq!(events[1].0, 6_000);
        assert!(matches!(events[1].1, TransportEvent::NoteOff { .. }));
        assert_eq!(events[2].0, 6_000);
        assert!(matches!(events[2].1, TransportEvent::NoteOn { velocity, .. } if velocity == 0.5));
    }

    #[test]
    fn offsets_are_block_relative() {
        let mut transport = Transport::new(two_notes(), tempo(), SR);
        transport.start(&rolling_recorder()).unwrap();

        let mut events = Vec::new();
        for _ in 0..23 {
            events.clear();
            transport.process_block(256, &mut events).unwrap();
        }
        // 23 * 256 = 5888; tick 1 starts at 6000
        events.clear();
        transport.process_block(256, &mut events).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|(offset, _)| *offset == 112));
    }

    #[test]
    fn stop_releases_held_notes_and_drops_the_rest() {
        let mut transport = Transport::new(two_notes(), tempo(), SR);
        transport.start(&rolling_recorder()).unwrap();

        let mut events = Vec::new();
        transport.process_block(100, &mut events).unwrap();
        assert_eq!(transport.held_notes(), 1);
        assert_eq!(transport.pending_events(), 1);

        let drained = transport.stop();
        assert_eq!(drained.len(), 1);
        assert!(matches!(drained[0], TransportEvent::NoteOff { .. }));
        assert_eq!(transport.pending_events(), 0);
        assert!(!transport.is_running());
    }

    #[test]
    fn automation_comes_before_notes() {
        let mut builder = Sequence::new(4, 8);
        builder
            .note(0, VoiceRole::Pad, Pitch::MIDDLE_C, 0.4, 4)
            .automation(0, AutomationTarget::Volume, 0.7);
        let mut transport = Transport::new(builder.build().unwrap(), tempo(), SR);
        transport.start(&rolling_recorder()).unwrap();

        let mut events = Vec::new();
        transport.process_block(16, &mut events).unwrap();
        assert!(matches!(events[0].1, TransportEvent::Automation { .. }));
        assert!(matches!(events[1].1, TransportEvent::NoteOn { .. }));
    }

    #[test]
    fn degenerate_clock_reports_a_stall() {
        let mut transport = Transport::new(two_notes(), tempo(), 0.0);
        transport.start(&rolling_recorder()).unwrap();

        let mut events = Vec::new();
        assert!(matches!(
            transport.process_block(64, &mut events),
            Err(RenderError::TransportStalled { tick: 0 })
        ));
    }
}
