use thiserror::Error;

use super::pitch::Pitch;
use crate::compose::AutomationTarget;
use crate::voices::VoiceRole;

/// What happens at an event's tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Start a note on `role`; the transport releases it `gate_ticks` later.
    Note {
        role: VoiceRole,
        pitch: Pitch,
        /// 0.0 - 1.0
        velocity: f32,
        gate_ticks: u64,
    },
    /// Jump an automated bus parameter to `value`.
    Automation { target: AutomationTarget, value: f32 },
}

/// A single timed event in a sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceEvent {
    /// When this event occurs (in ticks from sequence start)
    pub tick: u64,
    pub kind: EventKind,
}

impl SequenceEvent {
    fn order(&self) -> u8 {
        // Automation lands before notes on the same tick
        match self.kind {
            EventKind::Automation { .. } => 0,
            EventKind::Note { .. } => 1,
        }
    }
}

/// A whole track's worth of events, sorted by tick
#[derive(Debug, Clone)]
pub struct Sequence {
    /// Pulses per quarter note (timing resolution)
    pub ppq: u32,
    /// Events, sorted by tick
    pub events: Vec<SequenceEvent>,
    /// Total duration in ticks
    pub total_ticks: u64,
}

impl Sequence {
    /// Start building a sequence `total_ticks` long.
    pub fn new(ppq: u32, total_ticks: u64) -> SequenceBuilder {
        SequenceBuilder {
            ppq,
            total_ticks,
            events: Vec::new(),
        }
    }

    /// Events with `start_tick <= tick < end_tick`.
    pub fn events_between(&self, start_tick: u64, end_tick: u64) -> &[SequenceEvent] {
        let start = self.events.partition_point(|e| e.tick < start_tick);
        let end = self.events.partition_point(|e| e.tick < end_tick);
        &self.events[start..end.max(start)]
    }

    pub fn notes(&self) -> impl Iterator<Item = &SequenceEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Note { .. }))
    }

    /// Number of note events played by `role`.
    pub fn count_for(&self, role: VoiceRole) -> usize {
        self.notes()
            .filter(|e| matches!(e.kind, EventKind::Note { role: r, .. } if r == role))
            .count()
    }

    pub fn duration_ticks(&self) -> u64 {
        self.total_ticks
    }
}

/// Collects events in any order; `build` validates and sorts them.
pub struct SequenceBuilder {
    ppq: u32,
    total_ticks: u64,
    events: Vec<SequenceEvent>,
}

impl SequenceBuilder {
    pub fn note(
        &mut self,
        tick: u64,
        role: VoiceRole,
        pitch: Pitch,
        velocity: f32,
        gate_ticks: u64,
    ) -> &mut Self {
        self.events.push(SequenceEvent {
            tick,
            kind: EventKind::Note {
                role,
                pitch,
                velocity: velocity.clamp(0.0, 1.0),
                gate_ticks: gate_ticks.max(1),
            },
        });
        self
    }

    pub fn automation(&mut self, tick: u64, target: AutomationTarget, value: f32) -> &mut Self {
        self.events.push(SequenceEvent {
            tick,
            kind: EventKind::Automation { target, value },
        });
        self
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Build the final sequence
    pub fn build(mut self) -> Result<Sequence, SequenceError> {
        if self.total_ticks == 0 {
            return Err(SequenceError::Empty);
        }

        if let Some(late) = self.events.iter().find(|e| e.tick >= self.total_ticks) {
            return Err(SequenceError::PastEnd {
                tick: late.tick,
                total: self.total_ticks,
            });
        }

        // Stable: same-tick events keep insertion order within their kind
        self.events.sort_by_key(|e| (e.tick, e.order()));

        Ok(Sequence {
            ppq: self.ppq,
            events: self.events,
            total_ticks: self.total_ticks,
        })
    }
}

/// Errors that can occur when building a sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("sequence has zero length")]
    Empty,
    #[error("event at tick {tick} starts past the end of the sequence ({total} ticks)")]
    PastEnd { tick: u64, total: u64 },
}
