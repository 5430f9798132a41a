use crate::arrange::{Arrangement, Section};
use crate::compose::{AutomationTarget, FxHit, Layer, MusicalTemplate};
use crate::seed::SeededRandom;
use crate::sequencing::{Duration, Pitch, Sequence, SequenceBuilder, SequenceError, Tempo};
use crate::theory::{DrumChannel, Genre, LayerKind};
use crate::voices::VoiceRole;

/*
Event Timeline
==============

Lays the composed material over the arrangement. Every section restarts the
patterns from step 0 and plays them at a fixed grid:

  eighths      drums, melody, bass, lead layer, fx
  sixteenths   arpeggio, percussion, granular
  bars         pad chords, following the progression

Velocity is the section energy times a role weight times a per-event draw.
Draws use a running counter from index 5000 up, one per note, so the
timeline never reuses a composer draw.

Automation breakpoints are relative to each section start. The filter curve
is scaled by the section energy; the other curves pass through.
*/

const VELOCITY_DRAWS: u64 = 5_000;

/// Minimum cutoff the automation may ask for.
const MIN_CUTOFF_HZ: f32 = 20.0;

/// Build the full event timeline for `total_secs` of audio.
pub fn build_sequence(
    template: &MusicalTemplate,
    arrangement: &Arrangement,
    tempo: Tempo,
    total_secs: f64,
) -> Result<Sequence, SequenceError> {
    let total_ticks = tempo.secs_to_ticks(total_secs).max(1);
    let mut timeline = Timeline {
        template,
        tempo,
        total_ticks,
        builder: Sequence::new(tempo.ppq, total_ticks),
        random: SeededRandom::new(template.seed),
        draw: VELOCITY_DRAWS,
    };

    for section in arrangement.sections() {
        timeline.section(section);
    }

    timeline.builder.build()
}

/// Pitch every drum voice is triggered with. Drum voices ignore it; it only
/// pairs note-offs with their note-ons.
pub fn drum_note() -> Pitch {
    Pitch::from_parts(0, 2)
}

struct Timeline<'a> {
    template: &'a MusicalTemplate,
    tempo: Tempo,
    total_ticks: u64,
    builder: SequenceBuilder,
    random: SeededRandom,
    draw: u64,
}

/// One section's tick span and energy.
#[derive(Clone, Copy)]
struct Span {
    start: u64,
    end: u64,
    energy: f32,
}

impl Span {
    /// `(step index, tick)` for every grid line inside the span.
    fn grid(self, step: u64) -> impl Iterator<Item = (usize, u64)> {
        (self.start..self.end).step_by(step.max(1) as usize).enumerate()
    }
}

impl<'a> Timeline<'a> {
    fn ticks(&self, duration: Duration) -> u64 {
        duration.to_ticks(self.tempo.ppq).max(1)
    }

    fn next_draw(&mut self) -> f32 {
        let value = self.random.next(self.draw) as f32;
        self.draw += 1;
        value
    }

    fn note(&mut self, tick: u64, role: VoiceRole, pitch: Pitch, velocity: f32, gate: u64) {
        if tick < self.total_ticks && velocity > 0.0 {
            self.builder.note(tick, role, pitch, velocity, gate);
        }
    }

    /// Melodic velocity: role weight scaled by energy, within 10% jitter.
    fn melodic(
        &mut self,
        tick: u64,
        role: VoiceRole,
        pitch: Pitch,
        weight: f32,
        span: Span,
        gate: u64,
    ) {
        let velocity = span.energy * weight * (0.9 + 0.1 * self.next_draw());
        self.note(tick, role, pitch, velocity, gate);
    }

    fn section(&mut self, section: &Section) {
        let start = self.tempo.secs_to_ticks(section.start_secs);
        let end = self.tempo.secs_to_ticks(section.end_secs()).min(self.total_ticks);
        if start >= end {
            return;
        }
        let span = Span {
            start,
            end,
            energy: section.energy.clamp(0.0, 1.0),
        };

        self.automation(span);
        self.drums(span);
        self.melody_and_bass(span);
        self.pads(span);

        let template = self.template;
        for layer in template.layers.values() {
            self.layer(layer, span);
        }
    }

    fn automation(&mut self, span: Span) {
        let template = self.template;
        for (target, points) in &template.automation {
            for point in points {
                let tick = span.start + self.tempo.secs_to_ticks(point.time);
                if tick >= span.end {
                    continue;
                }
                let value = match target {
                    AutomationTarget::FilterCutoff => (point.value * span.energy).max(MIN_CUTOFF_HZ),
                    _ => point.value,
                };
                self.builder.automation(tick, *target, value);
            }
        }
    }

    fn drums(&mut self, span: Span) {
        let eighth = self.ticks(Duration::EIGHTH);
        let sixteenth = self.ticks(Duration::SIXTEENTH);
        let template = self.template;

        for (step, tick) in span.grid(eighth) {
            for (channel, lane) in template.drums.channels() {
                if !lane.is_hit(step) {
                    continue;
                }
                let (role, weight, gate) = match channel {
                    DrumChannel::Kick if template.genre.is_808_genre() => {
                        (VoiceRole::Kick808, 1.0, eighth)
                    }
                    DrumChannel::Kick => (VoiceRole::KickPunch, 1.0, eighth),
                    DrumChannel::Kick808 => (VoiceRole::Kick808, 1.0, eighth),
                    DrumChannel::Snare if span.energy < 0.5 => (VoiceRole::SnareRim, 1.0, eighth),
                    DrumChannel::Snare => (VoiceRole::SnareClap, 1.0, eighth),
                    DrumChannel::Hihat if step % 4 == 3 => (VoiceRole::HihatOpen, 0.7, eighth),
                    DrumChannel::Hihat => (VoiceRole::HihatClosed, 0.7, sixteenth),
                    DrumChannel::Perc => (VoiceRole::Perc, 0.6, sixteenth),
                };
                let velocity = span.energy * (0.5 + 0.5 * self.next_draw()) * weight;
                self.note(tick, role, drum_note(), velocity, gate);
            }
        }
    }

    fn melody_and_bass(&mut self, span: Span) {
        let eighth = self.ticks(Duration::EIGHTH);
        let template = self.template;
        let bass_role = if template.genre == Genre::Dubstep {
            VoiceRole::Wobble
        } else {
            VoiceRole::AcidBass
        };

        for (step, tick) in span.grid(eighth) {
            if let Some(pitch) = cycle(&template.melody, step) {
                self.melodic(tick, VoiceRole::Lead, pitch, 0.6, span, eighth);
            }
            if let Some(pitch) = cycle(&template.bass, step) {
                self.melodic(tick, bass_role, pitch, 0.8, span, eighth);
            }
        }
    }

    /// One chord per bar, walking the progression.
    fn pads(&mut self, span: Span) {
        let template = self.template;
        let Some(Layer::Pad(triad)) = template.layers.get(&LayerKind::Pad) else {
            return;
        };
        if template.chord_progression.is_empty() {
            return;
        }
        let bar = self.ticks(Duration::BAR);
        let key = template.key;

        for (index, tick) in span.grid(bar) {
            let chord = template.chord_progression[index % template.chord_progression.len()];
            let gate = bar.min(span.end - tick);
            for tone in triad {
                let degree = key.degree_of(tone.pitch_class()).unwrap_or(0) + chord.degree();
                let pitch = key.pitch(degree as i32, tone.octave());
                self.melodic(tick, VoiceRole::Pad, pitch, 0.4, span, gate);
            }
        }
    }

    fn layer(&mut self, layer: &Layer, span: Span) {
        let eighth = self.ticks(Duration::EIGHTH);
        let sixteenth = self.ticks(Duration::SIXTEENTH);

        match layer {
            // Chords are driven by the progression in `pads`
            Layer::Pad(_) => {}
            Layer::Arpeggio(pitches) => {
                for (step, tick) in span.grid(sixteenth) {
                    if let Some(pitch) = cycle(pitches, step) {
                        self.melodic(tick, VoiceRole::Arp, pitch, 0.5, span, sixteenth);
                    }
                }
            }
            Layer::Lead(pitches) => {
                for (step, tick) in span.grid(eighth) {
                    if let Some(pitch) = cycle(pitches, step) {
                        self.melodic(tick, VoiceRole::Supersaw, pitch, 0.5, span, eighth);
                    }
                }
            }
            Layer::Granular(pitches) => {
                for (step, tick) in span.grid(sixteenth) {
                    if let Some(pitch) = cycle(pitches, step) {
                        self.melodic(tick, VoiceRole::Pluck, pitch, 0.3, span, sixteenth);
                    }
                }
            }
            Layer::Percussion(pattern) => {
                for (step, tick) in span.grid(sixteenth) {
                    if pattern.is_hit(step) {
                        let velocity = span.energy * (0.5 + 0.5 * self.next_draw()) * 0.6;
                        self.note(tick, VoiceRole::Perc, drum_note(), velocity, sixteenth);
                    }
                }
            }
            Layer::Fx(hits) => self.fx(hits, span),
        }
    }

    fn fx(&mut self, hits: &[FxHit], span: Span) {
        let eighth = self.ticks(Duration::EIGHTH);
        let sweep_gate = self.ticks(Duration::HALF);
        let key = self.template.key;

        for (step, tick) in span.grid(eighth) {
            match hits.get(step % hits.len().max(1)) {
                Some(FxHit::Sweep) => {
                    self.melodic(tick, VoiceRole::Wobble, key.pitch(0, 2), 0.5, span, sweep_gate);
                }
                Some(FxHit::Impact) => {
                    self.melodic(tick, VoiceRole::Stab, key.pitch(0, 5), 0.7, span, eighth);
                    self.note(tick, VoiceRole::Kick808, drum_note(), span.energy, eighth);
                }
                Some(FxHit::Rest) | None => {}
            }
        }
    }
}

fn cycle(pitches: &[Pitch], step: usize) -> Option<Pitch> {
    if pitches.is_empty() {
        None
    } else {
        Some(pitches[step % pitches.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Composer;
    use crate::generate::GenerationRequest;
    use crate::sequencing::EventKind;
    use crate::theory::{ArrangementStyle, Complexity, Mood};

    fn render_inputs(
        genre: Genre,
        complexity: Complexity,
        secs: f64,
    ) -> (MusicalTemplate, Arrangement, Tempo) {
        let request = GenerationRequest::builder(genre, Mood::Energetic)
            .prompt("festival anthem")
            .duration_secs(secs)
            .complexity(complexity)
            .build();
        let template = Composer::new(&request, 4242, 1).compose();
        let arrangement = Arrangement::schedule(ArrangementStyle::IntroBuildupDropOutro, secs);
        let tempo = Tempo::new(template.bpm as f64, 480);
        (template, arrangement, tempo)
    }

    #[test]
    fn every_event_fits_the_duration() {
        let (template, arrangement, tempo) = render_inputs(Genre::Trance, Complexity::Complex, 30.0);
        let sequence = build_sequence(&template, &arrangement, tempo, 30.0).unwrap();

        assert!(!sequence.events.is_empty());
        assert!(sequence.events.iter().all(|e| e.tick < sequence.total_ticks));
        assert!(sequence
            .events
            .windows(2)
            .all(|pair| pair[0].tick <= pair[1].tick));
    }

    #[test]
    fn is_deterministic() {
        let (template, arrangement, tempo) = render_inputs(Genre::Techno, Complexity::Medium, 20.0);
        let a = build_sequence(&template, &arrangement, tempo, 20.0).unwrap();
        let b = build_sequence(&template, &arrangement, tempo, 20.0).unwrap();
        assert_eq!(a.events, b.events);
    }

    #[test]
    fn velocities_follow_section_energy() {
        let (template, arrangement, tempo) = render_inputs(Genre::Techno, Complexity::Simple, 60.0);
        let sequence = build_sequence(&template, &arrangement, tempo, 60.0).unwrap();

        for section in arrangement.sections() {
            let start = tempo.secs_to_ticks(section.start_secs);
            let end = tempo.secs_to_ticks(section.end_secs());
            for event in sequence.events_between(start, end) {
                if let EventKind::Note { velocity, .. } = event.kind {
                    assert!(velocity <= section.energy + 1e-6);
                }
            }
        }
    }

    #[test]
    fn sub_808_genres_use_the_808_kick() {
        let (template, arrangement, tempo) = render_inputs(Genre::Trap, Complexity::Simple, 30.0);
        let sequence = build_sequence(&template, &arrangement, tempo, 30.0).unwrap();
        assert!(sequence.count_for(VoiceRole::Kick808) > 0);
        assert_eq!(sequence.count_for(VoiceRole::KickPunch), 0);

        let (template, arrangement, tempo) = render_inputs(Genre::Techno, Complexity::Simple, 30.0);
        let sequence = build_sequence(&template, &arrangement, tempo, 30.0).unwrap();
        assert!(sequence.count_for(VoiceRole::KickPunch) > 0);
    }

    #[test]
    fn layers_only_play_when_composed() {
        let (simple, arrangement, tempo) = render_inputs(Genre::Trance, Complexity::Simple, 30.0);
        let sequence = build_sequence(&simple, &arrangement, tempo, 30.0).unwrap();
        assert_eq!(sequence.count_for(VoiceRole::Arp), 0);
        assert_eq!(sequence.count_for(VoiceRole::Pad), 0);
        assert!(sequence.count_for(VoiceRole::Lead) > 0);

        let (medium, arrangement, tempo) = render_inputs(Genre::Trance, Complexity::Medium, 30.0);
        let sequence = build_sequence(&medium, &arrangement, tempo, 30.0).unwrap();
        assert!(sequence.count_for(VoiceRole::Arp) > 0);
        // Triads, one per bar
        assert_eq!(sequence.count_for(VoiceRole::Pad) % 3, 0);
        assert!(sequence.count_for(VoiceRole::Pad) > 0);
    }

    #[test]
    fn filter_automation_is_scaled_by_energy() {
        let (template, arrangement, tempo) = render_inputs(Genre::Trance, Complexity::Simple, 8.0);
        let sequence = build_sequence(&template, &arrangement, tempo, 8.0).unwrap();
        let intro = &arrangement.sections()[0];

        let first_cutoff = sequence.events.iter().find_map(|e| match e.kind {
            EventKind::Automation {
                target: AutomationTarget::FilterCutoff,
                value,
            } => Some(value),
            _ => None,
        });
        let expected = template.curve(AutomationTarget::FilterCutoff)[0].value * intro.energy;
        assert_eq!(first_cutoff, Some(expected.max(MIN_CUTOFF_HZ)));
    }
}
