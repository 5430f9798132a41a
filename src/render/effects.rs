use std::collections::BTreeMap;

use log::debug;

use crate::compose::{AutomationTarget, EffectSlot};
use crate::graph::{
    autowah::AutoWahNode,
    chorus::ChorusNode,
    compressor::CompressorNode,
    delay::DelayNode,
    distortion::{BitcrusherNode, DistortionNode, WaveshaperNode},
    filter::FilterNode,
    phaser::PhaserNode,
    pitch_shift::PitchShiftNode,
    reverb::ReverbNode,
    tremolo::TremoloNode,
    GraphNode, RenderCtx,
};
use crate::theory::EffectKind;

/*
Effect Bank
===========

One shared unit per effect kind, built the first time a chain asks for it
and kept across renders. A chain is only a routing order over the bank.

Routing a chain resets every unit it touches and sets its tunable parameter
either to the default or to the variation's nudge f in [0, 1):

  reverb     room size   0.3 + 0.6f
  delay      time        0.125 + 0.25f s
  chorus     rate        2 + 6f Hz
  filter     cutoff      400 + 1600f Hz

The reverb and delay mix levels double as the send levels the automation
lanes drive.
*/

const REVERB_ROOM: f32 = 0.7;
const REVERB_SEND: f32 = 0.3;
const DELAY_SECS: f32 = 0.25;
const DELAY_SEND: f32 = 0.3;
const CHORUS_RATE: f32 = 4.0;
const FILTER_CUTOFF: f32 = 800.0;

/// A routable effect. Granular has no unit.
pub enum EffectUnit {
    Reverb(ReverbNode),
    Delay(DelayNode),
    Chorus(ChorusNode),
    Distortion(DistortionNode),
    Filter(FilterNode),
    Compressor(CompressorNode),
    Phaser(PhaserNode),
    Tremolo(TremoloNode),
    AutoWah(AutoWahNode),
    Bitcrusher(BitcrusherNode),
    PitchShift(PitchShiftNode),
    Waveshaper(WaveshaperNode),
}

impl EffectUnit {
    pub fn new(kind: EffectKind) -> Option<Self> {
        let unit = match kind {
            EffectKind::Reverb => EffectUnit::Reverb(ReverbNode::new(REVERB_ROOM, 0.5, REVERB_SEND)),
            EffectKind::Delay => EffectUnit::Delay(DelayNode::new(DELAY_SECS, 0.3, DELAY_SEND)),
            EffectKind::Chorus => EffectUnit::Chorus(ChorusNode::new(CHORUS_RATE, 2.5, 0.5)),
            EffectKind::Distortion => EffectUnit::Distortion(DistortionNode::soft(4.0, 0.8)),
            EffectKind::Filter => EffectUnit::Filter(FilterNode::lowpass(FILTER_CUTOFF)),
            EffectKind::Compressor => {
                EffectUnit::Compressor(CompressorNode::new(-30.0, 3.0, 0.003, 0.25).with_makeup_db(6.0))
            }
            EffectKind::Phaser => EffectUnit::Phaser(PhaserNode::new(0.5, 0.5, 0.5)),
            EffectKind::Tremolo => EffectUnit::Tremolo(TremoloNode::new(9.0, 0.75)),
            EffectKind::AutoWah => EffectUnit::AutoWah(AutoWahNode::new(50.0, 1_200.0, 2.0, 0.8)),
            EffectKind::Bitcrusher => EffectUnit::Bitcrusher(BitcrusherNode::new(4, 1, 0.6)),
            EffectKind::PitchShift => EffectUnit::PitchShift(PitchShiftNode::new(4.0, 0.5)),
            EffectKind::Waveshaper => EffectUnit::Waveshaper(WaveshaperNode::new(4, 0.5)),
            EffectKind::Granular => return None,
        };
        Some(unit)
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            EffectUnit::Reverb(_) => EffectKind::Reverb,
            EffectUnit::Delay(_) => EffectKind::Delay,
            EffectUnit::Chorus(_) => EffectKind::Chorus,
            EffectUnit::Distortion(_) => EffectKind::Distortion,
            EffectUnit::Filter(_) => EffectKind::Filter,
            EffectUnit::Compressor(_) => EffectKind::Compressor,
            EffectUnit::Phaser(_) => EffectKind::Phaser,
            EffectUnit::Tremolo(_) => EffectKind::Tremolo,
            EffectUnit::AutoWah(_) => EffectKind::AutoWah,
            EffectUnit::Bitcrusher(_) => EffectKind::Bitcrusher,
            EffectUnit::PitchShift(_) => EffectKind::PitchShift,
            EffectUnit::Waveshaper(_) => EffectKind::Waveshaper,
        }
    }

    /// Restore the tunable parameter, nudged if `nudge` is given.
    pub fn configure(&mut self, nudge: Option<f32>) {
        let at = |default: f32, low: f32, span: f32| nudge.map_or(default, |f| low + span * f);
        match self {
            EffectUnit::Reverb(node) => {
                node.set_room_size(at(REVERB_ROOM, 0.3, 0.6));
                node.set_mix(REVERB_SEND);
            }
            EffectUnit::Delay(node) => {
                node.set_time(at(DELAY_SECS, 0.125, 0.25));
                node.set_mix(DELAY_SEND);
            }
            EffectUnit::Chorus(node) => node.set_rate(at(CHORUS_RATE, 2.0, 6.0)),
            EffectUnit::Filter(node) => node.set_cutoff(at(FILTER_CUTOFF, 400.0, 1_600.0)),
            _ => {}
        }
    }

    fn node(&mut self) -> &mut dyn GraphNode {
        match self {
            EffectUnit::Reverb(node) => node,
            EffectUnit::Delay(node) => node,
            EffectUnit::Chorus(node) => node,
            EffectUnit::Distortion(node) => node,
            EffectUnit::Filter(node) => node,
            EffectUnit::Compressor(node) => node,
            EffectUnit::Phaser(node) => node,
            EffectUnit::Tremolo(node) => node,
            EffectUnit::AutoWah(node) => node,
            EffectUnit::Bitcrusher(node) => node,
            EffectUnit::PitchShift(node) => node,
            EffectUnit::Waveshaper(node) => node,
        }
    }
}

impl GraphNode for EffectUnit {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.node().render_block(out, ctx)
    }

    fn reset(&mut self) {
        self.node().reset()
    }
}

/// Shared effect units plus the order the current render runs them in.
#[derive(Default)]
pub struct EffectBank {
    units: BTreeMap<EffectKind, EffectUnit>,
    route: Vec<EffectKind>,
}

impl EffectBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a composed chain, applying each slot's nudge.
    pub fn route_slots(&mut self, slots: &[EffectSlot]) {
        self.route_with(slots.iter().map(|slot| (slot.kind, Some(slot.nudge))));
    }

    /// Route a fixed chain at default settings.
    pub fn route_kinds(&mut self, kinds: &[EffectKind]) {
        self.route_with(kinds.iter().map(|kind| (*kind, None)));
    }

    fn route_with(&mut self, chain: impl Iterator<Item = (EffectKind, Option<f32>)>) {
        self.route.clear();
        for (kind, nudge) in chain {
            if self.route.contains(&kind) {
                debug!("{} already routed, skipping the repeat", kind);
                continue;
            }
            if !self.units.contains_key(&kind) {
                match EffectUnit::new(kind) {
                    Some(unit) => {
                        self.units.insert(kind, unit);
                    }
                    None => {
                        debug!("{} has no effect unit, skipped", kind);
                        continue;
                    }
                }
            }
            if let Some(unit) = self.units.get_mut(&kind) {
                unit.reset();
                unit.configure(nudge);
                self.route.push(kind);
            }
        }
    }

    /// Kinds in processing order.
    pub fn routed(&self) -> &[EffectKind] {
        &self.route
    }

    /// Units built so far, routed or not.
    pub fn built(&self) -> usize {
        self.units.len()
    }

    pub fn unit(&self, kind: EffectKind) -> Option<&EffectUnit> {
        self.units.get(&kind)
    }

    /// Send level for the reverb or delay unit. Other targets are ignored.
    pub fn set_send(&mut self, target: AutomationTarget, level: f32) {
        let level = level.clamp(0.0, 1.0);
        match (target, self.units.get_mut(&send_kind(target))) {
            (AutomationTarget::ReverbSend, Some(EffectUnit::Reverb(node))) => node.set_mix(level),
            (AutomationTarget::DelaySend, Some(EffectUnit::Delay(node))) => node.set_mix(level),
            _ => {}
        }
    }

    /// Run `out` through the routed chain in place.
    pub fn process(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for kind in &self.route {
            if let Some(unit) = self.units.get_mut(kind) {
                unit.render_block(out, ctx);
            }
        }
    }

    /// Silence every tail, keep the units.
    pub fn reset(&mut self) {
        for unit in self.units.values_mut() {
            unit.reset();
        }
    }

    /// Drop every unit and the routing.
    pub fn clear(&mut self) {
        self.units.clear();
        self.route.clear();
    }
}

fn send_kind(target: AutomationTarget) -> EffectKind {
    match target {
        AutomationTarget::DelaySend => EffectKind::Delay,
        _ => EffectKind::Reverb,
    }
}
