use crate::dsp::reverb::SchroederReverb;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};

/*
Reverb Node
===========

Room simulation on top of the Schroeder reverb in `dsp::reverb`: four damped
combs for the tail, two allpasses for diffusion.

Parameters
----------

Room Size (0.0 - 1.0):  comb feedback, small room to large hall
Damping (0.0 - 1.0):    high-frequency absorption, bright to dark
Mix (0.0 - 1.0):        dry/wet; the reverb send automation drives this

The comb buffers depend on the sample rate, so the reverb is rebuilt on the
first block (and whenever the rate changes). Tails carry across note events;
only `reset()` clears them.

Example usage:

  // Pad wash
  voices::pad().through(ReverbNode::hall(0.4))
*/

#[derive(Clone, Copy, Debug)]
pub enum ReverbParam {
    RoomSize,
    Damping,
    Mix,
}

pub struct ReverbNode {
    reverb: Option<(SchroederReverb, f32)>,
    room_size: f32,
    damping: f32,
    mix: f32,
}

impl ReverbNode {
    /// - `room_size`: 0.0 (small room) to 1.0 (large hall)
    /// - `damping`: 0.0 (bright) to 1.0 (dark)
    /// - `mix`: 0.0 (dry) to 1.0 (wet)
    pub fn new(room_size: f32, damping: f32, mix: f32) -> Self {
        Self {
            reverb: None,
            room_size: room_size.clamp(0.0, 1.0),
            damping: damping.clamp(0.0, 1.0),
            mix: mix.clamp(0.0, 1.0),
        }
    }

    pub fn room(mix: f32) -> Self {
        Self::new(0.3, 0.5, mix)
    }

    pub fn hall(mix: f32) -> Self {
        Self::new(0.6, 0.4, mix)
    }

    pub fn plate(mix: f32) -> Self {
        Self::new(0.85, 0.3, mix)
    }

    pub fn room_size(&self) -> f32 {
        self.room_size
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    pub fn set_room_size(&mut self, room_size: f32) {
        self.room_size = room_size.clamp(0.0, 1.0);
        if let Some((reverb, _)) = &mut self.reverb {
            reverb.set_room_size(self.room_size);
        }
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping.clamp(0.0, 1.0);
        if let Some((reverb, _)) = &mut self.reverb {
            reverb.set_damping(self.damping);
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    fn reverb_for(&mut self, sample_rate: f32) -> &mut SchroederReverb {
        if !matches!(&self.reverb, Some((_, rate)) if *rate == sample_rate) {
            self.reverb = None;
        }

        let (room_size, damping) = (self.room_size, self.damping);
        let (reverb, _) = self.reverb.get_or_insert_with(|| {
            let mut reverb = SchroederReverb::new(sample_rate);
            reverb.set_room_size(room_size);
            reverb.set_damping(damping);
            (reverb, sample_rate)
        });
        reverb
    }
}

impl GraphNode for ReverbNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let mix = self.mix;
        let reverb = self.reverb_for(ctx.sample_rate);

        for sample in out.iter_mut() {
            let dry = *sample;
            let wet = reverb.process(dry);
            *sample = dry * (1.0 - mix) + wet * mix;
        }
    }

    fn reset(&mut self) {
        if let Some((reverb, _)) = &mut self.reverb {
            reverb.reset();
        }
    }
}

impl Modulatable for ReverbNode {
    type Param = ReverbParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            ReverbParam::RoomSize => self.room_size,
            ReverbParam::Damping => self.damping,
            ReverbParam::Mix => self.mix,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            ReverbParam::RoomSize => self.set_room_size(base + modulation),
            ReverbParam::Damping => self.set_damping(base + modulation),
            ReverbParam::Mix => self.set_mix(base + modulation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ctx() -> RenderCtx {
        RenderCtx::from_note(48000.0, 60, 100.0)
    }

    fn tail_energy(reverb: &mut ReverbNode) -> f32 {
        let mut energy = 0.0;
        for _ in 0..100 {
            let mut buf = vec![0.0; 64];
            reverb.render_block(&mut buf, &test_ctx());
            energy += buf.iter().map(|x| x * x).sum::<f32>();
        }
        energy
    }

    #[test]
    fn test_reverb_adds_tail() {
        let mut reverb = ReverbNode::new(0.5, 0.5, 1.0);

        let mut buffer = vec![1.0; 1];
        reverb.render_block(&mut buffer, &test_ctx());

        assert!(tail_energy(&mut reverb) > 0.01, "Reverb should produce a tail");
    }

    #[test]
    fn test_dry_reverb_preserves_signal() {
        let mut reverb = ReverbNode::new(0.5, 0.5, 0.0);

        let mut buffer = vec![0.5, 0.3, 0.7];
        let original = buffer.clone();

        reverb.render_block(&mut buffer, &test_ctx());

        for (a, b) in buffer.iter().zip(original.iter()) {
            assert!((a - b).abs() < 0.01, "Dry reverb should preserve signal");
        }
    }

    #[test]
    fn test_reset_clears_tail() {
        let mut reverb = ReverbNode::hall(1.0);
        let mut buffer = vec![1.0; 1];
        reverb.render_block(&mut buffer, &test_ctx());

        reverb.reset();
        assert_eq!(tail_energy(&mut reverb), 0.0);
    }

    #[test]
    fn test_reverb_presets() {
        let room = ReverbNode::room(0.3);
        let hall = ReverbNode::hall(0.3);
        let plate = ReverbNode::plate(0.3);

        assert!(room.room_size() < hall.room_size());
        assert!(hall.room_size() < plate.room_size());
    }
}
