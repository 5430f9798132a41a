use crate::dsp::distortion::{
    bit_reduce, chebyshev, foldback_buffer, hard_clip_buffer, soft_clip_buffer,
};
use crate::dsp::mix::apply_dry_wet;
use crate::graph::node::{GraphNode, Modulatable, RenderCtx};
use crate::MAX_BLOCK_SIZE;

/*
Distortion, Waveshaper, Bitcrusher
==================================

Three ways to add harmonics, all memoryless except the crusher's sample hold.

DistortionNode   clip curves from dsp::distortion (soft, hard, foldback)
                 with a drive in front and a dry/wet after.
WaveshaperNode   Chebyshev T_n blended over the input. The saturated mixing
                 style puts this first in the chain.
BitcrusherNode   amplitude quantization plus sample-rate reduction by
                 holding every N-th sample. The vintage mixing style appends
                 it to the chain and the drum bus.

Drive (1.0 - 10.0+): 1.0 clean, 3-4 warm, 5-10 heavy.
Mix (0.0 - 1.0): dry/wet.
*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DistortionMode {
    Soft,
    Hard,
    Foldback,
}

#[derive(Clone, Copy, Debug)]
pub enum DistortionParam {
    Drive,
    Mix,
}

pub struct DistortionNode {
    mode: DistortionMode,
    drive: f32,
    mix: f32,
    threshold: f32,
    dry_buffer: [f32; MAX_BLOCK_SIZE],
}

impl DistortionNode {
    fn new(mode: DistortionMode, drive: f32, mix: f32) -> Self {
        Self {
            mode,
            drive: drive.max(1.0),
            mix: mix.clamp(0.0, 1.0),
            threshold: 1.0,
            dry_buffer: [0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Warm, tube-like saturation
    pub fn soft(drive: f32, mix: f32) -> Self {
        Self::new(DistortionMode::Soft, drive, mix)
    }

    /// Harsh, buzzy clipping
    pub fn hard(drive: f32, mix: f32) -> Self {
        Self::new(DistortionMode::Hard, drive, mix)
    }

    /// Metallic folding
    pub fn foldback(drive: f32, mix: f32) -> Self {
        Self::new(DistortionMode::Foldback, drive, mix)
    }

    /// Threshold for hard clip and foldback. Clamped to at least 0.01.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.max(0.01);
        self
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.max(1.0);
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for DistortionNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        let len = out.len().min(MAX_BLOCK_SIZE);
        self.dry_buffer[..len].copy_from_slice(&out[..len]);

        match self.mode {
            DistortionMode::Soft => soft_clip_buffer(out, self.drive),
            DistortionMode::Hard => hard_clip_buffer(out, self.drive, self.threshold),
            DistortionMode::Foldback => foldback_buffer(out, self.drive, self.threshold),
        }

        apply_dry_wet(&self.dry_buffer[..len], &mut out[..len], self.mix);
    }
}

impl Modulatable for DistortionNode {
    type Param = DistortionParam;

    fn get_param(&self, param: Self::Param) -> f32 {
        match param {
            DistortionParam::Drive => self.drive,
            DistortionParam::Mix => self.mix,
        }
    }

    fn apply_modulation(&mut self, param: Self::Param, base: f32, modulation: f32) {
        match param {
            DistortionParam::Drive => self.set_drive(base + modulation),
            DistortionParam::Mix => self.set_mix(base + modulation),
        }
    }
}

/// Chebyshev waveshaper: adds the `order`-th harmonic on top of the input.
pub struct WaveshaperNode {
    order: u32,
    amount: f32,
}

impl WaveshaperNode {
    pub fn new(order: u32, amount: f32) -> Self {
        Self {
            order: order.clamp(1, 16),
            amount: amount.clamp(0.0, 1.0),
        }
    }

    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn set_amount(&mut self, amount: f32) {
        self.amount = amount.clamp(0.0, 1.0);
    }
}

impl GraphNode for WaveshaperNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            let shaped = chebyshev(*sample, self.order);
            *sample = *sample * (1.0 - self.amount) + shaped * self.amount;
        }
    }
}

pub struct BitcrusherNode {
    bits: u32,
    downsample: u32,
    mix: f32,
    held: f32,
    counter: u32,
}

impl BitcrusherNode {
    /// - `bits`: amplitude resolution, 1 - 16
    /// - `downsample`: hold each sample for this many frames (1 = off)
    pub fn new(bits: u32, downsample: u32, mix: f32) -> Self {
        Self {
            bits: bits.clamp(1, 16),
            downsample: downsample.max(1),
            mix: mix.clamp(0.0, 1.0),
            held: 0.0,
            counter: 0,
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }
}

impl GraphNode for BitcrusherNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            if self.counter == 0 {
                self.held = bit_reduce(*sample, self.bits);
            }
            self.counter = (self.counter + 1) % self.downsample;
            *sample = *sample * (1.0 - self.mix) + self.held * self.mix;
        }
    }

    fn reset(&mut self) {
        self.held = 0.0;
        self.counter = 0;
    }
}
