//! Preview playback on the default output device.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use edm_forge::AudioAsset;

/// Mono tape plus a fractional read head.
struct Playback {
    tape: Vec<f32>,
    position: f64,
    /// Tape samples per device frame.
    step: f64,
}

impl Playback {
    /// Next sample, linearly interpolated. `None` at the end of the tape.
    fn next(&mut self) -> Option<f32> {
        let index = self.position as usize;
        let a = *self.tape.get(index)?;
        let b = self.tape.get(index + 1).copied().unwrap_or(0.0);
        let frac = (self.position - index as f64) as f32;
        self.position += self.step;
        Some(a + (b - a) * frac)
    }
}

fn decode(asset: &AudioAsset) -> EyreResult<Vec<f32>> {
    let mut reader =
        hound::WavReader::new(Cursor::new(&asset.bytes)).wrap_err("rendered wav is unreadable")?;
    let channels = reader.spec().channels.max(1) as usize;
    let samples = reader
        .samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .wrap_err("rendered wav is truncated")?;

    // Every channel carries the same signal
    Ok(samples
        .chunks(channels)
        .map(|frame| frame[0] as f32 / i16::MAX as f32)
        .collect())
}

/// Play `asset` to the end, blocking until it finishes.
pub fn play(asset: &AudioAsset) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let device_rate = config.sample_rate().0 as f64;
    let channels = config.channels() as usize;
    log::info!(
        "playing {:.1} s at {} Hz on {} channel(s)",
        asset.duration_secs(),
        device_rate,
        channels
    );

    let state = Arc::new(Mutex::new(Playback {
        tape: decode(asset)?,
        position: 0.0,
        step: asset.sample_rate as f64 / device_rate,
    }));
    let finished = Arc::new(AtomicBool::new(false));

    let state_clone = state.clone();
    let finished_clone = finished.clone();
    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            let Ok(mut playback) = state_clone.lock() else {
                data.fill(0.0);
                return;
            };
            for frame in data.chunks_mut(channels) {
                let sample = match playback.next() {
                    Some(sample) => sample,
                    None => {
                        finished_clone.store(true, Ordering::Release);
                        0.0
                    }
                };
                frame.fill(sample);
            }
        },
        |err| log::error!("audio error: {}", err),
        None,
    )?;

    stream.play()?;
    while !finished.load(Ordering::Acquire) {
        std::thread::sleep(Duration::from_millis(50));
    }
    // Let the device drain its last buffer
    std::thread::sleep(Duration::from_millis(200));
    Ok(())
}
