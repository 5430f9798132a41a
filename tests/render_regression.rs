use std::io::Cursor;

use edm_forge::theory::{Complexity, Genre, MixingStyle, Mood};
use edm_forge::{GenerationRequest, Generator, GeneratorConfig};

fn render(config: GeneratorConfig, duration_secs: f64) -> edm_forge::Variation {
    let (mut generator, _remote) = Generator::new(config).unwrap();
    let request = GenerationRequest::builder(Genre::Electro, Mood::Energetic)
        .prompt("robots")
        .duration_secs(duration_secs)
        .complexity(Complexity::Simple)
        .mixing(MixingStyle::Saturated)
        .build();
    generator.generate(&request).unwrap().remove(0)
}

fn check_duration(config: GeneratorConfig, duration_secs: f64) {
    let sample_rate = config.sample_rate;
    let variation = render(config, duration_secs);

    let reader = hound::WavReader::new(Cursor::new(&variation.audio.bytes)).unwrap();
    let frames = reader.duration() as f64;
    let step = 1.0 / sample_rate as f64;
    assert!(
        (frames / sample_rate as f64 - duration_secs).abs() <= step,
        "{} frames for {} s",
        frames,
        duration_secs
    );
}

#[test]
fn wav_header_is_standard_pcm() {
    let variation = render(GeneratorConfig::default(), 0.5);
    let bytes = &variation.audio.bytes;

    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
    assert_eq!(&bytes[12..16], b"fmt ");

    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 44_100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
    assert_eq!(reader.duration(), 22_050);
}

#[test]
fn channels_carry_the_same_signal() {
    let variation = render(GeneratorConfig::default(), 0.5);
    let mut reader = hound::WavReader::new(Cursor::new(&variation.audio.bytes)).unwrap();
    let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();

    assert!(samples.chunks(2).all(|frame| frame[0] == frame[1]));
    assert!(samples.iter().any(|s| *s != 0));
}

#[test]
fn five_seconds() {
    check_duration(GeneratorConfig::default(), 5.0);
}

#[test]
fn thirty_seconds() {
    check_duration(GeneratorConfig::default(), 30.0);
}

#[test]
fn two_minutes() {
    check_duration(GeneratorConfig::default().channels(1), 120.0);
}

#[test]
fn fractional_durations_round_to_the_nearest_frame() {
    let variation = render(GeneratorConfig::default().sample_rate(48_000), 1.23456);
    assert_eq!(variation.audio.frames, 59_259);
}

#[test]
fn written_files_open_as_wav_and_json() {
    let variation = render(GeneratorConfig::default(), 0.5);
    let dir = tempfile::tempdir().unwrap();
    let id = &variation.metadata.unique_id;

    let wav = dir.path().join(format!("{}.wav", id));
    let json = dir.path().join(format!("{}.json", id));
    std::fs::write(&wav, &variation.audio.bytes).unwrap();
    std::fs::write(&json, variation.metadata_json().unwrap()).unwrap();

    let reader = hound::WavReader::open(&wav).unwrap();
    assert_eq!(reader.duration() as usize, variation.audio.frames);

    let metadata: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(metadata["uniqueId"], id.as_str());
    assert_eq!(metadata["genre"], "electro");
    assert_eq!(metadata["effectsChain"][0], "waveshaper");
}
