//! edm-forge - render procedural EDM to WAV
//!
//! Run with: cargo run -- --genre techno --mood dark --duration 30
//!
//! Log output follows `RUST_LOG` (default `info`).

mod cli;
mod play;

use std::fs;

use clap::Parser;
use color_eyre::eyre::WrapErr;

use cli::Cli;
use edm_forge::{Generator, GeneratorConfig};

fn load_config(cli: &Cli) -> color_eyre::Result<GeneratorConfig> {
    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .wrap_err_with(|| format!("invalid config {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };
    Ok(cli.apply(config))
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let request = cli.request().resolve();

    let (mut generator, _remote) = Generator::new(config)?;

    if let Some(limit) = cli.popular {
        for style in generator.popular_templates(limit) {
            println!(
                "{:>4}  {:<32} {:<20} {:>3} bpm  energy {:>2}  popularity {:>2}",
                style.id, style.name, style.sub_genre, style.bpm, style.energy, style.popularity
            );
        }
        return Ok(());
    }

    let variations = generator.generate(&request)?;
    generator.dispose();

    fs::create_dir_all(&cli.out)
        .wrap_err_with(|| format!("failed to create {}", cli.out.display()))?;

    for variation in &variations {
        let id = &variation.metadata.unique_id;
        let wav = cli.out.join(format!("{}.wav", id));
        let json = cli.out.join(format!("{}.json", id));

        fs::write(&wav, &variation.audio.bytes)
            .wrap_err_with(|| format!("failed to write {}", wav.display()))?;
        fs::write(&json, variation.metadata_json()?)
            .wrap_err_with(|| format!("failed to write {}", json.display()))?;

        log::info!(
            "variation {}: {} bpm, {}, {:.1} s -> {}",
            variation.variation_number,
            variation.metadata.bpm,
            variation.metadata.key,
            variation.duration_secs,
            wav.display()
        );
    }

    if cli.play {
        if let Some(first) = variations.first() {
            play::play(&first.audio)?;
        }
    }

    Ok(())
}
