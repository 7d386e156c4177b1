//! Engine command - report which OCR engine the probe finds.

use console::style;

use stockscan_core::{EngineAvailability, EngineProbe};

use super::load_config;

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let probe = EngineProbe::from_config(&config.ocr);

    println!("Candidate locations:");
    for candidate in probe.candidates() {
        let marker = if candidate.is_file() {
            style("found").green()
        } else {
            style("missing").dim()
        };
        println!("  {} ({})", candidate.display(), marker);
    }
    println!();

    match probe.probe() {
        EngineAvailability::Available { binary, version } => {
            println!(
                "{} OCR available: {} at {}",
                style("✓").green(),
                version,
                binary.display()
            );
            println!("  Language: {}", config.ocr.language);
        }
        EngineAvailability::Unavailable { reason } => {
            println!("{} Demo mode: {}", style("!").yellow(), reason);
            println!();
            println!("Install tesseract or set ocr.engine_path with 'stockscan config set'.");
        }
    }

    Ok(())
}
