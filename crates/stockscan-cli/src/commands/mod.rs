//! Subcommands and the setup they share.

pub mod batch;
pub mod config;
pub mod engine;
pub mod extract;
pub mod save_items;
pub mod serve;

use std::path::{Path, PathBuf};

use stockscan_core::{
    EngineAvailability, EngineProbe, Extractor, StockscanConfig, StockscanError, Storage, TesseractEngine,
};

/// `<config_dir>/stockscan/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockscan")
        .join("config.json")
}

/// Resolve the config file: the `--config` flag, else the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicit `--config` path must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StockscanConfig> {
    let path = match config_path {
        Some(path) => PathBuf::from(path),
        None => {
            let path = default_config_path();
            if !path.exists() {
                return Ok(StockscanConfig::default());
            }
            path
        }
    };

    let config = read_config(&path)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<StockscanConfig, StockscanError> {
    StockscanConfig::from_file(path)
        .map_err(|e| StockscanError::Config(format!("{}: {}", path.display(), e)))
}

/// Probe for the engine once and build the extractor around the result.
pub fn build_extractor(
    config: &StockscanConfig,
) -> anyhow::Result<(EngineAvailability, Extractor<TesseractEngine>)> {
    let availability = EngineProbe::from_config(&config.ocr).probe();
    let engine = TesseractEngine::from_availability(&availability, &config.ocr);
    let storage = Storage::open(&config.storage)?;

    Ok((availability, Extractor::new(engine, storage)))
}
