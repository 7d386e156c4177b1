//! Save-items command - store a confirmed list of items.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::Value;

use stockscan_core::Storage;

use super::load_config;

/// Arguments for the save-items command.
#[derive(Args)]
pub struct SaveItemsArgs {
    /// JSON file holding an array of items, or an object with an `items` array
    #[arg(required = true)]
    input: PathBuf,
}

pub async fn run(args: SaveItemsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let content = fs::read_to_string(&args.input)?;
    let items = items_from_json(serde_json::from_str(&content)?)?;

    let storage = Storage::open(&config.storage)?;
    let saved_file = storage.save_confirmed_items(&items)?;

    println!(
        "{} Saved {} items to {}",
        style("✓").green(),
        items.len(),
        storage.text_dir().join(&saved_file).display()
    );

    Ok(())
}

/// Accept either `[...]` or `{"items": [...]}`.
fn items_from_json(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => anyhow::bail!("`items` must be an array"),
            None => Ok(Vec::new()),
        },
        _ => anyhow::bail!("Expected a JSON array of items"),
    }
}
