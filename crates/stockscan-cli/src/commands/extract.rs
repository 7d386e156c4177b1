//! Extract command - read stock records from a single sheet image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use stockscan_core::{ExtractionEnvelope, ExtractionMode, ExtractionResult, FallbackReason, InventoryRecord};

use super::{build_extractor, load_config};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Sheet image
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print lines that did not match the record layout
    #[arg(long)]
    show_unmatched: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON envelope
    Json,
    /// CSV of records
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing sheet: {}", args.input.display());

    let (_, extractor) = build_extractor(&config)?;
    let result = extractor.extract_file(&args.input)?;

    if let ExtractionMode::Fallback { reason } = &result.mode {
        let why = match reason {
            FallbackReason::EngineUnavailable => "no OCR engine found".to_string(),
            FallbackReason::ExtractionFailed(e) => format!("OCR failed: {}", e),
        };
        eprintln!("{} Demo mode ({}), showing sample records", style("!").yellow(), why);
    }

    if args.show_unmatched && !result.unmatched_lines.is_empty() {
        eprintln!("{}", style("Unmatched lines:").yellow());
        for line in &result.unmatched_lines {
            eprintln!("  {}", line);
        }
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let envelope = ExtractionEnvelope::from(result.clone());
            Ok(serde_json::to_string_pretty(&envelope)?)
        }
        OutputFormat::Csv => format_csv(&result.records),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

pub fn format_csv(records: &[InventoryRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "sn",
        "name",
        "quantity",
        "barcode",
        "cost_price",
        "selling_price",
    ])?;

    for record in records {
        wtr.write_record([
            &record.serial_number.to_string(),
            &record.name,
            &record.quantity.to_string(),
            &record.barcode,
            &record.cost_price.to_string(),
            &record.selling_price.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    let status = if result.mode.is_fallback() { "demo mode" } else { "success" };
    output.push_str(&format!("OCR status: {}\n", status));
    output.push_str(&format!("Saved text: {}\n", result.saved_file));
    output.push_str(&format!("Records: {}\n\n", result.records.len()));

    for record in &result.records {
        output.push_str(&format!(
            "{:>4}  {:<30} {:>6}  {:<13}  {:>10}  {:>10}\n",
            record.serial_number,
            record.name,
            record.quantity,
            record.barcode,
            record.cost_price,
            record.selling_price
        ));
    }

    output
}
