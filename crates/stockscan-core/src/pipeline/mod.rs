//! Extraction orchestrator: engine path or demo fallback, then persistence.

mod envelope;

pub use envelope::{ExtractionEnvelope, OcrStatus};

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{RequestError, Result};
use crate::inventory::{fallback, ParsedLines, RecordParser};
use crate::models::record::InventoryRecord;
use crate::ocr::OcrEngine;
use crate::storage::{ImageUpload, Storage, TextSink};

/// Why a request was served from the demo fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No engine was bound at startup.
    EngineUnavailable,
    /// The engine failed on this request.
    ExtractionFailed(String),
}

/// Which path produced a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMode {
    /// The engine read the image. Zero records is still a success.
    EngineSuccess,
    /// Demo text and records were returned instead.
    Fallback { reason: FallbackReason },
}

impl ExtractionMode {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Outcome of one extraction request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// The text that was parsed, stored verbatim under `saved_file`.
    pub raw_text: String,
    /// Records in source order.
    pub records: Vec<InventoryRecord>,
    /// Path taken for this request.
    pub mode: ExtractionMode,
    /// Name the raw text was persisted under.
    pub saved_file: String,
    /// Non-empty lines that produced no record.
    pub unmatched_lines: Vec<String>,
    /// Wall time spent in the request.
    pub processing_time_ms: u64,
}

/// Runs extractions against an optional engine and a text sink.
///
/// `engine` is `None` when the startup probe found nothing; every request
/// then goes straight to the fallback. A failing engine only affects the
/// request it failed on.
pub struct Extractor<E, S = Storage> {
    engine: Option<E>,
    sink: S,
    parser: RecordParser,
}

impl<E: OcrEngine, S: TextSink> Extractor<E, S> {
    pub fn new(engine: Option<E>, sink: S) -> Self {
        Self {
            engine,
            sink,
            parser: RecordParser::new(),
        }
    }

    /// Whether an engine was bound at startup.
    pub fn engine_available(&self) -> bool {
        self.engine.is_some()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Extract records from an image already on disk.
    pub fn extract_file(&self, image: &Path) -> Result<ExtractionResult> {
        let start = Instant::now();

        let (raw_text, parsed, mode) = match &self.engine {
            Some(engine) => match engine.extract_text(image) {
                Ok(text) => {
                    let parsed = self.parser.parse_lines(&text.lines);
                    (text.raw_text, parsed, ExtractionMode::EngineSuccess)
                }
                Err(e) => {
                    warn!("OCR error on {} with {}: {}, using demo mode", image.display(), engine.name(), e);
                    self.fallback(FallbackReason::ExtractionFailed(e.to_string()))
                }
            },
            None => self.fallback(FallbackReason::EngineUnavailable),
        };

        let saved_file = self.sink.persist_text(&raw_text)?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} records from {} ({}) in {}ms, text saved as {}",
            parsed.records.len(),
            image.display(),
            if mode.is_fallback() { "demo mode" } else { "engine" },
            processing_time_ms,
            saved_file
        );
        if !parsed.unmatched.is_empty() {
            debug!("{} lines did not match the record pattern", parsed.unmatched.len());
        }

        Ok(ExtractionResult {
            raw_text,
            records: parsed.records,
            mode,
            saved_file,
            unmatched_lines: parsed.unmatched,
            processing_time_ms,
        })
    }

    fn fallback(&self, reason: FallbackReason) -> (String, ParsedLines, ExtractionMode) {
        let (text, records) = fallback::generate();
        let parsed = ParsedLines {
            records,
            unmatched: self.parser.parse_text(text).unmatched,
        };
        (text.to_string(), parsed, ExtractionMode::Fallback { reason })
    }
}

impl<E: OcrEngine> Extractor<E, Storage> {
    /// Validate and save an upload, then extract from it.
    ///
    /// A missing upload or empty filename is rejected before the engine or
    /// the fallback is consulted.
    pub fn extract_upload(&self, upload: Option<ImageUpload>) -> Result<ExtractionResult> {
        let upload = upload.ok_or_else(|| RequestError::MissingInput("No image file provided".to_string()))?;
        if upload.filename.is_empty() {
            return Err(RequestError::MissingInput("No selected file".to_string()).into());
        }

        let path = self.sink.save_upload(&upload)?;
        self.extract_file(&path)
    }
}
