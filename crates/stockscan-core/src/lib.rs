//! Core library for inventory sheet OCR processing.
//!
//! This crate provides:
//! - OCR engine discovery (locating a usable `tesseract` binary at startup)
//! - Line extraction through the engine
//! - Structural parsing of sheet lines into inventory records
//! - A deterministic demo fallback when no engine can be used
//! - The extraction orchestrator and flat-file storage

pub mod error;
pub mod models;
pub mod ocr;
pub mod inventory;
pub mod pipeline;
pub mod storage;

pub use error::{OcrError, RequestError, StockscanError, StorageError, Result};
pub use models::config::StockscanConfig;
pub use models::record::InventoryRecord;
pub use ocr::{EngineAvailability, EngineProbe, OcrEngine, OcrText, TesseractEngine};
pub use inventory::{fallback, RecordParser, ParsedLines};
pub use pipeline::{ExtractionEnvelope, ExtractionMode, ExtractionResult, Extractor, FallbackReason, OcrStatus};
pub use storage::{ImageUpload, Storage, TextSink};
