//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Well-known install locations for the tesseract binary, checked in order.
pub const DEFAULT_ENGINE_PATHS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
];

/// Main configuration for stockscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StockscanConfig {
    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Flat-file storage configuration.
    pub storage: StorageConfig,

    /// HTTP service configuration.
    pub server: ServerConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Explicit engine binary, checked before `search_paths`.
    pub engine_path: Option<PathBuf>,

    /// Candidate engine locations in priority order.
    pub search_paths: Vec<PathBuf>,

    /// Recognition language passed to the engine.
    pub language: String,

    /// Tesseract page segmentation mode (`--psm`), engine default when unset.
    pub page_segmentation_mode: Option<u8>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            engine_path: None,
            search_paths: DEFAULT_ENGINE_PATHS.iter().map(PathBuf::from).collect(),
            language: "eng".to_string(),
            page_segmentation_mode: None,
        }
    }
}

impl OcrConfig {
    /// Candidate binaries in the order the probe should check them.
    pub fn candidates(&self) -> Vec<PathBuf> {
        self.engine_path
            .iter()
            .cloned()
            .chain(self.search_paths.iter().cloned())
            .collect()
    }
}

/// Storage directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Where uploaded sheet images are saved.
    pub upload_dir: PathBuf,

    /// Where extracted text and confirmed items are written.
    pub text_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            text_dir: PathBuf::from("extracted_texts"),
        }
    }
}

/// HTTP service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Maximum accepted request body for uploads.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl StockscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
