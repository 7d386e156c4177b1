//! Tesseract command-line engine.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use image::{GenericImageView, ImageFormat, ImageReader};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{EngineAvailability, OcrEngine, OcrText};

/// Runs the bound tesseract binary on sheet images.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: String,
    page_segmentation_mode: Option<u8>,
}

impl TesseractEngine {
    /// Create an engine bound to `binary` with English recognition.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            language: "eng".to_string(),
            page_segmentation_mode: None,
        }
    }

    /// Bind an engine if the probe found one.
    pub fn from_availability(availability: &EngineAvailability, config: &OcrConfig) -> Option<Self> {
        availability.binary().map(|binary| {
            let mut engine = Self::new(binary).with_language(&config.language);
            engine.page_segmentation_mode = config.page_segmentation_mode;
            engine
        })
    }

    /// Set the recognition language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the page segmentation mode.
    pub fn with_page_segmentation_mode(mut self, psm: u8) -> Self {
        self.page_segmentation_mode = Some(psm);
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Decode the image and re-encode it as PNG inside `dir`.
    ///
    /// Decoding up front turns corrupt uploads into [`OcrError::InvalidImage`]
    /// instead of an opaque engine failure.
    fn prepare_input(&self, image: &Path, dir: &Path) -> Result<PathBuf, OcrError> {
        let decoded = ImageReader::open(image)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| OcrError::InvalidImage(format!("{}: {}", image.display(), e)))?;

        let (width, height) = decoded.dimensions();
        debug!("Decoded {} ({}x{})", image.display(), width, height);

        let input = dir.join("sheet.png");
        decoded
            .save_with_format(&input, ImageFormat::Png)
            .map_err(|e| OcrError::InvalidImage(format!("failed to re-encode image: {}", e)))?;

        Ok(input)
    }

    fn run(&self, input: &Path) -> Result<String, OcrError> {
        let mut command = Command::new(&self.binary);
        command.arg(input).arg("stdout").args(["-l", &self.language]);
        if let Some(psm) = self.page_segmentation_mode {
            command.args(["--psm", &psm.to_string()]);
        }

        let output = command
            .output()
            .map_err(|e| OcrError::Invocation(format!("{}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl OcrEngine for TesseractEngine {
    fn extract_text(&self, image: &Path) -> Result<OcrText, OcrError> {
        let start = Instant::now();
        let scratch = tempfile::tempdir()?;

        let input = self.prepare_input(image, scratch.path())?;
        let raw_text = self.run(&input)?;
        let text = OcrText::new(raw_text);

        info!(
            "OCR complete: {} lines in {}ms",
            text.non_empty_lines(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}
