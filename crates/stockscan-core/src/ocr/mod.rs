//! OCR engine discovery and line extraction.

mod probe;
mod tesseract;

pub use probe::{EngineAvailability, EngineProbe};
pub use tesseract::TesseractEngine;

use std::path::Path;

use crate::error::OcrError;

/// Text recognized from one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrText {
    /// Engine output as returned, lines separated by newlines.
    pub raw_text: String,

    /// Trimmed lines in order. Empty lines keep their position.
    pub lines: Vec<String>,
}

impl OcrText {
    /// Build the line view over raw engine output.
    pub fn new(raw_text: impl Into<String>) -> Self {
        let raw_text = raw_text.into();
        let lines = split_lines(&raw_text);
        Self { raw_text, lines }
    }

    /// Number of non-empty lines.
    pub fn non_empty_lines(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_empty()).count()
    }
}

/// Split text into trimmed lines after trimming the block itself.
pub fn split_lines(text: &str) -> Vec<String> {
    text.trim()
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

/// An OCR engine that turns an image on disk into text.
pub trait OcrEngine {
    /// Recognize the text in the image at `image`.
    fn extract_text(&self, image: &Path) -> Result<OcrText, OcrError>;

    /// Short engine name for logs.
    fn name(&self) -> &str;
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lines_are_trimmed_and_keep_blanks() {
        let text = OcrText::new("\n  Header  \r\n\n 1 Soap 2 1234567890 1.00 2.00 \n\n");
        assert_eq!(
            text.lines,
            vec!["Header", "", "1 Soap 2 1234567890 1.00 2.00"]
        );
        assert_eq!(text.non_empty_lines(), 2);
    }

    #[test]
    fn test_raw_text_kept_verbatim() {
        let raw = "  a\nb  \n";
        assert_eq!(OcrText::new(raw).raw_text, raw);
    }
}
