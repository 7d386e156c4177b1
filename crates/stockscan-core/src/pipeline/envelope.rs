//! Wire form of an extraction result.

use serde::{Deserialize, Serialize};

use crate::models::record::InventoryRecord;

use super::{ExtractionMode, ExtractionResult};

/// Status reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrStatus {
    Success,
    DemoMode,
}

impl From<&ExtractionMode> for OcrStatus {
    fn from(mode: &ExtractionMode) -> Self {
        match mode {
            ExtractionMode::EngineSuccess => Self::Success,
            ExtractionMode::Fallback { .. } => Self::DemoMode,
        }
    }
}

/// The response body returned for an extraction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionEnvelope {
    pub extracted_text: String,
    pub items: Vec<InventoryRecord>,
    pub saved_file: String,
    pub ocr_status: OcrStatus,
}

impl From<ExtractionResult> for ExtractionEnvelope {
    fn from(result: ExtractionResult) -> Self {
        Self {
            ocr_status: OcrStatus::from(&result.mode),
            extracted_text: result.raw_text,
            items: result.records,
            saved_file: result.saved_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::fallback;
    use crate::pipeline::FallbackReason;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_demo_envelope_json() {
        let result = ExtractionResult {
            raw_text: fallback::DEMO_TEXT.to_string(),
            records: fallback::demo_records(),
            mode: ExtractionMode::Fallback {
                reason: FallbackReason::EngineUnavailable,
            },
            saved_file: "text_20240105_101500.txt".to_string(),
            unmatched_lines: vec!["DEMO MODE - Tesseract OCR not available".to_string()],
            processing_time_ms: 3,
        };

        let json = serde_json::to_value(ExtractionEnvelope::from(result)).unwrap();
        assert_eq!(json["ocr_status"], "demo_mode");
        assert_eq!(json["saved_file"], "text_20240105_101500.txt");
        assert_eq!(json["extracted_text"], fallback::DEMO_TEXT);
        assert_eq!(
            json["items"][2],
            serde_json::json!({
                "sn": 3,
                "name": "Mountain Dew 500ml",
                "quantity": 18,
                "barcode": "8901234567892",
                "cost_price": 14.0,
                "selling_price": 23.5
            })
        );
        assert!(json.get("unmatched_lines").is_none());
    }

    #[test]
    fn test_status_follows_mode() {
        assert_eq!(OcrStatus::from(&ExtractionMode::EngineSuccess), OcrStatus::Success);
        assert_eq!(
            serde_json::to_value(OcrStatus::Success).unwrap(),
            serde_json::json!("success")
        );
    }
}
