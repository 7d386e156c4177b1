//! Demo output used when no OCR engine can be run.
//!
//! The text and records are constants so demo runs compare exactly across
//! calls and processes.

use rust_decimal::Decimal;

use crate::models::record::InventoryRecord;

/// Raw text produced in demo mode.
pub const DEMO_TEXT: &str = "DEMO MODE - Tesseract OCR not available\n\n\
1 Coca Cola 500ml 24 8901234567890 15.00 25.00\n\
2 Pepsi Cola 330ml 30 8901234567891 12.50 20.00\n\
3 Mountain Dew 500ml 18 8901234567892 14.00 23.50";

/// The records a real parse of [`DEMO_TEXT`] would produce.
pub fn demo_records() -> Vec<InventoryRecord> {
    vec![
        InventoryRecord::new(
            1,
            "Coca Cola 500ml",
            24,
            "8901234567890",
            Decimal::new(1500, 2),
            Decimal::new(2500, 2),
        ),
        InventoryRecord::new(
            2,
            "Pepsi Cola 330ml",
            30,
            "8901234567891",
            Decimal::new(1250, 2),
            Decimal::new(2000, 2),
        ),
        InventoryRecord::new(
            3,
            "Mountain Dew 500ml",
            18,
            "8901234567892",
            Decimal::new(1400, 2),
            Decimal::new(2350, 2),
        ),
    ]
}

/// Demo text and records together.
pub fn generate() -> (&'static str, Vec<InventoryRecord>) {
    (DEMO_TEXT, demo_records())
}
