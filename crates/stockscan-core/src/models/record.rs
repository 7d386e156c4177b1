//! Inventory record model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One parsed line of an inventory sheet.
///
/// Field names on the wire follow the sheet scanner's envelope: the serial
/// number travels as `sn` and prices are plain JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Serial number printed in the first column.
    #[serde(rename = "sn")]
    pub serial_number: u64,

    /// Item name, whitespace-trimmed.
    pub name: String,

    /// Quantity on hand.
    pub quantity: u64,

    /// Barcode, 10 to 13 digits.
    pub barcode: String,

    /// Unit cost price.
    #[serde(with = "rust_decimal::serde::float")]
    pub cost_price: Decimal,

    /// Unit selling price.
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
}

impl InventoryRecord {
    pub fn new(
        serial_number: u64,
        name: impl Into<String>,
        quantity: u64,
        barcode: impl Into<String>,
        cost_price: Decimal,
        selling_price: Decimal,
    ) -> Self {
        Self {
            serial_number,
            name: name.into(),
            quantity,
            barcode: barcode.into(),
            cost_price,
            selling_price,
        }
    }
}
