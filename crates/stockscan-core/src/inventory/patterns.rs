//! Line patterns for inventory sheets.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Full sheet row: serial, name, quantity, barcode, cost price, selling price.
    // The name is lazy so trailing numeric columns bind to their own groups.
    pub static ref RECORD_LINE: Regex = Regex::new(
        r"^([0-9]+)\s+(.+?)\s+([0-9]+)\s+([0-9]{10,13})\s+([0-9.]+)\s+([0-9.]+)$"
    ).unwrap();
}
