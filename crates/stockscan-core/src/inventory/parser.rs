//! Best-effort structural parser for inventory sheet lines.

use std::str::FromStr;

use regex::Captures;
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::record::InventoryRecord;
use crate::ocr::split_lines;

use super::patterns::RECORD_LINE;

/// Records parsed from a batch of lines, plus the lines that did not match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLines {
    /// Records in source order.
    pub records: Vec<InventoryRecord>,
    /// Non-empty lines that produced no record, in source order.
    pub unmatched: Vec<String>,
}

/// Turns sheet lines into [`InventoryRecord`]s.
///
/// Lines that do not have the six-column shape are skipped without error:
/// headers, totals and OCR noise are expected in the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one line. `None` when the line does not have the record shape.
    pub fn parse_line(&self, line: &str) -> Option<InventoryRecord> {
        let caps = RECORD_LINE.captures(line.trim())?;
        record_from_captures(&caps)
    }

    /// Parse an ordered sequence of lines.
    pub fn parse_lines<I, L>(&self, lines: I) -> ParsedLines
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let mut parsed = ParsedLines::default();

        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }

            match self.parse_line(line) {
                Some(record) => parsed.records.push(record),
                None => parsed.unmatched.push(line.to_string()),
            }
        }

        debug!(
            "Parsed {} records, {} unmatched lines",
            parsed.records.len(),
            parsed.unmatched.len()
        );

        parsed
    }

    /// Split a raw text block into lines and parse them.
    pub fn parse_text(&self, text: &str) -> ParsedLines {
        self.parse_lines(split_lines(text))
    }
}

fn record_from_captures(caps: &Captures<'_>) -> Option<InventoryRecord> {
    // Groups only guarantee digit shapes; values that overflow or contain
    // several dots still fail here and the line counts as unmatched.
    let serial_number = caps[1].parse().ok()?;
    let quantity = caps[3].parse().ok()?;
    let cost_price = Decimal::from_str(&caps[5]).ok()?;
    let selling_price = Decimal::from_str(&caps[6]).ok()?;

    Some(InventoryRecord {
        serial_number,
        name: caps[2].trim().to_string(),
        quantity,
        barcode: caps[4].to_string(),
        cost_price,
        selling_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sheet_with_note_line() {
        let text = "1 Coca Cola 500ml 24 8901234567890 15.00 25.00\n\
                    NOTE: reorder soon\n\
                    2 Pepsi Cola 330ml 30 8901234567891 12.50 20.00";

        let parsed = RecordParser::new().parse_text(text);

        assert_eq!(
            parsed.records,
            vec![
                InventoryRecord::new(1, "Coca Cola 500ml", 24, "8901234567890", dec("15.0"), dec("25.0")),
                InventoryRecord::new(2, "Pepsi Cola 330ml", 30, "8901234567891", dec("12.5"), dec("20.0")),
            ]
        );
        assert_eq!(parsed.unmatched, vec!["NOTE: reorder soon"]);
    }

    #[test]
    fn test_name_is_trimmed_and_lazy() {
        let record = RecordParser::new()
            .parse_line("  7   Rice   Basmati 5kg    12   1234567890   80.5   99.99  ")
            .unwrap();
        assert_eq!(record.serial_number, 7);
        assert_eq!(record.name, "Rice   Basmati 5kg");
        assert_eq!(record.quantity, 12);
        assert_eq!(record.barcode, "1234567890");
        assert_eq!(record.cost_price, dec("80.5"));
        assert_eq!(record.selling_price, dec("99.99"));
    }

    #[test]
    fn test_numeric_words_stay_in_name() {
        let record = RecordParser::new()
            .parse_line("3 Pack 6 12 1234567890123 1.00 2.00")
            .unwrap();
        assert_eq!(record.name, "Pack 6");
        assert_eq!(record.quantity, 12);
    }

    #[test]
    fn test_barcode_length_bounds() {
        let parser = RecordParser::new();
        assert!(parser.parse_line("1 Soap 2 123456789 1.00 2.00").is_none());
        assert!(parser.parse_line("1 Soap 2 1234567890 1.00 2.00").is_some());
        assert!(parser.parse_line("1 Soap 2 1234567890123 1.00 2.00").is_some());
        assert!(parser.parse_line("1 Soap 2 12345678901234 1.00 2.00").is_none());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let parser = RecordParser::new();
        let lines = [
            "S.N. Name Qty Barcode Cost Sell",
            "A Soap 2 1234567890 1.00 2.00",
            "1 Soap 2 1234567890 1.00",
            "1 Soap 2 1234567890 1.00 2.00 extra",
            "1 Soap 2 1234567890 -1.00 2.00",
            "1 2 1234567890 1.00 2.00",
            "TOTAL 1234.00",
        ];

        let parsed = parser.parse_lines(lines);
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.unmatched.len(), lines.len());
    }

    #[test]
    fn test_unconvertible_numbers_are_unmatched() {
        let parser = RecordParser::new();
        assert!(parser.parse_line("1 Soap 2 1234567890 1.2.3 2.00").is_none());
        assert!(parser.parse_line("99999999999999999999 Soap 2 1234567890 1.00 2.00").is_none());
    }

    #[test]
    fn test_large_serial_and_quantity() {
        let parser = RecordParser::new();

        let record = parser.parse_line("0 Soap 5000000000 1234567890 1.00 2.00").unwrap();
        assert_eq!(record.quantity, 5_000_000_000);

        let record = parser.parse_line("4294967296 Soap 2 1234567890 1.00 2.00").unwrap();
        assert_eq!(record.serial_number, 4_294_967_296);

        let record = parser
            .parse_line("18446744073709551615 Bulk Rice 18446744073709551615 1234567890 1.00 2.00")
            .unwrap();
        assert_eq!(record.serial_number, u64::MAX);
        assert_eq!(record.quantity, u64::MAX);
    }

    #[test]
    fn test_order_and_duplicates_preserved() {
        let text = "2 Tea 1 1111111111 1.00 2.00\n\n\
                    1 Sugar 5 2222222222 3.00 4.00\n\
                    2 Tea 1 1111111111 1.00 2.00";
        let parsed = RecordParser::new().parse_text(text);

        let serials: Vec<u64> = parsed.records.iter().map(|r| r.serial_number).collect();
        assert_eq!(serials, vec![2, 1, 2]);
        assert!(parsed.unmatched.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(RecordParser::new().parse_text(""), ParsedLines::default());
        assert_eq!(RecordParser::new().parse_text("  \n \n"), ParsedLines::default());
    }
}
