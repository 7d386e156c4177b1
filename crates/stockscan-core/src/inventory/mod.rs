//! Inventory record extraction from sheet text.

pub mod fallback;
mod parser;
pub mod patterns;

pub use parser::{ParsedLines, RecordParser};
