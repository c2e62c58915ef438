//! Cell normalization and total numeric parsing.
//!
//! Each parser returns `Ok(None)` when the cell carries no value and an error
//! only when a value is present but malformed.

use std::num::{ParseFloatError, ParseIntError};

/// Replaces non-breaking spaces with regular spaces and trims.
pub fn clean_cell(cell: &str) -> String {
    cell.replace('\u{a0}', " ").trim().to_string()
}

/// Parses a respondent count.
///
/// Only all-digit cells are counts; anything else (blank, `-`, `N/A`, `3.0`)
/// is treated as no count. An all-digit value that does not fit is an error.
pub fn parse_count(cell: &str) -> Result<Option<u32>, ParseIntError> {
    if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    cell.parse().map(Some)
}

/// Parses a mean or standard deviation. Blank means absent.
pub fn parse_real(cell: &str) -> Result<Option<f64>, ParseFloatError> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse().map(Some)
}
