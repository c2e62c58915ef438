//! Splits an export into its quantitative and qualitative regions.

use super::rows::Row;

/// Rows before the quantitative region: the banner plus the table header.
///
/// Positional, not content-derived; an export with extra banner lines will
/// misalign.
pub const QUANT_OFFSET: usize = 5;

/// First-cell prefix that opens the free-text region.
pub const SENTINEL: &str = "Text Responses";

#[derive(Debug, Clone, Copy)]
pub struct Sections<'a> {
    pub quantitative: &'a [Row],
    /// Starts with the sentinel row itself; empty when there is none.
    pub qualitative: &'a [Row],
}

/// True when the raw first cell starts with [`SENTINEL`] (case-sensitive).
pub fn is_sentinel(row: &Row) -> bool {
    row.first_cell().is_some_and(|cell| cell.starts_with(SENTINEL))
}

pub fn split_sections(rows: &[Row]) -> Sections<'_> {
    let body = rows.get(QUANT_OFFSET..).unwrap_or_default();
    let boundary = body.iter().position(is_sentinel).unwrap_or(body.len());
    let (quantitative, qualitative) = body.split_at(boundary);

    Sections {
        quantitative,
        qualitative,
    }
}
