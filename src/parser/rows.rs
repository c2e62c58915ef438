//! Raw rows of an export file.
//!
//! The `csv` reader skips blank lines, but the export layout counts them:
//! they shift the fixed banner offset and end the quantitative table. A
//! quote-aware scan of the text records where blank physical lines sit and
//! an empty [`Row`] is put back at each of those positions.

use csv::{ReaderBuilder, StringRecord};

use crate::error::ConvertError;

const UTF8_BOM: char = '\u{feff}';

/// One record of the export, as untyped text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).map(String::as_str)
    }

    pub fn first_cell(&self) -> Option<&str> {
        self.cell(0)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a blank line (no cells at all).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The row's cells joined back with commas, i.e. the line text with any
    /// quoting removed.
    pub fn joined(&self) -> String {
        self.cells.join(",")
    }
}

impl From<StringRecord> for Row {
    fn from(record: StringRecord) -> Self {
        Self::new(record.iter().map(str::to_string).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for Row {
    fn from(cells: Vec<S>) -> Self {
        Self::new(cells.into_iter().map(Into::into).collect())
    }
}

/// Parses raw file bytes into rows, keeping blank lines as empty rows.
///
/// # Errors
///
/// Returns [`ConvertError::Csv`] if the bytes are not valid UTF-8 or not
/// valid CSV.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Row>, ConvertError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        ConvertError::Csv(csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e,
        )))
    })?;
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let mut rows = Vec::new();
    for blank in line_layout(text) {
        if blank {
            rows.push(Row::default());
            continue;
        }
        match records.next() {
            Some(record) => rows.push(Row::from(record?)),
            None => break,
        }
    }
    // anything the scan did not account for is still data
    for record in records {
        rows.push(Row::from(record?));
    }

    Ok(rows)
}

/// One entry per physical record in `text`: `true` for a blank line.
///
/// A record ends at `\n`, `\r\n` or a bare `\r`, as it does for the `csv`
/// reader. Newlines inside quoted fields do not end a record. A quote only
/// opens a quoted field at the start of a field, matching how the `csv`
/// reader treats stray quotes in unquoted text.
fn line_layout(text: &str) -> Vec<bool> {
    let mut layout = Vec::new();
    let mut chars = text.chars().peekable();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut has_content = false;

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match ch {
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                layout.push(!has_content);
                has_content = false;
                at_field_start = true;
            }
            '"' if at_field_start => {
                in_quotes = true;
                has_content = true;
                at_field_start = false;
            }
            ',' => {
                has_content = true;
                at_field_start = true;
            }
            _ => {
                has_content = true;
                at_field_start = false;
            }
        }
    }

    if has_content {
        layout.push(false);
    }
    layout
}
