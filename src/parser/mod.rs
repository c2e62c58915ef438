//! Parser for course-evaluation CSV exports.
//!
//! An export is laid out as:
//! - rows 0-3: banner with the `<Term> <Year>, <Title> Section` line and the
//!   `There were: <n> possible respondents` line
//! - row 4: quantitative table header (ignored)
//! - rows 5..: one row per question (`_, text, N, mean, SD`)
//! - from the first `Text Responses` row: `Question: <text>` headers, each
//!   followed by single-cell answers

pub mod assemble;
pub mod cells;
pub mod metadata;
pub mod qual;
pub mod quant;
pub mod rows;
pub mod sections;

pub use rows::{Row, read_rows};

use std::sync::Arc;

use tracing::debug;

use crate::catalog::QuestionCatalog;
use crate::error::ConvertError;
use crate::model::ParsedExport;
use crate::sentiment::SentimentScorer;

use assemble::assemble_main_record;
use metadata::{METADATA_WINDOW, extract_metadata};
use qual::parse_qualitative;
use quant::parse_quantitative;
use sections::split_sections;

/// Parses exports against a question catalog and a sentiment scorer.
#[derive(Clone, Copy)]
pub struct ExportParser<'a> {
    catalog: &'a QuestionCatalog,
    scorer: &'a dyn SentimentScorer,
}

impl<'a> ExportParser<'a> {
    pub fn new(catalog: &'a QuestionCatalog, scorer: &'a dyn SentimentScorer) -> Self {
        Self { catalog, scorer }
    }

    /// Parses raw file contents.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedExport, ConvertError> {
        let rows = read_rows(bytes)?;
        self.parse_rows(&rows)
    }

    /// Parses an already-read export. Either every record of the file is
    /// returned or an error is.
    pub fn parse_rows(&self, rows: &[Row]) -> Result<ParsedExport, ConvertError> {
        let banner: Vec<String> = rows.iter().take(METADATA_WINDOW).map(Row::joined).collect();
        let metadata = Arc::new(extract_metadata(&banner)?);

        let sections = split_sections(rows);
        debug!(
            course = %metadata.course_title,
            quantitative_rows = sections.quantitative.len(),
            qualitative_rows = sections.qualitative.len(),
            "Export sections located"
        );

        let measurements = parse_quantitative(sections.quantitative, &metadata, self.catalog)?;
        let comments = parse_qualitative(sections.qualitative, &metadata, self.scorer);
        let main = assemble_main_record(&metadata, &measurements);

        Ok(ParsedExport {
            main,
            measurements,
            comments,
        })
    }
}
