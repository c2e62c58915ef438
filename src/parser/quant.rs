//! Quantitative table rows: question text, N, mean and standard deviation.

use std::sync::Arc;

use tracing::trace;

use super::cells::{clean_cell, parse_count, parse_real};
use super::rows::Row;
use super::sections::is_sentinel;
use crate::catalog::QuestionCatalog;
use crate::error::ConvertError;
use crate::model::{OfferingMetadata, QuantMeasurement};

const QUESTION_COL: usize = 1;
const N_COL: usize = 2;
const MEAN_COL: usize = 3;
const SD_COL: usize = 4;
/// Narrower rows are layout artifacts.
const MIN_CELLS: usize = 5;

/// Parses the quantitative region in order.
///
/// Stops at the first blank row or sentinel row even if the region was cut
/// further down.
///
/// # Errors
///
/// [`ConvertError::NumericFieldParse`] when an N, mean or SD cell holds a
/// value that is present but not a number.
pub fn parse_quantitative(
    rows: &[Row],
    metadata: &Arc<OfferingMetadata>,
    catalog: &QuestionCatalog,
) -> Result<Vec<QuantMeasurement>, ConvertError> {
    let mut measurements = Vec::new();

    for row in rows {
        if row.is_empty() || is_sentinel(row) {
            break;
        }
        if let Some(measurement) = parse_row(row, metadata, catalog)? {
            measurements.push(measurement);
        }
    }

    Ok(measurements)
}

fn parse_row(
    row: &Row,
    metadata: &Arc<OfferingMetadata>,
    catalog: &QuestionCatalog,
) -> Result<Option<QuantMeasurement>, ConvertError> {
    if row.len() < MIN_CELLS {
        trace!(cells = row.len(), "Skipping narrow row");
        return Ok(None);
    }

    let cell = |idx: usize| clean_cell(row.cell(idx).unwrap_or_default());

    let question_text = cell(QUESTION_COL);
    if question_text.is_empty() {
        return Ok(None);
    }

    let n = cell(N_COL);
    let sample_size = parse_count(&n).map_err(|_| numeric_error("N", &n, &question_text))?;

    let mean_cell = cell(MEAN_COL);
    let mean =
        parse_real(&mean_cell).map_err(|_| numeric_error("Avg", &mean_cell, &question_text))?;

    let sd_cell = cell(SD_COL);
    let stddev = parse_real(&sd_cell).map_err(|_| numeric_error("SD", &sd_cell, &question_text))?;

    Ok(Some(QuantMeasurement {
        metadata: Arc::clone(metadata),
        question_number: catalog.number_for(&question_text),
        question_text,
        sample_size,
        mean,
        stddev,
    }))
}

fn numeric_error(column: &'static str, value: &str, question: &str) -> ConvertError {
    ConvertError::NumericFieldParse {
        column,
        value: value.to_string(),
        question: question.to_string(),
    }
}
