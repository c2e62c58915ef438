//! Error kinds raised while converting a single export file.
//!
//! Every variant is fatal to the file that produced it and to nothing else:
//! the pipeline logs it, records it in the run report and moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Required banner fields were not found in the first lines of the file.
    #[error("could not parse metadata in file header (missing {})", .missing.join(", "))]
    MetadataParse { missing: Vec<&'static str> },

    /// A quantitative cell was non-empty but not a valid number.
    #[error("invalid {column} value {value:?} for question {question:?}")]
    NumericFieldParse {
        column: &'static str,
        value: String,
        question: String,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl ConvertError {
    /// Short machine-friendly name used in logs and the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::MetadataParse { .. } => "metadata_parse",
            ConvertError::NumericFieldParse { .. } => "numeric_field_parse",
            ConvertError::Io { .. } => "io",
            ConvertError::Csv(_) => "csv",
        }
    }
}
