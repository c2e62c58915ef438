//! Records recovered from a course-evaluation export.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::sentiment::SentimentBucket;

/// Academic term of an offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Term {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl FromStr for Term {
    type Err = ();

    /// Case-insensitive; only the four season names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spring" => Ok(Term::Spring),
            "summer" => Ok(Term::Summer),
            "fall" => Ok(Term::Fall),
            "winter" => Ok(Term::Winter),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Term::Spring => "Spring",
            Term::Summer => "Summer",
            Term::Fall => "Fall",
            Term::Winter => "Winter",
        };
        f.write_str(name)
    }
}

/// Banner information shared by every record of one export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferingMetadata {
    pub course_title: String,
    pub term: Term,
    pub year: i32,
    pub possible_respondents: u32,
}

/// One row of the quantitative table.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantMeasurement {
    pub metadata: Arc<OfferingMetadata>,
    pub question_number: Option<u8>,
    pub question_text: String,
    pub sample_size: Option<u32>,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
}

/// One free-text answer, labelled with the question it was given under.
#[derive(Debug, Clone, PartialEq)]
pub struct QualComment {
    pub metadata: Arc<OfferingMetadata>,
    pub question_text: String,
    pub answer_text: String,
    pub sentiment: SentimentBucket,
}

/// Per-offering summary carrying the two headline averages.
#[derive(Debug, Clone, PartialEq)]
pub struct MainRecord {
    pub metadata: Arc<OfferingMetadata>,
    pub avg_q21: Option<f64>,
    pub avg_q23: Option<f64>,
}

/// Everything a single export file contributes to the run.
///
/// Built only when the whole file parsed; a failing file yields no
/// `ParsedExport` at all.
#[derive(Debug, Clone)]
pub struct ParsedExport {
    pub main: MainRecord,
    pub measurements: Vec<QuantMeasurement>,
    pub comments: Vec<QualComment>,
}

impl ParsedExport {
    pub fn metadata(&self) -> &OfferingMetadata {
        &self.main.metadata
    }
}
