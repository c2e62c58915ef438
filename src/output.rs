//! Output tables and their CSV persistence.
//!
//! Three tables are accumulated over a run and written once at the end:
//! `Main.csv`, `Quant.csv` and `Qual.csv`. Headers are always written, so an
//! empty table is still a valid file with a fixed column order.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::model::{MainRecord, ParsedExport, QualComment, QuantMeasurement, Term};
use crate::sentiment::SentimentBucket;

pub const SUMMARY_FILE: &str = "Main.csv";
pub const QUANT_FILE: &str = "Quant.csv";
pub const QUAL_FILE: &str = "Qual.csv";

pub const SUMMARY_COLUMNS: [&str; 6] = [
    "Course Title",
    "Term",
    "Year",
    "# of Possible Responses",
    "Avg (21)",
    "Avg (23)",
];

pub const QUANT_COLUMNS: [&str; 9] = [
    "Course Title",
    "Term",
    "Year",
    "# of Possible Responses",
    "Question #",
    "Question Text",
    "N",
    "Avg",
    "SD",
];

pub const QUAL_COLUMNS: [&str; 6] = [
    "Course Title",
    "Term",
    "Year",
    "Question Text",
    "Answer Text",
    "Sentiment",
];

#[derive(Debug, Serialize)]
pub struct SummaryRow<'a> {
    #[serde(rename = "Course Title")]
    pub course_title: &'a str,
    #[serde(rename = "Term")]
    pub term: Term,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "# of Possible Responses")]
    pub possible_respondents: u32,
    #[serde(rename = "Avg (21)")]
    pub avg_q21: Option<f64>,
    #[serde(rename = "Avg (23)")]
    pub avg_q23: Option<f64>,
}

impl<'a> From<&'a MainRecord> for SummaryRow<'a> {
    fn from(r: &'a MainRecord) -> Self {
        Self {
            course_title: &r.metadata.course_title,
            term: r.metadata.term,
            year: r.metadata.year,
            possible_respondents: r.metadata.possible_respondents,
            avg_q21: r.avg_q21,
            avg_q23: r.avg_q23,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuantRow<'a> {
    #[serde(rename = "Course Title")]
    pub course_title: &'a str,
    #[serde(rename = "Term")]
    pub term: Term,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "# of Possible Responses")]
    pub possible_respondents: u32,
    #[serde(rename = "Question #")]
    pub question_number: Option<u8>,
    #[serde(rename = "Question Text")]
    pub question_text: &'a str,
    #[serde(rename = "N")]
    pub sample_size: Option<u32>,
    #[serde(rename = "Avg")]
    pub mean: Option<f64>,
    #[serde(rename = "SD")]
    pub stddev: Option<f64>,
}

impl<'a> From<&'a QuantMeasurement> for QuantRow<'a> {
    fn from(m: &'a QuantMeasurement) -> Self {
        Self {
            course_title: &m.metadata.course_title,
            term: m.metadata.term,
            year: m.metadata.year,
            possible_respondents: m.metadata.possible_respondents,
            question_number: m.question_number,
            question_text: &m.question_text,
            sample_size: m.sample_size,
            mean: m.mean,
            stddev: m.stddev,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QualRow<'a> {
    #[serde(rename = "Course Title")]
    pub course_title: &'a str,
    #[serde(rename = "Term")]
    pub term: Term,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Question Text")]
    pub question_text: &'a str,
    #[serde(rename = "Answer Text")]
    pub answer_text: &'a str,
    #[serde(rename = "Sentiment")]
    pub sentiment: SentimentBucket,
}

impl<'a> From<&'a QualComment> for QualRow<'a> {
    fn from(c: &'a QualComment) -> Self {
        Self {
            course_title: &c.metadata.course_title,
            term: c.metadata.term,
            year: c.metadata.year,
            question_text: &c.question_text,
            answer_text: &c.answer_text,
            sentiment: c.sentiment,
        }
    }
}

/// Records accumulated across every successfully parsed file.
#[derive(Debug, Default)]
pub struct OutputTables {
    pub main: Vec<MainRecord>,
    pub quant: Vec<QuantMeasurement>,
    pub qual: Vec<QualComment>,
}

impl OutputTables {
    /// Appends one file's records.
    pub fn absorb(&mut self, export: ParsedExport) {
        self.main.push(export.main);
        self.quant.extend(export.measurements);
        self.qual.extend(export.comments);
    }

    /// Writes the three tables into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;

        write_table(
            &dir.join(SUMMARY_FILE),
            &SUMMARY_COLUMNS,
            self.main.iter().map(SummaryRow::from),
        )?;
        write_table(
            &dir.join(QUANT_FILE),
            &QUANT_COLUMNS,
            self.quant.iter().map(QuantRow::from),
        )?;
        write_table(
            &dir.join(QUAL_FILE),
            &QUAL_COLUMNS,
            self.qual.iter().map(QualRow::from),
        )?;

        info!(
            dir = %dir.display(),
            main = self.main.len(),
            quant = self.quant.len(),
            qual = self.qual.len(),
            "Wrote output tables"
        );
        Ok(())
    }
}

/// Writes `columns` as the header row followed by one serialized row per
/// item, replacing any existing file. Returns the number of data rows.
pub fn write_table<T: Serialize>(
    path: &Path,
    columns: &[&str],
    rows: impl IntoIterator<Item = T>,
) -> Result<usize> {
    debug!(path = %path.display(), "Writing CSV table");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false) // header written explicitly so empty tables get one
        .from_writer(file);

    writer.write_record(columns)?;
    let mut count = 0;
    for row in rows {
        writer.serialize(row)?;
        count += 1;
    }
    writer.flush()?;

    Ok(count)
}

/// One parsed export as pretty JSON, in the same shape as the CSV rows.
pub fn export_to_json(export: &ParsedExport) -> Result<String> {
    #[derive(Serialize)]
    struct ExportView<'a> {
        summary: SummaryRow<'a>,
        quantitative: Vec<QuantRow<'a>>,
        qualitative: Vec<QualRow<'a>>,
    }

    let view = ExportView {
        summary: SummaryRow::from(&export.main),
        quantitative: export.measurements.iter().map(QuantRow::from).collect(),
        qualitative: export.comments.iter().map(QualRow::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OfferingMetadata;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir); // clean up any prior run
        dir
    }

    fn sample_export() -> ParsedExport {
        let metadata = Arc::new(OfferingMetadata {
            course_title: "Intro to Systems".to_string(),
            term: Term::Fall,
            year: 2023,
            possible_respondents: 42,
        });
        ParsedExport {
            main: MainRecord {
                metadata: Arc::clone(&metadata),
                avg_q21: Some(4.2),
                avg_q23: None,
            },
            measurements: vec![
                QuantMeasurement {
                    metadata: Arc::clone(&metadata),
                    question_number: Some(21),
                    question_text: "Overall effectiveness of instructor's teaching technique"
                        .to_string(),
                    sample_size: Some(38),
                    mean: Some(4.2),
                    stddev: Some(0.8),
                },
                QuantMeasurement {
                    metadata: Arc::clone(&metadata),
                    question_number: None,
                    question_text: "Lab sessions, overall".to_string(),
                    sample_size: None,
                    mean: None,
                    stddev: None,
                },
            ],
            comments: vec![QualComment {
                metadata,
                question_text: "Instructor conduct professional".to_string(),
                answer_text: "Great mentor, always on time.".to_string(),
                sentiment: SentimentBucket::Positive,
            }],
        }
    }

    #[test]
    fn test_write_tables_contents() {
        let dir = temp_dir("course_eval_test_write_tables");
        let mut tables = OutputTables::default();
        tables.absorb(sample_export());
        tables.write_to(&dir).unwrap();

        let main = fs::read_to_string(dir.join(SUMMARY_FILE)).unwrap();
        assert_eq!(
            main,
            "Course Title,Term,Year,# of Possible Responses,Avg (21),Avg (23)\n\
             Intro to Systems,Fall,2023,42,4.2,\n"
        );

        let quant = fs::read_to_string(dir.join(QUANT_FILE)).unwrap();
        let lines: Vec<_> = quant.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Course Title,Term,Year,# of Possible Responses,Question #,Question Text,N,Avg,SD",
                "Intro to Systems,Fall,2023,42,21,Overall effectiveness of instructor's teaching technique,38,4.2,0.8",
                "Intro to Systems,Fall,2023,42,,\"Lab sessions, overall\",,,",
            ]
        );

        let qual = fs::read_to_string(dir.join(QUAL_FILE)).unwrap();
        assert_eq!(
            qual,
            "Course Title,Term,Year,Question Text,Answer Text,Sentiment\n\
             Intro to Systems,Fall,2023,Instructor conduct professional,\"Great mentor, always on time.\",Positive\n"
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_tables_still_have_headers() {
        let dir = temp_dir("course_eval_test_empty_tables");
        OutputTables::default().write_to(&dir).unwrap();

        let qual = fs::read_to_string(dir.join(QUAL_FILE)).unwrap();
        assert_eq!(qual.lines().count(), 1);
        assert!(qual.starts_with("Course Title,Term,Year,Question Text"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_table_replaces_existing_file() {
        let dir = temp_dir("course_eval_test_replace");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("t.csv");

        write_table(&path, &["a"], vec![[1], [2]]).unwrap();
        let count = write_table(&path, &["a"], vec![[3]]).unwrap();

        assert_eq!(count, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n3\n");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_row_field_names_match_columns() {
        let export = sample_export();
        let json = serde_json::to_value(QuantRow::from(&export.measurements[0])).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = QUANT_COLUMNS.to_vec();
        expected.sort();
        let mut keys = keys;
        keys.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_export_to_json() {
        let json = export_to_json(&sample_export()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["Avg (21)"], 4.2);
        assert!(value["summary"]["Avg (23)"].is_null());
        assert_eq!(value["quantitative"].as_array().unwrap().len(), 2);
        assert_eq!(value["qualitative"][0]["Sentiment"], "Positive");
    }
}
