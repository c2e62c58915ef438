//! JSON summary of a conversion run.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

use crate::error::ConvertError;
use crate::model::ParsedExport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Failed,
}

/// Outcome of one input file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_title: Option<String>,
    pub measurements: usize,
    pub comments: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn succeeded(file: &str, export: &ParsedExport) -> Self {
        Self {
            file: file.to_string(),
            status: FileStatus::Ok,
            course_title: Some(export.metadata().course_title.clone()),
            measurements: export.measurements.len(),
            comments: export.comments.len(),
            error_kind: None,
            error: None,
        }
    }

    pub fn failed(file: &str, err: &ConvertError) -> Self {
        Self {
            file: file.to_string(),
            status: FileStatus::Failed,
            course_title: None,
            measurements: 0,
            comments: 0,
            error_kind: Some(err.kind()),
            error: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Totals {
    pub files: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub main_rows: usize,
    pub quant_rows: usize,
    pub qual_rows: usize,
}

/// Top-level run summary, written with `--report`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub input_dir: String,
    pub files: Vec<FileReport>,
    pub totals: Totals,
}

impl RunReport {
    pub fn new(input_dir: &Path) -> Self {
        Self {
            generated_at: Utc::now(),
            input_dir: input_dir.display().to_string(),
            files: Vec::new(),
            totals: Totals::default(),
        }
    }

    pub fn record(&mut self, file: FileReport) {
        self.totals.files += 1;
        match file.status {
            FileStatus::Ok => {
                self.totals.succeeded += 1;
                self.totals.main_rows += 1;
                self.totals.quant_rows += file.measurements;
                self.totals.qual_rows += file.comments;
            }
            FileStatus::Failed => self.totals.failed += 1,
        }
        self.files.push(file);
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.status == FileStatus::Failed)
    }

    /// Writes the report as pretty JSON, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, body).with_context(|| format!("writing report {}", path.display()))?;
        Ok(())
    }
}
