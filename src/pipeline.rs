//! Batch conversion of a directory of exports.
//!
//! Files are discovered in name order and parsed on a bounded pool of
//! blocking tasks. Results are folded back in discovery order, so the output
//! tables do not depend on the concurrency level. A file that fails is
//! logged, recorded in the [`RunReport`] and contributes nothing.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info};

use crate::catalog::QuestionCatalog;
use crate::error::ConvertError;
use crate::model::ParsedExport;
use crate::output::OutputTables;
use crate::parser::ExportParser;
use crate::report::{FileReport, RunReport};
use crate::sentiment::SentimentScorer;

/// Parsing context shared by every worker of a run.
pub struct Converter {
    catalog: QuestionCatalog,
    scorer: Box<dyn SentimentScorer>,
}

impl Converter {
    pub fn new(catalog: QuestionCatalog, scorer: impl SentimentScorer + 'static) -> Self {
        Self {
            catalog,
            scorer: Box::new(scorer),
        }
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn parser(&self) -> ExportParser<'_> {
        ExportParser::new(&self.catalog, self.scorer.as_ref())
    }

    /// Reads and parses one export file.
    #[tracing::instrument(skip(self, path), fields(file = %display_name(path)))]
    pub fn process_file(&self, path: &Path) -> Result<ParsedExport, ConvertError> {
        let bytes = std::fs::read(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(bytes = bytes.len(), "Export read");
        self.parser().parse_bytes(&bytes)
    }
}

/// Result of one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<ParsedExport, ConvertError>,
}

/// Everything a run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub tables: OutputTables,
    pub report: RunReport,
}

/// Lists `*.csv` files (extension in any case) directly inside `dir`, sorted
/// by file name.
///
/// # Errors
///
/// Fails only if the directory itself cannot be read.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("listing input directory {}", dir.display()))?
    {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            inputs.push(path);
        }
    }

    inputs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(inputs)
}

/// Parses every input with at most `concurrency` files in flight and
/// returns the outcomes in input order.
pub async fn process_all(
    converter: Arc<Converter>,
    inputs: Vec<PathBuf>,
    concurrency: usize,
) -> Result<Vec<FileOutcome>> {
    let semaphore = Arc::new(tokio::sync::Semaphore::new(concurrency.max(1)));
    let mut tasks = Vec::with_capacity(inputs.len());

    for path in &inputs {
        let sem = semaphore.clone();
        let converter = converter.clone();
        let path = path.clone();

        // process_file opens the per-file span; the worker only carries the
        // caller's span and subscriber onto the blocking thread
        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire_owned().await.context("worker pool closed")?;
                let parent = tracing::Span::current();
                let dispatch = tracing::dispatcher::get_default(|d| d.clone());
                let result = tokio::task::spawn_blocking(move || {
                    tracing::dispatcher::with_default(&dispatch, || {
                        parent.in_scope(|| converter.process_file(&path))
                    })
                })
                .await?;
                anyhow::Ok(result)
            }
            .in_current_span(),
        );
        tasks.push(task);
    }

    let mut outcomes = Vec::with_capacity(inputs.len());
    for (path, task) in inputs.into_iter().zip(tasks) {
        let result = task.await??;
        outcomes.push(FileOutcome { path, result });
    }
    Ok(outcomes)
}

/// Folds outcomes into the output tables and the run report, logging each
/// failed file by name.
pub fn collect_outcomes(input_dir: &Path, outcomes: Vec<FileOutcome>) -> RunOutcome {
    let mut tables = OutputTables::default();
    let mut report = RunReport::new(input_dir);

    for FileOutcome { path, result } in outcomes {
        let name = display_name(&path);
        match result {
            Ok(export) => {
                info!(
                    file = %name,
                    course = %export.metadata().course_title,
                    measurements = export.measurements.len(),
                    comments = export.comments.len(),
                    "File converted"
                );
                report.record(FileReport::succeeded(&name, &export));
                tables.absorb(export);
            }
            Err(e) => {
                error!(file = %name, kind = e.kind(), error = %e, "Error processing file, skipping");
                report.record(FileReport::failed(&name, &e));
            }
        }
    }

    RunOutcome { tables, report }
}

/// Discovers and converts every export in `input_dir`.
#[tracing::instrument(skip(converter, input_dir), fields(input_dir = %input_dir.display()))]
pub async fn run(
    converter: Arc<Converter>,
    input_dir: &Path,
    concurrency: usize,
) -> Result<RunOutcome> {
    let inputs = discover_inputs(input_dir)?;
    info!(files = inputs.len(), "Input files discovered");

    let outcomes = process_all(converter, inputs, concurrency).await?;
    Ok(collect_outcomes(input_dir, outcomes))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
