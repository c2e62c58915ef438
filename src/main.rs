//! CLI entry point for the course evaluation converter.
//!
//! Provides subcommands for converting a directory of exports into the
//! summary, quantitative and qualitative tables, inspecting a single export,
//! and listing the active question catalog.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use course_eval::{
    catalog::QuestionCatalog,
    output::export_to_json,
    pipeline::{self, Converter},
    sentiment::LexiconScorer,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "course_eval")]
#[command(about = "Convert course evaluation exports into normalized CSV tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every export in a directory into Main.csv, Quant.csv and Qual.csv
    Convert {
        /// Directory containing the raw CSV exports
        #[arg(short, long, env = "COURSE_EVAL_INPUT_DIR", default_value = "input")]
        input_dir: PathBuf,

        /// Directory the three output tables are written to
        #[arg(short, long, env = "COURSE_EVAL_OUTPUT_DIR", default_value = "output")]
        output_dir: PathBuf,

        /// JSON file mapping question numbers to question text
        #[arg(long, env = "COURSE_EVAL_CATALOG")]
        catalog: Option<PathBuf>,

        /// VADER-format lexicon replacing the built-in sentiment lexicon
        #[arg(long, env = "COURSE_EVAL_LEXICON")]
        lexicon: Option<PathBuf>,

        /// Maximum number of files parsed at once
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,

        /// Optional: write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Parse a single export and print its records as JSON
    Inspect {
        /// Path to the export file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file mapping question numbers to question text
        #[arg(long, env = "COURSE_EVAL_CATALOG")]
        catalog: Option<PathBuf>,

        /// VADER-format lexicon replacing the built-in sentiment lexicon
        #[arg(long, env = "COURSE_EVAL_LEXICON")]
        lexicon: Option<PathBuf>,
    },
    /// List the question catalog in use
    Questions {
        /// JSON file mapping question numbers to question text
        #[arg(long, env = "COURSE_EVAL_CATALOG")]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/course_eval.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("course_eval.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input_dir,
            output_dir,
            catalog,
            lexicon,
            concurrency,
            report,
        } => {
            let converter = Arc::new(build_converter(catalog.as_deref(), lexicon.as_deref())?);
            let outcome = pipeline::run(converter, &input_dir, concurrency).await?;

            outcome.tables.write_to(&output_dir)?;

            let totals = &outcome.report.totals;
            if totals.failed > 0 {
                warn!(
                    failed = totals.failed,
                    succeeded = totals.succeeded,
                    "Some files were skipped"
                );
            }
            info!(
                main = totals.main_rows,
                quant = totals.quant_rows,
                qual = totals.qual_rows,
                output_dir = %output_dir.display(),
                "Conversion finished"
            );

            if let Some(path) = report {
                outcome.report.write(&path)?;
                info!(path = %path.display(), "Run report written");
            }
        }
        Commands::Inspect {
            file,
            catalog,
            lexicon,
        } => {
            let converter = build_converter(catalog.as_deref(), lexicon.as_deref())?;
            let export = converter
                .process_file(&file)
                .with_context(|| format!("parsing {}", file.display()))?;
            println!("{}", export_to_json(&export)?);
        }
        Commands::Questions { catalog } => {
            let catalog = load_catalog(catalog.as_deref())?;
            info!(total = catalog.len(), "Question catalog");
            for (number, text) in catalog.iter() {
                println!("{number:>3}  {text}");
            }
        }
    }

    Ok(())
}

/// Builds the shared parsing context; the sentiment lexicon is loaded once
/// here, before any file is read.
fn build_converter(catalog: Option<&Path>, lexicon: Option<&Path>) -> Result<Converter> {
    let catalog = load_catalog(catalog)?;
    let scorer = match lexicon {
        Some(path) => LexiconScorer::load(path)?,
        None => LexiconScorer::builtin()?,
    };
    info!(
        questions = catalog.len(),
        lexicon_entries = scorer.len(),
        "Converter ready"
    );
    Ok(Converter::new(catalog, scorer))
}

fn load_catalog(path: Option<&Path>) -> Result<QuestionCatalog> {
    match path {
        Some(path) => QuestionCatalog::load(path),
        None => Ok(QuestionCatalog::default()),
    }
}
