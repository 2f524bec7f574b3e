//! CLI entry point for the aquarium visitor pipeline.
//!
//! Provides subcommands for normalizing sign-in sheets, checking how a single
//! origin resolves, and printing the domestic deny-list.

use anyhow::{Context, Result};
use aquarium_visitors::{
    classify::NationalityClassifier,
    config::PipelineConfig,
    geo::{tables, GeoResolver, ResolutionStage},
    ingest::read_sources,
    output::{print_json, write_records, write_summary_json},
    pipeline::Pipeline,
    stats::{Period, VisitorSummary},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aquarium_visitors")]
#[command(about = "Normalize aquarium visitor sign-in sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one or more CSV sign-in sheets
    Process {
        /// CSV files to read, in order
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// CSV file to write normalized records to
        #[arg(short, long, default_value = "visitors_clean.csv")]
        output: PathBuf,

        /// Optional: JSON file to write the visitor summary to
        #[arg(short, long)]
        summary: Option<PathBuf>,

        /// First day (YYYY-MM-DD) included in the summary
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD) included in the summary
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Minimum similarity score (0-100) to accept a gazetteer match
        #[arg(long)]
        fuzzy_threshold: Option<u8>,

        /// Children counts above this are treated as excursions
        #[arg(long)]
        excursion_threshold: Option<u32>,

        /// JSON pipeline configuration
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Show how a single origin (and optional phone) is classified
    Resolve {
        origin: String,

        #[arg(short, long, default_value = "")]
        phone: String,

        /// JSON pipeline configuration
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Print the domestic place names that veto foreign matches
    DenyList,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let _file_guard = init_logging()?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            inputs,
            output,
            summary,
            from,
            to,
            fuzzy_threshold,
            excursion_threshold,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(threshold) = fuzzy_threshold {
                config.fuzzy_acceptance_threshold = threshold;
            }
            if let Some(threshold) = excursion_threshold {
                config.excursion_threshold = threshold;
            }
            config.validate()?;

            process(&inputs, &output, summary.as_deref(), Period::new(from, to), config)?;
        }
        Commands::Resolve {
            origin,
            phone,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let resolver = GeoResolver::from_config(&config);
            let classifier = NationalityClassifier::from_config(&config);

            let resolution = resolver.resolve(&origin);
            let nationality = classifier.classify(resolution.foreign_by_location, &phone);

            let report = serde_json::json!({
                "origin_raw": origin,
                "origin_resolved": resolution.name,
                "stage": resolution.stage.as_str(),
                "score": match resolution.stage {
                    ResolutionStage::Gazetteer { score } => Some(score),
                    _ => None,
                },
                "foreign_by_location": nationality.foreign_by_location,
                "foreign_by_phone": nationality.foreign_by_phone,
                "is_foreign": nationality.is_foreign,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::DenyList => {
            info!(
                tables_version = tables::TABLES_VERSION,
                terms = tables::domestic_deny_terms().len(),
                "Domestic deny-list"
            );
            for term in tables::domestic_deny_terms() {
                println!("{term}");
            }
        }
    }

    Ok(())
}

/// Logging setup: colored stderr + JSON rolling log file.
///
/// The returned guard must be held until exit so buffered file lines flush.
fn init_logging() -> Result<WorkerGuard> {
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/aquarium_visitors.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aquarium_visitors.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

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

    Ok(file_guard)
}

fn load_config(path: Option<&str>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let config = PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config from {path}"))?;
            info!(path, "Loaded pipeline config");
            Ok(config)
        }
        None => Ok(PipelineConfig::default()),
    }
}

#[tracing::instrument(skip_all, fields(inputs = inputs.len(), output = %output.display()))]
fn process(
    inputs: &[PathBuf],
    output: &Path,
    summary_path: Option<&Path>,
    period: Period,
    config: PipelineConfig,
) -> Result<()> {
    let batch = read_sources(inputs);
    if batch.skipped.len() == inputs.len() {
        warn!("Every source was skipped");
    }

    let pipeline = Pipeline::new(config);
    let run = pipeline.run_batch(batch);

    if run.is_empty() {
        warn!(
            rejected = run.rejected.len(),
            skipped_sources = run.skipped_sources.len(),
            "No usable records; nothing written"
        );
        return Ok(());
    }

    let rejected = run.rejected.len();
    let replacement = run.excursion_replacement;
    let corrected = run.corrected_excursions;
    let records = run.into_records();

    write_records(output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        records = records.len(),
        rejected,
        excursion_replacement = replacement,
        corrected_excursions = corrected,
        output = %output.display(),
        "Normalized records written"
    );

    if let Some(summary_path) = summary_path {
        let summary = VisitorSummary::for_period(&records, period);
        write_summary_json(summary_path, &summary)
            .with_context(|| format!("Failed to write {}", summary_path.display()))?;
        print_json(&summary)?;
        if !period.is_unbounded() {
            info!(from = ?period.from, to = ?period.to, "Summary limited to period");
        }
        info!(
            path = %summary_path.display(),
            total_public = summary.total_public,
            children_pct = format!("{:.1}", summary.children_pct()),
            foreign_pct = format!("{:.1}", summary.foreign_pct()),
            "Summary written"
        );
    }

    Ok(())
}
