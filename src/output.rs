//! Output formatting and persistence for normalized records and summaries.
//!
//! Supports JSON logging and files, and CSV export.

use anyhow::Result;
use tracing::{debug, info};

use crate::record::NormalizedRecord;
use crate::stats::VisitorSummary;
use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::Path;

/// Logs a summary as pretty-printed JSON.
pub fn print_json(summary: &VisitorSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes every record as a CSV row, replacing any existing file.
///
/// The header is written even when `records` is empty.
pub fn write_records(path: &Path, records: &[NormalizedRecord]) -> Result<()> {
    debug!(path = %path.display(), records = records.len(), "Writing normalized records");
    ensure_parent(path)?;

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

    writer.write_record(RECORD_HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Column order of [`NormalizedRecord`]'s serialized form.
const RECORD_HEADER: &[&str] = &[
    "source",
    "line",
    "timestamp",
    "calendar_date",
    "month",
    "weekday",
    "hour_of_day",
    "name",
    "origin_raw",
    "phone_raw",
    "note",
    "age",
    "children_count",
    "children_corrected",
    "origin_resolved",
    "origin_stage",
    "foreign_by_location",
    "foreign_by_phone",
    "is_foreign",
    "total_visitors",
    "group_type",
];

/// Writes a summary as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summary: &VisitorSummary) -> Result<()> {
    debug!(path = %path.display(), "Writing summary");
    ensure_parent(path)?;
    fs::write(path, serde_json::to_string_pretty(summary)?)?;
    Ok(())
}
