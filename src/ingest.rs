//! Reading sign-in sheets into [`RawRecord`] rows.
//!
//! Each CSV source is decoded (UTF-8, falling back to Windows-1252), its
//! delimiter sniffed, its header skipped and every row projected onto the
//! fixed 7-column schema. A source that cannot be shaped at all is skipped
//! and reported; the others carry on.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{RejectReason, RowRejected, SkippedSource, SourceError};
use crate::record::RawRecord;

/// A projected row and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub source: String,
    /// 1-based line number in the source file.
    pub line: usize,
    pub raw: RawRecord,
}

/// Everything read from one or more sources, concatenated in input order.
#[derive(Debug, Default)]
pub struct IngestBatch {
    pub rows: Vec<SourceRow>,
    pub rejected: Vec<RowRejected>,
    pub skipped: Vec<SkippedSource>,
}

/// Decodes raw file bytes, trying UTF-8 first and falling back to Windows-1252
/// (spreadsheet exports on Windows). A leading BOM is dropped.
pub fn decode_bytes(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Picks the delimiter giving the most consistent multi-field rows over the first lines.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b',', b';', b'\t', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0usize;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let Some(&target) = counts.first() else {
            continue;
        };
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count();
        let score = consistent * target;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Parses one in-memory CSV source. The first row is a header.
///
/// # Errors
///
/// Returns a [`SourceError`] when the source is empty, its header has fewer
/// than [`RawRecord::MIN_COLUMNS`] columns, or the CSV cannot be read.
pub fn parse_source(
    source: &str,
    content: &str,
) -> Result<(Vec<SourceRow>, Vec<RowRejected>), SourceError> {
    if content.trim().is_empty() {
        return Err(SourceError::Empty);
    }

    let delimiter = sniff_delimiter(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let header_len = reader.headers()?.len();
    if header_len < RawRecord::MIN_COLUMNS {
        return Err(SourceError::TooFewColumns {
            expected: RawRecord::MIN_COLUMNS,
            found: header_len,
        });
    }

    let mut rows = Vec::new();
    let mut rejected = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        let fields: Vec<&str> = record.iter().collect();

        match RawRecord::from_fields(&fields) {
            Some(raw) => rows.push(SourceRow {
                source: source.to_string(),
                line,
                raw,
            }),
            None => {
                debug!(source, line, fields = fields.len(), "Row rejected: too few fields");
                rejected.push(RowRejected {
                    source: source.to_string(),
                    line,
                    reason: RejectReason::TooFewFields(fields.len()),
                });
            }
        }
    }

    Ok((rows, rejected))
}

/// Reads and parses one CSV file.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn read_source(path: &Path) -> Result<(Vec<SourceRow>, Vec<RowRejected>), SourceError> {
    let bytes = std::fs::read(path)?;
    let content = decode_bytes(bytes);
    parse_source(&path.display().to_string(), &content)
}

/// Reads every source, skipping (and reporting) the ones that cannot be shaped.
pub fn read_sources<P: AsRef<Path>>(paths: &[P]) -> IngestBatch {
    let mut batch = IngestBatch::default();

    for path in paths {
        let path = path.as_ref();
        let source = path.display().to_string();
        match read_source(path) {
            Ok((rows, rejected)) => {
                info!(source = %source, rows = rows.len(), rejected = rejected.len(), "Source read");
                batch.rows.extend(rows);
                batch.rejected.extend(rejected);
            }
            Err(error) => {
                warn!(source = %source, error = %error, "Skipping malformed source");
                batch.skipped.push(SkippedSource { source, error });
            }
        }
    }

    batch
}
