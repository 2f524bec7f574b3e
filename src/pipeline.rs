//! Stage-sequential normalization: temporal → numeric → geographic →
//! nationality → aggregate.
//!
//! Each stage maps over the batch in memory. Row failures drop the row,
//! source failures were already absorbed by ingestion, and an all-rejected
//! batch comes back as [`BatchOutcome::Empty`].

use tracing::{debug, info};

use crate::aggregate;
use crate::classify::NationalityClassifier;
use crate::config::PipelineConfig;
use crate::error::{RejectReason, RowRejected, SkippedSource};
use crate::geo::GeoResolver;
use crate::ingest::{IngestBatch, SourceRow};
use crate::numeric::{parse_age, parse_children, sanitize_children, ChildrenField};
use crate::record::NormalizedRecord;
use crate::temporal::{self, TemporalFields};

#[derive(Debug)]
pub enum BatchOutcome {
    Populated(Vec<NormalizedRecord>),
    /// No row survived (or there were none to begin with).
    Empty,
}

/// Everything one run produced, including what it had to drop.
#[derive(Debug)]
pub struct PipelineRun {
    pub outcome: BatchOutcome,
    pub rejected: Vec<RowRejected>,
    pub skipped_sources: Vec<SkippedSource>,
    /// Substitute used for children counts above the excursion threshold.
    pub excursion_replacement: u32,
    pub corrected_excursions: usize,
}

impl PipelineRun {
    pub fn records(&self) -> &[NormalizedRecord] {
        match &self.outcome {
            BatchOutcome::Populated(records) => records,
            BatchOutcome::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Empty)
    }

    pub fn into_records(self) -> Vec<NormalizedRecord> {
        match self.outcome {
            BatchOutcome::Populated(records) => records,
            BatchOutcome::Empty => Vec::new(),
        }
    }
}

pub struct Pipeline {
    config: PipelineConfig,
    resolver: GeoResolver,
    classifier: NationalityClassifier,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let resolver = GeoResolver::from_config(&config);
        let classifier = NationalityClassifier::from_config(&config);
        Self {
            config,
            resolver,
            classifier,
        }
    }

    /// Runs the pipeline over a merged multi-source batch, carrying its
    /// rejected rows and skipped sources into the result.
    pub fn run_batch(&self, batch: IngestBatch) -> PipelineRun {
        let mut run = self.run(batch.rows);
        let mut rejected = batch.rejected;
        rejected.append(&mut run.rejected);
        run.rejected = rejected;
        run.skipped_sources = batch.skipped;
        run
    }

    /// Runs every stage over `rows`. The excursion replacement is computed
    /// over all surviving rows together, so callers must merge sources first.
    #[tracing::instrument(skip_all, fields(rows = rows.len()))]
    pub fn run(&self, rows: Vec<SourceRow>) -> PipelineRun {
        let mut rejected = Vec::new();

        let dated: Vec<(SourceRow, TemporalFields)> = rows
            .into_iter()
            .filter_map(|row| match temporal::normalize(&row.raw.timestamp, self.config.day_first) {
                Some(fields) => Some((row, fields)),
                None => {
                    debug!(source = %row.source, line = row.line, "Row rejected: unparsable timestamp");
                    rejected.push(RowRejected {
                        source: row.source.clone(),
                        line: row.line,
                        reason: RejectReason::UnparsableTimestamp(row.raw.timestamp.clone()),
                    });
                    None
                }
            })
            .collect();

        if dated.is_empty() {
            info!(rejected = rejected.len(), "No usable rows after timestamp parsing");
            return PipelineRun {
                outcome: BatchOutcome::Empty,
                rejected,
                skipped_sources: Vec::new(),
                excursion_replacement: 0,
                corrected_excursions: 0,
            };
        }

        let children_fields: Vec<ChildrenField> = dated
            .iter()
            .map(|(row, _)| parse_children(&row.raw.children))
            .collect();
        let correction = sanitize_children(&children_fields, self.config.excursion_threshold);
        info!(
            replacement = correction.replacement,
            corrected = correction.corrected,
            threshold = self.config.excursion_threshold,
            "Excursion correction computed"
        );

        let records: Vec<NormalizedRecord> = dated
            .into_iter()
            .zip(correction.counts.iter().copied())
            .map(|((row, time), (children_count, children_corrected))| {
                self.normalize_row(row, time, children_count, children_corrected)
            })
            .collect();

        let foreign = records.iter().filter(|r| r.is_foreign).count();
        info!(
            records = records.len(),
            rejected = rejected.len(),
            foreign,
            cached_matches = self.resolver.cached_entries(),
            "Pipeline run complete"
        );

        PipelineRun {
            outcome: BatchOutcome::Populated(records),
            rejected,
            skipped_sources: Vec::new(),
            excursion_replacement: correction.replacement,
            corrected_excursions: correction.corrected,
        }
    }

    fn normalize_row(
        &self,
        row: SourceRow,
        time: TemporalFields,
        children_count: u32,
        children_corrected: bool,
    ) -> NormalizedRecord {
        let SourceRow { source, line, raw } = row;

        let age = parse_age(&raw.age, self.config.min_age, self.config.max_age);
        let resolution = self.resolver.resolve(&raw.origin);
        let nationality = self
            .classifier
            .classify(resolution.foreign_by_location, &raw.phone);
        let (total_visitors, group_type) = aggregate::project(children_count);

        NormalizedRecord {
            source,
            line,
            timestamp: time.timestamp,
            calendar_date: time.calendar_date,
            month: time.month,
            weekday: time.weekday,
            hour_of_day: time.hour_of_day,
            name: raw.name,
            origin_raw: raw.origin,
            phone_raw: raw.phone,
            note: raw.note,
            age,
            children_count,
            children_corrected,
            origin_resolved: resolution.name,
            origin_stage: resolution.stage.as_str(),
            foreign_by_location: nationality.foreign_by_location,
            foreign_by_phone: nationality.foreign_by_phone,
            is_foreign: nationality.is_foreign,
            total_visitors,
            group_type,
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
