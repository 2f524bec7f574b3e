use aquarium_visitors::config::PipelineConfig;
use aquarium_visitors::error::{RejectReason, SourceError};
use aquarium_visitors::ingest::read_sources;
use aquarium_visitors::output::write_records;
use aquarium_visitors::pipeline::Pipeline;
use aquarium_visitors::record::{GroupType, Weekday};
use aquarium_visitors::stats::{Period, VisitorSummary};
use chrono::NaiveDate;
use std::env;
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn temp_path(name: &str) -> PathBuf {
    env::temp_dir().join(name)
}

#[test]
fn test_full_pipeline() {
    let batch = read_sources(&[fixture("visitors.csv")]);
    assert!(batch.skipped.is_empty());

    let run = Pipeline::default().run_batch(batch);
    assert!(!run.is_empty());

    // unparsable timestamp + short row
    assert_eq!(run.rejected.len(), 2);
    assert!(run
        .rejected
        .iter()
        .any(|r| matches!(r.reason, RejectReason::UnparsableTimestamp(_)) && r.line == 7));
    assert!(run
        .rejected
        .iter()
        .any(|r| r.reason == RejectReason::TooFewFields(2) && r.line == 9));

    // stated counts <= 40 are 2, 0, 1, 0; mean 0.75 rounds to 1
    assert_eq!(run.excursion_replacement, 1);
    assert_eq!(run.corrected_excursions, 1);

    let records = run.records();
    assert_eq!(records.len(), 6);

    let origins: Vec<&str> = records.iter().map(|r| r.origin_resolved.as_str()).collect();
    assert_eq!(
        origins,
        vec!["Cuiabá", "Argentina", "Porto Esperidião", "Sinop", "Cuiabá", "Sinoo"]
    );

    let excursion = &records[3];
    assert_eq!(excursion.children_count, 1);
    assert!(excursion.children_corrected);
    assert_eq!(excursion.group_type, GroupType::FamilyOrGroup);

    let unstated = &records[4];
    assert_eq!(unstated.children_count, 0);
    assert!(unstated.foreign_by_phone);
    assert!(!unstated.foreign_by_location);
    assert!(unstated.is_foreign);

    // "Porto" alone would be Portugal; the domestic remainder vetoes it
    assert!(!records[2].is_foreign);

    for r in records {
        assert!(r.children_count <= 40);
        assert_eq!(r.total_visitors, 1 + r.children_count);
    }
}

#[test]
fn test_summary_from_fixture() {
    let run = Pipeline::default().run_batch(read_sources(&[fixture("visitors.csv")]));
    let summary = VisitorSummary::from_records(run.records());

    assert_eq!(summary.total_adults, 6);
    assert_eq!(summary.total_children, 4);
    assert_eq!(summary.total_public, 10);
    assert_eq!(summary.foreign_records, 2);
    assert_eq!(summary.foreign_visitors, 2);

    let saturday = &summary.weekday_averages[5];
    assert_eq!(saturday.weekday, Weekday::Saturday);
    assert_eq!(saturday.days_observed, 2);
    assert_eq!(saturday.average_visitors, 4.5);
    assert_eq!(summary.weekday_averages[6].average_visitors, 1.0);

    assert_eq!(summary.top_origins[0].origin, "Cuiabá");
    assert_eq!(summary.top_origins[0].records, 2);
    assert_eq!(summary.top_origins[1].origin, "Argentina");

    let first_weekend = Period::new(
        NaiveDate::from_ymd_opt(2024, 3, 2),
        NaiveDate::from_ymd_opt(2024, 3, 2),
    );
    let summary = VisitorSummary::for_period(run.records(), first_weekend);
    assert_eq!(summary.total_adults, 3);
    assert_eq!(summary.total_public, 6);
}

#[test]
fn test_lower_fuzzy_threshold_accepts_near_miss() {
    let config = PipelineConfig {
        fuzzy_acceptance_threshold: 80,
        ..PipelineConfig::default()
    };
    let run = Pipeline::new(config).run_batch(read_sources(&[fixture("visitors.csv")]));
    assert_eq!(run.records()[5].origin_resolved, "Sinop");
}

#[test]
fn test_malformed_source_is_skipped() {
    let broken = temp_path("aquarium_visitors_it_broken.csv");
    fs::write(&broken, "a,b\n1,2\n").unwrap();

    let batch = read_sources(&[broken.clone(), fixture("visitors.csv")]);
    assert_eq!(batch.skipped.len(), 1);
    assert!(matches!(
        batch.skipped[0].error,
        SourceError::TooFewColumns { found: 2, .. }
    ));

    let run = Pipeline::default().run_batch(batch);
    assert_eq!(run.records().len(), 6);
    assert_eq!(run.skipped_sources.len(), 1);

    fs::remove_file(&broken).unwrap();
}

#[test]
fn test_latin1_semicolon_source() {
    let path = temp_path("aquarium_visitors_it_latin1.csv");
    let mut bytes = b"data;nome;cidade;fone;idade;criancas;obs\n".to_vec();
    // "Várzea Grande" with a Windows-1252 a-acute
    bytes.extend_from_slice(b"05/03/2024 15:00;Rui;V\xE1rzea Grande;;60;dois;\n");
    fs::write(&path, &bytes).unwrap();

    let run = Pipeline::default().run_batch(read_sources(&[path.clone()]));
    let records = run.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].origin_resolved, "Várzea Grande");
    assert_eq!(records[0].children_count, 2);
    assert_eq!(records[0].weekday, Weekday::Tuesday);

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_all_rows_rejected_is_empty_batch() {
    let path = temp_path("aquarium_visitors_it_empty.csv");
    fs::write(
        &path,
        "a,b,c,d,e,f,g\nontem,Ana,Sinop,,30,1,\nsem data,Bia,Sinop,,30,1,\n",
    )
    .unwrap();

    let run = Pipeline::default().run_batch(read_sources(&[path.clone()]));
    assert!(run.is_empty());
    assert_eq!(run.rejected.len(), 2);

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_written_csv_round_trips_row_count() {
    let run = Pipeline::default().run_batch(read_sources(&[fixture("visitors.csv")]));
    let path = temp_path("aquarium_visitors_it_output.csv");
    write_records(&path, run.records()).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.records().count(), 6);

    fs::remove_file(&path).unwrap();
}
