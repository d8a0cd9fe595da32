//! End-to-end: encoded file on disk -> dataset -> both analyses

mod common;

use sickday_stats::config::Thresholds;
use sickday_stats::data::{DataLoader, DatasetCache, EmployeeRecord, LoadError, ParseError};
use sickday_stats::report::{compute_report, AnalysisKind, AnalysisOutcome};
use std::time::Duration;

#[test]
fn gender_effect_is_detected_and_age_effect_is_not() {
    let (_dir, path) = common::write_export(common::staff());
    let dataset = DataLoader::default().load_file(&path).unwrap();
    assert_eq!(dataset.len(), 60);

    let report = compute_report(&dataset, &Thresholds::default());
    assert_eq!(report.sections.len(), 2);

    let gender = report.section(AnalysisKind::Gender).unwrap();
    let findings = gender.findings().unwrap();
    assert!(findings.reject_null);
    assert!(findings.p_value < 0.001);
    assert!(findings.interpretation.starts_with("We reject"));

    let chart = gender.chart.as_ref().unwrap();
    let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Ж", "М"]);
    assert_eq!((chart.bars[0].successes, chart.bars[0].nobs), (20, 30));
    assert_eq!((chart.bars[1].successes, chart.bars[1].nobs), (5, 30));

    let age = report.section(AnalysisKind::AgeGroup).unwrap();
    let findings = age.findings().unwrap();
    assert!(!findings.reject_null);
    assert!(findings.p_value > 0.3);
    assert!(findings.interpretation.starts_with("We fail to reject"));
}

#[test]
fn thresholds_change_the_outcome_variable() {
    let dataset = common::staff_dataset();
    // Nobody has more than five sick days, so the pooled share is zero
    let report = compute_report(&dataset, &Thresholds::new(5, 35, 0.05).unwrap());

    for section in &report.sections {
        assert!(matches!(section.outcome, AnalysisOutcome::Failed { .. }));
        let chart = section.chart.as_ref().unwrap();
        assert!(chart.bars.iter().all(|b| b.successes == 0));
    }
}

#[test]
fn single_gender_fails_only_the_gender_section() {
    let records: Vec<EmployeeRecord> = common::staff()
        .into_iter()
        .filter(|r| r.gender == "Ж")
        .collect();
    let (_dir, path) = common::write_export(records);
    let dataset = DataLoader::default().load_file(&path).unwrap();

    let report = compute_report(&dataset, &Thresholds::default());
    assert!(report.section(AnalysisKind::Gender).unwrap().findings().is_none());
    // Ж: 20 of 20 up to 35, 0 of 10 over 35
    let age = report.section(AnalysisKind::AgeGroup).unwrap();
    assert!(age.findings().unwrap().reject_null);
}

#[test]
fn one_bad_row_rejects_the_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    let text = "\"Количество больничных дней,\"\"Возраст\"\",\"\"Пол\"\"\"\n\
                \"5,39,\"\"Ж\"\"\"\n\
                \"abc,25,\"\"М\"\"\"\n";
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(text);
    std::fs::write(&path, bytes).unwrap();

    let err = DataLoader::default().load_file(&path).unwrap_err();
    assert!(matches!(
        err,
        LoadError::Parse(ParseError::InvalidNumber { row: 2, .. })
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = DataLoader::default()
        .load_file(&dir.path().join("absent.csv"))
        .unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn cache_serves_the_same_dataset_until_invalidated() {
    let (_dir, path) = common::write_export(common::staff());
    let mut cache = DatasetCache::new(DataLoader::default(), Duration::from_secs(60));

    let first = cache.get_or_load(&path).unwrap();
    let second = cache.get_or_load(&path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(cache.is_cached());

    cache.invalidate();
    assert!(!cache.is_cached());
    let third = cache.get_or_load(&path).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), first.len());
}
