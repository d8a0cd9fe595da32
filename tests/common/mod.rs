//! Shared fixture: a small staff export with a clear gender effect and no
//! age effect at the default thresholds.

#![allow(dead_code)]

use sickday_stats::data::{DataLoader, Dataset, EmployeeRecord};
use std::path::PathBuf;
use tempfile::TempDir;

fn repeat(n: usize, sick_days: i64, age: i64, gender: &str) -> Vec<EmployeeRecord> {
    (0..n)
        .map(|_| EmployeeRecord {
            sick_days,
            age,
            gender: gender.to_string(),
        })
        .collect()
}

/// Women: 20 of 30 above two sick days. Men: 5 of 30.
/// Up to 35: 20 of 45. Over 35: 5 of 15.
pub fn staff() -> Vec<EmployeeRecord> {
    let mut records = repeat(20, 5, 30, "Ж");
    records.extend(repeat(10, 1, 50, "Ж"));
    records.extend(repeat(5, 5, 50, "М"));
    records.extend(repeat(25, 1, 30, "М"));
    records
}

pub fn staff_dataset() -> Dataset {
    Dataset::from_records(staff()).unwrap()
}

/// Write the fixture as a windows-1251 export inside a fresh temp dir.
pub fn write_export(records: Vec<EmployeeRecord>) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sick_days.csv");
    let loader = DataLoader::default();
    let bytes = loader
        .to_csv_bytes(&Dataset::from_records(records).unwrap())
        .unwrap();
    std::fs::write(&path, bytes).unwrap();
    (dir, path)
}
