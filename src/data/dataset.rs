//! Employee Dataset
//! Typed records plus a Polars frame for grouped aggregation.

use super::derived::{GroupingKey, SickDaysAbove, EXCEEDS_COL};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const SICK_DAYS_COL: &str = "count_sick_days";
pub const AGE_COL: &str = "age";
pub const GENDER_COL: &str = "gender";

/// One employee row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub sick_days: i64,
    pub age: i64,
    pub gender: String,
}

impl EmployeeRecord {
    /// Packed cell value as it appears in the source file: `5,39,"Ж"`.
    pub fn to_composite(&self) -> String {
        format!("{},{},\"{}\"", self.sick_days, self.age, self.gender)
    }
}

/// Immutable dataset loaded once per run.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<EmployeeRecord>,
    df: DataFrame,
}

impl Dataset {
    pub fn from_records(records: Vec<EmployeeRecord>) -> PolarsResult<Self> {
        let sick_days: Vec<i64> = records.iter().map(|r| r.sick_days).collect();
        let ages: Vec<i64> = records.iter().map(|r| r.age).collect();
        let genders: Vec<String> = records.iter().map(|r| r.gender.clone()).collect();

        let df = DataFrame::new(vec![
            Column::new(SICK_DAYS_COL.into(), sick_days),
            Column::new(AGE_COL.into(), ages),
            Column::new(GENDER_COL.into(), genders),
        ])?;

        Ok(Self { records, df })
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Copy of the frame with the outcome flag and grouping column attached.
    /// The dataset itself stays untouched.
    pub fn with_derived_columns(
        &self,
        outcome: SickDaysAbove,
        key: GroupingKey,
    ) -> PolarsResult<DataFrame> {
        self.df
            .clone()
            .lazy()
            .with_columns([
                outcome.expr().alias(EXCEEDS_COL),
                key.expr().alias(key.column_name()),
            ])
            .collect()
    }
}
