//! Derived Columns
//! Outcome predicate and grouping keys computed from the typed columns.

use super::dataset::{AGE_COL, GENDER_COL, SICK_DAYS_COL};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const EXCEEDS_COL: &str = "more_than_work_days";
pub const AGE_GROUP_COL: &str = "age_group";

/// Outcome predicate: an employee took strictly more sick days than the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SickDaysAbove(pub u32);

impl SickDaysAbove {
    pub fn expr(&self) -> Expr {
        col(SICK_DAYS_COL).gt(lit(i64::from(self.0)))
    }
}

/// Two-way split of employees around an age threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Older,
    YoungerOrEqual,
}

impl AgeGroup {
    pub fn label(&self, threshold: u32) -> String {
        match self {
            AgeGroup::Older => format!("older_than_{}", threshold),
            AgeGroup::YoungerOrEqual => format!("younger_or_equal_{}", threshold),
        }
    }
}

/// Column the dataset is partitioned by for a proportion test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingKey {
    Gender,
    AgeGroup { threshold: u32 },
}

impl GroupingKey {
    /// Name of the column this key produces.
    pub fn column_name(&self) -> &'static str {
        match self {
            GroupingKey::Gender => GENDER_COL,
            GroupingKey::AgeGroup { .. } => AGE_GROUP_COL,
        }
    }

    pub fn expr(&self) -> Expr {
        match self {
            GroupingKey::Gender => col(GENDER_COL),
            GroupingKey::AgeGroup { threshold } => {
                when(col(AGE_COL).gt(lit(i64::from(*threshold))))
                    .then(lit(AgeGroup::Older.label(*threshold)))
                    .otherwise(lit(AgeGroup::YoungerOrEqual.label(*threshold)))
            }
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}
