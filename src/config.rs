//! Analysis Configuration Module
//! The three user-adjustable thresholds and their slider ranges.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Default input file, read when no file has been chosen.
pub const DEFAULT_DATA_PATH: &str = "sick_days.csv";
/// Encoding of the employee export files.
pub const DEFAULT_ENCODING: &str = "windows-1251";

pub const DEFAULT_WORK_DAYS: u32 = 2;
pub const DEFAULT_AGE: u32 = 35;
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Recommended slider ranges
pub const WORK_DAYS_RANGE: RangeInclusive<u32> = 1..=7;
pub const AGE_RANGE: RangeInclusive<u32> = 18..=65;
pub const ALPHA_RANGE: RangeInclusive<f64> = 0.01..=0.5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Significance level must lie strictly between 0 and 1, got {0}")]
    Alpha(f64),
    #[error("Age threshold must be positive")]
    Age,
}

/// Thresholds driving both analyses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Sick-day count an employee must exceed to count as a "success".
    pub work_days: u32,
    /// Employees strictly older than this fall into the older group.
    pub age: u32,
    /// Significance level.
    pub alpha: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            work_days: DEFAULT_WORK_DAYS,
            age: DEFAULT_AGE,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Thresholds {
    /// Build a validated threshold set.
    pub fn new(work_days: u32, age: u32, alpha: f64) -> Result<Self, ConfigError> {
        let thresholds = Self {
            work_days,
            age,
            alpha,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::Alpha(self.alpha));
        }
        if self.age == 0 {
            return Err(ConfigError::Age);
        }
        Ok(())
    }

    /// Clamp every value into its slider range.
    pub fn clamped_to_sliders(self) -> Self {
        Self {
            work_days: self
                .work_days
                .clamp(*WORK_DAYS_RANGE.start(), *WORK_DAYS_RANGE.end()),
            age: self.age.clamp(*AGE_RANGE.start(), *AGE_RANGE.end()),
            alpha: self.alpha.clamp(*ALPHA_RANGE.start(), *ALPHA_RANGE.end()),
        }
    }
}
