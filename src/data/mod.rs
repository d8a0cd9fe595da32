//! Data module - CSV loading, typed dataset and derived columns

mod cache;
mod dataset;
mod derived;
mod loader;

pub use cache::{DatasetCache, DEFAULT_TTL};
pub use dataset::{Dataset, EmployeeRecord, AGE_COL, GENDER_COL, SICK_DAYS_COL};
pub use derived::{AgeGroup, GroupingKey, SickDaysAbove, AGE_GROUP_COL, EXCEEDS_COL};
pub use loader::{parse_packed_cell, DataLoader, LoadError, ParseError, PACKED_HEADER};
