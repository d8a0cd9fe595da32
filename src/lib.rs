//! Sick-Day Analysis - proportion z-tests on employee sick-day exports
//!
//! Loads a legacy-encoded CSV whose sick days, age and gender are packed into
//! one column, then tests whether the share of employees exceeding a sick-day
//! threshold differs by gender and by age group.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod gui;
pub mod report;
pub mod stats;
