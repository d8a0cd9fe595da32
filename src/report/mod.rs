//! Report module - turns analyses into text, JSON and chart data

mod model;
mod text;

pub use model::{
    compute_report, AnalysisOutcome, AnalysisSection, BarChartData, Findings, ReportModel,
};
pub use text::{format_p_value, AnalysisKind, P_VALUE_DECIMALS, TEST_INTRO};
