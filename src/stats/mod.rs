//! Statistics module - two-proportion z-test and dataset-level evaluation

mod evaluator;
mod ztest;

pub use evaluator::{
    evaluate_proportions, EvaluationError, GroupSummary, ProportionAnalysis, ProportionEvaluator,
};
pub use ztest::{
    two_proportion_ztest, GroupCounts, ProportionTestInput, TestVerdict, ZTestError, ZTestResult,
};
