//! Proportion Test Evaluator
//! Partitions a dataset by a grouping key, counts outcome successes per group
//! with Polars and runs the pooled two-proportion z-test.

use super::ztest::{
    two_proportion_ztest, GroupCounts, ProportionTestInput, TestVerdict, ZTestError, ZTestResult,
};
use crate::data::{Dataset, GroupingKey, SickDaysAbove, EXCEEDS_COL};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const SUCCESSES_COL: &str = "successes";
const NOBS_COL: &str = "nobs";

#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Polars error: {0}")]
    Frame(#[from] PolarsError),
    #[error("Grouping by {key} must yield exactly two groups, found {groups:?}")]
    Grouping { key: String, groups: Vec<String> },
    #[error("Grouping by {key} produced a null label or count")]
    NullAggregate { key: String },
    #[error("Proportion test is undefined: {0}")]
    UndefinedTest(&'static str),
    #[error("Significance level must lie strictly between 0 and 1, got {0}")]
    InvalidAlpha(f64),
    #[error("Invalid group counts: {0}")]
    InvalidCounts(ZTestError),
    #[error("{0}")]
    Distribution(String),
}

impl From<ZTestError> for EvaluationError {
    fn from(err: ZTestError) -> Self {
        match err {
            ZTestError::Undefined(reason) => EvaluationError::UndefinedTest(reason),
            ZTestError::InvalidAlpha(alpha) => EvaluationError::InvalidAlpha(alpha),
            ZTestError::Distribution(msg) => EvaluationError::Distribution(msg),
            counts @ ZTestError::InvalidCounts { .. } => EvaluationError::InvalidCounts(counts),
        }
    }
}

/// Aggregate for one group, also the bar height in charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub label: String,
    pub successes: u64,
    pub nobs: u64,
    /// Share of the group for which the outcome holds.
    pub rate: f64,
}

impl GroupSummary {
    pub fn new(label: String, counts: GroupCounts) -> Self {
        Self {
            label,
            successes: counts.successes,
            nobs: counts.nobs,
            rate: counts.proportion().unwrap_or(0.0),
        }
    }
}

/// Full result of one proportion analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionAnalysis {
    pub key: GroupingKey,
    pub outcome: SickDaysAbove,
    /// Groups ordered by label; z is computed as first minus second.
    pub groups: [GroupSummary; 2],
    pub test: ZTestResult,
    pub verdict: TestVerdict,
}

/// Dataset-level proportion tests.
pub struct ProportionEvaluator;

impl ProportionEvaluator {
    /// Success counts and sample sizes per group, sorted by group label.
    pub fn group_counts(
        dataset: &Dataset,
        outcome: SickDaysAbove,
        key: GroupingKey,
    ) -> Result<Vec<(String, GroupCounts)>, EvaluationError> {
        let grouped = dataset
            .with_derived_columns(outcome, key)?
            .lazy()
            .group_by([col(key.column_name())])
            .agg([
                col(EXCEEDS_COL)
                    .cast(DataType::UInt64)
                    .sum()
                    .alias(SUCCESSES_COL),
                len().alias(NOBS_COL),
            ])
            .collect()?;

        let mut counts = Self::counts_from_frame(&grouped, key)?;
        counts.sort_by(|a, b| a.0.cmp(&b.0));

        debug!(key = %key, ?counts, "Group counts");
        Ok(counts)
    }

    /// Read (label, successes, nobs) rows out of the aggregated frame.
    fn counts_from_frame(
        grouped: &DataFrame,
        key: GroupingKey,
    ) -> Result<Vec<(String, GroupCounts)>, EvaluationError> {
        let labels = grouped.column(key.column_name())?.str()?;
        let successes = grouped.column(SUCCESSES_COL)?.cast(&DataType::UInt64)?;
        let successes = successes.u64()?;
        let nobs = grouped.column(NOBS_COL)?.cast(&DataType::UInt64)?;
        let nobs = nobs.u64()?;

        let mut counts = Vec::with_capacity(grouped.height());
        for ((label, s), n) in labels.into_iter().zip(successes).zip(nobs) {
            let (Some(label), Some(s), Some(n)) = (label, s, n) else {
                return Err(EvaluationError::NullAggregate {
                    key: key.to_string(),
                });
            };
            counts.push((label.to_string(), GroupCounts::new(s, n)?));
        }
        Ok(counts)
    }

    /// Run the z-test for one grouping and return counts, statistic and verdict.
    pub fn analyze(
        dataset: &Dataset,
        outcome: SickDaysAbove,
        key: GroupingKey,
        alpha: f64,
    ) -> Result<ProportionAnalysis, EvaluationError> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(EvaluationError::InvalidAlpha(alpha));
        }

        let counts = Self::group_counts(dataset, outcome, key)?;
        let [(first_label, first), (second_label, second)]: [(String, GroupCounts); 2] = counts
            .try_into()
            .map_err(|counts: Vec<(String, GroupCounts)>| EvaluationError::Grouping {
                key: key.to_string(),
                groups: counts.into_iter().map(|(label, _)| label).collect(),
            })?;

        let test = two_proportion_ztest(&ProportionTestInput::new(first, second))?;
        let verdict = TestVerdict::decide(test.p_value, alpha)?;
        debug!(
            key = %key,
            z = test.statistic,
            p_value = test.p_value,
            reject_null = verdict.reject_null,
            "Proportion z-test"
        );

        Ok(ProportionAnalysis {
            key,
            outcome,
            groups: [
                GroupSummary::new(first_label, first),
                GroupSummary::new(second_label, second),
            ],
            test,
            verdict,
        })
    }
}

/// Reject / fail-to-reject verdict for the outcome split by `key`.
pub fn evaluate_proportions(
    dataset: &Dataset,
    outcome: SickDaysAbove,
    key: GroupingKey,
    alpha: f64,
) -> Result<TestVerdict, EvaluationError> {
    ProportionEvaluator::analyze(dataset, outcome, key, alpha).map(|analysis| analysis.verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{EmployeeRecord, GENDER_COL};

    /// `exceeding` of `total` employees with the given gender and age take 5 sick days, the rest 0.
    fn cohort(gender: &str, age: i64, exceeding: usize, total: usize) -> Vec<EmployeeRecord> {
        (0..total)
            .map(|i| EmployeeRecord {
                sick_days: if i < exceeding { 5 } else { 0 },
                age,
                gender: gender.to_string(),
            })
            .collect()
    }

    fn dataset(cohorts: Vec<Vec<EmployeeRecord>>) -> Dataset {
        Dataset::from_records(cohorts.into_iter().flatten().collect()).unwrap()
    }

    #[test]
    fn counts_are_aligned_by_label() {
        // Unequal group sizes: pairing sums with frequency-ordered counts would mismatch
        let ds = dataset(vec![cohort("М", 30, 2, 10), cohort("Ж", 30, 9, 30)]);
        let counts =
            ProportionEvaluator::group_counts(&ds, SickDaysAbove(2), GroupingKey::Gender).unwrap();
        assert_eq!(
            counts,
            vec![
                ("Ж".to_string(), GroupCounts::new(9, 30).unwrap()),
                ("М".to_string(), GroupCounts::new(2, 10).unwrap()),
            ]
        );
    }

    #[test]
    fn boundary_values_stay_out_of_success_and_older_group() {
        let ds = Dataset::from_records(vec![
            EmployeeRecord {
                sick_days: 2,
                age: 35,
                gender: "Ж".to_string(),
            },
            EmployeeRecord {
                sick_days: 3,
                age: 36,
                gender: "М".to_string(),
            },
        ])
        .unwrap();

        let counts = ProportionEvaluator::group_counts(
            &ds,
            SickDaysAbove(2),
            GroupingKey::AgeGroup { threshold: 35 },
        )
        .unwrap();
        assert_eq!(
            counts,
            vec![
                ("older_than_35".to_string(), GroupCounts::new(1, 1).unwrap()),
                ("younger_or_equal_35".to_string(), GroupCounts::new(0, 1).unwrap()),
            ]
        );

        let by_gender =
            ProportionEvaluator::group_counts(&ds, SickDaysAbove(2), GroupingKey::Gender).unwrap();
        assert_eq!(by_gender[0], ("Ж".to_string(), GroupCounts::new(0, 1).unwrap()));
    }

    #[test]
    fn null_aggregate_is_an_error() {
        let grouped = DataFrame::new(vec![
            Column::new(GENDER_COL.into(), vec![Some("Ж"), None]),
            Column::new(SUCCESSES_COL.into(), vec![Some(1u64), Some(2)]),
            Column::new(NOBS_COL.into(), vec![Some(3u64), Some(4)]),
        ])
        .unwrap();

        let err = ProportionEvaluator::counts_from_frame(&grouped, GroupingKey::Gender).unwrap_err();
        assert!(matches!(err, EvaluationError::NullAggregate { .. }));

        let grouped = DataFrame::new(vec![
            Column::new(GENDER_COL.into(), vec![Some("Ж"), Some("М")]),
            Column::new(SUCCESSES_COL.into(), vec![Some(1u64), None]),
            Column::new(NOBS_COL.into(), vec![Some(3u64), Some(4)]),
        ])
        .unwrap();
        assert!(matches!(
            ProportionEvaluator::counts_from_frame(&grouped, GroupingKey::Gender),
            Err(EvaluationError::NullAggregate { .. })
        ));
    }

    #[test]
    fn gender_analysis_matches_direct_test() {
        let ds = dataset(vec![cohort("Ж", 30, 50, 100), cohort("М", 30, 30, 100)]);
        let analysis =
            ProportionEvaluator::analyze(&ds, SickDaysAbove(2), GroupingKey::Gender, 0.05)
                .unwrap();

        let direct = two_proportion_ztest(&ProportionTestInput::new(
            GroupCounts::new(50, 100).unwrap(),
            GroupCounts::new(30, 100).unwrap(),
        ))
        .unwrap();
        assert_eq!(analysis.test, direct);
        assert!(analysis.verdict.reject_null);
        assert_eq!(analysis.groups[0].label, "Ж");
        assert!((analysis.groups[0].rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn age_analysis_uses_configured_thresholds() {
        let ds = dataset(vec![cohort("М", 50, 10, 100), cohort("Ж", 25, 11, 100)]);
        let analysis = ProportionEvaluator::analyze(
            &ds,
            SickDaysAbove(2),
            GroupingKey::AgeGroup { threshold: 35 },
            0.05,
        )
        .unwrap();

        assert_eq!(analysis.groups[0].label, "older_than_35");
        assert_eq!(analysis.groups[0].successes, 10);
        assert_eq!(analysis.groups[1].label, "younger_or_equal_35");
        assert!(!analysis.verdict.reject_null);
    }

    #[test]
    fn single_group_is_a_grouping_error() {
        let ds = dataset(vec![cohort("М", 30, 3, 10)]);
        let err = evaluate_proportions(&ds, SickDaysAbove(2), GroupingKey::Gender, 0.05)
            .unwrap_err();
        match err {
            EvaluationError::Grouping { groups, .. } => assert_eq!(groups, vec!["М"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn three_groups_is_a_grouping_error() {
        let ds = dataset(vec![
            cohort("М", 30, 3, 10),
            cohort("Ж", 30, 3, 10),
            cohort("Х", 30, 3, 10),
        ]);
        assert!(matches!(
            evaluate_proportions(&ds, SickDaysAbove(2), GroupingKey::Gender, 0.05),
            Err(EvaluationError::Grouping { .. })
        ));
    }

    #[test]
    fn nobody_exceeding_is_undefined() {
        let ds = dataset(vec![cohort("М", 30, 0, 10), cohort("Ж", 30, 0, 10)]);
        assert!(matches!(
            evaluate_proportions(&ds, SickDaysAbove(2), GroupingKey::Gender, 0.05),
            Err(EvaluationError::UndefinedTest(_))
        ));
    }

    #[test]
    fn alpha_is_validated() {
        let ds = dataset(vec![cohort("М", 30, 3, 10), cohort("Ж", 30, 5, 10)]);
        assert!(matches!(
            evaluate_proportions(&ds, SickDaysAbove(2), GroupingKey::Gender, 1.5),
            Err(EvaluationError::InvalidAlpha(_))
        ));
    }
}
