//! Report Model
//! Pure recomputation of both analyses for a dataset and a threshold set.

use super::text::{format_p_value, AnalysisKind, TEST_INTRO};
use crate::config::Thresholds;
use crate::data::{Dataset, GroupingKey, SickDaysAbove};
use crate::stats::{GroupSummary, ProportionEvaluator};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Bar chart of outcome rate per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<GroupSummary>,
}

/// Test result rendered for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Findings {
    pub z_statistic: f64,
    pub p_value: f64,
    pub p_value_text: String,
    pub reject_null: bool,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed(Findings),
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub kind: AnalysisKind,
    pub title: String,
    pub hypothesis: String,
    pub null_hypothesis: String,
    pub alternative_hypothesis: String,
    pub outcome: AnalysisOutcome,
    /// Absent only when the groups could not be aggregated at all.
    pub chart: Option<BarChartData>,
}

impl AnalysisSection {
    pub fn findings(&self) -> Option<&Findings> {
        match &self.outcome {
            AnalysisOutcome::Completed(findings) => Some(findings),
            AnalysisOutcome::Failed { .. } => None,
        }
    }
}

/// Everything a presentation layer needs to draw the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub thresholds: Thresholds,
    pub record_count: usize,
    pub sections: Vec<AnalysisSection>,
}

impl ReportModel {
    pub fn section(&self, kind: AnalysisKind) -> Option<&AnalysisSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// Recompute the gender and age-group analyses. A failure in one section is
/// recorded in that section and does not affect the other.
pub fn compute_report(dataset: &Dataset, thresholds: &Thresholds) -> ReportModel {
    let outcome = SickDaysAbove(thresholds.work_days);
    let sections = [
        (AnalysisKind::Gender, GroupingKey::Gender),
        (
            AnalysisKind::AgeGroup,
            GroupingKey::AgeGroup {
                threshold: thresholds.age,
            },
        ),
    ]
    .into_iter()
    .map(|(kind, key)| build_section(dataset, thresholds, outcome, kind, key))
    .collect();

    ReportModel {
        thresholds: *thresholds,
        record_count: dataset.len(),
        sections,
    }
}

fn build_section(
    dataset: &Dataset,
    thresholds: &Thresholds,
    outcome: SickDaysAbove,
    kind: AnalysisKind,
    key: GroupingKey,
) -> AnalysisSection {
    let chart = ProportionEvaluator::group_counts(dataset, outcome, key)
        .map(|counts| BarChartData {
            title: kind.title().to_string(),
            x_label: kind.axis_label().to_string(),
            y_label: format!("Share with more than {} sick days", thresholds.work_days),
            bars: counts
                .into_iter()
                .map(|(label, counts)| GroupSummary::new(label, counts))
                .collect(),
        })
        .ok();

    let outcome = match ProportionEvaluator::analyze(dataset, outcome, key, thresholds.alpha) {
        Ok(analysis) => AnalysisOutcome::Completed(Findings {
            z_statistic: analysis.test.statistic,
            p_value: analysis.verdict.p_value,
            p_value_text: format_p_value(analysis.verdict.p_value),
            reject_null: analysis.verdict.reject_null,
            interpretation: kind.interpretation(thresholds, analysis.verdict.reject_null),
        }),
        Err(err) => {
            warn!(analysis = kind.axis_label(), error = %err, "Analysis failed");
            AnalysisOutcome::Failed {
                message: err.to_string(),
            }
        }
    };

    AnalysisSection {
        kind,
        title: kind.title().to_string(),
        hypothesis: kind.hypothesis(thresholds),
        null_hypothesis: kind.null_hypothesis(thresholds),
        alternative_hypothesis: kind.alternative_hypothesis(thresholds),
        outcome,
        chart,
    }
}

impl fmt::Display for AnalysisSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.title)?;
        writeln!(f, "{}", self.hypothesis)?;
        writeln!(f, "* {}", self.null_hypothesis)?;
        writeln!(f, "* {}", self.alternative_hypothesis)?;
        match &self.outcome {
            AnalysisOutcome::Completed(findings) => {
                writeln!(f, "{}", TEST_INTRO)?;
                writeln!(f, "**{}**", findings.p_value_text)?;
                writeln!(f, "{}", findings.interpretation)?;
            }
            AnalysisOutcome::Failed { message } => {
                writeln!(f, "Analysis failed: {}", message)?;
            }
        }
        if let Some(chart) = &self.chart {
            writeln!(f, "{} by {}:", chart.y_label, chart.x_label)?;
            for bar in &chart.bars {
                writeln!(
                    f,
                    "  {}: {:.1}% ({}/{})",
                    bar.label,
                    bar.rate * 100.0,
                    bar.successes,
                    bar.nobs
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ReportModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Sick-day analysis of {} employees (work_days = {}, age = {}, alpha = {})",
            self.record_count, self.thresholds.work_days, self.thresholds.age, self.thresholds.alpha
        )?;
        for section in &self.sections {
            writeln!(f)?;
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}
