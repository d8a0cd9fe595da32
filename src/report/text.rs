//! Report wording: section titles, hypotheses and the two verdict templates.

use crate::config::Thresholds;
use serde::{Deserialize, Serialize};

/// Decimal places shown for p-values. Display only; decisions use the raw value.
pub const P_VALUE_DECIMALS: usize = 10;

pub const TEST_INTRO: &str = "We ran a two-proportion z-test and obtained the following result:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Gender,
    AgeGroup,
}

impl AnalysisKind {
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisKind::Gender => "Gender differences in sick-day absences",
            AnalysisKind::AgeGroup => "Age differences in sick-day absences",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            AnalysisKind::Gender => "gender",
            AnalysisKind::AgeGroup => "age_group",
        }
    }

    pub fn hypothesis(&self, t: &Thresholds) -> String {
        match self {
            AnalysisKind::Gender => format!(
                "Hypothesis: men take more than {} sick days per year significantly more often than women.",
                t.work_days
            ),
            AnalysisKind::AgeGroup => format!(
                "Hypothesis: employees older than {} take more than {} sick days per year \
                 significantly more often than their younger colleagues.",
                t.age, t.work_days
            ),
        }
    }

    /// Statement of (no) difference shared by H0/H1 and the verdict sentences.
    fn difference(&self, t: &Thresholds, exists: bool) -> String {
        let lead = if exists {
            "there is a statistically significant difference"
        } else {
            "there is no statistically significant difference"
        };
        match self {
            AnalysisKind::Gender => format!(
                "{} between the shares of men and women taking more than {} sick days per year",
                lead, t.work_days
            ),
            AnalysisKind::AgeGroup => format!(
                "{} between the shares of employees older than {} and those aged {} or younger \
                 taking more than {} sick days per year",
                lead, t.age, t.age, t.work_days
            ),
        }
    }

    pub fn null_hypothesis(&self, t: &Thresholds) -> String {
        format!("H0: {}.", capitalize(&self.difference(t, false)))
    }

    pub fn alternative_hypothesis(&self, t: &Thresholds) -> String {
        format!("H1: {}.", capitalize(&self.difference(t, true)))
    }

    /// Pick one of the two fixed verdict templates.
    pub fn interpretation(&self, t: &Thresholds, reject_null: bool) -> String {
        if reject_null {
            format!(
                "We reject the null hypothesis because the p-value is below the significance \
                 level ({}), which means {}.",
                t.alpha,
                self.difference(t, true)
            )
        } else {
            format!(
                "We fail to reject the null hypothesis because the p-value is not below the \
                 significance level ({}): {}.",
                t.alpha,
                self.difference(t, false)
            )
        }
    }
}

pub fn format_p_value(p_value: f64) -> String {
    format!("p-value: {:.*}", P_VALUE_DECIMALS, p_value)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
