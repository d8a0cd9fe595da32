//! Two-Proportion Z-Test
//! Pooled-variance z-test for equality of two independent proportions.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ZTestError {
    #[error("Success count {successes} exceeds sample size {nobs}")]
    InvalidCounts { successes: u64, nobs: u64 },
    #[error("Test statistic is undefined: {0}")]
    Undefined(&'static str),
    #[error("Normal distribution unavailable: {0}")]
    Distribution(String),
    #[error("Significance level must lie strictly between 0 and 1, got {0}")]
    InvalidAlpha(f64),
}

/// Successes and sample size of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    pub successes: u64,
    pub nobs: u64,
}

impl GroupCounts {
    pub fn new(successes: u64, nobs: u64) -> Result<Self, ZTestError> {
        if successes > nobs {
            return Err(ZTestError::InvalidCounts { successes, nobs });
        }
        Ok(Self { successes, nobs })
    }

    /// Observed proportion, `None` for an empty group.
    pub fn proportion(&self) -> Option<f64> {
        (self.nobs > 0).then(|| self.successes as f64 / self.nobs as f64)
    }
}

/// Input pair for the test. Group order fixes the sign of z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProportionTestInput {
    pub first: GroupCounts,
    pub second: GroupCounts,
}

impl ProportionTestInput {
    pub fn new(first: GroupCounts, second: GroupCounts) -> Self {
        Self { first, second }
    }

    pub fn swapped(&self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTestResult {
    pub statistic: f64,
    pub p_value: f64,
    pub pooled_proportion: f64,
    pub standard_error: f64,
}

/// Reject / fail-to-reject decision for a p-value at a significance level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestVerdict {
    pub p_value: f64,
    pub alpha: f64,
    pub reject_null: bool,
}

impl TestVerdict {
    /// The null hypothesis is rejected exactly when `p_value < alpha`.
    pub fn decide(p_value: f64, alpha: f64) -> Result<Self, ZTestError> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ZTestError::InvalidAlpha(alpha));
        }
        Ok(Self {
            p_value,
            alpha,
            reject_null: p_value < alpha,
        })
    }
}

/// Run the two-sided pooled z-test.
///
/// SE = sqrt(p(1-p)(1/n1 + 1/n2)) with p the pooled proportion, and
/// p-value = 2 * (1 - Phi(|z|)), evaluated through the survival function.
pub fn two_proportion_ztest(input: &ProportionTestInput) -> Result<ZTestResult, ZTestError> {
    let (a, b) = (input.first, input.second);
    if a.nobs == 0 || b.nobs == 0 {
        return Err(ZTestError::Undefined("a group has no observations"));
    }

    let n1 = a.nobs as f64;
    let n2 = b.nobs as f64;
    let p1 = a.successes as f64 / n1;
    let p2 = b.successes as f64 / n2;

    let pooled = (a.successes + b.successes) as f64 / (n1 + n2);
    if pooled <= 0.0 || pooled >= 1.0 {
        return Err(ZTestError::Undefined(
            "pooled proportion is 0 or 1, so the variance is zero",
        ));
    }

    let se = (pooled * (1.0 - pooled) * (1.0 / n1 + 1.0 / n2)).sqrt();
    let z = (p1 - p2) / se;
    if !z.is_finite() {
        return Err(ZTestError::Undefined("test statistic is not finite"));
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| ZTestError::Distribution(e.to_string()))?;
    let p_value = (2.0 * normal.sf(z.abs())).clamp(0.0, 1.0);

    Ok(ZTestResult {
        statistic: z,
        p_value,
        pooled_proportion: pooled,
        standard_error: se,
    })
}
