//! Regression classification between two benchmark summaries
//!
//! The comparison is a pure, single-pass function over two static summaries:
//! no I/O, no mutation of either input, and finding a regression is a normal
//! result rather than an error. Malformed input is rejected earlier, when the
//! documents are loaded.

use crate::summary::BenchmarkSummary;
use serde::{Deserialize, Serialize};

/// Policy for deciding whether a benchmark regressed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionPolicy {
    /// Maximum allowed relative regression (0.1 = 10% slower than baseline)
    pub max_relative_regression: f64,

    /// Absolute slack in the mean's unit
    ///
    /// Acts as a floor on the threshold for every benchmark, and as the
    /// whole threshold when the baseline mean is zero or negative. Protects
    /// very fast benchmarks where a tiny absolute increase shows up as a
    /// large relative percentage.
    pub absolute_slack: f64,
}

impl Default for RegressionPolicy {
    fn default() -> Self {
        Self {
            max_relative_regression: 0.1, // 10% headroom
            absolute_slack: 1.0,          // 1 ns floor
        }
    }
}

impl RegressionPolicy {
    /// Validate policy values
    pub fn validate(&self) -> Result<(), String> {
        if !self.max_relative_regression.is_finite() {
            return Err(format!(
                "max_relative_regression must be finite, got {}",
                self.max_relative_regression
            ));
        }

        if !self.absolute_slack.is_finite() {
            return Err(format!(
                "absolute_slack must be finite, got {}",
                self.absolute_slack
            ));
        }

        Ok(())
    }

    /// Highest tolerable current mean for the given baseline mean
    fn effective_threshold(&self, baseline_mean: f64) -> f64 {
        let threshold = if baseline_mean <= 0.0 {
            self.absolute_slack
        } else {
            baseline_mean * (1.0 + self.max_relative_regression)
        };

        threshold.max(self.absolute_slack)
    }
}

/// A benchmark whose current mean exceeded the policy threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub name: String,
    pub baseline_mean: f64,
    pub current_mean: f64,
}

impl Regression {
    /// Signed percentage delta against the baseline, infinite when the
    /// baseline mean is exactly zero
    pub fn delta_percent(&self) -> f64 {
        if self.baseline_mean == 0.0 {
            f64::INFINITY
        } else {
            (self.current_mean - self.baseline_mean) / self.baseline_mean * 100.0
        }
    }
}

/// Classification of the delta between two summaries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Baseline benchmarks absent from the current run, in name order
    pub missing: Vec<String>,
    /// Benchmarks beyond the allowed regression, in name order
    pub regressions: Vec<Regression>,
    /// Current benchmarks absent from the baseline, in name order
    pub new_benchmarks: Vec<String>,
}

impl ComparisonResult {
    /// True when nothing is missing and nothing regressed
    ///
    /// New benchmarks are informational and never count against the gate.
    pub fn is_within_threshold(&self) -> bool {
        self.missing.is_empty() && self.regressions.is_empty()
    }
}

/// Classify every baseline benchmark as present-and-ok, missing, or
/// regressed, and collect benchmarks that only exist in the current run
///
/// # Example
/// ```
/// use centinela::compare::{compare_summaries, RegressionPolicy};
/// use centinela::summary::{BenchmarkEstimate, BenchmarkSummary};
///
/// let estimate = |mean: f64| BenchmarkEstimate {
///     mean,
///     mean_ci_lower: mean,
///     mean_ci_upper: mean,
///     median: mean,
///     std_dev: 0.0,
///     unit: "ns".to_string(),
/// };
///
/// let mut baseline = BenchmarkSummary::new();
/// baseline.insert("parse".to_string(), estimate(100.0));
/// let mut current = BenchmarkSummary::new();
/// current.insert("parse".to_string(), estimate(105.0));
///
/// // 105 is within the default 10% threshold of 100
/// let result = compare_summaries(&baseline, &current, &RegressionPolicy::default());
/// assert!(result.is_within_threshold());
/// ```
pub fn compare_summaries(
    baseline: &BenchmarkSummary,
    current: &BenchmarkSummary,
    policy: &RegressionPolicy,
) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    for (name, baseline_estimate) in baseline {
        let Some(current_estimate) = current.get(name) else {
            result.missing.push(name.clone());
            continue;
        };

        if current_estimate.mean > policy.effective_threshold(baseline_estimate.mean) {
            result.regressions.push(Regression {
                name: name.clone(),
                baseline_mean: baseline_estimate.mean,
                current_mean: current_estimate.mean,
            });
        }
    }

    result.new_benchmarks = current
        .keys()
        .filter(|name| !baseline.contains_key(*name))
        .cloned()
        .collect();

    result
}
