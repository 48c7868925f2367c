//! Report rendering and exit policy for comparisons
//!
//! The text report mirrors what a CI log wants to show: the informational
//! new-benchmark notice first, then either the success line or the missing
//! and regression lists. The JSON report carries the same content for
//! machine consumption.

use crate::compare::{ComparisonResult, RegressionPolicy};
use serde::{Deserialize, Serialize};

/// Exit code for a finished comparison: 0 when the gate passes, 1 otherwise
///
/// New benchmarks never affect the exit code.
pub fn exit_code(result: &ComparisonResult) -> i32 {
    if result.is_within_threshold() {
        0
    } else {
        1
    }
}

fn format_ns(value: f64) -> String {
    format!("{:.3} ns", value)
}

/// Render the human-readable report
pub fn render_text(result: &ComparisonResult, policy: &RegressionPolicy) -> String {
    let mut report = String::new();

    if !result.new_benchmarks.is_empty() {
        report.push_str("ℹ️  Detected new benchmarks not present in baseline:\n");
        for name in &result.new_benchmarks {
            report.push_str(&format!("   • {}\n", name));
        }
        report.push('\n');
    }

    if result.is_within_threshold() {
        report.push_str(&format!(
            "✅ Benchmarks are within the allowed regression threshold ({:.1}% max).\n",
            policy.max_relative_regression * 100.0
        ));
        return report;
    }

    if !result.missing.is_empty() {
        report.push_str("❌ Missing benchmarks in current run:\n");
        for name in &result.missing {
            report.push_str(&format!("   • {}\n", name));
        }
        report.push('\n');
    }

    if !result.regressions.is_empty() {
        report.push_str("❌ Benchmarks exceeding allowed regression:\n");
        for regression in &result.regressions {
            report.push_str(&format!(
                "   • {}: baseline {}, current {} (+{:.2}%)\n",
                regression.name,
                format_ns(regression.baseline_mean),
                format_ns(regression.current_mean),
                regression.delta_percent()
            ));
        }
    }

    report
}

/// Machine-readable comparison report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// True when the gate passes (nothing missing, nothing regressed)
    pub within_threshold: bool,
    /// Benchmarks only present in the current run
    pub new_benchmarks: Vec<String>,
    /// Baseline benchmarks absent from the current run
    pub missing: Vec<String>,
    /// Benchmarks beyond the allowed regression
    pub regressions: Vec<JsonRegression>,
}

/// A single regression entry in the JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRegression {
    pub name: String,
    pub baseline_mean: f64,
    pub current_mean: f64,
    /// Signed percentage delta; omitted when the baseline mean is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta_percent: Option<f64>,
}

impl JsonReport {
    fn from_result(result: &ComparisonResult) -> Self {
        let regressions = result
            .regressions
            .iter()
            .map(|regression| {
                let delta = regression.delta_percent();
                JsonRegression {
                    name: regression.name.clone(),
                    baseline_mean: regression.baseline_mean,
                    current_mean: regression.current_mean,
                    delta_percent: delta.is_finite().then_some(delta),
                }
            })
            .collect();

        Self {
            within_threshold: result.is_within_threshold(),
            new_benchmarks: result.new_benchmarks.clone(),
            missing: result.missing.clone(),
            regressions,
        }
    }
}

/// Render the JSON report, terminated by a newline
pub fn render_json(result: &ComparisonResult) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(&JsonReport::from_result(result))?;
    text.push('\n');
    Ok(text)
}
