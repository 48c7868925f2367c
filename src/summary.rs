//! Consolidated benchmark summary documents
//!
//! A summary maps benchmark name to the statistical estimates exported from a
//! Criterion run. Summaries are persisted as JSON with sorted keys, stable
//! field order, and a trailing newline so repeated exports over unchanged
//! input are byte-identical and diff cleanly in version control.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors for loading and persisting summary documents
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("benchmark summary not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("benchmark statistics for '{name}' are malformed: {source}")]
    MalformedEntry {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SummaryError>;

/// Time unit assumed when a document does not carry one
pub const DEFAULT_UNIT: &str = "ns";

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

/// Statistical summary of a single named benchmark
///
/// `mean_ci_lower <= mean <= mean_ci_upper` is assumed from the harness and
/// not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEstimate {
    /// Mean latency point estimate, in `unit`
    pub mean: f64,
    /// Lower bound of the mean's confidence interval
    pub mean_ci_lower: f64,
    /// Upper bound of the mean's confidence interval
    pub mean_ci_upper: f64,
    /// Median latency point estimate
    pub median: f64,
    /// Standard deviation point estimate
    pub std_dev: f64,
    /// Time unit tag ("ns" unless the harness says otherwise)
    #[serde(default = "default_unit")]
    pub unit: String,
}

/// Mapping from benchmark name to its estimates, sorted by name
pub type BenchmarkSummary = BTreeMap<String, BenchmarkEstimate>;

/// Load a summary document, validating every entry
///
/// Entries are validated one at a time so a malformed entry (missing or
/// non-numeric statistics) is reported by benchmark name rather than byte
/// offset. A single bad entry fails the whole load; no partial summary is
/// ever returned.
pub fn load_summary(path: &Path) -> Result<BenchmarkSummary> {
    if !path.exists() {
        return Err(SummaryError::NotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| SummaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let entries: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(&text).map_err(|source| SummaryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut summary = BenchmarkSummary::new();
    for (name, value) in entries {
        let estimate =
            serde_json::from_value(value).map_err(|source| SummaryError::MalformedEntry {
                name: name.clone(),
                source,
            })?;
        summary.insert(name, estimate);
    }

    tracing::debug!(
        "loaded {} benchmarks from {}",
        summary.len(),
        path.display()
    );

    Ok(summary)
}

/// Write a summary document, creating intermediate directories as needed
///
/// Serialization is deterministic: the map type keeps keys sorted, serde
/// keeps field order stable, and the output ends with a newline.
pub fn write_summary(summary: &BenchmarkSummary, path: &Path) -> Result<()> {
    let mut text = serde_json::to_string_pretty(summary)?;
    text.push('\n');

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| SummaryError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, text).map_err(|source| SummaryError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn estimate(mean: f64) -> BenchmarkEstimate {
        BenchmarkEstimate {
            mean,
            mean_ci_lower: mean - 1.0,
            mean_ci_upper: mean + 1.0,
            median: mean,
            std_dev: 0.5,
            unit: DEFAULT_UNIT.to_string(),
        }
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");

        let mut summary = BenchmarkSummary::new();
        summary.insert("parse_small".to_string(), estimate(100.0));
        summary.insert("parse_large".to_string(), estimate(2500.0));

        write_summary(&summary, &path).unwrap();
        let loaded = load_summary(&path).unwrap();

        assert_eq!(summary, loaded);
    }

    #[test]
    fn test_write_is_deterministic_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.json");
        let second = dir.path().join("b.json");

        let mut summary = BenchmarkSummary::new();
        summary.insert("b".to_string(), estimate(2.0));
        summary.insert("a".to_string(), estimate(1.0));

        write_summary(&summary, &first).unwrap();
        write_summary(&summary, &second).unwrap();

        let first_bytes = fs::read(&first).unwrap();
        let second_bytes = fs::read(&second).unwrap();
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first_bytes.last(), Some(&b'\n'));

        // Sorted keys regardless of insertion order
        let text = String::from_utf8(first_bytes).unwrap();
        assert!(text.find("\"a\"").unwrap() < text.find("\"b\"").unwrap());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("summary.json");

        let mut summary = BenchmarkSummary::new();
        summary.insert("bench".to_string(), estimate(10.0));

        write_summary(&summary, &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = load_summary(&path).unwrap_err();
        assert!(matches!(err, SummaryError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_json_is_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json at all").unwrap();

        let err = load_summary(&path).unwrap_err();
        assert!(matches!(err, SummaryError::Parse { .. }));
    }

    #[test]
    fn test_load_malformed_entry_names_benchmark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        fs::write(
            &path,
            r#"{"good": {"mean": 1.0, "mean_ci_lower": 0.9, "mean_ci_upper": 1.1,
                        "median": 1.0, "std_dev": 0.1, "unit": "ns"},
                "slow_path": {"mean": "fast"}}"#,
        )
        .unwrap();

        let err = load_summary(&path).unwrap_err();
        match err {
            SummaryError::MalformedEntry { ref name, .. } => assert_eq!(name, "slow_path"),
            other => panic!("expected MalformedEntry, got {:?}", other),
        }
        assert!(err.to_string().contains("slow_path"));
    }

    #[test]
    fn test_load_defaults_missing_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        fs::write(
            &path,
            r#"{"bench": {"mean": 1.0, "mean_ci_lower": 0.9, "mean_ci_upper": 1.1,
                          "median": 1.0, "std_dev": 0.1}}"#,
        )
        .unwrap();

        let summary = load_summary(&path).unwrap();
        assert_eq!(summary["bench"].unit, DEFAULT_UNIT);
    }

    fn arb_estimate() -> impl Strategy<Value = BenchmarkEstimate> {
        (
            -1e12..1e12f64,
            -1e12..1e12f64,
            -1e12..1e12f64,
            -1e12..1e12f64,
            0.0..1e9f64,
            "(ns|us|ms)",
        )
            .prop_map(|(mean, lower, upper, median, std_dev, unit)| BenchmarkEstimate {
                mean,
                mean_ci_lower: lower,
                mean_ci_upper: upper,
                median,
                std_dev,
                unit,
            })
    }

    proptest! {
        #[test]
        fn prop_summary_round_trips_losslessly(
            summary in proptest::collection::btree_map("[a-z_]{1,12}", arb_estimate(), 1..8)
        ) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("summary.json");

            write_summary(&summary, &path).unwrap();
            let loaded = load_summary(&path).unwrap();

            prop_assert_eq!(summary, loaded);
        }
    }
}
