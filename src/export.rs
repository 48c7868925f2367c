//! Aggregation of Criterion estimate documents
//!
//! `cargo bench` leaves one `new/estimates.json` per benchmark beneath the
//! Criterion output directory. Aggregation walks that tree and merges every
//! estimate into a single summary keyed by benchmark name.

use crate::summary::{BenchmarkEstimate, BenchmarkSummary, DEFAULT_UNIT};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory segment Criterion uses for the latest run
const RUN_MARKER: &str = "new";

/// Estimates document file name within a run directory
const ESTIMATES_FILE: &str = "estimates.json";

/// Errors for the aggregation stage
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("criterion directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("failed to walk {root}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no criterion estimates found under {0}; ensure `cargo bench` has been executed")]
    NoEstimates(PathBuf),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Point estimate with confidence interval, as Criterion serializes the mean
#[derive(Debug, Deserialize)]
struct RawMean {
    point_estimate: f64,
    confidence_interval: RawConfidenceInterval,
}

#[derive(Debug, Deserialize)]
struct RawConfidenceInterval {
    lower_bound: f64,
    upper_bound: f64,
}

/// Bare point estimate (median, std_dev)
#[derive(Debug, Deserialize)]
struct RawStatistic {
    point_estimate: f64,
}

/// The subset of Criterion's estimates document this tool consumes
#[derive(Debug, Deserialize)]
struct RawEstimates {
    mean: RawMean,
    median: RawStatistic,
    std_dev: RawStatistic,
    unit: Option<String>,
}

impl RawEstimates {
    fn into_estimate(self) -> BenchmarkEstimate {
        BenchmarkEstimate {
            mean: self.mean.point_estimate,
            mean_ci_lower: self.mean.confidence_interval.lower_bound,
            mean_ci_upper: self.mean.confidence_interval.upper_bound,
            median: self.median.point_estimate,
            std_dev: self.std_dev.point_estimate,
            unit: self.unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        }
    }
}

/// True for paths shaped `<benchmark>/new/estimates.json`
fn is_estimates_path(path: &Path) -> bool {
    path.file_name().map_or(false, |file| file == ESTIMATES_FILE)
        && path
            .parent()
            .and_then(Path::file_name)
            .map_or(false, |dir| dir == RUN_MARKER)
}

/// Benchmark name: the path segment two levels above the estimates document
/// (the parent of the `new` run directory)
fn benchmark_name(path: &Path) -> Option<String> {
    let bench_dir = path.parent()?.parent()?;
    Some(bench_dir.file_name()?.to_string_lossy().into_owned())
}

/// Walk `root` and merge every matching estimates document into one summary
///
/// Traversal is sorted by file name, so when two documents map to the same
/// benchmark name the resolution is deterministic: the later one wins and a
/// warning names the benchmark. Any unreadable or unparseable document fails
/// the whole aggregation; there is no best-effort partial output.
pub fn collect_estimates(root: &Path) -> Result<BenchmarkSummary> {
    if !root.exists() {
        return Err(ExportError::RootNotFound(root.to_path_buf()));
    }

    let mut results = BenchmarkSummary::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| ExportError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_estimates_path(path) {
            continue;
        }
        let Some(name) = benchmark_name(path) else {
            continue;
        };

        tracing::debug!("found estimates for '{}' at {}", name, path.display());
        let estimate = read_estimates(path)?;
        if results.insert(name.clone(), estimate).is_some() {
            tracing::warn!(
                "duplicate benchmark name '{}'; keeping estimates from {}",
                name,
                path.display()
            );
        }
    }

    if results.is_empty() {
        return Err(ExportError::NoEstimates(root.to_path_buf()));
    }

    Ok(results)
}

fn read_estimates(path: &Path) -> Result<BenchmarkEstimate> {
    let text = fs::read_to_string(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawEstimates = serde_json::from_str(&text).map_err(|source| ExportError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(raw.into_estimate())
}
