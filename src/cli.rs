//! CLI argument parsing for Centinela

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for comparison reports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "centinela")]
#[command(version)]
#[command(about = "Criterion benchmark summary exporter and regression gate", long_about = None)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregate Criterion estimates into a single JSON summary
    Export {
        /// Criterion output directory (usually target/criterion)
        criterion_dir: PathBuf,

        /// Destination for the consolidated summary JSON
        output: PathBuf,
    },

    /// Compare a benchmark summary against a baseline
    Compare {
        /// Path to the baseline summary JSON
        baseline: PathBuf,

        /// Path to the current summary JSON
        current: PathBuf,

        /// Maximum allowed relative regression (e.g. 0.1 for 10%)
        #[arg(
            long = "max-regression",
            value_name = "FRACTION",
            default_value_t = 0.1
        )]
        max_regression: f64,

        /// Absolute slack in nanoseconds for zero-baseline benchmarks
        #[arg(long = "absolute-slack", value_name = "NS", default_value_t = 1.0)]
        absolute_slack: f64,

        /// Report format (text or json)
        #[arg(long = "format", value_enum, default_value = "text")]
        format: ReportFormat,
    },
}
