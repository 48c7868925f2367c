//! Centinela - Criterion benchmark summary exporter and regression gate
//!
//! This library aggregates the per-benchmark `estimates.json` documents that
//! `cargo bench` leaves under the Criterion output directory into one
//! consolidated summary, and compares two such summaries to gate CI on
//! mean-latency regressions.

pub mod cli;
pub mod compare;
pub mod export;
pub mod report;
pub mod summary;
