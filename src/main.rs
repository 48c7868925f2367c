use anyhow::Result;
use centinela::cli::{Cli, Command, ReportFormat};
use centinela::compare::{compare_summaries, RegressionPolicy};
use centinela::{export, report, summary};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Aggregate a Criterion output tree into a summary document
fn run_export(criterion_dir: &Path, output: &Path) -> Result<()> {
    let results = export::collect_estimates(criterion_dir)?;
    summary::write_summary(&results, output)?;

    println!(
        "Wrote benchmark summary for {} benchmarks to {}",
        results.len(),
        output.display()
    );

    Ok(())
}

/// Compare two summary documents and return the process exit code
fn run_compare(
    baseline_path: &Path,
    current_path: &Path,
    policy: &RegressionPolicy,
    format: ReportFormat,
) -> Result<i32> {
    policy.validate().map_err(|reason| anyhow::anyhow!(reason))?;

    let baseline = summary::load_summary(baseline_path)?;
    let current = summary::load_summary(current_path)?;
    let result = compare_summaries(&baseline, &current, policy);

    let rendered = match format {
        ReportFormat::Text => report::render_text(&result, policy),
        ReportFormat::Json => report::render_json(&result)?,
    };
    print!("{}", rendered);

    Ok(report::exit_code(&result))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Export {
            criterion_dir,
            output,
        } => run_export(&criterion_dir, &output),
        Command::Compare {
            baseline,
            current,
            max_regression,
            absolute_slack,
            format,
        } => {
            let policy = RegressionPolicy {
                max_relative_regression: max_regression,
                absolute_slack,
            };
            let code = run_compare(&baseline, &current, &policy, format)?;
            std::process::exit(code)
        }
    }
}
