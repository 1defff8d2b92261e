//! Tally CLI - count lines, words, characters and bytes of many files at once
//!
//! Front end for the measurement engine: collects the file selection and the
//! operation selection, starts one batch and renders outcomes as they arrive.

mod logging;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use logging::LogFormat;
use tally_core::application::{build, MeasuringExecutor, OrchestratorConfig, TaskOrchestrator};
use tally_core::domain::{Metric, TaskOutcome};
use tally_core::port::{PlatformProbe, ProcessRunner, TaskExecutor};
use tally_core::AppError;
use tally_infra_system::{HostPlatformProbe, TokioProcessRunner};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status when the host platform has no command mapping
const EXIT_UNSUPPORTED: u8 = 2;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Concurrent file measurement using the host's counting tools", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format
    #[arg(long, env = "TALLY_LOG_FORMAT", value_enum, default_value = "pretty", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure files (one task per file and metric)
    Count {
        /// Files to measure
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Metric to compute: lines, words, chars, bytes (repeatable, default: lines)
        #[arg(short, long = "metric")]
        metrics: Vec<Metric>,

        /// Compute all four metrics
        #[arg(long, conflicts_with = "metrics")]
        all: bool,

        /// Maximum number of measurement processes running at once (default: unbounded)
        #[arg(long, env = "TALLY_MAX_CONCURRENCY")]
        max_concurrency: Option<usize>,

        /// Print each outcome as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// Show the detected platform and the commands it maps to
    Platform,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    info!("Tally v{} starting...", VERSION);

    let probe = HostPlatformProbe::new();

    match cli.command {
        Commands::Count {
            files,
            metrics,
            all,
            max_concurrency,
            json,
        } => {
            let metrics = selected_metrics(metrics, all);
            let files = dedup(files);
            count(&probe, files, metrics, max_concurrency, json).await
        }
        Commands::Platform => {
            show_platform(&probe);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn count(
    probe: &dyn PlatformProbe,
    files: Vec<PathBuf>,
    metrics: Vec<Metric>,
    max_concurrency: Option<usize>,
    json: bool,
) -> Result<ExitCode> {
    let platform = probe.platform();
    info!(
        identifier = %probe.identifier(),
        host = %probe.description(),
        platform = %platform,
        "Platform detected"
    );

    let config = match max_concurrency {
        Some(limit) => OrchestratorConfig::with_max_concurrency(limit)
            .context("Invalid --max-concurrency")?,
        None => OrchestratorConfig::unbounded(),
    };

    // DI wiring
    let runner: Arc<dyn ProcessRunner> = Arc::new(TokioProcessRunner::new());
    let executor: Arc<dyn TaskExecutor> = Arc::new(MeasuringExecutor::new(runner));
    let orchestrator = TaskOrchestrator::new(platform, executor, config);

    let (tx, mut rx) = mpsc::unbounded_channel::<TaskOutcome>();
    let handles = match orchestrator.start_batch(&files, &metrics, move |outcome| {
        render::print_outcome(&outcome, json);
        let _ = tx.send(outcome);
    }) {
        Ok(handles) => handles,
        Err(AppError::UnsupportedPlatform(p)) => {
            eprintln!(
                "{}",
                format!("✗ Unsupported platform ({}): no counting command available", p)
                    .red()
                    .bold()
            );
            return Ok(ExitCode::from(EXIT_UNSUPPORTED));
        }
        Err(e) => return Err(e).context("Failed to start batch"),
    };

    let scheduled = handles.len();
    let order = handles.tasks().to_vec();
    let completed = handles.join_all().await;
    info!(scheduled, completed, "Batch drained");

    // Sender lives in the callback, which is dropped once the batch drained
    let mut outcomes = Vec::with_capacity(scheduled);
    while let Some(outcome) = rx.recv().await {
        outcomes.push(outcome);
    }

    if !json {
        render::print_summary(&order, &outcomes);
    }

    if outcomes.iter().all(TaskOutcome::is_success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn show_platform(probe: &dyn PlatformProbe) {
    let platform = probe.platform();

    println!("{}", "Platform".cyan().bold());
    println!();
    println!("  {} {}", "Identifier:".bold(), probe.identifier());
    println!("  {} {}", "Host:".bold(), probe.description());
    if platform.is_supported() {
        println!("  {} {}", "Resolved:".bold(), platform.to_string().green());
    } else {
        println!("  {} {}", "Resolved:".bold(), platform.to_string().red());
        return;
    }
    println!();

    for metric in Metric::ALL {
        if let Ok(invocation) = build(platform, metric, "<file>") {
            println!("  {} {}", format!("{:<18}", metric.label()).bold(), invocation);
        }
    }
}

/// Explicit metrics win; `--all` selects everything; default is line counting
fn selected_metrics(metrics: Vec<Metric>, all: bool) -> Vec<Metric> {
    if all {
        Metric::ALL.to_vec()
    } else if metrics.is_empty() {
        vec![Metric::LineCount]
    } else {
        dedup(metrics)
    }
}

/// Drop repeats while keeping first-seen order
fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
