//! Command execution for the curve parser CLI
//!
//! Sets up logging, runs the coordinator over the input folder, writes the
//! tables and reports a summary.

use crate::cli::args::Args;
use crate::models::ProcessingStats;
use crate::processor::RunCoordinator;
use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Main command runner
pub fn run(args: &Args) -> Result<ProcessingStats> {
    let start_time = Instant::now();
    setup_logging(args);

    args.validate()?;
    let config = args.to_config().context("Failed to build run configuration")?;
    let quiet = args.quiet;

    if !quiet {
        println!("{}", "Parsing curve exports".bright_green().bold());
        println!("  {} {}", "Folder:".bright_cyan(), args.folder.display());
        println!("  {} {}", "Output:".bright_cyan(), args.output_dir().display());
    }

    let mut coordinator = RunCoordinator::new(config)?;
    coordinator
        .process_folder(&args.folder)
        .with_context(|| format!("Failed to process {}", args.folder.display()))?;

    let written = coordinator
        .write_tables(args.output_dir())
        .context("Failed to write output tables")?;
    info!("Finished in {}ms", start_time.elapsed().as_millis());

    let stats = ProcessingStats {
        processing_time_ms: start_time.elapsed().as_millis(),
        ..coordinator.stats().clone()
    };

    if !quiet {
        print_summary(&stats, &written);
    }
    Ok(stats)
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("curve_parser={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

fn print_summary(stats: &ProcessingStats, written: &[PathBuf]) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Files processed:".bright_cyan(),
        stats.files_processed.to_string().bright_white()
    );
    if stats.files_failed > 0 {
        println!(
            "  {} {}",
            "Files failed:".bright_red(),
            stats.files_failed.to_string().bright_red().bold()
        );
        for (path, reason) in &stats.failures {
            println!("    {} {}", path.display().to_string().bright_red(), reason);
        }
    }
    println!(
        "  {} {}",
        "Samples:".bright_cyan(),
        stats.samples_parsed.to_string().bright_white()
    );
    println!(
        "  {} {} params, {} raw",
        "Rows:".bright_cyan(),
        stats.params_rows.to_string().bright_white().bold(),
        stats.raw_rows.to_string().bright_white().bold()
    );
    for path in written {
        println!("  {} {}", "Wrote:".bright_cyan(), path.display());
    }
}
