//! mkvprops CLI
//!
//! Batch edit titles, languages, names and flags of Matroska tracks.

use clap::Parser;
use colored::Colorize;
use mkvprops::cli::{
    args::Cli,
    commands::run::{self, RunOutcome},
};
use mkvprops::preflight;
use std::process::ExitCode;

/// Exit status after an interrupt (128 + SIGINT).
const INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Run preflight checks unless skipped
    if !cli.skip_preflight {
        run_preflight_checks()?;
    }

    // The pipeline blocks on subprocesses and stdin
    let pipeline = tokio::task::spawn_blocking(move || run::run(&cli));

    tokio::select! {
        joined = pipeline => {
            let outcome = joined??;
            Ok(match outcome {
                RunOutcome::Completed => ExitCode::SUCCESS,
                RunOutcome::NoFiles => ExitCode::from(1),
            })
        }
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("{}", "Interrupted, exiting.".bold().yellow());
            // Returning would wait for the blocking task
            std::process::exit(INTERRUPTED);
        }
    }
}

/// Initialize the logging system.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("mkvprops=debug")
    } else {
        EnvFilter::new("mkvprops=info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}

/// Run preflight checks and fail if a tool is missing.
fn run_preflight_checks() -> anyhow::Result<()> {
    println!("{}", "Running preflight checks...".bold());
    println!();

    let results = preflight::run_preflight_checks();
    preflight::print_results(&results);

    println!();

    if !preflight::all_passed(&results) {
        let missing = preflight::missing_tools(&results).join(", ");
        return Err(mkvprops::Error::ToolNotFound(missing).into());
    }

    Ok(())
}
