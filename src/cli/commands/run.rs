//! Run command implementation.
//!
//! Renames files, probes every container, groups them by track layout,
//! asks the operator for codes per group and applies the edits.

use crate::cli::args::Cli;
use crate::core::categorizer::Categories;
use crate::core::editor;
use crate::core::prompt::{Decision, Prompter};
use crate::core::renamer;
use crate::core::scanner::{self, ScanScope};
use crate::models::config::{self, Settings};
use crate::models::summary::RunSummary;
use crate::services::mkvmerge;
use crate::services::mkvpropedit::{DryRun, EditExecutor, MkvPropEdit};
use crate::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// No container files were found under the scan root, or none could
    /// be read.
    NoFiles,
}

/// Run against stdin/stdout.
pub fn run(cli: &Cli) -> Result<RunOutcome> {
    let stdin = std::io::stdin();
    run_with_io(cli, stdin.lock(), std::io::stdout())
}

/// Run with the operator dialog on the given input and output.
pub fn run_with_io<R: BufRead, W: Write>(cli: &Cli, input: R, output: W) -> Result<RunOutcome> {
    println!("{}", "[MKVPROPS] Editing track properties...".bold().cyan());
    println!();

    let root = cli.directory.as_path();
    crate::utils::fs::ensure_directory(root)?;

    let config = config::load_config(cli.config.as_deref())?;
    let settings = Settings::from_config(config, cli.overrides())?;
    let scope = ScanScope {
        recursive: !cli.single_folder,
        ignore_dirs: &settings.ignore_dirs,
    };

    let mut summary = RunSummary::new();

    if settings.rename_files {
        rename_pass(root, scope, &settings, &mut summary)?;
    }

    println!("[INFO] Scanning: {}", root.display());
    let scan = scanner::scan_containers(root, scope, &settings.pattern_unwanted)?;
    tracing::debug!(
        "Scanned {} files in {} directories, {} unwanted",
        scan.total_files_scanned,
        scan.total_dirs_scanned,
        scan.unwanted.len()
    );

    if scan.containers.is_empty() {
        println!("Found no .mkv files in {}", root.display());
        return Ok(RunOutcome::NoFiles);
    }

    let categories = probe_all(&scan.containers, &settings, &mut summary);
    if categories.is_empty() {
        println!("Found no readable .mkv files in {}", root.display());
        print_summary(&summary);
        return Ok(RunOutcome::NoFiles);
    }
    println!(
        "[OK] Found {} file(s) in {} group(s)",
        categories.file_count(),
        categories.len()
    );

    let executor: Box<dyn EditExecutor> = if cli.dry_run {
        Box::new(DryRun)
    } else {
        Box::new(MkvPropEdit::new())
    };

    let mut prompter = Prompter::new(input, output);
    for (i, category) in categories.iter().enumerate() {
        let Some(record) = categories.record(category.representative()) else {
            continue;
        };

        match prompter.ask(i, category, record, &settings)? {
            Decision::Skip => {
                tracing::info!("Skipped group {}", i + 1);
                summary.groups_skipped += 1;
            }
            Decision::Accept(directive) => editor::apply_category(
                category,
                &categories,
                &directive,
                &settings,
                executor.as_ref(),
                &mut summary,
            ),
        }
    }

    print_summary(&summary);
    Ok(RunOutcome::Completed)
}

/// Both rename passes, completed before anything is probed.
fn rename_pass(
    root: &Path,
    scope: ScanScope<'_>,
    settings: &Settings,
    summary: &mut RunSummary,
) -> Result<()> {
    let dirs = scanner::scan_directories(root, scope)?;

    let stripped = renamer::strip_counters(&dirs)?;
    summary.record_renames(&stripped);

    let matched = renamer::rename_to_sidecars(&dirs, settings)?;
    summary.record_renames(&matched);

    if !stripped.skipped.is_empty() {
        println!(
            "{}",
            "[WARNING] Not renamed, target name already exists:"
                .bold()
                .yellow()
        );
        for path in &stripped.skipped {
            println!("  {}", path.display());
        }
        println!();
    }

    Ok(())
}

/// Probe every container. Failures are reported and the file is left out.
fn probe_all(paths: &[PathBuf], settings: &Settings, summary: &mut RunSummary) -> Categories {
    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message("Reading track information");

    let mut categories = Categories::new();
    for path in paths {
        match mkvmerge::probe(path, &settings.codec_aliases) {
            Ok(record) => categories.insert(record),
            Err(e) => {
                pb.suspend(|| println!("{} {}", "[ERROR]".red(), e));
                tracing::warn!("Probe failed: {}", e);
                summary.probe_failed.push(path.clone());
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    categories
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "[Summary]".bold().green());
    println!(
        "  Renamed {} and edited {} files",
        summary.renamed, summary.edited
    );
    if summary.groups_skipped > 0 {
        println!("  {} {}", "Skipped groups:".bold(), summary.groups_skipped);
    }
    if !summary.rename_failed.is_empty() {
        println!(
            "  {} {}",
            "Failed renames:".bold().red(),
            summary.rename_failed.len()
        );
        for path in &summary.rename_failed {
            println!("    {}", path.display());
        }
    }
    if !summary.probe_failed.is_empty() {
        println!(
            "  {} {}",
            "Unreadable files:".bold().red(),
            summary.probe_failed.len()
        );
        for path in &summary.probe_failed {
            println!("    {}", path.display());
        }
    }
    if !summary.edit_failed.is_empty() {
        println!(
            "  {} {}",
            "Failed edits:".bold().red(),
            summary.edit_failed.len()
        );
        for path in &summary.edit_failed {
            println!("    {}", path.display());
        }
    }
}
