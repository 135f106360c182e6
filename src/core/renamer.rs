//! File renaming passes.
//!
//! Two passes run before probing:
//! - strip duplicate counters: `Movie (1).mkv` -> `Movie.mkv`
//! - match sidecar: a lone container file takes the name of a lone sidecar
//!
//! Neither pass ever replaces an existing file.

use crate::core::scanner::{self, SIDECAR_EXTENSION};
use crate::models::config::Settings;
use crate::models::summary::RenameReport;
use crate::utils::fs::{file_name_string, file_stem_string, rename_no_clobber};
use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// Name of a file with its trailing ` (1)` style counters removed,
/// or `None` if it carries no counter.
pub fn stripped_name(filename: &str) -> Option<String> {
    let re = regex::Regex::new(r"^(.*?)(?:\s\(\d\))+(\.(?i:mkv))$").ok()?;
    let caps = re.captures(filename)?;
    Some(format!("{}{}", &caps[1], &caps[2]))
}

fn progress(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    pb.set_message(message);
    pb
}

/// Strip duplicate counters from container names in every directory.
///
/// A file is left untouched (and reported as skipped) when the stripped name
/// already exists. Running the pass twice renames nothing the second time.
/// Unreadable directories and failed renames are reported and passed over.
pub fn strip_counters(dirs: &[PathBuf]) -> Result<RenameReport> {
    let mut report = RenameReport::default();
    let pb = progress(dirs.len(), "Stripping appended counters");

    for dir in dirs {
        pb.inc(1);
        let Some(files) = list_or_record(dir, &mut report) else {
            continue;
        };

        for file in files {
            let Some(trimmed) = stripped_name(&file_name_string(&file)) else {
                continue;
            };
            let target = dir.join(trimmed);
            pb.suspend(|| rename_and_record(file, target, &mut report));
        }
    }

    pb.finish_and_clear();
    tracing::info!(
        "Counter stripping: {} renamed, {} skipped, {} failed",
        report.renamed.len(),
        report.skipped.len(),
        report.failed.len()
    );

    Ok(report)
}

/// Rename lone container files to match the lone sidecar in their directory.
///
/// Directories with zero or several eligible containers or sidecars are
/// ambiguous and left alone. Failures are reported and passed over.
pub fn rename_to_sidecars(dirs: &[PathBuf], settings: &Settings) -> Result<RenameReport> {
    let mut report = RenameReport::default();
    let pb = progress(dirs.len(), "Renaming files to match sidecars");

    for dir in dirs {
        pb.inc(1);
        let Some(files) = list_or_record(dir, &mut report) else {
            continue;
        };

        let Some(target) = sidecar_target(&files, settings) else {
            continue;
        };
        let Some(container) = files
            .iter()
            .find(|f| is_eligible_container(f, settings))
        else {
            continue;
        };

        if *container == target {
            continue;
        }

        let container = container.clone();
        pb.suspend(|| rename_and_record(container, target, &mut report));
    }

    pb.finish_and_clear();
    tracing::info!("Sidecar matching: {} renamed", report.renamed.len());

    Ok(report)
}

/// Files of a directory; an unreadable directory is recorded as failed.
fn list_or_record(dir: &Path, report: &mut RenameReport) -> Option<Vec<PathBuf>> {
    match scanner::list_files(dir) {
        Ok(files) => Some(files),
        Err(e) => {
            tracing::warn!("Failed to list {}: {}", dir.display(), e);
            report.failed.push(dir.to_path_buf());
            None
        }
    }
}

fn rename_and_record(from: PathBuf, to: PathBuf, report: &mut RenameReport) {
    match rename_no_clobber(&from, &to) {
        Ok(true) => {
            tracing::debug!("Renamed {} -> {}", from.display(), to.display());
            report.renamed.push((from, to));
        }
        Ok(false) => {
            tracing::debug!("Target exists, not renaming {}", from.display());
            report.skipped.push(from);
        }
        Err(e) => {
            tracing::warn!("Failed to rename {}: {}", from.display(), e);
            report.failed.push(from);
        }
    }
}

fn is_eligible_container(path: &Path, settings: &Settings) -> bool {
    scanner::is_container(path) && !scanner::is_unwanted(path, &settings.pattern_unwanted)
}

fn is_eligible_sidecar(path: &Path, settings: &Settings) -> bool {
    scanner::has_extension(path, SIDECAR_EXTENSION)
        && !settings.ignore_sidecars.contains(&file_name_string(path))
}

/// Path the lone container should have, if the directory has exactly one
/// eligible container and exactly one eligible sidecar.
fn sidecar_target(files: &[PathBuf], settings: &Settings) -> Option<PathBuf> {
    let containers: Vec<_> = files
        .iter()
        .filter(|f| is_eligible_container(f, settings))
        .collect();
    let sidecars: Vec<_> = files
        .iter()
        .filter(|f| is_eligible_sidecar(f, settings))
        .collect();

    match (containers.as_slice(), sidecars.as_slice()) {
        ([container], [sidecar]) => {
            let extension = container
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_else(|| scanner::CONTAINER_EXTENSION.to_string());
            let name = format!("{}.{}", file_stem_string(sidecar), extension);
            Some(sidecar.with_file_name(name))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripped_name() {
        assert_eq!(stripped_name("Movie (1).mkv"), Some("Movie.mkv".to_string()));
        assert_eq!(stripped_name("Movie (1) (2).mkv"), Some("Movie.mkv".to_string()));
        assert_eq!(
            stripped_name("Movie (2020) (3).mkv"),
            Some("Movie (2020).mkv".to_string())
        );
        assert_eq!(stripped_name("Movie (1).MKV"), Some("Movie.MKV".to_string()));
    }

    #[test]
    fn test_stripped_name_no_counter() {
        assert_eq!(stripped_name("Movie (2020).mkv"), None);
        assert_eq!(stripped_name("Movie.mkv"), None);
        assert_eq!(stripped_name("Movie (1).nfo"), None);
        assert_eq!(stripped_name("Movie(1).mkv"), None);
    }

    #[test]
    fn test_failed_rename_is_recorded() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let gone = temp_dir.path().join("Gone (1).mkv");
        let target = temp_dir.path().join("Gone.mkv");

        let mut report = RenameReport::default();
        rename_and_record(gone.clone(), target.clone(), &mut report);

        assert!(report.renamed.is_empty());
        assert!(report.skipped.is_empty());
        assert_eq!(report.failed, vec![gone]);
        assert!(!target.exists());
    }

    // Filesystem tests for both passes live in tests/renamer_tests.rs
}
