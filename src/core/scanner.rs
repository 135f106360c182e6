//! Directory scanner module.
//!
//! Walks the scan root (and, unless single-folder mode is active, its
//! subdirectories) for Matroska files, skipping ignore-listed directories
//! and unwanted files such as trailers and samples.

use crate::Result;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Container extension handled by the tool.
pub const CONTAINER_EXTENSION: &str = "mkv";

/// Sidecar extension holding title metadata.
pub const SIDECAR_EXTENSION: &str = "nfo";

/// Which directories to visit.
#[derive(Debug, Clone, Copy)]
pub struct ScanScope<'a> {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Lower-cased directory names to skip, including their subtree.
    pub ignore_dirs: &'a BTreeSet<String>,
}

/// Result of scanning for container files.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Container files to process, in scan order.
    pub containers: Vec<PathBuf>,
    /// Container files matching the unwanted pattern.
    pub unwanted: Vec<PathBuf>,
    /// Total files scanned.
    pub total_files_scanned: usize,
    /// Total directories scanned.
    pub total_dirs_scanned: usize,
}

/// Check if a path has the given extension (case-insensitive).
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Check if a file is a container file.
pub fn is_container(path: &Path) -> bool {
    has_extension(path, CONTAINER_EXTENSION)
}

/// Check if a file name matches the unwanted pattern.
pub fn is_unwanted(path: &Path, pattern: &Regex) -> bool {
    path.file_name()
        .map(|n| pattern.is_match(&n.to_string_lossy()))
        .unwrap_or(false)
}

fn is_ignored_dir(entry: &DirEntry, ignore_dirs: &BTreeSet<String>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && ignore_dirs.contains(&entry.file_name().to_string_lossy().to_lowercase())
}

/// List the directories to process: the root first, then its subdirectories
/// in sorted depth-first order.
pub fn scan_directories(root: &Path, scope: ScanScope<'_>) -> Result<Vec<PathBuf>> {
    crate::utils::fs::ensure_directory(root)?;

    let max_depth = if scope.recursive { usize::MAX } else { 0 };
    let mut dirs = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e, scope.ignore_dirs))
    {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => tracing::warn!("Failed to read directory entry: {}", e),
        }
    }

    Ok(dirs)
}

/// List the regular files directly inside a directory, sorted by name.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Scan for container files to probe.
pub fn scan_containers(root: &Path, scope: ScanScope<'_>, unwanted: &Regex) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for dir in scan_directories(root, scope)? {
        result.total_dirs_scanned += 1;

        let files = match list_files(&dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!("Failed to list {}: {}", dir.display(), e);
                continue;
            }
        };

        for file in files {
            result.total_files_scanned += 1;

            if !is_container(&file) {
                continue;
            }
            if is_unwanted(&file, unwanted) {
                tracing::debug!("Unwanted file skipped: {}", file.display());
                result.unwanted.push(file);
                continue;
            }
            result.containers.push(file);
        }
    }

    tracing::info!(
        "Scanned {} files in {} directories: {} containers, {} unwanted",
        result.total_files_scanned,
        result.total_dirs_scanned,
        result.containers.len(),
        result.unwanted.len()
    );

    Ok(result)
}
