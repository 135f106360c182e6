//! Integration tests for the scanner module.
//!
//! Tests cover:
//! - Recursive and single-folder scanning
//! - Ignored directories
//! - Unwanted file filtering
//! - Error handling for non-existent paths

use mkvprops::core::scanner::{scan_containers, scan_directories, ScanScope};
use mkvprops::models::config::DEFAULT_PATTERN_UNWANTED;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn ignore(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_lowercase()).collect()
}

fn unwanted() -> Regex {
    Regex::new(DEFAULT_PATTERN_UNWANTED).unwrap()
}

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::write(root.join("b.mkv"), "fake").unwrap();
    fs::write(root.join("a.mkv"), "fake").unwrap();
    fs::write(root.join("a.nfo"), "<movie/>").unwrap();
    fs::write(root.join("notes.txt"), "").unwrap();

    fs::create_dir_all(root.join("Season 01")).unwrap();
    fs::write(root.join("Season 01").join("e01.mkv"), "fake").unwrap();
    fs::write(root.join("Season 01").join("e01-sample.mkv"), "fake").unwrap();

    fs::create_dir_all(root.join("Extras").join("Deep")).unwrap();
    fs::write(root.join("Extras").join("x.mkv"), "fake").unwrap();
    fs::write(root.join("Extras").join("Deep").join("y.mkv"), "fake").unwrap();

    temp_dir
}

#[test]
fn test_scan_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let ignore_dirs = ignore(&[]);
    let scope = ScanScope {
        recursive: true,
        ignore_dirs: &ignore_dirs,
    };

    let result = scan_containers(temp_dir.path(), scope, &unwanted()).unwrap();
    assert!(result.containers.is_empty());
    assert_eq!(result.total_dirs_scanned, 1);
}

#[test]
fn test_scan_recursive_in_order() {
    let temp_dir = fixture();
    let root = temp_dir.path();
    let ignore_dirs = ignore(&[]);
    let scope = ScanScope {
        recursive: true,
        ignore_dirs: &ignore_dirs,
    };

    let result = scan_containers(root, scope, &unwanted()).unwrap();

    let expected: Vec<PathBuf> = vec![
        root.join("a.mkv"),
        root.join("b.mkv"),
        root.join("Extras").join("x.mkv"),
        root.join("Extras").join("Deep").join("y.mkv"),
        root.join("Season 01").join("e01.mkv"),
    ];
    assert_eq!(result.containers, expected);
    assert_eq!(result.unwanted, vec![root.join("Season 01").join("e01-sample.mkv")]);
}

#[test]
fn test_scan_single_folder() {
    let temp_dir = fixture();
    let root = temp_dir.path();
    let ignore_dirs = ignore(&[]);
    let scope = ScanScope {
        recursive: false,
        ignore_dirs: &ignore_dirs,
    };

    let result = scan_containers(root, scope, &unwanted()).unwrap();
    assert_eq!(result.containers, vec![root.join("a.mkv"), root.join("b.mkv")]);
    assert_eq!(result.total_dirs_scanned, 1);
}

#[test]
fn test_ignored_directory_skips_subtree() {
    let temp_dir = fixture();
    let root = temp_dir.path();
    let ignore_dirs = ignore(&["extras"]);
    let scope = ScanScope {
        recursive: true,
        ignore_dirs: &ignore_dirs,
    };

    let dirs = scan_directories(root, scope).unwrap();
    assert_eq!(dirs, vec![root.to_path_buf(), root.join("Season 01")]);

    let result = scan_containers(root, scope, &unwanted()).unwrap();
    assert!(result
        .containers
        .iter()
        .all(|p| !p.starts_with(root.join("Extras"))));
}

#[test]
fn test_scan_nonexistent_path() {
    let ignore_dirs = ignore(&[]);
    let scope = ScanScope {
        recursive: true,
        ignore_dirs: &ignore_dirs,
    };

    let result = scan_containers(
        std::path::Path::new("/nonexistent/path/12345"),
        scope,
        &unwanted(),
    );
    assert!(matches!(result, Err(mkvprops::Error::PathNotFound(_))));
}

#[test]
fn test_scan_file_as_root() {
    let temp_dir = fixture();
    let ignore_dirs = ignore(&[]);
    let scope = ScanScope {
        recursive: true,
        ignore_dirs: &ignore_dirs,
    };

    let result = scan_directories(&temp_dir.path().join("a.mkv"), scope);
    assert!(matches!(result, Err(mkvprops::Error::NotADirectory(_))));
}
