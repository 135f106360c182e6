//! Run summary model.

use std::path::PathBuf;

/// Counters accumulated over one run and printed at the end.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files renamed by either rename pass.
    pub renamed: usize,
    /// Files whose counter could not be stripped because the target exists.
    pub rename_skipped: Vec<PathBuf>,
    /// Files or directories a rename pass could not handle.
    pub rename_failed: Vec<PathBuf>,
    /// Files that could not be probed.
    pub probe_failed: Vec<PathBuf>,
    /// Groups the operator skipped.
    pub groups_skipped: usize,
    /// Files successfully edited.
    pub edited: usize,
    /// Files where the edit tool failed.
    pub edit_failed: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the result of a rename pass into the summary.
    pub fn record_renames(&mut self, report: &RenameReport) {
        self.renamed += report.renamed.len();
        self.rename_skipped.extend(report.skipped.iter().cloned());
        self.rename_failed.extend(report.failed.iter().cloned());
    }
}

/// Outcome of a single rename pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    /// (from, to) pairs that were renamed.
    pub renamed: Vec<(PathBuf, PathBuf)>,
    /// Files left untouched because the target name already exists.
    pub skipped: Vec<PathBuf>,
    /// Files that failed to rename and directories that could not be read.
    pub failed: Vec<PathBuf>,
}
