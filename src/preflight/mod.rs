//! Preflight checks for the MKVToolNix command line tools.

mod mkvtoolnix;

use colored::Colorize;

const INSTALL_HINT: &str =
    "Install MKVToolNix and add it to PATH: https://mkvtoolnix.download/downloads.html";

/// Whether a tool could be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// `--version` ran; the first output line if it could be read.
    Found { version: Option<String> },
    Missing,
}

/// Result of checking one external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    pub tool: &'static str,
    pub status: ToolStatus,
}

impl ToolCheck {
    pub fn found(tool: &'static str, version: Option<String>) -> Self {
        Self {
            tool,
            status: ToolStatus::Found { version },
        }
    }

    pub fn missing(tool: &'static str) -> Self {
        Self {
            tool,
            status: ToolStatus::Missing,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self.status, ToolStatus::Found { .. })
    }

    fn describe(&self) -> String {
        match &self.status {
            ToolStatus::Found { version: Some(v) } => format!("installed ({})", v),
            ToolStatus::Found { version: None } => "installed".to_string(),
            ToolStatus::Missing => "not found".to_string(),
        }
    }
}

/// Check every tool the run needs.
pub fn run_preflight_checks() -> Vec<ToolCheck> {
    vec![mkvtoolnix::check_mkvmerge(), mkvtoolnix::check_mkvpropedit()]
}

/// Print one line per tool, and the install hint if any is missing.
pub fn print_results(checks: &[ToolCheck]) {
    for check in checks {
        let marker = if check.passed() {
            "[OK]".green()
        } else {
            "[FAIL]".red()
        };
        println!("{} {}: {}", marker, check.tool.bold(), check.describe());
    }

    if !all_passed(checks) {
        println!("  {} {}", "->".yellow(), INSTALL_HINT);
    }
}

pub fn all_passed(checks: &[ToolCheck]) -> bool {
    checks.iter().all(ToolCheck::passed)
}

/// Names of the tools that could not be executed.
pub fn missing_tools(checks: &[ToolCheck]) -> Vec<&'static str> {
    checks
        .iter()
        .filter(|c| !c.passed())
        .map(|c| c.tool)
        .collect()
}
