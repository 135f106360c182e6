//! Wrappers around the MKVToolNix command line tools.

pub mod mkvmerge;
pub mod mkvpropedit;

use crate::Result;
use std::process::Command;

/// Check whether `<tool> --version` can be executed.
fn tool_runs(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// First line of `<tool> --version`.
fn tool_version(tool: &str) -> Result<String> {
    let output = Command::new(tool).arg("--version").output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("unknown");

    Ok(first_line.to_string())
}
