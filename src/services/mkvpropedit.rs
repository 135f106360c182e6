//! mkvpropedit service for applying header edits.

use crate::Result;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// One mkvpropedit invocation: the file and the arguments after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCommand {
    pub path: PathBuf,
    pub args: Vec<String>,
}

impl EditCommand {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Start editing a section (`info`, `track:a1`, ...).
    pub fn edit(&mut self, selector: impl Into<String>) -> &mut Self {
        self.args.push("--edit".to_string());
        self.args.push(selector.into());
        self
    }

    /// Set a property in the current section.
    pub fn set(&mut self, property: &str, value: impl std::fmt::Display) -> &mut Self {
        self.args.push("--set".to_string());
        self.args.push(format!("{}={}", property, value));
        self
    }

    /// Set a boolean flag (`flag-default=1`).
    pub fn flag(&mut self, flag: &str, value: bool) -> &mut Self {
        self.set(flag, if value { 1 } else { 0 })
    }

    /// Value of the last `--set property=...` in the section `selector`.
    pub fn value_of(&self, selector: &str, property: &str) -> Option<&str> {
        let prefix = format!("{}=", property);
        let mut in_section = false;
        let mut found = None;

        for pair in self.args.chunks(2) {
            match pair {
                [opt, sel] if opt == "--edit" => in_section = sel == selector,
                [opt, assignment] if opt == "--set" && in_section => {
                    if let Some(value) = assignment.strip_prefix(&prefix) {
                        found = Some(value);
                    }
                }
                _ => {}
            }
        }

        found
    }

    /// Render as a shell-like line for logs and dry runs.
    pub fn display_line(&self) -> String {
        let mut parts = vec![
            "mkvpropedit".to_string(),
            quote(&self.path.display().to_string()),
        ];
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(arg: &str) -> String {
    if arg.contains(char::is_whitespace) || arg.is_empty() {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Applies edit commands to files.
pub trait EditExecutor {
    fn execute(&self, command: &EditCommand) -> Result<()>;
}

/// Runs the real `mkvpropedit` binary.
#[derive(Debug)]
pub struct MkvPropEdit {
    program: PathBuf,
}

impl Default for MkvPropEdit {
    fn default() -> Self {
        Self::new()
    }
}

impl MkvPropEdit {
    pub fn new() -> Self {
        Self::with_program("mkvpropedit")
    }

    /// Use another executable, e.g. a full path to mkvpropedit.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl EditExecutor for MkvPropEdit {
    fn execute(&self, command: &EditCommand) -> Result<()> {
        tracing::debug!("{}", command.display_line());

        let output = Command::new(&self.program)
            .arg(&command.path)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| crate::Error::edit(&command.path, e.to_string()))?;

        // mkvpropedit reports warnings and errors on stdout
        let stdout = String::from_utf8_lossy(&output.stdout);

        match output.status.code() {
            Some(0) => Ok(()),
            // 1: warnings were printed but the file was written
            Some(1) => {
                for line in stdout.lines().filter(|l| l.starts_with("Warning")) {
                    tracing::warn!("{}: {}", command.path.display(), line);
                }
                Ok(())
            }
            _ => {
                let reason = stdout
                    .lines()
                    .rev()
                    .find(|l| l.starts_with("Error"))
                    .unwrap_or_else(|| stdout.trim());
                Err(crate::Error::edit(
                    &command.path,
                    format!("{}: {}", output.status, reason),
                ))
            }
        }
    }
}

/// Prints commands instead of running them.
#[derive(Debug, Default)]
pub struct DryRun;

impl EditExecutor for DryRun {
    fn execute(&self, command: &EditCommand) -> Result<()> {
        println!("[DRY RUN] {}", command.display_line());
        Ok(())
    }
}

/// Check if mkvpropedit is installed.
pub fn is_installed() -> bool {
    super::tool_runs("mkvpropedit")
}

/// Get mkvpropedit version.
pub fn get_version() -> Result<String> {
    super::tool_version("mkvpropedit")
}
