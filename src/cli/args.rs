//! Command line argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// mkvprops - Batch edit Matroska track properties
#[derive(Parser, Debug)]
#[command(name = "mkvprops")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to process
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub directory: PathBuf,

    /// Only process the given directory, not its subdirectories
    #[arg(short, long)]
    pub single_folder: bool,

    /// Do not append the subtitle format to subtitle names
    #[arg(long)]
    pub no_subformat: bool,

    /// Do not rename files before editing
    #[arg(long)]
    pub no_renaming: bool,

    /// Do not infer forced/SDH/commentary flags
    #[arg(long)]
    pub no_auto_flags: bool,

    /// Path to a config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the mkvpropedit commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip preflight checks
    #[arg(long)]
    pub skip_preflight: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Command line negations of config toggles.
    pub fn overrides(&self) -> crate::models::config::ToggleOverrides {
        crate::models::config::ToggleOverrides {
            no_renaming: self.no_renaming,
            no_auto_flags: self.no_auto_flags,
            no_subformat: self.no_subformat,
        }
    }
}
