//! Error types for mkvprops.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mkvprops.
#[derive(Error, Debug)]
pub enum Error {
    // Preflight errors
    #[error("{0} not found. Install MKVToolNix: https://mkvtoolnix.download/downloads.html")]
    ToolNotFound(String),

    // File system errors
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    // Probe errors
    #[error("Failed to read track information for {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    // Sidecar errors
    #[error("Failed to parse {path}: {reason}")]
    SidecarParse { path: PathBuf, reason: String },

    // Operator input errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Input closed while waiting for codes")]
    InputClosed,

    // Edit errors
    #[error("mkvpropedit failed on {path}: {reason}")]
    Edit { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // TOML errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // Regex errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Reasons an operator code line is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Video code count ({given}) does not match video track count ({expected}), try again.")]
    VideoCount { expected: usize, given: usize },

    #[error("Audio code count ({given}) does not match audio track count ({expected}), try again.")]
    AudioCount { expected: usize, given: usize },

    #[error("Subtitle code count ({given}) does not match subtitle track count ({expected}), try again.")]
    SubtitleCount { expected: usize, given: usize },

    #[error("Invalid code(s) or syntax, try again.")]
    Syntax,

    #[error("Invalid language code(s) {}, try again.", .0.join(", "))]
    UnknownCodes(Vec<String>),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a probe error for a file.
    pub fn probe<S: Into<String>>(path: &std::path::Path, reason: S) -> Self {
        Error::Probe {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create an edit error for a file.
    pub fn edit<S: Into<String>>(path: &std::path::Path, reason: S) -> Self {
        Error::Edit {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}
