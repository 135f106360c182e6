//! mkvprops library
//!
//! Batch editing of Matroska track metadata: files with identical track
//! layouts are grouped, the operator enters language codes once per group,
//! and mkvpropedit applies titles, languages, names and flags to every file.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
