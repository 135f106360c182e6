//! Data models.

pub mod config;
pub mod directive;
pub mod media;
pub mod summary;
