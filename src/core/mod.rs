//! Core processing modules.

pub mod categorizer;
pub mod editor;
pub mod prompt;
pub mod renamer;
pub mod scanner;
pub mod title;
