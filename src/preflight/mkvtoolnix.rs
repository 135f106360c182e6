//! MKVToolNix preflight checks.

use super::ToolCheck;
use crate::services::{mkvmerge, mkvpropedit};
use crate::Result;

pub fn check_mkvmerge() -> ToolCheck {
    check("mkvmerge", mkvmerge::is_installed, mkvmerge::get_version)
}

pub fn check_mkvpropedit() -> ToolCheck {
    check("mkvpropedit", mkvpropedit::is_installed, mkvpropedit::get_version)
}

fn check(
    tool: &'static str,
    is_installed: fn() -> bool,
    get_version: fn() -> Result<String>,
) -> ToolCheck {
    if !is_installed() {
        return ToolCheck::missing(tool);
    }
    ToolCheck::found(tool, get_version().ok())
}
