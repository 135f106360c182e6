//! File system utilities.

use crate::Result;
use std::path::Path;

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Rename a file, refusing to replace an existing target.
///
/// Returns `Ok(false)` if the target already exists.
pub fn rename_no_clobber(from: &Path, to: &Path) -> Result<bool> {
    if to.exists() {
        return Ok(false);
    }
    std::fs::rename(from, to)?;
    Ok(true)
}

/// File name as a string (lossy).
pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// File stem as a string (lossy).
pub fn file_stem_string(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_names() {
        let path = PathBuf::from("/tv/Show (2020) - S01E01 - Pilot.mkv");
        assert_eq!(file_name_string(&path), "Show (2020) - S01E01 - Pilot.mkv");
        assert_eq!(file_stem_string(&path), "Show (2020) - S01E01 - Pilot");
    }

    #[test]
    fn test_ensure_directory_missing() {
        assert!(ensure_directory(Path::new("/nonexistent/dir")).is_err());
    }
}
