//! Path resolution helpers for configured directories.
//!
//! Supports absolute paths, `~` home-directory expansion, and paths
//! relative to the current working directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FieldError, Result};

/// Resolve the user's home directory (cross-platform).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        FieldError::ConfigInvalid("Could not determine home directory".to_string())
    })
}

/// Expand a configured path.
///
/// `~` and `~/...` expand to the home directory; everything else is used
/// as-is (relative paths stay relative to the working directory).
pub fn expand(path: &Path) -> Result<PathBuf> {
    let text = path.to_string_lossy();
    if text == "~" || text.starts_with("~/") {
        let home = home_dir()?;
        let rest = text.strip_prefix("~/").unwrap_or("");
        let resolved = if rest.is_empty() { home } else { home.join(rest) };
        debug!(original = %path.display(), resolved = %resolved.display(), "Expanded home path");
        return Ok(resolved);
    }
    Ok(path.to_path_buf())
}
