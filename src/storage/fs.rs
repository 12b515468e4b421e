//! Filesystem-backed directory capability.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::Result;

use super::WritableDir;

/// A writable directory rooted at a filesystem path.
///
/// The root is created on construction; subdirectories and files are
/// created (or overwritten) on demand.
#[derive(Debug, Clone)]
pub struct FsDir {
    path: PathBuf,
}

impl FsDir {
    /// Open the capability, creating the directory if absent.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        debug!(path = %path.display(), "Directory capability granted");
        Ok(Self { path })
    }

    /// The underlying filesystem path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WritableDir for FsDir {
    fn subdir(&self, name: &str) -> Result<Box<dyn WritableDir>> {
        let sub = Self::new(self.path.join(name))?;
        Ok(Box::new(sub))
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let target = self.path.join(name);
        fs::write(&target, bytes)?;
        trace!(path = %target.display(), bytes = bytes.len(), "File written");
        Ok(())
    }
}
