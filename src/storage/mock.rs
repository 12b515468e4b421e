//! Mock directory capability for unit testing.
//!
//! Records every operation for later assertion, stores written bytes in
//! memory, and supports failure injection by file name.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::error::{FieldError, Result};

use super::WritableDir;

/// Recorded operation for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Subdir { name: String },
    WriteFile { name: String, bytes: usize },
}

#[derive(Debug, Default)]
struct Shared {
    ops: Vec<Operation>,
    files: BTreeMap<String, Vec<u8>>,
    failing_names: Vec<String>,
    inject: Option<String>,
}

/// In-memory directory capability.
///
/// Subdirectories share the recording state with their root, so a test can
/// assert the full operation sequence from the root handle.
#[derive(Debug, Clone, Default)]
pub struct MockDir {
    prefix: String,
    shared: Arc<Mutex<Shared>>,
}

impl MockDir {
    /// Create an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Failure injection ===

    /// Fail any write to a file with this exact name.
    pub fn fail_on(&self, name: &str) {
        self.lock().failing_names.push(name.to_string());
    }

    /// Fail the next operation with the given reason.
    pub fn inject_error(&self, reason: &str) {
        self.lock().inject = Some(reason.to_string());
    }

    // === Assertions ===

    /// All recorded operations, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.lock().ops.clone()
    }

    /// Panics if any operation was recorded.
    pub fn assert_no_operations(&self) {
        let ops = self.operations();
        assert!(ops.is_empty(), "Expected no operations, found: {ops:#?}");
    }

    /// Bytes written to the named file, matched by full path or basename.
    #[must_use]
    pub fn file_bytes(&self, name: &str) -> Option<Vec<u8>> {
        let shared = self.lock();
        shared.files.get(name).cloned().or_else(|| {
            shared
                .files
                .iter()
                .find(|(path, _)| path.rsplit('/').next() == Some(name))
                .map(|(_, bytes)| bytes.clone())
        })
    }

    /// Paths of every written file, sorted.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.lock().files.keys().cloned().collect()
    }

    /// Number of files written so far.
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.lock().files.len()
    }

    // === Internal helpers ===

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().expect("mock state lock poisoned")
    }

    fn joined(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}/{name}", self.prefix)
        }
    }

    fn check_inject(&self) -> Result<()> {
        if let Some(reason) = self.lock().inject.take() {
            return Err(FieldError::Other(reason));
        }
        Ok(())
    }
}

impl WritableDir for MockDir {
    fn subdir(&self, name: &str) -> Result<Box<dyn WritableDir>> {
        self.check_inject()?;
        trace!(%name, "Mock subdir");
        self.lock().ops.push(Operation::Subdir {
            name: name.to_string(),
        });
        Ok(Box::new(Self {
            prefix: self.joined(name),
            shared: Arc::clone(&self.shared),
        }))
    }

    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.check_inject()?;
        if self.lock().failing_names.iter().any(|n| n == name) {
            return Err(FieldError::Other(format!(
                "mock write to '{name}' configured to fail"
            )));
        }

        trace!(%name, bytes = bytes.len(), "Mock write");
        let path = self.joined(name);
        let mut shared = self.lock();
        shared.ops.push(Operation::WriteFile {
            name: name.to_string(),
            bytes: bytes.len(),
        });
        shared.files.insert(path, bytes.to_vec());
        Ok(())
    }
}
