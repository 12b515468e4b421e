//! Persistence of a session into a writable directory capability.
//!
//! The capability models a consent-granted directory: subdirectories and
//! files can be created or overwritten by name, and nothing can be read
//! back. Saving is a sequential loop with no transactional guarantee — a
//! failure partway leaves already-written files in place, and a retried
//! save converges because every name is derived deterministically from the
//! session.

mod fs;
pub mod mock;

pub use fs::FsDir;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{FieldError, Result};
use crate::export;
use crate::identity;
use crate::session::{SaveLogEntry, Session};

/// A consent-granted directory that can create subdirectories and files.
///
/// No read-back or existence-check API is assumed beyond create-if-absent.
pub trait WritableDir {
    /// Get or create a subdirectory by name.
    fn subdir(&self, name: &str) -> Result<Box<dyn WritableDir>>;

    /// Create or overwrite a file with the given bytes.
    fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Outcome of a fully successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SaveSummary {
    /// Per-location folder the files were written into.
    pub folder: String,
    /// Number of photo files written.
    pub photos_written: usize,
    /// Every file written, in write order.
    pub files: Vec<String>,
}

/// Derive the per-location folder name from the creation stamp, the
/// location ID, and the sanitized note. Identical inputs reuse the same
/// folder on a re-save.
#[must_use]
pub fn folder_name(created: &str, location_id: &str, note: &str) -> String {
    format!("{created}_{location_id}_{}", identity::sanitize(note))
}

fn save_error(name: &str, cause: &FieldError) -> FieldError {
    FieldError::Save {
        name: name.to_string(),
        reason: cause.to_string(),
    }
}

/// Write the session's photos and its CSV/JSON manifests under `root`.
///
/// Order: the location subfolder is created, then each photo payload is
/// written one at a time in capture order (appending a log entry per
/// successful write), then the CSV, then the JSON. On full success the
/// dirty flag is cleared. On any failure the error propagates with no
/// rollback and no retry.
pub fn save_location(session: &mut Session, root: &dyn WritableDir) -> Result<SaveSummary> {
    let Some(location) = session.location().cloned() else {
        return Err(FieldError::NoLocation);
    };

    let folder = folder_name(&location.created, &location.location_id, &location.note);
    let dir = root
        .subdir(&folder)
        .map_err(|e| save_error(&folder, &e))?;
    debug!(%folder, "Location folder ready");

    let mut files = Vec::new();
    let photos_written = session.photos().len();
    for i in 0..photos_written {
        let (filename, sample_id) = {
            let photo = &session.photos()[i];
            (photo.filename.clone(), photo.sample_id.clone())
        };
        dir.write_file(&filename, &session.photos()[i].payload)
            .map_err(|e| save_error(&filename, &e))?;
        session.push_log(SaveLogEntry {
            project: session.project().to_string(),
            sample_id,
            filename: filename.clone(),
        });
        files.push(filename);
    }

    let csv_name = format!("{}.csv", location.location_id);
    let csv = export::to_csv(session)?;
    dir.write_file(&csv_name, csv.as_bytes())
        .map_err(|e| save_error(&csv_name, &e))?;
    files.push(csv_name);

    let json_name = format!("{}.json", location.location_id);
    let json = export::to_json(session)?;
    dir.write_file(&json_name, json.as_bytes())
        .map_err(|e| save_error(&json_name, &e))?;
    files.push(json_name);

    session.mark_saved();
    info!(%folder, photos = photos_written, "Location saved");

    Ok(SaveSummary {
        folder,
        photos_written,
        files,
    })
}
