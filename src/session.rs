//! In-memory session state: the active location, its photos, and the
//! recent-write log.
//!
//! The session is the single piece of shared mutable state in the
//! application. It is owned by the controller and mutated from one logical
//! thread of control; nothing here persists across process restarts.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::error::{FieldError, Result};
use crate::geo::GpsFix;
use crate::identity::{self, LocationIdFactory};

/// Maximum number of entries retained in the recent-write log.
pub const LOG_CAPACITY: usize = 20;

/// A user-declared site visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable creation timestamp.
    pub created: String,
    /// Generated identifier, unique per creation event.
    #[serde(rename = "locationId")]
    pub location_id: String,
    /// Free-text note describing the site.
    pub note: String,
}

/// One captured image tied to a sample.
#[derive(Debug, Clone)]
pub struct Photo {
    /// Sample this photo belongs to (`S001`, ...).
    pub sample_id: String,
    /// Deterministic filename within the location folder.
    pub filename: String,
    /// JPEG payload, held in memory until save.
    pub payload: Vec<u8>,
}

/// Entry in the recent-write log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveLogEntry {
    pub project: String,
    pub sample_id: String,
    pub filename: String,
}

/// Counts shown after each capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// Number of distinct samples with at least one photo.
    pub samples: usize,
    /// Total photo count.
    pub photos: usize,
}

/// Aggregated session state.
#[derive(Debug, Default)]
pub struct Session {
    project: String,
    location: Option<Location>,
    photos: Vec<Photo>,
    sample_counter: u32,
    gps: Option<GpsFix>,
    dirty: bool,
    ids: LocationIdFactory,
    log: VecDeque<SaveLogEntry>,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new location, replacing any prior one.
    ///
    /// Clears the photo list, resets the sample counter to 1, and clears
    /// the dirty flag. Prior state is untouched when validation fails.
    pub fn create_location(
        &mut self,
        project: &str,
        note: &str,
        now: &DateTime<Local>,
    ) -> Result<&Location> {
        let note = note.trim();
        if note.is_empty() {
            return Err(FieldError::Validation { field: "note" });
        }
        let project = project.trim();
        if project.is_empty() {
            return Err(FieldError::Validation { field: "project" });
        }

        self.project = project.to_string();
        let location = Location {
            created: identity::created_stamp(now),
            location_id: self.ids.next(now),
            note: note.to_string(),
        };
        info!(location_id = %location.location_id, note = %location.note, "New location");

        self.photos.clear();
        self.sample_counter = 1;
        self.dirty = false;
        Ok(self.location.insert(location))
    }

    /// Append a captured photo to the current sample.
    pub fn add_photo(&mut self, payload: Vec<u8>) -> Result<&Photo> {
        let Some(location) = &self.location else {
            return Err(FieldError::NoLocation);
        };

        let sample_id = identity::sample_id(self.sample_counter);
        let existing = self
            .photos
            .iter()
            .filter(|p| p.sample_id == sample_id)
            .count();
        let filename = identity::photo_filename(&location.location_id, &sample_id, existing);
        debug!(%sample_id, %filename, bytes = payload.len(), "Photo captured");

        self.photos.push(Photo {
            sample_id,
            filename,
            payload,
        });
        self.dirty = true;
        Ok(self.photos.last().expect("photo just appended"))
    }

    /// Advance to the next sample. Existing photos are untouched.
    pub fn advance_sample(&mut self) -> u32 {
        self.sample_counter += 1;
        trace!(counter = self.sample_counter, "Sample advanced");
        self.sample_counter
    }

    /// Drop all captured photos. Location and sample counter are untouched.
    pub fn clear_photos(&mut self) {
        info!(dropped = self.photos.len(), "Photos cleared");
        self.photos.clear();
        self.dirty = true;
    }

    /// Record the latest GPS reading.
    pub fn set_gps(&mut self, fix: GpsFix) {
        self.gps = Some(fix);
    }

    /// Record one successful write at the front of the log, evicting past
    /// [`LOG_CAPACITY`].
    pub fn push_log(&mut self, entry: SaveLogEntry) {
        self.log.push_front(entry);
        self.log.truncate(LOG_CAPACITY);
    }

    /// Record a completed save: one log entry per written photo, in write
    /// order, then clear the dirty flag.
    pub fn record_saved(&mut self, entries: Vec<SaveLogEntry>) {
        for entry in entries {
            self.push_log(entry);
        }
        self.mark_saved();
    }

    /// Clear the dirty flag after a fully successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // === Accessors ===

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    #[must_use]
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    #[must_use]
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    #[must_use]
    pub fn sample_counter(&self) -> u32 {
        self.sample_counter
    }

    #[must_use]
    pub fn gps(&self) -> Option<&GpsFix> {
        self.gps.as_ref()
    }

    /// True iff unsaved photos or edits exist since the last successful save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn log(&self) -> &VecDeque<SaveLogEntry> {
        &self.log
    }

    /// Distinct-sample and photo counts.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let mut seen: Vec<&str> = Vec::new();
        for photo in &self.photos {
            if !seen.contains(&photo.sample_id.as_str()) {
                seen.push(&photo.sample_id);
            }
        }
        SessionSummary {
            samples: seen.len(),
            photos: self.photos.len(),
        }
    }
}
