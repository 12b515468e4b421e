//! Orchestration of user-triggered actions over the session.
//!
//! The controller owns the session plus the capture, location, and storage
//! collaborators, and sequences the action flow: new-location, capture,
//! advance-sample, clear, refresh-gps, save. Everything runs on one logical
//! thread of control; the only guard is the explicit save-in-progress flag.

use chrono::Local;
use serde::Serialize;
use tracing::{debug, warn};

use crate::capture::BoxedCapture;
use crate::error::{FieldError, Result};
use crate::geo::{GpsFix, LocationService};
use crate::session::{Location, SaveLogEntry, Session};
use crate::storage::{self, SaveSummary, WritableDir};

/// What a single capture produced.
#[derive(Debug, Clone, Serialize)]
pub struct SnapReport {
    pub sample_id: String,
    pub filename: String,
}

/// Drives one field-collection session.
pub struct SessionController {
    session: Session,
    capture: BoxedCapture,
    locator: Box<dyn LocationService>,
    target: Option<Box<dyn WritableDir>>,
    save_in_flight: bool,
}

impl SessionController {
    /// Create a controller with no storage target granted yet.
    #[must_use]
    pub fn new(capture: BoxedCapture, locator: Box<dyn LocationService>) -> Self {
        Self {
            session: Session::new(),
            capture,
            locator,
            target: None,
            save_in_flight: false,
        }
    }

    /// Grant the directory capability used by save.
    pub fn set_target(&mut self, target: Box<dyn WritableDir>) {
        self.target = Some(target);
    }

    /// Replace the location service.
    pub fn set_locator(&mut self, locator: Box<dyn LocationService>) {
        self.locator = locator;
    }

    /// Read access to the session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Declare a new location, replacing any prior one.
    pub fn new_location(&mut self, project: &str, note: &str) -> Result<Location> {
        let now = Local::now();
        self.session
            .create_location(project, note, &now)
            .map(Clone::clone)
    }

    /// Capture one frame and append it to the current sample.
    pub fn snap(&mut self) -> Result<SnapReport> {
        if self.session.location().is_none() {
            return Err(FieldError::NoLocation);
        }
        let payload = self.capture.capture()?;
        let photo = self.session.add_photo(payload)?;
        Ok(SnapReport {
            sample_id: photo.sample_id.clone(),
            filename: photo.filename.clone(),
        })
    }

    /// Advance to the next sample; returns the new counter value.
    pub fn advance_sample(&mut self) -> u32 {
        self.session.advance_sample()
    }

    /// Drop all captured photos.
    pub fn clear_photos(&mut self) {
        self.session.clear_photos();
    }

    /// Acquire a fresh GPS fix and attach it to the session.
    pub fn refresh_gps(&mut self) -> GpsFix {
        let fix = self.locator.acquire();
        if fix.is_empty() {
            warn!("GPS acquisition yielded no data");
        }
        self.session.set_gps(fix);
        fix
    }

    /// Persist the session into the granted target directory.
    ///
    /// Rejected with `SaveInProgress` while a prior save is still in
    /// flight, and with `NoTarget` when no capability has been granted.
    pub fn save(&mut self) -> Result<SaveSummary> {
        if self.save_in_flight {
            return Err(FieldError::SaveInProgress);
        }
        let Some(target) = self.target.as_deref() else {
            return Err(FieldError::NoTarget);
        };

        self.save_in_flight = true;
        debug!("Save started");
        let result = storage::save_location(&mut self.session, target);
        self.save_in_flight = false;
        result
    }

    /// The recent-write log, newest first.
    #[must_use]
    pub fn recent_log(&self) -> Vec<SaveLogEntry> {
        self.session.log().iter().cloned().collect()
    }

    #[cfg(test)]
    fn force_save_in_flight(&mut self) {
        self.save_in_flight = true;
    }
}
