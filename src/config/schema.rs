//! Configuration file models.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{FieldError, Result};
use crate::geo::GpsFix;

/// Tool configuration, loaded from TOML or YAML.
///
/// Every field is optional or defaulted; a missing config file is
/// equivalent to the defaults. Command-line flags override whatever is
/// loaded here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FieldConfig {
    /// Default project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Default save folder (supports `~` expansion).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// JPEG re-encode quality (1-100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Static GPS settings.
    #[serde(default)]
    pub gps: GpsConfig,
}

/// GPS settings: a fixed reading plus the acquisition bound.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GpsConfig {
    #[serde(default)]
    pub lat: Option<f64>,

    #[serde(default)]
    pub lon: Option<f64>,

    /// Accuracy in meters.
    #[serde(default)]
    pub acc: Option<f64>,

    /// Bound on a live acquisition, in seconds.
    #[serde(default = "default_gps_timeout")]
    pub timeout_secs: u64,
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_gps_timeout() -> u64 {
    7
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            project: None,
            output_dir: None,
            jpeg_quality: default_jpeg_quality(),
            gps: GpsConfig::default(),
        }
    }
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            lat: None,
            lon: None,
            acc: None,
            timeout_secs: default_gps_timeout(),
        }
    }
}

impl FieldConfig {
    /// Validate loaded values.
    pub fn validate(&self) -> Result<()> {
        trace!("Validating config");
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(FieldError::ConfigInvalid(format!(
                "jpeg_quality must be 1-100, got {}",
                self.jpeg_quality
            )));
        }
        if let Some(lat) = self.gps.lat {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(FieldError::ConfigInvalid(format!(
                    "gps.lat out of range: {lat}"
                )));
            }
        }
        if let Some(lon) = self.gps.lon {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(FieldError::ConfigInvalid(format!(
                    "gps.lon out of range: {lon}"
                )));
            }
        }
        Ok(())
    }
}

impl GpsConfig {
    /// The configured reading as a fix; empty when nothing is set.
    #[must_use]
    pub const fn fix(&self) -> GpsFix {
        GpsFix {
            lat: self.lat,
            lon: self.lon,
            acc: self.acc,
        }
    }
}
