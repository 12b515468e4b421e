//! Configuration file handling.
//!
//! The config file lives under the platform config directory and may be
//! TOML or YAML, detected by extension. Absence of the default file is not
//! an error; it means defaults.

mod path;
mod schema;

pub use path::{expand, home_dir};
pub use schema::{FieldConfig, GpsConfig};

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{FieldError, Result, ResultExt};

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension. `None` if unrecognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Directory holding the tool's configuration.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("fnotes"))
        .ok_or_else(|| FieldError::ConfigInvalid("Could not determine config directory".to_string()))
}

/// Default configuration file path.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load and validate a configuration file.
pub fn load(path: &Path) -> Result<FieldConfig> {
    if !path.is_file() {
        return Err(FieldError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }
    let text = std::fs::read_to_string(path)?;

    let format = ConfigFormat::from_extension(path).ok_or_else(|| {
        FieldError::ConfigParse(format!(
            "Unrecognized config extension: {}",
            path.display()
        ))
    })?;

    let config: FieldConfig = match format {
        ConfigFormat::Toml => toml::from_str(&text)
            .map_err(|e| FieldError::ConfigParse(format!("{}: {e}", path.display())))?,
        ConfigFormat::Yaml => serde_yaml::from_str(&text)
            .map_err(|e| FieldError::ConfigParse(format!("{}: {e}", path.display())))?,
    };

    config.validate()?;
    debug!(path = %path.display(), "Config loaded");
    Ok(config)
}

/// Load the config from an explicit path, or from the default location.
///
/// A missing default file yields the defaults; a missing explicit path is
/// an error.
pub fn load_or_default(explicit: Option<&Path>) -> Result<FieldConfig> {
    match explicit {
        Some(path) => load(path),
        None => {
            let path = default_config_path()?;
            if path.is_file() {
                load(&path)
            } else {
                Ok(FieldConfig::default())
            }
        }
    }
}

/// Write a starter config file at the default location.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_starter(force: bool) -> Result<PathBuf> {
    let path = default_config_path()?;
    if path.exists() && !force {
        return Err(FieldError::ConfigInvalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let starter = toml::to_string_pretty(&FieldConfig::default())
        .with_context(|| "Starter config serialization failed")?;
    std::fs::write(&path, starter)?;
    info!(path = %path.display(), "Starter config written");
    Ok(path)
}
