//! Error types for field-collection operations.

use thiserror::Error;

/// Primary error type for field-collection operations.
#[derive(Error, Debug)]
pub enum FieldError {
    // Session errors
    #[error("Missing required input: {field}")]
    Validation { field: &'static str },

    #[error("No active location")]
    NoLocation,

    #[error("No save folder selected")]
    NoTarget,

    #[error("A save is already in progress")]
    SaveInProgress,

    // Capture errors
    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Frame source not found: {path}")]
    FrameNotFound { path: String },

    // Save errors
    #[error("Save failed at '{name}': {reason}")]
    Save { name: String, reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl FieldError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::NoLocation
                | Self::NoTarget
                | Self::SaveInProgress
                | Self::FrameNotFound { .. }
                | Self::ConfigNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Validation { .. } => Some("Provide both a project name and a location note"),
            Self::NoLocation => Some("Create a location first"),
            Self::NoTarget => Some("Pass --out or set output_dir in the config"),
            Self::SaveInProgress => Some("Wait for the current save to finish"),
            Self::ConfigNotFound { .. } => Some("Run: fnotes init"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using FieldError.
pub type Result<T> = std::result::Result<T, FieldError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| FieldError::Other(format!("{}: {e}", f().into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_recoverable() {
        assert!(FieldError::NoLocation.is_user_recoverable());
        assert!(FieldError::Validation { field: "note" }.is_user_recoverable());
        assert!(!FieldError::Save {
            name: "x.jpg".to_string(),
            reason: "disk full".to_string()
        }
        .is_user_recoverable());
    }

    #[test]
    fn test_suggestions() {
        assert!(FieldError::NoTarget.suggestion().is_some());
        assert!(FieldError::Other("misc".to_string()).suggestion().is_none());
    }

    #[test]
    fn test_with_context() {
        let base: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "gone",
        ));
        let err = base.with_context(|| "opening frame").unwrap_err();
        assert!(err.to_string().contains("opening frame"));
        assert!(err.to_string().contains("gone"));
    }
}
