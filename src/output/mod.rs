//! Output mode abstraction for robot and human output.
//!
//! Robot mode prints one JSON document per command to stdout; human mode
//! delegates to a rendering closure so each command controls its own text
//! layout.

use console::style;
use serde::Serialize;

use crate::error::FieldError;

/// How command results are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Human-readable text with optional color.
    Text,
    /// Pretty JSON for scripts and agents.
    Json,
    /// Compact JSON (single line).
    JsonCompact,
}

impl Mode {
    /// True for either JSON variant.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonCompact)
    }
}

/// Emit a command result: JSON in robot mode, the closure's text otherwise.
pub fn emit<T: Serialize>(mode: Mode, value: &T, human: impl FnOnce()) {
    match mode {
        Mode::Json => println!("{}", serde_json::to_string_pretty(value).unwrap()),
        Mode::JsonCompact => println!("{}", serde_json::to_string(value).unwrap()),
        Mode::Text => human(),
    }
}

/// Error payload for robot mode.
#[derive(Debug, Serialize)]
struct ErrorPayload<'a> {
    ok: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a str>,
}

/// Surface an error as a single transient notification.
pub fn emit_error(mode: Mode, error: &FieldError) {
    let suggestion = error.suggestion();
    if mode.is_json() {
        let payload = ErrorPayload {
            ok: false,
            error: error.to_string(),
            suggestion,
        };
        eprintln!("{}", serde_json::to_string(&payload).unwrap());
    } else {
        eprintln!("{} {error}", style("error:").red().bold());
        if let Some(hint) = suggestion {
            eprintln!("  {}", style(hint).dim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_is_json() {
        assert!(Mode::Json.is_json());
        assert!(Mode::JsonCompact.is_json());
        assert!(!Mode::Text.is_json());
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = ErrorPayload {
            ok: false,
            error: "No save folder selected".to_string(),
            suggestion: Some("Pass --out"),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"ok\":false"));
        assert!(json.contains("suggestion"));
    }
}
