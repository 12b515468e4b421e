//! CSV and JSON rendering of a session for export.
//!
//! Both renderings are deterministic: identical state produces identical
//! bytes, so a re-save after a partial failure converges to the same files.

use serde::Serialize;
use tracing::trace;

use crate::error::{FieldError, Result, ResultExt};
use crate::geo::GpsFix;
use crate::session::{Location, Session};

/// Quote a CSV field per RFC 4180 when it contains the delimiter, a quote,
/// or a line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render an optional coordinate; absent values become empty fields,
/// never the literal word "null".
fn coord(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Render the session as CSV.
///
/// Layout: key/value rows for project, locationId, note, gps_lat, gps_lon;
/// one blank row; a `sampleId,filename` header; one row per photo in
/// capture order. Rows are joined by `\n` with no trailing newline.
pub fn to_csv(session: &Session) -> Result<String> {
    let Some(location) = session.location() else {
        return Err(FieldError::NoLocation);
    };
    let gps = session.gps().copied().unwrap_or_default();

    let mut rows = vec![
        format!("project,{}", csv_field(session.project())),
        format!("locationId,{}", csv_field(&location.location_id)),
        format!("note,{}", csv_field(&location.note)),
        format!("gps_lat,{}", coord(gps.lat)),
        format!("gps_lon,{}", coord(gps.lon)),
        String::new(),
        "sampleId,filename".to_string(),
    ];
    for photo in session.photos() {
        rows.push(format!(
            "{},{}",
            csv_field(&photo.sample_id),
            csv_field(&photo.filename)
        ));
    }

    trace!(rows = rows.len(), "Rendered CSV");
    Ok(rows.join("\n"))
}

/// JSON manifest written next to the photos. Field order is fixed by the
/// struct declaration, so output is stable for identical state.
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    project: &'a str,
    gps: Option<&'a GpsFix>,
    location: &'a Location,
    photos: Vec<&'a str>,
}

/// Render the session as pretty-printed JSON.
pub fn to_json(session: &Session) -> Result<String> {
    let Some(location) = session.location() else {
        return Err(FieldError::NoLocation);
    };

    let manifest = Manifest {
        project: session.project(),
        gps: session.gps(),
        location,
        photos: session
            .photos()
            .iter()
            .map(|p| p.filename.as_str())
            .collect(),
    };

    serde_json::to_string_pretty(&manifest).with_context(|| "Manifest serialization failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn session_with_photos() -> Session {
        let now = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let mut session = Session::new();
        session.create_location("survey", "ridge top", &now).unwrap();
        session.add_photo(vec![1]).unwrap();
        session.advance_sample();
        session.add_photo(vec![2]).unwrap();
        session
    }

    #[test]
    fn test_csv_layout() {
        let mut session = session_with_photos();
        session.set_gps(GpsFix::new(35.65, 139.74, Some(5.0)));

        let csv = to_csv(&session).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();
        assert_eq!(lines[0], "project,survey");
        assert_eq!(lines[1], "locationId,L20250314092653");
        assert_eq!(lines[2], "note,ridge top");
        assert_eq!(lines[3], "gps_lat,35.65");
        assert_eq!(lines[4], "gps_lon,139.74");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "sampleId,filename");
        assert_eq!(lines[7], "S001,L20250314092653-S001-01.jpg");
        assert_eq!(lines[8], "S002,L20250314092653-S002-01.jpg");
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_csv_missing_gps_is_empty_not_null() {
        let session = session_with_photos();
        let csv = to_csv(&session).unwrap();
        assert!(csv.contains("gps_lat,\n"));
        assert!(csv.contains("gps_lon,\n"));
        assert!(!csv.contains("null"));
    }

    #[test]
    fn test_csv_empty_fix_renders_empty_fields() {
        let mut session = session_with_photos();
        session.set_gps(GpsFix::empty());
        let csv = to_csv(&session).unwrap();
        assert!(csv.contains("gps_lat,\n"));
        assert!(!csv.contains("null"));
    }

    #[test]
    fn test_csv_quotes_delimiter_in_note() {
        let now = Local.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let mut session = Session::new();
        session
            .create_location("survey", "north face, shady", &now)
            .unwrap();
        let csv = to_csv(&session).unwrap();
        assert!(csv.contains("note,\"north face, shady\""));
    }

    #[test]
    fn test_csv_escapes_quotes() {
        assert_eq!(csv_field(r#"the "big" rock"#), r#""the ""big"" rock""#);
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn test_csv_requires_location() {
        let session = Session::new();
        assert!(matches!(to_csv(&session), Err(FieldError::NoLocation)));
    }

    #[test]
    fn test_json_shape() {
        let mut session = session_with_photos();
        session.set_gps(GpsFix::new(35.65, 139.74, Some(5.0)));

        let json = to_json(&session).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["project"], "survey");
        assert_eq!(value["gps"]["lat"], 35.65);
        assert_eq!(value["location"]["locationId"], "L20250314092653");
        assert_eq!(value["location"]["note"], "ridge top");
        assert_eq!(value["photos"][0], "L20250314092653-S001-01.jpg");
        assert_eq!(value["photos"][1], "L20250314092653-S002-01.jpg");
    }

    #[test]
    fn test_json_null_gps_when_never_acquired() {
        let session = session_with_photos();
        let json = to_json(&session).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["gps"].is_null());
    }

    #[test]
    fn test_json_is_deterministic() {
        let session = session_with_photos();
        assert_eq!(to_json(&session).unwrap(), to_json(&session).unwrap());
    }
}
