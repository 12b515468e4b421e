//! Identifier derivation for locations, samples, and photo files.
//!
//! Every identifier is a pure function of counters and a caller-supplied
//! clock value, so generation stays deterministic under test.

use chrono::{DateTime, Local};
use tracing::trace;

/// File extension used for all captured photos.
pub const PHOTO_EXT: &str = "jpg";

/// Format a creation timestamp as it appears in folder names and manifests.
pub fn created_stamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d %H%M%S").to_string()
}

/// Format a sample counter as a fixed-width sample ID (`S001`, `S002`, ...).
pub fn sample_id(counter: u32) -> String {
    format!("S{counter:03}")
}

/// Derive a photo filename from its location, sample, and the number of
/// photos already captured for that sample.
///
/// The sequence number is `existing_for_sample + 1`, zero-padded to two
/// digits, which keeps filenames unique within a location as long as the
/// in-memory photo list is the only writer.
pub fn photo_filename(location_id: &str, sample_id: &str, existing_for_sample: usize) -> String {
    format!(
        "{location_id}-{sample_id}-{:02}.{PHOTO_EXT}",
        existing_for_sample + 1
    )
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Issues location IDs derived from a compact timestamp.
///
/// The raw ID is `L` followed by the digits of the creation time at one
/// second resolution. Two locations created within the same second would
/// collide on the raw form, so the factory remembers the last issued base
/// and appends `x2`, `x3`, ... for reissues within that second.
#[derive(Debug, Default)]
pub struct LocationIdFactory {
    last: Option<(String, u32)>,
}

impl LocationIdFactory {
    /// Create a factory with no issue history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next location ID for the given instant.
    pub fn next(&mut self, now: &DateTime<Local>) -> String {
        let base = format!("L{}", now.format("%Y%m%d%H%M%S"));
        match &mut self.last {
            Some((prev, n)) if *prev == base => {
                *n += 1;
                let id = format!("{base}x{n}");
                trace!(%id, "Reissued location ID within the same second");
                id
            }
            _ => {
                self.last = Some((base.clone(), 1));
                base
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 9, 26, secs).unwrap()
    }

    #[test]
    fn test_created_stamp_format() {
        assert_eq!(created_stamp(&at(53)), "20250314 092653");
    }

    #[test]
    fn test_sample_id_padding() {
        assert_eq!(sample_id(1), "S001");
        assert_eq!(sample_id(42), "S042");
        assert_eq!(sample_id(999), "S999");
        assert_eq!(sample_id(1000), "S1000");
    }

    #[test]
    fn test_photo_filename_sequence() {
        assert_eq!(
            photo_filename("L20250314092653", "S001", 0),
            "L20250314092653-S001-01.jpg"
        );
        assert_eq!(
            photo_filename("L20250314092653", "S001", 9),
            "L20250314092653-S001-10.jpg"
        );
    }

    #[test]
    fn test_sanitize_keeps_safe_chars() {
        assert_eq!(sanitize("ridge_top-07"), "ridge_top-07");
    }

    #[test]
    fn test_sanitize_replaces_everything_else() {
        assert_eq!(sanitize("north face, shady"), "north_face__shady");
        assert_eq!(sanitize("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize("湿地 site"), "___site");
    }

    #[test]
    fn test_location_id_basic() {
        let mut ids = LocationIdFactory::new();
        assert_eq!(ids.next(&at(53)), "L20250314092653");
    }

    #[test]
    fn test_location_id_distinct_across_seconds() {
        let mut ids = LocationIdFactory::new();
        let a = ids.next(&at(1));
        let b = ids.next(&at(2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_location_id_same_second_gets_suffix() {
        let mut ids = LocationIdFactory::new();
        let a = ids.next(&at(5));
        let b = ids.next(&at(5));
        let c = ids.next(&at(5));
        assert_eq!(b, format!("{a}x2"));
        assert_eq!(c, format!("{a}x3"));
    }

    #[test]
    fn test_location_id_suffix_resets_next_second() {
        let mut ids = LocationIdFactory::new();
        ids.next(&at(5));
        ids.next(&at(5));
        assert_eq!(ids.next(&at(6)), "L20250314092606");
    }
}
