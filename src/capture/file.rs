//! File-backed capture source.
//!
//! The CLI stand-in for a camera: frames are queued as image file paths,
//! decoded on capture, and re-encoded as JPEG at the configured quality so
//! every stored photo has a uniform format regardless of the source.

use std::collections::VecDeque;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::error::{FieldError, Result};

use super::CaptureService;

/// Capture source that consumes a queue of image files.
#[derive(Debug)]
pub struct FileCapture {
    queue: VecDeque<PathBuf>,
    quality: u8,
}

impl FileCapture {
    /// Create a source over the given frame paths, consumed in order.
    #[must_use]
    pub fn new<I, P>(frames: I, quality: u8) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            queue: frames.into_iter().map(Into::into).collect(),
            quality,
        }
    }

    /// Queue one more frame at the back.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.queue.push_back(path.into());
    }

    /// Number of frames still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    fn encode_jpeg(&self, path: &Path) -> Result<Vec<u8>> {
        let img = image::open(path).map_err(|e| {
            FieldError::Capture(format!("cannot decode {}: {e}", path.display()))
        })?;

        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), self.quality);
        img.write_with_encoder(encoder).map_err(|e| {
            FieldError::Capture(format!("cannot encode {}: {e}", path.display()))
        })?;

        debug!(
            path = %path.display(),
            bytes = buf.len(),
            quality = self.quality,
            "Frame encoded"
        );
        Ok(buf)
    }
}

impl CaptureService for FileCapture {
    fn capture(&mut self) -> Result<Vec<u8>> {
        let Some(path) = self.queue.pop_front() else {
            return Err(FieldError::Capture("no frames queued".to_string()));
        };
        if !path.is_file() {
            return Err(FieldError::FrameNotFound {
                path: path.display().to_string(),
            });
        }
        self.encode_jpeg(&path)
    }

    fn is_ready(&self) -> bool {
        !self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let img = RgbImage::from_pixel(4, 4, Rgb([200, 80, 10]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_capture_reencodes_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let frame = write_png(dir.path(), "frame.png");

        let mut capture = FileCapture::new([frame], 85);
        assert!(capture.is_ready());

        let payload = capture.capture().unwrap();
        // JPEG SOI marker
        assert_eq!(&payload[..2], &[0xff, 0xd8]);
        assert!(!capture.is_ready());
    }

    #[test]
    fn test_capture_exhausted_queue() {
        let mut capture = FileCapture::new(Vec::<PathBuf>::new(), 85);
        let err = capture.capture().unwrap_err();
        assert!(matches!(err, FieldError::Capture(_)));
    }

    #[test]
    fn test_capture_missing_file() {
        let mut capture = FileCapture::new([PathBuf::from("/nonexistent/frame.png")], 85);
        let err = capture.capture().unwrap_err();
        assert!(matches!(err, FieldError::FrameNotFound { .. }));
    }

    #[test]
    fn test_push_appends() {
        let dir = tempfile::tempdir().unwrap();
        let frame = write_png(dir.path(), "late.png");

        let mut capture = FileCapture::new(Vec::<PathBuf>::new(), 85);
        assert_eq!(capture.remaining(), 0);
        capture.push(frame);
        assert_eq!(capture.remaining(), 1);
        capture.capture().unwrap();
    }
}
