//! Frame capture abstraction.
//!
//! This module provides a trait-based abstraction over frame sources,
//! enabling testability without real image files. The session treats a
//! capture source as a black box that yields one JPEG payload per request.

mod file;
pub mod mock;

pub use file::FileCapture;

use crate::error::Result;

/// A service that produces one JPEG frame per request.
pub trait CaptureService {
    /// Capture a single frame.
    ///
    /// # Errors
    ///
    /// Returns `Capture` when the source is not ready or the frame cannot
    /// be produced.
    fn capture(&mut self) -> Result<Vec<u8>>;

    /// Whether the source currently has a frame available.
    fn is_ready(&self) -> bool;
}

/// Type alias for boxed trait object.
pub type BoxedCapture = Box<dyn CaptureService>;

/// Shared handles delegate, so a caller can keep feeding a source that a
/// controller already owns.
impl<C: CaptureService> CaptureService for std::rc::Rc<std::cell::RefCell<C>> {
    fn capture(&mut self) -> Result<Vec<u8>> {
        self.borrow_mut().capture()
    }

    fn is_ready(&self) -> bool {
        self.borrow().is_ready()
    }
}
