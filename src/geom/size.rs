//! Image pixel dimensions.

use std::fmt;

use serde::Serialize;

/// Width and height of the image as displayed, in pixels.
///
/// This is the fixed scale factor between normalized and pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn as_f64(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Shrinks the size proportionally so the height does not exceed
    /// `max_height`. Sizes already within the limit are returned unchanged.
    ///
    /// Neither dimension drops below one pixel, since the result is used as
    /// a divisor when converting back to normalized coordinates.
    pub fn fit_height(&self, max_height: u32) -> ImageSize {
        if max_height == 0 || self.height <= max_height {
            return *self;
        }
        let ratio = max_height as f64 / self.height as f64;
        let scale = |dim: u32| ((dim as f64 * ratio).round() as u32).max(1);
        ImageSize::new(scale(self.width), scale(self.height))
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
