//! Axis-aligned boxes stored as corners (left, top, right, bottom).

use std::marker::PhantomData;

use super::{ImageSize, Normalized, Pixel};

/// An axis-aligned box in the coordinate space `S`.
///
/// `new` stores the corners as given. Use [`Rect::from_corners`] when the
/// corners come from user input in arbitrary order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<S> {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    _space: PhantomData<S>,
}

impl<S> Rect<S> {
    #[inline]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            _space: PhantomData,
        }
    }

    /// Builds a box from two opposite corners in any order, so that
    /// `right >= left` and `bottom >= top` hold.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.left <= self.right && self.top <= self.bottom
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl Rect<Normalized> {
    /// YOLO center/size to corners.
    pub fn from_center_size(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }

    /// Scales the corners by the image size.
    pub fn to_pixel(&self, size: ImageSize) -> Rect<Pixel> {
        let (w, h) = size.as_f64();
        Rect::new(self.left * w, self.top * h, self.right * w, self.bottom * h)
    }
}

impl Rect<Pixel> {
    /// Inverse of [`Rect::<Normalized>::from_center_size`] followed by
    /// [`Rect::<Normalized>::to_pixel`]: returns `(cx, cy, w, h)` as fractions
    /// of the image size, without any truncation.
    pub fn to_center_size(&self, size: ImageSize) -> (f64, f64, f64, f64) {
        let (w, h) = size.as_f64();
        (
            (self.left + self.right) / 2.0 / w,
            (self.top + self.bottom) / 2.0 / h,
            (self.right - self.left) / w,
            (self.bottom - self.top) / h,
        )
    }
}
