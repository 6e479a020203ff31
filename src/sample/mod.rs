//! Labeled boxes of the image being edited.
//!
//! A [`Sample`] is one bounding box: its original category, an optional
//! pending reassignment, its pixel-space corners and the edit flags that
//! decide whether the label file has to be rewritten. The samples of one
//! image are owned by a [`SampleGrouper`].

mod grouper;

pub use grouper::{Rgba, SampleGrouper};

use std::fmt;

use thiserror::Error;

use crate::categories::CategoryNames;
use crate::error::YolomarkError;
use crate::geom::precision::truncate;
use crate::geom::{ImageSize, Normalized, Pixel, Rect};
use crate::label_file::YoloRecord;

/// Position of a sample inside its [`SampleGrouper`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleId(pub usize);

impl SampleId {
    #[inline]
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleId({})", self.0)
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category index with no name in the loaded names file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("category not found for index {0}")]
pub struct UnknownCategory(pub usize);

/// One bounding box of one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    category_index: usize,
    new_category_index: Option<usize>,
    bbox: Rect<Pixel>,
    image_size: ImageSize,
    line_number: Option<usize>,
    visible: bool,
    deleted: bool,
    is_new: bool,
    dirty: bool,
}

impl Sample {
    /// Builds a sample from a parsed label line.
    ///
    /// Pixel corners are computed once here, with `image_size` as the scale
    /// factor, and are the source of truth from then on.
    pub fn from_yolo(
        record: &YoloRecord,
        line_number: usize,
        names: &CategoryNames,
        image_size: ImageSize,
    ) -> Result<Self, UnknownCategory> {
        if !names.contains(record.class_id) {
            return Err(UnknownCategory(record.class_id));
        }
        let px = Rect::<Normalized>::from_center_size(record.cx, record.cy, record.w, record.h)
            .to_pixel(image_size);
        // Negative sizes in the file would otherwise flip the corners.
        let bbox = Rect::from_corners(px.left, px.top, px.right, px.bottom);
        Ok(Self {
            category_index: record.class_id,
            new_category_index: None,
            bbox,
            image_size,
            line_number: Some(line_number),
            visible: true,
            deleted: false,
            is_new: false,
            dirty: false,
        })
    }

    /// Builds a sample for a box drawn by the user. The corners may be given
    /// in any order but must be finite.
    ///
    /// Both failures are recoverable: an unknown category is an
    /// [`YolomarkError::InvalidCategoryEdit`], bad corners an
    /// [`YolomarkError::InvalidBox`].
    pub fn drawn(
        category_index: usize,
        corners: Rect<Pixel>,
        names: &CategoryNames,
        image_size: ImageSize,
    ) -> Result<Self, YolomarkError> {
        if !names.contains(category_index) {
            return Err(YolomarkError::InvalidCategoryEdit {
                message: UnknownCategory(category_index).to_string(),
            });
        }
        if !corners.is_finite() {
            return Err(YolomarkError::InvalidBox {
                message: format!(
                    "corners must be finite, got ({}, {}) - ({}, {})",
                    corners.left, corners.top, corners.right, corners.bottom
                ),
            });
        }
        let bbox = Rect::from_corners(corners.left, corners.top, corners.right, corners.bottom);
        Ok(Self {
            category_index,
            new_category_index: None,
            bbox,
            image_size,
            line_number: None,
            visible: true,
            deleted: false,
            is_new: true,
            dirty: false,
        })
    }

    pub fn category_index(&self) -> usize {
        self.category_index
    }

    pub fn new_category_index(&self) -> Option<usize> {
        self.new_category_index
    }

    /// The category written on save: the pending reassignment if any,
    /// otherwise the original.
    pub fn effective_category(&self) -> usize {
        self.new_category_index.unwrap_or(self.category_index)
    }

    pub fn bbox(&self) -> &Rect<Pixel> {
        &self.bbox
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    /// 0-based line in the label file this sample was read from. `None` for
    /// drawn boxes.
    pub fn line_number(&self) -> Option<usize> {
        self.line_number
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// True once the category has been edited.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_deleted(&mut self, deleted: bool) {
        self.deleted = deleted;
    }

    /// Records a pending reassignment. The caller checks the index against
    /// the category names.
    pub fn set_category(&mut self, category_index: usize) {
        self.new_category_index = Some(category_index);
        self.dirty = true;
    }

    /// Drops the pending reassignment.
    pub fn reset_category(&mut self) {
        self.new_category_index = None;
        self.dirty = false;
    }

    /// True if saving would change what is on disk for this sample.
    pub fn needs_save(&self) -> bool {
        self.dirty || self.deleted || self.is_new
    }

    /// Normalized `(cx, cy, w, h)` without truncation.
    pub fn normalized(&self) -> (f64, f64, f64, f64) {
        self.bbox.to_center_size(self.image_size)
    }

    /// The label line for this sample: effective category and normalized
    /// fields truncated to six decimals.
    pub fn to_yolo(&self) -> YoloRecord {
        let (cx, cy, w, h) = self.normalized();
        YoloRecord {
            class_id: self.effective_category(),
            cx: truncate(cx),
            cy: truncate(cy),
            w: truncate(w),
            h: truncate(h),
        }
    }

    /// Makes the pending state the saved state.
    pub(crate) fn commit(&mut self) {
        self.category_index = self.effective_category();
        self.new_category_index = None;
        self.dirty = false;
        self.is_new = false;
    }
}
