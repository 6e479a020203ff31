//! Edit events and the function that applies them.
//!
//! Every user action on the current image is one [`EditEvent`]; applying it
//! mutates the loaded image's samples directly and reports whether the
//! displayed boxes changed.

use log::{debug, warn};

use super::LoadedImage;
use crate::categories::CategoryNames;
use crate::error::YolomarkError;
use crate::geom::{Pixel, Rect};
use crate::sample::{Sample, SampleId};

/// A user action on the current image.
#[derive(Clone, Debug, PartialEq)]
pub enum EditEvent {
    /// Show or hide every sample of an original category.
    SetGroupVisibility { category: usize, visible: bool },
    /// Show or hide one sample.
    SetSampleVisibility { sample: SampleId, visible: bool },
    /// Mark or unmark a sample for deletion on the next save.
    SetSampleDeleted { sample: SampleId, deleted: bool },
    /// Raw text typed into the "new category" cell. Empty text clears the
    /// pending reassignment.
    EditCategory { sample: SampleId, input: String },
    /// A new box drawn on the image.
    DrawBox {
        category: usize,
        corners: Rect<Pixel>,
    },
}

/// What changed after an event was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// The set of displayed boxes changed and should be redrawn.
    Redraw,
    /// The model changed without affecting what is drawn.
    Changed,
    /// A new sample was added.
    Added(SampleId),
}

/// Applies one event to the loaded image.
///
/// Errors for category edits and unknown samples are recoverable: the model
/// is left exactly as it was before the call.
pub fn apply_event(
    image: &mut LoadedImage,
    names: &CategoryNames,
    event: EditEvent,
) -> Result<EventOutcome, YolomarkError> {
    debug!("applying {:?} to {}", event, image.entry.file_name());

    match event {
        EditEvent::SetGroupVisibility { category, visible } => {
            image.grouper.set_group_visibility(category, visible);
            Ok(EventOutcome::Redraw)
        }
        EditEvent::SetSampleVisibility { sample, visible } => {
            sample_mut(image, sample)?.set_visible(visible);
            Ok(EventOutcome::Redraw)
        }
        EditEvent::SetSampleDeleted { sample, deleted } => {
            sample_mut(image, sample)?.set_deleted(deleted);
            Ok(EventOutcome::Changed)
        }
        EditEvent::EditCategory { sample, input } => {
            let target = sample_mut(image, sample)?;
            let input = input.trim();
            if input.is_empty() {
                target.reset_category();
                return Ok(EventOutcome::Changed);
            }
            let category = parse_category(input, names).inspect_err(|err| {
                warn!("discarding category edit on sample {}: {}", sample, err);
            })?;
            target.set_category(category);
            image.grouper.ensure_color(category);
            Ok(EventOutcome::Changed)
        }
        EditEvent::DrawBox { category, corners } => {
            let drawn = Sample::drawn(category, corners, names, image.size).inspect_err(|err| {
                warn!("discarding drawn box: {}", err);
            })?;
            Ok(EventOutcome::Added(image.grouper.add_sample(drawn)))
        }
    }
}

fn sample_mut(image: &mut LoadedImage, id: SampleId) -> Result<&mut Sample, YolomarkError> {
    image
        .grouper
        .sample_mut(id)
        .ok_or(YolomarkError::UnknownSample(id.as_usize()))
}

fn parse_category(input: &str, names: &CategoryNames) -> Result<usize, YolomarkError> {
    let category = input
        .parse::<usize>()
        .map_err(|_| YolomarkError::InvalidCategoryEdit {
            message: format!("category must be an integer, got '{input}'"),
        })?;
    if !names.contains(category) {
        return Err(YolomarkError::InvalidCategoryEdit {
            message: format!(
                "category index must be one of {:?}, got {}",
                names.indices(),
                category
            ),
        });
    }
    Ok(category)
}
