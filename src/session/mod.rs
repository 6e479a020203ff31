//! An annotation session over one image directory.
//!
//! The session owns the category names, the navigable image list and the
//! samples of the image currently shown. Moving to another image always
//! saves the current one first, then loads the next.

mod event;

pub use event::{apply_event, EditEvent, EventOutcome};

use std::path::Path;

use log::info;

use crate::categories::CategoryNames;
use crate::error::YolomarkError;
use crate::geom::ImageSize;
use crate::images::{label_path_for, read_image_size, scan_image_dir, ImageEntry, ImageList};
use crate::label_file::{read_label_file, render_label_file, write_label_file};
use crate::sample::SampleGrouper;

/// When a label file gets rewritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SavePolicy {
    /// Only if some sample was edited, deleted or drawn.
    #[default]
    WhenChanged,
    /// Every time the image is left, which also normalizes the file.
    Always,
}

/// Options for a session.
#[derive(Clone, Debug, Default)]
pub struct SessionOptions {
    /// Seed for category colors.
    pub color_seed: Option<u64>,
    /// Cap on the displayed image height. The reduced size becomes the pixel
    /// scale of the samples.
    pub max_display_height: Option<u32>,
    pub save_policy: SavePolicy,
    /// Report what would be saved without touching any file.
    pub dry_run: bool,
}

/// Where the session is in the image list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Before the first image.
    Start,
    Image(usize),
    /// Past the last image.
    End,
}

/// The image currently being edited.
#[derive(Debug)]
pub struct LoadedImage {
    pub index: usize,
    pub entry: ImageEntry,
    /// Display size, the scale factor of every sample.
    pub size: ImageSize,
    pub grouper: SampleGrouper,
}

/// Result of saving the current image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No image loaded.
    NothingLoaded,
    /// Nothing changed and the policy did not force a write.
    Unchanged,
    /// The label file was rewritten with this many lines.
    Written { lines: usize },
    /// Dry run: the content that would have been written.
    DryRun { content: String },
}

pub struct Session {
    names: CategoryNames,
    images: ImageList,
    options: SessionOptions,
    position: Position,
    current: Option<LoadedImage>,
}

impl Session {
    pub fn new(names: CategoryNames, images: ImageList, options: SessionOptions) -> Self {
        Self {
            names,
            images,
            options,
            position: Position::Start,
            current: None,
        }
    }

    /// Loads the names file and scans the image directory.
    pub fn open(
        image_dir: &Path,
        names_path: &Path,
        options: SessionOptions,
    ) -> Result<Self, YolomarkError> {
        let names = CategoryNames::read(names_path)?;
        let images = scan_image_dir(image_dir)?;
        Ok(Self::new(names, images, options))
    }

    /// A session over one image and its sibling label file.
    pub fn for_image(
        image_path: &Path,
        names: CategoryNames,
        options: SessionOptions,
    ) -> Result<Self, YolomarkError> {
        let label_path = label_path_for(image_path);
        if !label_path.is_file() {
            return Err(YolomarkError::MissingLabelFile {
                image_path: image_path.to_path_buf(),
            });
        }
        let images = ImageList {
            entries: vec![ImageEntry {
                image_path: image_path.to_path_buf(),
                label_path,
            }],
            skipped: Vec::new(),
        };
        Ok(Self::new(names, images, options))
    }

    pub fn names(&self) -> &CategoryNames {
        &self.names
    }

    pub fn images(&self) -> &ImageList {
        &self.images
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn current(&self) -> Option<&LoadedImage> {
        self.current.as_ref()
    }

    /// `"index/total"` for the status bar, empty before the first image.
    pub fn progress(&self) -> String {
        match self.position {
            Position::Start => String::new(),
            Position::Image(index) => format!("{}/{}", index, self.images.len()),
            Position::End => format!("{}/{}", self.images.len(), self.images.len()),
        }
    }

    /// Saves the current image and moves to the next one.
    pub fn next(&mut self) -> Result<Position, YolomarkError> {
        let target = match self.position {
            Position::Start => 0,
            Position::Image(index) => index + 1,
            Position::End => self.images.len(),
        };
        self.move_to(target)
    }

    /// Saves the current image and moves to the previous one.
    pub fn previous(&mut self) -> Result<Position, YolomarkError> {
        match self.position {
            Position::Start | Position::Image(0) => {
                self.save_current()?;
                self.current = None;
                self.position = Position::Start;
                Ok(self.position)
            }
            Position::Image(index) => self.move_to(index - 1),
            Position::End if self.images.is_empty() => {
                self.position = Position::Start;
                Ok(self.position)
            }
            Position::End => self.move_to(self.images.len() - 1),
        }
    }

    /// Saves the current image and jumps to `index`. Indices past the end
    /// land on [`Position::End`].
    pub fn go_to(&mut self, index: usize) -> Result<Position, YolomarkError> {
        self.move_to(index)
    }

    /// Applies an edit to the current image.
    pub fn apply(&mut self, event: EditEvent) -> Result<EventOutcome, YolomarkError> {
        let image = self.current.as_mut().ok_or(YolomarkError::NoImageLoaded)?;
        apply_event(image, &self.names, event)
    }

    /// Writes the current image's label file according to the save policy.
    pub fn save_current(&mut self) -> Result<SaveOutcome, YolomarkError> {
        let Some(image) = self.current.as_ref() else {
            return Ok(SaveOutcome::NothingLoaded);
        };
        if self.options.save_policy == SavePolicy::WhenChanged && !image.grouper.needs_save() {
            return Ok(SaveOutcome::Unchanged);
        }
        self.write_current()
    }

    /// Rewrites the current image's label file regardless of the policy.
    ///
    /// After a real write the grouper is committed: deleted samples are gone
    /// and pending categories become the originals.
    pub fn write_current(&mut self) -> Result<SaveOutcome, YolomarkError> {
        let Some(image) = self.current.as_mut() else {
            return Ok(SaveOutcome::NothingLoaded);
        };

        if self.options.dry_run {
            return Ok(SaveOutcome::DryRun {
                content: render_label_file(&image.grouper),
            });
        }

        let lines = write_label_file(&image.entry.label_path, &image.grouper)?;
        image.grouper.commit();
        info!(
            "saved {} ({} line(s))",
            image.entry.label_path.display(),
            lines
        );
        Ok(SaveOutcome::Written { lines })
    }

    /// Save-then-load. If loading fails the session stays on `index` with no
    /// image, so `next` and `previous` step on from the image that failed.
    fn move_to(&mut self, index: usize) -> Result<Position, YolomarkError> {
        self.save_current()?;
        self.current = None;

        let Some(entry) = self.images.get(index).cloned() else {
            self.position = Position::End;
            return Ok(self.position);
        };

        self.position = Position::Image(index);
        let loaded = self.load(index, entry)?;
        info!(
            "loaded {} ({}, {} sample(s))",
            loaded.entry.file_name(),
            loaded.size,
            loaded.grouper.len()
        );
        self.current = Some(loaded);
        Ok(self.position)
    }

    fn load(&self, index: usize, entry: ImageEntry) -> Result<LoadedImage, YolomarkError> {
        let mut size = read_image_size(&entry.image_path)?;
        if let Some(max_height) = self.options.max_display_height {
            size = size.fit_height(max_height);
        }

        let samples = read_label_file(&entry.label_path, &self.names, size)?;
        let mut grouper = SampleGrouper::new(self.options.color_seed);
        for sample in samples {
            grouper.add_sample(sample);
        }

        Ok(LoadedImage {
            index,
            entry,
            size,
            grouper,
        })
    }
}
