//! Image directory scanning.
//!
//! The navigable list holds every image directly inside the chosen directory
//! that has a sibling label file (`photo.jpg` -> `photo.txt`). Images without
//! one are skipped rather than treated as errors.

use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::YolomarkError;
use crate::geom::ImageSize;

pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];
pub const LABEL_EXTENSION: &str = "txt";

/// An image and the label file that goes with it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
}

impl ImageEntry {
    /// File name of the image, for status lines.
    pub fn file_name(&self) -> String {
        self.image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The images of one directory, in path order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ImageList {
    pub entries: Vec<ImageEntry>,
    /// Images found without a label file.
    pub skipped: Vec<PathBuf>,
}

impl ImageList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }
}

/// Scans `dir` (not recursively) for images with label files.
pub fn scan_image_dir(dir: &Path) -> Result<ImageList, YolomarkError> {
    if !dir.is_dir() {
        return Err(YolomarkError::ImageDirInvalid {
            path: dir.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    let mut images = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| YolomarkError::ImageDirInvalid {
            path: dir.to_path_buf(),
            message: format!("failed while reading directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_extension(entry.path(), &IMAGE_EXTENSIONS) {
            images.push(entry.into_path());
        }
    }
    images.sort();

    let mut list = ImageList::default();
    for image_path in images {
        let label_path = label_path_for(&image_path);
        if label_path.is_file() {
            list.entries.push(ImageEntry {
                image_path,
                label_path,
            });
        } else {
            debug!("no label file for {}, skipping", image_path.display());
            list.skipped.push(image_path);
        }
    }

    info!(
        "found {} image(s) with labels in {} ({} skipped)",
        list.len(),
        dir.display(),
        list.skipped.len()
    );
    Ok(list)
}

/// The label file expected next to `image_path`.
pub fn label_path_for(image_path: &Path) -> PathBuf {
    image_path.with_extension(LABEL_EXTENSION)
}

/// Reads pixel dimensions from the image header without decoding it.
pub fn read_image_size(path: &Path) -> Result<ImageSize, YolomarkError> {
    let size = imagesize::size(path).map_err(|source| YolomarkError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| YolomarkError::ImageDirInvalid {
            path: path.to_path_buf(),
            message: format!("image width {} does not fit in u32", size.width),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| YolomarkError::ImageDirInvalid {
            path: path.to_path_buf(),
            message: format!("image height {} does not fit in u32", size.height),
        })?;

    let size = ImageSize::new(width, height);
    if size.is_empty() {
        return Err(YolomarkError::ImageDirInvalid {
            path: path.to_path_buf(),
            message: format!("image has zero size ({size})"),
        });
    }
    Ok(size)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    allowed
        .iter()
        .any(|allowed_ext| ext.eq_ignore_ascii_case(allowed_ext))
}
