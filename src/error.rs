use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yolomark operations.
#[derive(Debug, Error)]
pub enum YolomarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read category names from {path}: {source}")]
    NamesFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid label file {path} at line {line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Category not found for index {index} ({path}, line {line})")]
    UnknownCategory {
        index: usize,
        path: PathBuf,
        line: usize,
    },

    #[error("Failed to write label file {path}: {source}")]
    LabelWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDimensionRead {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Invalid image directory {path}: {message}")]
    ImageDirInvalid { path: PathBuf, message: String },

    #[error("No label file next to {image_path}")]
    MissingLabelFile { image_path: PathBuf },

    #[error("Invalid category edit: {message}")]
    InvalidCategoryEdit { message: String },

    #[error("Invalid box: {message}")]
    InvalidBox { message: String },

    #[error("No sample with id {0} in the current image")]
    UnknownSample(usize),

    #[error("No image is loaded")]
    NoImageLoaded,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}

impl YolomarkError {
    /// Returns true for errors the caller can show to the user and carry on
    /// from, leaving the model untouched.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            YolomarkError::InvalidCategoryEdit { .. }
                | YolomarkError::InvalidBox { .. }
                | YolomarkError::UnknownSample(_)
        )
    }
}
