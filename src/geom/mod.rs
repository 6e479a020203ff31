//! Geometry shared by samples and label files.
//!
//! Boxes live in pixel space while an image is being edited and are only
//! expressed in normalized YOLO center/size form when read from or written to
//! a label file. The space is carried in the type:
//!
//! ```
//! use yolomark::geom::{ImageSize, Normalized, Rect};
//!
//! let norm = Rect::<Normalized>::from_center_size(0.5, 0.5, 0.2, 0.4);
//! let px = norm.to_pixel(ImageSize::new(1000, 800));
//! assert!((px.left - 400.0).abs() < 1e-9);
//! assert!((px.bottom - 560.0).abs() < 1e-9);
//! ```

pub mod precision;
mod rect;
mod size;
mod space;

pub use rect::Rect;
pub use size::ImageSize;
pub use space::{Normalized, Pixel};
