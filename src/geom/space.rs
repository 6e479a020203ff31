//! Coordinate space markers.
//!
//! Uninhabited types used only as type parameters, so a box measured in
//! pixels can never be passed where a normalized box is expected.

/// Absolute pixel positions on the displayed image, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pixel {}

/// Positions expressed as fractions of the image size, nominally in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Normalized {}
