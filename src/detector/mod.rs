//! Image-space stages of the decoder: binarization, pattern location, and
//! perspective extraction of the module grid.

/// Adaptive thresholding of the greyscale image
pub mod binarize;
/// Perspective sampling of the located symbol
pub mod extract;
/// Finder and alignment pattern search
pub mod locator;
