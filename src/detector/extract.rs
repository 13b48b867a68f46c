//! Sampling the located symbol into a dimension x dimension module grid.
//!
//! A projective transform maps module-space sample points onto the image:
//! the three finder centres sit 3.5 modules inside their corners and the
//! alignment pattern 6.5 modules inside the bottom-right corner.

use super::locator::SymbolLocation;
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::PerspectiveTransform;

/// Sampled module grid plus the image-space corners of the symbol,
/// clockwise from top-left
pub struct ExtractedGrid {
    /// Sampled modules, true = dark
    pub matrix: BitMatrix,
    /// Image-space corners of the grid, clockwise from top-left
    pub corners: [Point; 4],
}

/// Sample the binarized image into a module grid; `None` when the corner
/// geometry is degenerate
pub fn extract(image: &BitMatrix, location: &SymbolLocation) -> Option<ExtractedGrid> {
    let dimension = location.dimension;
    let dim = dimension as f32;

    let src = [
        Point::new(3.5, 3.5),
        Point::new(dim - 3.5, 3.5),
        Point::new(dim - 6.5, dim - 6.5),
        Point::new(3.5, dim - 3.5),
    ];
    let dst = [
        location.top_left,
        location.top_right,
        location.alignment,
        location.bottom_left,
    ];
    let transform = PerspectiveTransform::from_points(&src, &dst)?;

    let mut matrix = BitMatrix::new(dimension, dimension);
    for y in 0..dimension {
        for x in 0..dimension {
            let p = transform.transform(&Point::new(x as f32 + 0.5, y as f32 + 0.5));
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            matrix.set(x, y, image.get(p.x.floor() as usize, p.y.floor() as usize));
        }
    }

    let corners = [
        transform.transform(&Point::new(0.0, 0.0)),
        transform.transform(&Point::new(dim, 0.0)),
        transform.transform(&Point::new(dim, dim)),
        transform.transform(&Point::new(0.0, dim)),
    ];

    Some(ExtractedGrid { matrix, corners })
}
