//! File-level helpers for the CLI, tests and benches. The codec core never
//! touches the filesystem; everything here goes through the `image` crate.

use crate::encoder::EncodedQr;
use std::path::Path;

/// Load an image file as a tightly-packed RGBA buffer with its dimensions
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    Ok((img.into_raw(), width as usize, height as usize))
}

/// Render an encoded symbol and write it as an 8-bit greyscale PNG
pub fn save_png<P: AsRef<Path>>(
    qr: &EncodedQr,
    module_size: usize,
    margin: usize,
    path: P,
) -> Result<(), image::ImageError> {
    let (luma, width, height) = qr.render_luma(module_size, margin);
    let img = image::GrayImage::from_raw(width as u32, height as u32, luma)
        .expect("render dimensions match the buffer");
    img.save(path)
}
