//! End-to-end decode pipeline: binarize, locate, extract, decode, with
//! configurable handling of light-on-dark symbols and a mirrored retry for
//! transposed samples.

use crate::debug;
use crate::decoder::matrix_decode::decode_matrix;
use crate::detector::binarize::binarize;
use crate::detector::extract::extract;
use crate::detector::locator::locate;
use crate::models::{BitMatrix, Decoded, Location};
use crate::utils::grayscale::rgba_to_luma;

/// Whether to binarize for dark-on-light symbols, light-on-dark, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionAttempts {
    /// Dark-on-light only (the common case)
    #[default]
    DontInvert,
    /// Light-on-dark only
    OnlyInvert,
    /// Dark-on-light first, then light-on-dark
    AttemptBoth,
    /// Light-on-dark first, then dark-on-light
    InvertFirst,
}

/// Decoder configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Inversion handling; defaults to dark-on-light only
    pub inversion: InversionAttempts,
}

/// Decode the first QR symbol found in a tightly-packed RGBA buffer
pub fn decode(rgba: &[u8], width: usize, height: usize) -> Option<Decoded> {
    decode_with_options(rgba, width, height, &DecodeOptions::default())
}

/// Decode with explicit options
pub fn decode_with_options(
    rgba: &[u8],
    width: usize,
    height: usize,
    options: &DecodeOptions,
) -> Option<Decoded> {
    let luma = rgba_to_luma(rgba, width, height);
    decode_luma(&luma, width, height, options)
}

/// Decode from a pre-computed greyscale buffer
pub fn decode_luma(
    luma: &[u8],
    width: usize,
    height: usize,
    options: &DecodeOptions,
) -> Option<Decoded> {
    let binary = binarize(luma, width, height);

    let passes: &[bool] = match options.inversion {
        InversionAttempts::DontInvert => &[false],
        InversionAttempts::OnlyInvert => &[true],
        InversionAttempts::AttemptBoth => &[false, true],
        InversionAttempts::InvertFirst => &[true, false],
    };

    for &inverted in passes {
        let matrix = if inverted {
            binary.inverted()
        } else {
            binary.clone()
        };
        if let Some(decoded) = decode_binary(&matrix) {
            return Some(decoded);
        }
        if cfg!(debug_assertions) && debug::debug_enabled() {
            eprintln!("PIPELINE: pass inverted={} failed", inverted);
        }
    }
    None
}

/// One binarized pass: locate, extract, decode the grid
fn decode_binary(binary: &BitMatrix) -> Option<Decoded> {
    let location = locate(binary)?;
    let grid = extract(binary, &location)?;
    let output = decode_matrix(&grid.matrix)?;

    Some(Decoded {
        text: output.payload.text,
        bytes: output.payload.bytes,
        chunks: output.payload.chunks,
        version: output.version,
        ec_level: output.ec_level,
        mask: output.mask,
        location: Location {
            top_left: location.top_left,
            top_right: location.top_right,
            bottom_left: location.bottom_left,
            alignment: location.alignment,
            corners: grid.corners,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::models::ECLevel;

    #[test]
    fn rendered_symbol_decodes_from_luma() {
        let qr = encode("PIPELINE", ECLevel::M).unwrap();
        let (luma, width, height) = qr.render_luma(4, 4);
        let decoded = decode_luma(&luma, width, height, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.text, "PIPELINE");
        assert_eq!(decoded.version, qr.version);
    }

    #[test]
    fn inverted_symbol_needs_an_inversion_pass() {
        let qr = encode("INVERTED", ECLevel::M).unwrap();
        let (mut luma, width, height) = qr.render_luma(4, 4);
        for v in &mut luma {
            *v = 255 - *v;
        }
        assert!(decode_luma(&luma, width, height, &DecodeOptions::default()).is_none());
        let options = DecodeOptions {
            inversion: InversionAttempts::AttemptBoth,
        };
        let decoded = decode_luma(&luma, width, height, &options).unwrap();
        assert_eq!(decoded.text, "INVERTED");
    }

    #[test]
    fn blank_image_is_none() {
        let luma = vec![255u8; 200 * 200];
        assert!(decode_luma(&luma, 200, 200, &DecodeOptions::default()).is_none());
    }
}
