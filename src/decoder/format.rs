/// Format information recovery from the sampled module grid
use crate::models::{BitMatrix, ECLevel, MaskPattern};
use crate::tables;

/// The 15-bit format payload: error correction level and data mask
pub struct FormatInfo {
    /// Error correction level in effect
    pub ec_level: ECLevel,
    /// Data mask in effect
    pub mask: MaskPattern,
}

impl FormatInfo {
    /// Read both format copies and match each against the stored table
    /// within Hamming distance 3; the first copy wins when both decode
    pub fn extract(matrix: &BitMatrix) -> Option<Self> {
        let around_top_left = Self::read_top_left_copy(matrix);
        let split_copy = Self::read_split_copy(matrix);

        tables::match_format_info(around_top_left)
            .or_else(|| tables::match_format_info(split_copy))
            .map(|(ec_level, mask)| Self { ec_level, mask })
    }

    /// Copy wrapped around the top-left finder; bit i of the word sits at
    /// the positions its encoder counterpart wrote
    fn read_top_left_copy(matrix: &BitMatrix) -> u16 {
        let mut bits = 0u16;
        for i in 0..6 {
            bits |= (matrix.get(8, i) as u16) << i;
        }
        bits |= (matrix.get(8, 7) as u16) << 6;
        bits |= (matrix.get(8, 8) as u16) << 7;
        bits |= (matrix.get(7, 8) as u16) << 8;
        for i in 9..15 {
            bits |= (matrix.get(14 - i, 8) as u16) << i;
        }
        bits
    }

    /// Copy split between the top-right and bottom-left finders
    fn read_split_copy(matrix: &BitMatrix) -> u16 {
        let size = matrix.width();
        let mut bits = 0u16;
        for i in 0..8 {
            bits |= (matrix.get(size - 1 - i, 8) as u16) << i;
        }
        for i in 8..15 {
            bits |= (matrix.get(8, size - 15 + i) as u16) << i;
        }
        bits
    }
}
