//! Static tables from ISO/IEC 18004, embedded verbatim, plus the handful of
//! quantities derived from them (raw module counts, block layouts, data
//! capacity). Index 0 of the per-version tables is unused padding so that
//! version numbers index directly.

use crate::models::{ECLevel, MaskPattern};

/// ECC codewords per block, indexed [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

/// Number of RS blocks, indexed [ec_level][version]
const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Alignment pattern centre coordinates per version (row and column alike)
const ALIGNMENT_PATTERN_CENTERS: [&[usize]; 41] = [
    &[],
    &[],
    &[6, 18],
    &[6, 22],
    &[6, 26],
    &[6, 30],
    &[6, 34],
    &[6, 22, 38],
    &[6, 24, 42],
    &[6, 26, 46],
    &[6, 28, 50],
    &[6, 30, 54],
    &[6, 32, 58],
    &[6, 34, 62],
    &[6, 26, 46, 66],
    &[6, 26, 48, 70],
    &[6, 26, 50, 74],
    &[6, 30, 54, 78],
    &[6, 30, 56, 82],
    &[6, 30, 58, 86],
    &[6, 34, 62, 90],
    &[6, 28, 50, 72, 94],
    &[6, 26, 50, 74, 98],
    &[6, 30, 54, 78, 102],
    &[6, 28, 54, 80, 106],
    &[6, 32, 58, 84, 110],
    &[6, 30, 58, 86, 114],
    &[6, 34, 62, 90, 118],
    &[6, 26, 50, 74, 98, 122],
    &[6, 30, 54, 78, 102, 126],
    &[6, 26, 52, 78, 104, 130],
    &[6, 30, 56, 82, 108, 134],
    &[6, 34, 60, 86, 112, 138],
    &[6, 30, 58, 86, 114, 142],
    &[6, 34, 62, 90, 118, 146],
    &[6, 30, 54, 78, 102, 126, 150],
    &[6, 24, 50, 76, 102, 128, 154],
    &[6, 28, 54, 80, 106, 132, 158],
    &[6, 32, 58, 84, 110, 136, 162],
    &[6, 26, 54, 82, 110, 138, 166],
    &[6, 30, 58, 86, 114, 142, 170],
];

/// 18-bit BCH-coded version information, versions 7 through 40
const VERSION_INFO: [u32; 34] = [
    0x07C94, 0x085BC, 0x09A99, 0x0A4D3, 0x0BBF6, 0x0C762, 0x0D847, 0x0E60D, 0x0F928, 0x10B78,
    0x1145D, 0x12A17, 0x13532, 0x149A6, 0x15683, 0x168C9, 0x177EC, 0x18EC4, 0x191E1, 0x1AFAB,
    0x1B08E, 0x1CC1A, 0x1D33F, 0x1ED75, 0x1F250, 0x209D5, 0x216F0, 0x228BA, 0x2379F, 0x24B0B,
    0x2542E, 0x26A64, 0x27541, 0x28C69,
];

/// 15-bit masked format information, indexed by (ec_bits << 3) | mask
const FORMAT_INFO: [u16; 32] = [
    0x5412, 0x5125, 0x5E7C, 0x5B4B, 0x45F9, 0x40CE, 0x4F97, 0x4AA0, // M
    0x77C4, 0x72F3, 0x7DAA, 0x789D, 0x662F, 0x6318, 0x6C41, 0x6976, // L
    0x1689, 0x13BE, 0x1CE7, 0x19D0, 0x0762, 0x0255, 0x0D0C, 0x083B, // H
    0x355F, 0x3068, 0x3F31, 0x3A06, 0x24B4, 0x2183, 0x2EDA, 0x2BED, // Q
];

/// One group of identically-shaped RS blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockGroup {
    /// How many blocks in this group
    pub count: usize,
    /// Total codewords per block
    pub total: usize,
    /// Data codewords per block (total - data = ECC)
    pub data: usize,
}

/// Symbol size in modules for a version
pub fn version_size(version: u8) -> usize {
    debug_assert!((1..=40).contains(&version));
    4 * version as usize + 17
}

/// Data-capable modules in the symbol (everything outside function patterns)
pub fn num_raw_data_modules(version: u8) -> usize {
    debug_assert!((1..=40).contains(&version));
    let v = version as usize;
    let mut modules = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        modules -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            modules -= 36;
        }
    }
    modules
}

/// Total codewords in the symbol
pub fn total_codewords(version: u8) -> usize {
    num_raw_data_modules(version) / 8
}

/// Leftover bits that pad the data region (0-7)
pub fn remainder_bits(version: u8) -> usize {
    num_raw_data_modules(version) % 8
}

/// ECC codewords per block for (version, level)
pub fn ecc_per_block(version: u8, ec_level: ECLevel) -> usize {
    ECC_CODEWORDS_PER_BLOCK[ec_level.table_index()][version as usize] as usize
}

/// Number of RS blocks for (version, level)
pub fn num_blocks(version: u8, ec_level: ECLevel) -> usize {
    NUM_ERROR_CORRECTION_BLOCKS[ec_level.table_index()][version as usize] as usize
}

/// RS block layout as one or two groups of (count, total, data)
pub fn rs_blocks(version: u8, ec_level: ECLevel) -> Vec<BlockGroup> {
    let blocks = num_blocks(version, ec_level);
    let ecc = ecc_per_block(version, ec_level);
    let total = total_codewords(version);
    let short_total = total / blocks;
    let short_count = blocks - total % blocks;

    let mut groups = vec![BlockGroup {
        count: short_count,
        total: short_total,
        data: short_total - ecc,
    }];
    if short_count < blocks {
        groups.push(BlockGroup {
            count: blocks - short_count,
            total: short_total + 1,
            data: short_total + 1 - ecc,
        });
    }
    groups
}

/// Data capacity in bits for (version, level)
pub fn max_data_bits(version: u8, ec_level: ECLevel) -> usize {
    8 * (total_codewords(version) - num_blocks(version, ec_level) * ecc_per_block(version, ec_level))
}

/// Alignment pattern centres for a version (empty for version 1)
pub fn alignment_centers(version: u8) -> &'static [usize] {
    ALIGNMENT_PATTERN_CENTERS[version as usize]
}

/// BCH-coded version information word; versions 7-40 only
pub fn version_info(version: u8) -> Option<u32> {
    if (7..=40).contains(&version) {
        Some(VERSION_INFO[version as usize - 7])
    } else {
        None
    }
}

/// Version whose stored info word is within Hamming distance 3 of `bits`
pub fn match_version_info(bits: u32) -> Option<u8> {
    let mut best: Option<(u8, u32)> = None;
    for (i, &stored) in VERSION_INFO.iter().enumerate() {
        let distance = (stored ^ bits).count_ones();
        if distance <= 3 && best.map_or(true, |(_, d)| distance < d) {
            best = Some((i as u8 + 7, distance));
        }
    }
    best.map(|(v, _)| v)
}

/// Masked 15-bit format information word for (level, mask)
pub fn format_info(ec_level: ECLevel, mask: MaskPattern) -> u16 {
    FORMAT_INFO[((ec_level.format_bits() << 3) | mask.id()) as usize]
}

/// (level, mask) whose stored format word is within Hamming distance 3 of `bits`
pub fn match_format_info(bits: u16) -> Option<(ECLevel, MaskPattern)> {
    let mut best: Option<(usize, u32)> = None;
    for (i, &stored) in FORMAT_INFO.iter().enumerate() {
        let distance = (stored ^ bits).count_ones();
        if distance <= 3 && best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| {
        let ec_level = ECLevel::from_format_bits((i >> 3) as u8).expect("two-bit value");
        let mask = MaskPattern::new((i & 0x07) as u8).expect("three-bit value");
        (ec_level, mask)
    })
}
