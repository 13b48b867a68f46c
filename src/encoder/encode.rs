use super::matrix::SymbolBuilder;
use super::segment::Segment;
use super::EncodeError;
use crate::bits::BitBuffer;
use crate::ecc::generator::compute_ecc;
use crate::models::{BitMatrix, ECLevel, MaskPattern};
use crate::tables;

/// An encoded symbol: the module matrix plus the choices that produced it
#[derive(Debug, Clone)]
pub struct EncodedQr {
    /// Module matrix, true = dark
    pub matrix: BitMatrix,
    /// Symbol version (1-40)
    pub version: u8,
    /// Error correction level
    pub ec_level: ECLevel,
    /// Selected data mask
    pub mask: MaskPattern,
}

impl EncodedQr {
    /// Side length in modules
    pub fn size(&self) -> usize {
        self.matrix.width()
    }

    /// Rasterise to an 8-bit greyscale buffer (0x00 dark, 0xFF light) with
    /// `margin` modules of quiet zone on every side
    pub fn render_luma(&self, module_size: usize, margin: usize) -> (Vec<u8>, usize, usize) {
        let side = (self.size() + 2 * margin) * module_size;
        let mut pixels = vec![0xFFu8; side * side];
        for my in 0..self.size() {
            for mx in 0..self.size() {
                if !self.matrix.get(mx, my) {
                    continue;
                }
                let px = (mx + margin) * module_size;
                let py = (my + margin) * module_size;
                for y in py..py + module_size {
                    let row = y * side;
                    for x in px..px + module_size {
                        pixels[row + x] = 0x00;
                    }
                }
            }
        }
        (pixels, side, side)
    }

    /// Rasterise to a tightly-packed RGBA buffer, as the decoder consumes
    pub fn render_rgba(&self, module_size: usize, margin: usize) -> (Vec<u8>, usize, usize) {
        let (luma, width, height) = self.render_luma(module_size, margin);
        let mut rgba = Vec::with_capacity(luma.len() * 4);
        for v in luma {
            rgba.extend_from_slice(&[v, v, v, 0xFF]);
        }
        (rgba, width, height)
    }
}

/// Encode text at the smallest fitting version, choosing the mode automatically
pub fn encode(text: &str, ec_level: ECLevel) -> Result<EncodedQr, EncodeError> {
    encode_with_version(text, ec_level, 0)
}

/// Encode text at an explicit version; version 0 selects automatic fitting
pub fn encode_with_version(
    text: &str,
    ec_level: ECLevel,
    version: u8,
) -> Result<EncodedQr, EncodeError> {
    encode_segments(&Segment::make_segments(text), ec_level, version)
}

/// Encode pre-built segments at an explicit version (0 = automatic)
pub fn encode_segments(
    segments: &[Segment],
    ec_level: ECLevel,
    version: u8,
) -> Result<EncodedQr, EncodeError> {
    let version = resolve_version(segments, ec_level, version)?;
    let capacity_bits = tables::max_data_bits(version, ec_level);

    let mut bb = BitBuffer::new();
    for segment in segments {
        segment.write(version, &mut bb);
    }
    debug_assert!(bb.len() <= capacity_bits);

    // Terminator, byte alignment, then alternating pad bytes
    let terminator = (capacity_bits - bb.len()).min(4);
    if terminator > 0 {
        bb.put(0, terminator);
    }
    let align = (8 - bb.len() % 8) % 8;
    if align > 0 {
        bb.put(0, align);
    }
    for &pad in [0xECu32, 0x11].iter().cycle() {
        if bb.len() >= capacity_bits {
            break;
        }
        bb.put(pad, 8);
    }
    debug_assert_eq!(bb.len(), capacity_bits);

    let codewords = interleave_with_ecc(bb.as_bytes(), version, ec_level);

    let mut builder = SymbolBuilder::new(version, ec_level);
    builder.place_codewords(&codewords);

    // Try all eight masks and keep the lowest penalty; ties fall to the
    // lowest id because the comparison is strict
    let mut best_mask = MaskPattern::new(0).expect("mask 0");
    let mut best_penalty = u32::MAX;
    for id in 0..8u8 {
        let mask = MaskPattern::new(id).expect("mask id");
        builder.apply_mask(mask);
        builder.draw_format(mask);
        let penalty = builder.penalty();
        if penalty < best_penalty {
            best_penalty = penalty;
            best_mask = mask;
        }
        // XOR a second time to restore the unmasked modules
        builder.apply_mask(mask);
    }
    builder.apply_mask(best_mask);
    builder.draw_format(best_mask);

    Ok(EncodedQr {
        matrix: builder.into_matrix(),
        version,
        ec_level,
        mask: best_mask,
    })
}

fn resolve_version(
    segments: &[Segment],
    ec_level: ECLevel,
    version: u8,
) -> Result<u8, EncodeError> {
    let needed = |v: u8| -> Option<usize> {
        segments.iter().try_fold(0usize, |acc, s| {
            s.total_bits(v).map(|bits| acc + bits)
        })
    };

    if version == 0 {
        for v in 1..=40u8 {
            if let Some(bits) = needed(v) {
                if bits <= tables::max_data_bits(v, ec_level) {
                    return Ok(v);
                }
            }
        }
        Err(EncodeError::DataOverflow {
            needed_bits: needed(40).unwrap_or(usize::MAX),
            available_bits: tables::max_data_bits(40, ec_level),
        })
    } else {
        if !(1..=40).contains(&version) {
            return Err(EncodeError::InvalidVersion(version));
        }
        let available = tables::max_data_bits(version, ec_level);
        match needed(version) {
            Some(bits) if bits <= available => Ok(version),
            other => Err(EncodeError::DataOverflow {
                needed_bits: other.unwrap_or(usize::MAX),
                available_bits: available,
            }),
        }
    }
}

/// Split data codewords into RS blocks, append ECC per block, and interleave
/// data column-major across blocks followed by ECC column-major
fn interleave_with_ecc(data: &[u8], version: u8, ec_level: ECLevel) -> Vec<u8> {
    let groups = tables::rs_blocks(version, ec_level);
    let ecc_len = tables::ecc_per_block(version, ec_level);

    let mut blocks: Vec<&[u8]> = Vec::new();
    let mut offset = 0;
    for group in &groups {
        for _ in 0..group.count {
            blocks.push(&data[offset..offset + group.data]);
            offset += group.data;
        }
    }
    debug_assert_eq!(offset, data.len());

    let ecc_blocks: Vec<Vec<u8>> = blocks.iter().map(|b| compute_ecc(b, ecc_len)).collect();

    let max_data_len = blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let mut out = Vec::with_capacity(tables::total_codewords(version));
    for i in 0..max_data_len {
        for block in &blocks {
            if i < block.len() {
                out.push(block[i]);
            }
        }
    }
    for i in 0..ecc_len {
        for ecc in &ecc_blocks {
            out.push(ecc[i]);
        }
    }
    out
}
