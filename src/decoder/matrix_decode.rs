//! From a sampled module grid to a decoded payload: version and format
//! recovery, de-masking, codeword extraction, de-interleaving and
//! Reed-Solomon correction, with a mirrored retry for transposed samples.

use super::bitstream::{bits_to_codewords, extract_bits};
use super::format::FormatInfo;
use super::function_mask::FunctionMask;
use super::modes::{self, DecodedPayload};
use super::unmask::unmask;
use super::version::read_version;
use crate::debug;
use crate::ecc::reed_solomon::ReedSolomonDecoder;
use crate::models::{BitMatrix, ECLevel, MaskPattern};
use crate::tables;

/// Result of decoding one module grid
pub struct MatrixDecodeOutput {
    /// Parsed chunks, text and bytes
    pub payload: DecodedPayload,
    /// Symbol version (1-40)
    pub version: u8,
    /// Error correction level from the format information
    pub ec_level: ECLevel,
    /// Data mask from the format information
    pub mask: MaskPattern,
    /// True when only the diagonal mirror of the grid decoded
    pub mirrored: bool,
}

/// Decode a sampled grid, retrying its diagonal mirror before giving up
pub fn decode_matrix(matrix: &BitMatrix) -> Option<MatrixDecodeOutput> {
    if let Some(output) = decode_oriented(matrix, false) {
        return Some(output);
    }
    decode_oriented(&matrix.transposed(), true)
}

fn decode_oriented(matrix: &BitMatrix, mirrored: bool) -> Option<MatrixDecodeOutput> {
    let size = matrix.width();
    if size < 21 || size > 177 || (size - 17) % 4 != 0 {
        return None;
    }

    // Small symbols carry no version blocks; their size is the version
    let version = if size <= 41 {
        ((size - 17) / 4) as u8
    } else {
        let version = read_version(matrix)?;
        if tables::version_size(version) != size {
            return None;
        }
        version
    };

    let format = FormatInfo::extract(matrix)?;
    let func = FunctionMask::new(version);

    let mut unmasked = matrix.clone();
    unmask(&mut unmasked, format.mask, &func);
    let bits = extract_bits(&unmasked, &func);
    let codewords = bits_to_codewords(&bits);

    let expected = tables::total_codewords(version);
    if codewords.len() < expected {
        return None;
    }
    let data = deinterleave_and_correct(&codewords[..expected], version, format.ec_level)?;
    let payload = modes::decode_segments(&data, version)?;

    if cfg!(debug_assertions) && debug::debug_enabled() {
        eprintln!(
            "MATRIX: v{} {:?} mask {} mirrored={} chunks={}",
            version,
            format.ec_level,
            format.mask.id(),
            mirrored,
            payload.chunks.len()
        );
    }

    Some(MatrixDecodeOutput {
        payload,
        version,
        ec_level: format.ec_level,
        mask: format.mask,
        mirrored,
    })
}

/// Undo the column-major interleave, correct each RS block, and concatenate
/// the data codewords in block order
fn deinterleave_and_correct(
    codewords: &[u8],
    version: u8,
    ec_level: ECLevel,
) -> Option<Vec<u8>> {
    let groups = tables::rs_blocks(version, ec_level);
    let ecc_len = tables::ecc_per_block(version, ec_level);

    let mut data_lens = Vec::new();
    for group in &groups {
        for _ in 0..group.count {
            data_lens.push(group.data);
        }
    }
    let max_data_len = *data_lens.last().expect("at least one block");

    let mut blocks: Vec<Vec<u8>> = data_lens
        .iter()
        .map(|&len| Vec::with_capacity(len + ecc_len))
        .collect();

    let mut index = 0;
    for i in 0..max_data_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            if i < data_lens[b] {
                block.push(codewords[index]);
                index += 1;
            }
        }
    }
    for _ in 0..ecc_len {
        for block in blocks.iter_mut() {
            block.push(codewords[index]);
            index += 1;
        }
    }
    debug_assert_eq!(index, codewords.len());

    let rs = ReedSolomonDecoder::new(ecc_len);
    let mut data = Vec::with_capacity(data_lens.iter().sum());
    for (b, block) in blocks.iter_mut().enumerate() {
        if rs.decode(block).is_err() {
            if cfg!(debug_assertions) && debug::debug_enabled() {
                eprintln!("MATRIX: block {} uncorrectable", b);
            }
            return None;
        }
        data.extend_from_slice(&block[..data_lens[b]]);
    }
    Some(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{encode, encode_segments, encode_with_version, Segment};
    use crate::models::DataChunk;

    #[test]
    fn decodes_the_encoder_output_directly() {
        let qr = encode("MATRIX ROUNDTRIP", ECLevel::M).unwrap();
        let out = decode_matrix(&qr.matrix).unwrap();
        assert_eq!(out.payload.text, "MATRIX ROUNDTRIP");
        assert_eq!(out.version, qr.version);
        assert_eq!(out.ec_level, ECLevel::M);
        assert_eq!(out.mask.id(), qr.mask.id());
        assert!(!out.mirrored);
    }

    #[test]
    fn decodes_a_transposed_grid_via_the_mirror_retry() {
        let qr = encode("MIRROR", ECLevel::L).unwrap();
        let out = decode_matrix(&qr.matrix.transposed()).unwrap();
        assert_eq!(out.payload.text, "MIRROR");
        assert!(out.mirrored);
    }

    #[test]
    fn corrects_codeword_damage_within_capacity() {
        let qr = encode_with_version("DAMAGE OK", ECLevel::H, 1).unwrap();
        // v1-H corrects 8 codewords; flip a couple of whole data modules
        let mut damaged = qr.matrix.clone();
        for x in 9..13 {
            damaged.toggle(x, 12);
        }
        let out = decode_matrix(&damaged).unwrap();
        assert_eq!(out.payload.text, "DAMAGE OK");
    }

    #[test]
    fn multi_block_symbol_round_trips() {
        // v5-Q uses four RS blocks in two groups
        let text = "THE QUICK BROWN FOX JUMPS OVER THE LAZY DOG 0123456789";
        let qr = encode_with_version(text, ECLevel::Q, 5).unwrap();
        assert_eq!(qr.version, 5);
        let out = decode_matrix(&qr.matrix).unwrap();
        assert_eq!(out.payload.text, text);
    }

    #[test]
    fn version_seven_reads_its_version_blocks() {
        let text: String = std::iter::repeat('7').take(200).collect();
        let qr = encode_with_version(&text, ECLevel::L, 7).unwrap();
        assert_eq!(qr.matrix.width(), 45);
        let out = decode_matrix(&qr.matrix).unwrap();
        assert_eq!(out.version, 7);
        assert_eq!(out.payload.text, text);
    }

    #[test]
    fn kanji_segments_round_trip() {
        let segments = [Segment::kanji("漢字").unwrap()];
        let qr = encode_segments(&segments, ECLevel::M, 0).unwrap();
        let out = decode_matrix(&qr.matrix).unwrap();
        assert_eq!(out.payload.text, "漢字");
        assert_eq!(out.payload.bytes, vec![0x8A, 0xBF, 0x8E, 0x9A]);
        assert_eq!(out.payload.chunks, vec![DataChunk::Kanji("漢字".into())]);
    }

    #[test]
    fn empty_symbol_round_trips() {
        let qr = encode_with_version("", ECLevel::L, 1).unwrap();
        let out = decode_matrix(&qr.matrix).unwrap();
        assert!(out.payload.text.is_empty());
        assert!(out.payload.chunks.is_empty());
    }

    #[test]
    fn wrong_sized_matrix_is_rejected() {
        assert!(decode_matrix(&BitMatrix::new(20, 20)).is_none());
        assert!(decode_matrix(&BitMatrix::new(24, 24)).is_none());
    }
}
