//! End-to-end round trips: encode, rasterise in memory, decode. No image
//! assets are involved; every case goes through the full pipeline of
//! binarization, pattern location, perspective sampling, error correction
//! and segment parsing.

use qrcodec::{
    decode, decode_with_options, encode, encode_segments, encode_with_version, DataChunk,
    DecodeOptions, Decoded, ECLevel, EncodeError, InversionAttempts, Segment,
};

const SCALE: usize = 4;
const MARGIN: usize = 4;

fn roundtrip(text: &str, ecl: ECLevel) -> Decoded {
    let qr = encode(text, ecl).unwrap_or_else(|e| panic!("encode {:?}: {}", text, e));
    let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    decode(&rgba, width, height).unwrap_or_else(|| panic!("decode failed for {:?}", text))
}

#[test]
fn numeric_payload_decodes_as_a_numeric_chunk() {
    let decoded = roundtrip("12345", ECLevel::M);
    assert_eq!(decoded.text, "12345");
    assert_eq!(decoded.chunks, vec![DataChunk::Numeric("12345".into())]);
}

#[test]
fn alphanumeric_payload_at_version_one() {
    let qr = encode_with_version("HELLO WORLD", ECLevel::Q, 1).unwrap();
    assert_eq!(qr.size(), 21);
    let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    let decoded = decode(&rgba, width, height).unwrap();
    assert_eq!(decoded.text, "HELLO WORLD");
    assert_eq!(decoded.version, 1);
    assert_eq!(decoded.ec_level, ECLevel::Q);
    assert!(matches!(decoded.chunks[0], DataChunk::Alphanumeric(_)));
}

#[test]
fn utf8_payload_decodes_as_a_byte_chunk() {
    let decoded = roundtrip("Hello, 世界!", ECLevel::M);
    assert_eq!(decoded.text, "Hello, 世界!");
    let expected = [
        0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x2C, 0x20, 0xE4, 0xB8, 0x96, 0xE7, 0x95, 0x8C, 0x21,
    ];
    assert_eq!(decoded.bytes, expected);
    assert_eq!(decoded.chunks, vec![DataChunk::Byte(expected.to_vec())]);
}

#[test]
fn explicit_kanji_segment_round_trips() {
    let segments = [Segment::kanji("漢字").unwrap()];
    let qr = encode_segments(&segments, ECLevel::M, 0).unwrap();
    let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    let decoded = decode(&rgba, width, height).unwrap();
    assert_eq!(decoded.text, "漢字");
    assert_eq!(decoded.bytes, vec![0x8A, 0xBF, 0x8E, 0x9A]);
    assert_eq!(decoded.chunks, vec![DataChunk::Kanji("漢字".into())]);
}

#[test]
fn empty_payload_round_trips() {
    let qr = encode_with_version("", ECLevel::L, 1).unwrap();
    let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    let decoded = decode(&rgba, width, height).unwrap();
    assert!(decoded.text.is_empty());
    assert!(decoded.chunks.is_empty());
}

#[test]
fn rotated_half_turn_still_decodes() {
    let qr = encode("ROTATION TEST 180", ECLevel::M).unwrap();
    let (mut rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    // Rotating an RGBA buffer 180 degrees reverses whole pixels
    let mut reversed = Vec::with_capacity(rgba.len());
    for px in rgba.chunks(4).rev() {
        reversed.extend_from_slice(px);
    }
    rgba = reversed;
    let decoded = decode(&rgba, width, height).unwrap();
    assert_eq!(decoded.text, "ROTATION TEST 180");
}

#[test]
fn mirrored_image_decodes_via_the_transpose_retry() {
    let qr = encode("MIRRORED IMAGE", ECLevel::M).unwrap();
    let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    let mut flipped = vec![0u8; rgba.len()];
    for y in 0..height {
        for x in 0..width {
            let src = (y * width + x) * 4;
            let dst = (y * width + (width - 1 - x)) * 4;
            flipped[dst..dst + 4].copy_from_slice(&rgba[src..src + 4]);
        }
    }
    let decoded = decode(&flipped, width, height).unwrap();
    assert_eq!(decoded.text, "MIRRORED IMAGE");
}

#[test]
fn inverted_image_decodes_with_inversion_attempts() {
    let qr = encode("LIGHT ON DARK", ECLevel::M).unwrap();
    let (mut rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    for (i, v) in rgba.iter_mut().enumerate() {
        if i % 4 != 3 {
            *v = 255 - *v;
        }
    }
    assert!(decode(&rgba, width, height).is_none());
    for inversion in [InversionAttempts::OnlyInvert, InversionAttempts::AttemptBoth] {
        let decoded =
            decode_with_options(&rgba, width, height, &DecodeOptions { inversion }).unwrap();
        assert_eq!(decoded.text, "LIGHT ON DARK");
    }
}

#[test]
fn module_damage_within_ec_capacity_is_corrected() {
    let qr = encode_with_version("DAMAGED BUT READABLE", ECLevel::H, 2).unwrap();
    let (mut rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    // Blank out a handful of modules in the data region
    for (mx, my) in [(11usize, 14usize), (12, 14), (13, 15), (11, 16)] {
        let px = (mx + MARGIN) * SCALE;
        let py = (my + MARGIN) * SCALE;
        for y in py..py + SCALE {
            for x in px..px + SCALE {
                let i = (y * width + x) * 4;
                rgba[i..i + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
    }
    let decoded = decode(&rgba, width, height).unwrap();
    assert_eq!(decoded.text, "DAMAGED BUT READABLE");
}

#[test]
fn versions_with_alignment_patterns_round_trip() {
    for (version, ecl) in [(2u8, ECLevel::M), (4, ECLevel::Q), (7, ECLevel::L)] {
        let text = format!("ALIGN V{} 0123456789", version);
        let qr = encode_with_version(&text, ecl, version).unwrap();
        let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
        let decoded = decode(&rgba, width, height)
            .unwrap_or_else(|| panic!("v{} did not decode", version));
        assert_eq!(decoded.text, text);
        assert_eq!(decoded.version, version);
    }
}

#[test]
fn metadata_matches_the_encoder_choices() {
    let qr = encode("METADATA", ECLevel::Q).unwrap();
    let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    let decoded = decode(&rgba, width, height).unwrap();
    assert_eq!(decoded.version, qr.version);
    assert_eq!(decoded.ec_level, qr.ec_level);
    assert_eq!(decoded.mask.id(), qr.mask.id());
}

#[test]
fn location_geometry_lands_on_the_rendered_symbol() {
    let qr = encode("LOCATION", ECLevel::L).unwrap();
    let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
    let decoded = decode(&rgba, width, height).unwrap();
    let loc = decoded.location;
    // The top-left finder centre sits 3.5 modules into the symbol
    let expected = (MARGIN as f32 + 3.5) * SCALE as f32;
    assert!((loc.top_left.x - expected).abs() < SCALE as f32);
    assert!((loc.top_left.y - expected).abs() < SCALE as f32);
    assert!(loc.top_right.x > loc.top_left.x + 10.0);
    assert!(loc.bottom_left.y > loc.top_left.y + 10.0);
    // Grid corners frame the symbol
    assert!(loc.corners[0].x < loc.corners[1].x);
    assert!(loc.corners[0].y < loc.corners[3].y);
}

#[test]
fn version_autofit_is_monotone() {
    let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 0123456789 ABCDEFGHIJKLMNOPQRSTU";
    let auto = encode(text, ECLevel::Q).unwrap();
    let fitted = auto.version;
    assert!(matches!(
        encode_with_version(text, ECLevel::Q, fitted - 1),
        Err(EncodeError::DataOverflow { .. })
    ));
    for version in fitted..fitted + 3 {
        let qr = encode_with_version(text, ECLevel::Q, version).unwrap();
        assert_eq!(qr.version, version);
        let (rgba, width, height) = qr.render_rgba(SCALE, MARGIN);
        let decoded = decode(&rgba, width, height).unwrap();
        assert_eq!(decoded.text, text);
    }
}

#[test]
fn all_ec_levels_round_trip() {
    for ecl in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
        let decoded = roundtrip("EC LEVEL CHECK 123", ecl);
        assert_eq!(decoded.text, "EC LEVEL CHECK 123");
        assert_eq!(decoded.ec_level, ecl);
    }
}

#[test]
fn longer_payload_spanning_multiple_blocks() {
    let text: String = (0..30).map(|i| format!("SEGMENT {} ", i)).collect();
    let decoded = roundtrip(&text, ECLevel::M);
    assert_eq!(decoded.text, text);
    assert!(decoded.version >= 5);
}

#[test]
fn larger_module_scale_also_decodes() {
    let qr = encode("BIG MODULES", ECLevel::M).unwrap();
    let (rgba, width, height) = qr.render_rgba(7, 5);
    let decoded = decode(&rgba, width, height).unwrap();
    assert_eq!(decoded.text, "BIG MODULES");
}
