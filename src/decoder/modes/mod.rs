//! Typed segment parsing of the corrected data codewords.
//!
//! Modes covered: Numeric, Alphanumeric, Byte, Kanji, plus the ECI and
//! structured-append headers, which are reported as chunks but never
//! interpreted. A stream that runs dry mid-segment yields the chunks
//! gathered so far; an unknown mode indicator fails the decode.

pub mod alphanumeric;
pub mod byte;
pub mod kanji;
pub mod numeric;

use crate::bits::BitStream;
use crate::debug;
use crate::models::DataChunk;

use alphanumeric::AlphanumericDecoder;
use byte::ByteDecoder;
use kanji::KanjiDecoder;
use numeric::NumericDecoder;

/// Fully parsed payload of one symbol
#[derive(Debug, Clone, Default)]
pub struct DecodedPayload {
    /// Raw bytes of the data-bearing chunks, concatenated
    pub bytes: Vec<u8>,
    /// Text of the data-bearing chunks, concatenated
    pub text: String,
    /// All chunks in stream order
    pub chunks: Vec<DataChunk>,
}

/// Width of the character count indicator for a mode at a version
fn char_count_bits(mode: u32, version: u8) -> usize {
    let class = (version as usize + 7) / 17;
    match mode {
        0x1 => [10, 12, 14][class],
        0x2 => [9, 11, 13][class],
        0x4 => [8, 16, 16][class],
        0x8 => [8, 10, 12][class],
        _ => 0,
    }
}

/// Parse the corrected data codewords into typed chunks
pub fn decode_segments(codewords: &[u8], version: u8) -> Option<DecodedPayload> {
    let mut stream = BitStream::new(codewords);
    let mut payload = DecodedPayload::default();

    loop {
        if stream.available() < 4 {
            break;
        }
        let mode = stream.read(4).expect("mode availability checked");

        match mode {
            // Terminator: the fill up to the byte boundary must be zero
            0x0 => {
                let fill_bits = stream.available() % 8;
                if fill_bits > 0 {
                    let fill = stream.read(fill_bits).expect("fill availability checked");
                    if fill != 0 && cfg!(debug_assertions) && debug::debug_enabled() {
                        eprintln!("SEGMENTS: nonzero fill after terminator: {:b}", fill);
                    }
                }
                break;
            }
            0x1 => {
                let Some(count) = read_count(&mut stream, mode, version) else {
                    break;
                };
                if stream.available() < NumericDecoder::body_bits(count) {
                    break;
                }
                let text = NumericDecoder::decode(&mut stream, count)?;
                payload.bytes.extend_from_slice(text.as_bytes());
                payload.text.push_str(&text);
                payload.chunks.push(DataChunk::Numeric(text));
            }
            0x2 => {
                let Some(count) = read_count(&mut stream, mode, version) else {
                    break;
                };
                if stream.available() < AlphanumericDecoder::body_bits(count) {
                    break;
                }
                let text = AlphanumericDecoder::decode(&mut stream, count)?;
                payload.bytes.extend_from_slice(text.as_bytes());
                payload.text.push_str(&text);
                payload.chunks.push(DataChunk::Alphanumeric(text));
            }
            0x4 => {
                let Some(count) = read_count(&mut stream, mode, version) else {
                    break;
                };
                if stream.available() < 8 * count {
                    break;
                }
                let (bytes, text) = ByteDecoder::decode(&mut stream, count)?;
                payload.bytes.extend_from_slice(&bytes);
                payload.text.push_str(&text);
                payload.chunks.push(DataChunk::Byte(bytes));
            }
            0x8 => {
                let Some(count) = read_count(&mut stream, mode, version) else {
                    break;
                };
                if stream.available() < 13 * count {
                    break;
                }
                let (sjis, text) = KanjiDecoder::decode(&mut stream, count)?;
                payload.bytes.extend_from_slice(&sjis);
                payload.text.push_str(&text);
                payload.chunks.push(DataChunk::Kanji(text));
            }
            0x7 => {
                let Some(assignment) = read_eci(&mut stream) else {
                    break;
                };
                payload.chunks.push(DataChunk::Eci(assignment));
            }
            0x3 => {
                if stream.available() < 16 {
                    break;
                }
                let index = stream.read(4).expect("checked") as u8;
                let total = stream.read(4).expect("checked") as u8;
                let parity = stream.read(8).expect("checked") as u8;
                payload.chunks.push(DataChunk::StructuredAppend {
                    index,
                    total,
                    parity,
                });
            }
            // Unknown mode indicator: the stream is not trustworthy
            _ => return None,
        }
    }

    Some(payload)
}

fn read_count(stream: &mut BitStream, mode: u32, version: u8) -> Option<usize> {
    stream.read(char_count_bits(mode, version)).map(|c| c as usize)
}

/// ECI assignment number: 0 / 10 / 110 prefixes select 7, 14 or 21 value bits
fn read_eci(stream: &mut BitStream) -> Option<u32> {
    let first = stream.read(8)?;
    if first & 0x80 == 0 {
        Some(first)
    } else if first & 0xC0 == 0x80 {
        let second = stream.read(8)?;
        Some(((first & 0x3F) << 8) | second)
    } else if first & 0xE0 == 0xC0 {
        let second = stream.read(8)?;
        let third = stream.read(8)?;
        Some(((first & 0x1F) << 16) | (second << 8) | third)
    } else {
        None
    }
}
