/// Byte mode (0100): eight bits per byte, interpreted as UTF-8 where possible
use crate::bits::BitStream;

/// Decoder for byte segments
pub struct ByteDecoder;

impl ByteDecoder {
    /// Decode `count` bytes; the textual form falls back byte-wise on
    /// malformed UTF-8 rather than failing
    pub fn decode(stream: &mut BitStream, count: usize) -> Option<(Vec<u8>, String)> {
        let mut bytes = Vec::with_capacity(count);
        for _ in 0..count {
            bytes.push(stream.read(8)? as u8);
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        Some((bytes, text))
    }
}
