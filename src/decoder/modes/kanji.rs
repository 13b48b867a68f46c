/// Kanji mode (1000): 13-bit values reconstructing two-byte Shift-JIS codes
use crate::bits::BitStream;
use crate::charset;

/// Decoder for Kanji segments
pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Decode `count` characters, returning the reconstructed Shift-JIS
    /// bytes alongside the text; `None` when a code has no Unicode mapping
    pub fn decode(stream: &mut BitStream, count: usize) -> Option<(Vec<u8>, String)> {
        let mut sjis = Vec::with_capacity(count * 2);
        for _ in 0..count {
            let value = stream.read(13)?;
            let assembled = ((value / 0xC0) << 8) | (value % 0xC0);
            let code = if assembled < 0x1F00 {
                assembled + 0x8140
            } else {
                assembled + 0xC140
            };
            sjis.push((code >> 8) as u8);
            sjis.push((code & 0xFF) as u8);
        }
        let text = charset::decode_sjis(&sjis)?;
        Some((sjis, text))
    }
}
