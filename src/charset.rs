//! Unicode <-> Shift-JIS conversion for Kanji mode, backed by the
//! `encoding_rs` codec.

use encoding_rs::SHIFT_JIS;

/// Encode text as Shift-JIS bytes; `None` when any character is unmappable
pub fn encode_sjis(text: &str) -> Option<Vec<u8>> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    if had_errors {
        None
    } else {
        Some(bytes.into_owned())
    }
}

/// Decode Shift-JIS bytes to text; `None` on malformed sequences
pub fn decode_sjis(bytes: &[u8]) -> Option<String> {
    let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// True when the Shift-JIS code falls in the two-byte ranges Kanji mode
/// can carry (0x8140-0x9FFC or 0xE040-0xEBBF)
pub fn in_kanji_range(code: u16) -> bool {
    (0x8140..=0x9FFC).contains(&code) || (0xE040..=0xEBBF).contains(&code)
}
