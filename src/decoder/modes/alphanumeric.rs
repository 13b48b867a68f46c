/// Alphanumeric mode (0010): two characters per 11 bits, one per 6
use crate::bits::BitStream;

const ALPHANUMERIC_TABLE: [char; 45] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ', '$',
    '%', '*', '+', '-', '.', '/', ':',
];

/// Decoder for alphanumeric segments
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Bits the body of a `count`-character run occupies
    pub fn body_bits(count: usize) -> usize {
        11 * (count / 2) + 6 * (count % 2)
    }

    /// Decode `count` characters; `None` when a value exceeds the alphabet
    pub fn decode(stream: &mut BitStream, count: usize) -> Option<String> {
        let mut text = String::with_capacity(count);
        let mut remaining = count;
        while remaining >= 2 {
            let value = stream.read(11)?;
            let first = (value / 45) as usize;
            let second = (value % 45) as usize;
            if first >= 45 {
                return None;
            }
            text.push(ALPHANUMERIC_TABLE[first]);
            text.push(ALPHANUMERIC_TABLE[second]);
            remaining -= 2;
        }
        if remaining == 1 {
            let value = stream.read(6)? as usize;
            if value >= 45 {
                return None;
            }
            text.push(ALPHANUMERIC_TABLE[value]);
        }
        Some(text)
    }
}
