/// Numeric mode (0001): three digits per 10 bits, two per 7, one per 4
use crate::bits::BitStream;

/// Decoder for numeric segments
pub struct NumericDecoder;

impl NumericDecoder {
    /// Bits the body of a `count`-digit run occupies
    pub fn body_bits(count: usize) -> usize {
        10 * (count / 3) + [0, 4, 7][count % 3]
    }

    /// Decode `count` digits; `None` when a group encodes an impossible value
    pub fn decode(stream: &mut BitStream, count: usize) -> Option<String> {
        let mut text = String::with_capacity(count);
        let mut remaining = count;
        while remaining > 0 {
            let group = remaining.min(3);
            let bits = [0, 4, 7, 10][group];
            let value = stream.read(bits)?;
            let limit = [0, 10, 100, 1000][group];
            if value >= limit {
                return None;
            }
            match group {
                3 => text.push_str(&format!("{:03}", value)),
                2 => text.push_str(&format!("{:02}", value)),
                _ => text.push_str(&format!("{}", value)),
            }
            remaining -= group;
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitBuffer;

    #[test]
    fn groups_of_three_two_and_one() {
        let mut bb = BitBuffer::new();
        bb.put(12, 10); // "012"
        bb.put(34, 7); // "34"
        bb.put(5, 4); // "5"
        let bytes = bb.as_bytes().to_vec();
        let mut stream = BitStream::new(&bytes);
        assert_eq!(NumericDecoder::decode(&mut stream, 6).unwrap(), "012345");
    }

    #[test]
    fn out_of_range_group_is_invalid() {
        let mut bb = BitBuffer::new();
        bb.put(1000, 10);
        let bytes = bb.as_bytes().to_vec();
        let mut stream = BitStream::new(&bytes);
        assert!(NumericDecoder::decode(&mut stream, 3).is_none());
    }

    #[test]
    fn body_bit_widths() {
        assert_eq!(NumericDecoder::body_bits(5), 17);
        assert_eq!(NumericDecoder::body_bits(6), 20);
        assert_eq!(NumericDecoder::body_bits(7), 24);
    }
}
