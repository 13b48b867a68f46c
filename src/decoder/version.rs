/// Version information recovery for symbols of version 7 and above
use crate::models::BitMatrix;
use crate::tables;

/// Read both 18-bit version blocks and match against the stored words
/// within Hamming distance 3
pub fn read_version(matrix: &BitMatrix) -> Option<u8> {
    let size = matrix.width();
    if size < 45 {
        return None;
    }

    // Bit i sits at (size-11 + i%3, i/3) and mirrored at the transpose
    let mut top_right = 0u32;
    let mut bottom_left = 0u32;
    for i in 0..18 {
        let a = size - 11 + i % 3;
        let b = i / 3;
        top_right |= (matrix.get(a, b) as u32) << i;
        bottom_left |= (matrix.get(b, a) as u32) << i;
    }

    tables::match_version_info(top_right).or_else(|| tables::match_version_info(bottom_left))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_version(matrix: &mut BitMatrix, info: u32) {
        let size = matrix.width();
        for i in 0..18 {
            let bit = (info >> i) & 1 == 1;
            let a = size - 11 + i % 3;
            let b = i / 3;
            matrix.set(a, b, bit);
            matrix.set(b, a, bit);
        }
    }

    #[test]
    fn clean_version_blocks_decode() {
        for version in [7u8, 10, 25, 40] {
            let size = tables::version_size(version);
            let mut m = BitMatrix::new(size, size);
            write_version(&mut m, tables::version_info(version).unwrap());
            assert_eq!(read_version(&m), Some(version));
        }
    }

    #[test]
    fn three_errors_per_block_are_tolerated() {
        let size = tables::version_size(12);
        let mut m = BitMatrix::new(size, size);
        write_version(&mut m, tables::version_info(12).unwrap());
        // Flip three bits of the top-right block only
        for i in [0usize, 7, 16] {
            m.toggle(size - 11 + i % 3, i / 3);
        }
        assert_eq!(read_version(&m), Some(12));
    }

    #[test]
    fn small_symbols_have_no_version_info() {
        let m = BitMatrix::new(41, 41);
        assert_eq!(read_version(&m), None);
    }
}
