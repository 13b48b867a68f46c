/// Codeword extraction along the zig-zag data path
use super::function_mask::FunctionMask;
use crate::models::BitMatrix;

/// Walk the placement path — two-column lanes from the right edge,
/// alternating upward and downward, skipping the vertical timing column —
/// and collect data-module bits in write order
pub fn extract_bits(matrix: &BitMatrix, func: &FunctionMask) -> Vec<bool> {
    let size = matrix.width() as i32;
    let mut bits = Vec::with_capacity((size * size) as usize);

    let mut right = size - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = (right + 1) & 2 == 0;
        for vert in 0..size {
            let y = (if upward { size - 1 - vert } else { vert }) as usize;
            for j in 0..2 {
                let x = (right - j) as usize;
                if !func.is_function(x, y) {
                    bits.push(matrix.get(x, y));
                }
            }
        }
        right -= 2;
    }
    bits
}

/// Pack bits into codewords, most significant bit first; trailing bits that
/// do not fill a byte are the remainder and are dropped
pub fn bits_to_codewords(bits: &[bool]) -> Vec<u8> {
    let mut codewords = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.chunks_exact(8) {
        let mut byte = 0u8;
        for &bit in chunk {
            byte = (byte << 1) | bit as u8;
        }
        codewords.push(byte);
    }
    codewords
}
