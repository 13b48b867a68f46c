/// Data mask removal
use super::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// XOR the format-selected mask out of every data module
pub fn unmask(matrix: &mut BitMatrix, mask: MaskPattern, func: &FunctionMask) {
    let size = matrix.width();
    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask.is_masked(y, x) {
                matrix.toggle(x, y);
            }
        }
    }
}
