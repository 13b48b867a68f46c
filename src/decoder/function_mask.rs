use crate::models::BitMatrix;
use crate::tables;

/// Function-module map for one version: true marks cells that carry finder,
/// timing, alignment, format or version information rather than data.
pub struct FunctionMask {
    mask: BitMatrix,
}

impl FunctionMask {
    pub fn new(version: u8) -> Self {
        let size = tables::version_size(version);
        let mut mask = BitMatrix::new(size, size);

        // Finder patterns with their separators and adjacent format strips.
        // Top-left: 9x9 including both format strips; top-right: 8 columns
        // by 9 rows; bottom-left: 9 columns by 8 rows.
        for y in 0..9 {
            for x in 0..9 {
                mask.set(x, y, true);
                if x < 8 {
                    mask.set(size - 1 - x, y, true);
                }
                if y < 8 {
                    mask.set(x, size - 1 - y, true);
                }
            }
        }

        // Timing row and column
        for i in 0..size {
            mask.set(6, i, true);
            mask.set(i, 6, true);
        }

        // Alignment patterns, skipping the three finder corners
        let centers = tables::alignment_centers(version);
        let last = centers.len().wrapping_sub(1);
        for (i, &cy) in centers.iter().enumerate() {
            for (j, &cx) in centers.iter().enumerate() {
                let in_finder =
                    (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
                if in_finder {
                    continue;
                }
                for dy in 0..5 {
                    for dx in 0..5 {
                        mask.set(cx - 2 + dx, cy - 2 + dy, true);
                    }
                }
            }
        }

        // Version blocks for v7+
        if version >= 7 {
            for i in 0..18 {
                let a = size - 11 + i % 3;
                let b = i / 3;
                mask.set(a, b, true);
                mask.set(b, a, true);
            }
        }

        Self { mask }
    }

    pub fn size(&self) -> usize {
        self.mask.width()
    }

    pub fn is_function(&self, x: usize, y: usize) -> bool {
        self.mask.get(x, y)
    }

    /// Cells available to data and remainder bits
    pub fn data_module_count(&self) -> usize {
        let size = self.mask.width();
        size * size - self.mask.count_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_cells_match_the_capacity_formula() {
        for version in [1u8, 2, 6, 7, 13, 21, 35, 40] {
            let mask = FunctionMask::new(version);
            assert_eq!(
                mask.data_module_count(),
                tables::num_raw_data_modules(version),
                "v{}",
                version
            );
        }
    }

    #[test]
    fn corners_and_timing_are_function_cells() {
        let mask = FunctionMask::new(2);
        let size = mask.size();
        assert!(mask.is_function(0, 0));
        assert!(mask.is_function(size - 1, 0));
        assert!(mask.is_function(0, size - 1));
        assert!(mask.is_function(8, 8));
        assert!(mask.is_function(10, 6));
        assert!(mask.is_function(6, 10));
        // The v2 alignment pattern at (18, 18)
        assert!(mask.is_function(18, 18));
        assert!(mask.is_function(16, 20));
        // But its surroundings are data
        assert!(!mask.is_function(15, 18));
        assert!(!mask.is_function(size - 1, size - 1));
    }
}
