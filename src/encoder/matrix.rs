use crate::models::{BitMatrix, ECLevel, MaskPattern};
use crate::tables;

/// Module matrix under construction: function patterns first, then data
/// placement, mask trials and penalty scoring.
///
/// Two bitmaps track state: `modules` holds colours, `function` marks cells
/// owned by function patterns (including reserved format/version cells).
/// Every non-function cell is written exactly once by `place_codewords`, so
/// no unset module can be observed in the finished symbol.
pub struct SymbolBuilder {
    size: usize,
    version: u8,
    ec_level: ECLevel,
    modules: BitMatrix,
    function: BitMatrix,
}

impl SymbolBuilder {
    pub fn new(version: u8, ec_level: ECLevel) -> Self {
        let size = tables::version_size(version);
        let mut builder = Self {
            size,
            version,
            ec_level,
            modules: BitMatrix::new(size, size),
            function: BitMatrix::new(size, size),
        };
        builder.draw_function_patterns();
        builder
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The finished module matrix
    pub fn into_matrix(self) -> BitMatrix {
        self.modules
    }

    fn draw_function_patterns(&mut self) {
        let size = self.size;

        // Timing patterns on row 6 and column 6
        for i in 0..size {
            self.set_function(6, i, i % 2 == 0);
            self.set_function(i, 6, i % 2 == 0);
        }

        // Finder patterns with their separators, clipped at the edges
        self.draw_finder(3, 3);
        self.draw_finder(size - 4, 3);
        self.draw_finder(3, size - 4);

        // Alignment patterns everywhere except the three finder corners
        let centers = tables::alignment_centers(self.version);
        let last = centers.len().wrapping_sub(1);
        for (i, &cy) in centers.iter().enumerate() {
            for (j, &cx) in centers.iter().enumerate() {
                let in_finder =
                    (i == 0 && j == 0) || (i == 0 && j == last) || (i == last && j == 0);
                if !in_finder {
                    self.draw_alignment(cx, cy);
                }
            }
        }

        // Reserve the format strips with a provisional mask-0 word
        self.draw_format(MaskPattern::new(0).expect("mask 0"));
        self.draw_version_info();
    }

    fn draw_finder(&mut self, cx: usize, cy: usize) {
        for dy in -4i32..=4 {
            for dx in -4i32..=4 {
                let x = cx as i32 + dx;
                let y = cy as i32 + dy;
                if x < 0 || y < 0 || x >= self.size as i32 || y >= self.size as i32 {
                    continue;
                }
                // Chebyshev rings: dark core and border, light ring and separator
                let dist = dx.abs().max(dy.abs());
                self.set_function(x as usize, y as usize, dist != 2 && dist != 4);
            }
        }
    }

    fn draw_alignment(&mut self, cx: usize, cy: usize) {
        for dy in -2i32..=2 {
            for dx in -2i32..=2 {
                let x = (cx as i32 + dx) as usize;
                let y = (cy as i32 + dy) as usize;
                self.set_function(x, y, dx.abs().max(dy.abs()) != 1);
            }
        }
    }

    /// Write the 15-bit format word in both locations plus the dark module
    pub fn draw_format(&mut self, mask: MaskPattern) {
        let bits = tables::format_info(self.ec_level, mask) as u32;
        let size = self.size;

        // Copy around the top-left finder
        for i in 0..6 {
            self.set_function(8, i, bit(bits, i));
        }
        self.set_function(8, 7, bit(bits, 6));
        self.set_function(8, 8, bit(bits, 7));
        self.set_function(7, 8, bit(bits, 8));
        for i in 9..15 {
            self.set_function(14 - i, 8, bit(bits, i));
        }

        // Copy split between top-right and bottom-left
        for i in 0..8 {
            self.set_function(size - 1 - i, 8, bit(bits, i));
        }
        for i in 8..15 {
            self.set_function(8, size - 15 + i, bit(bits, i));
        }

        self.set_function(8, size - 8, true);
    }

    fn draw_version_info(&mut self) {
        let Some(info) = tables::version_info(self.version) else {
            return;
        };
        for i in 0..18 {
            let value = bit(info, i);
            let a = self.size - 11 + i % 3;
            let b = i / 3;
            self.set_function(a, b, value);
            self.set_function(b, a, value);
        }
    }

    fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        self.modules.set(x, y, dark);
        self.function.set(x, y, true);
    }

    /// Place interleaved codewords along the zig-zag path. Remainder bits
    /// (0-7 depending on version) stay light.
    pub fn place_codewords(&mut self, data: &[u8]) {
        let size = self.size as i32;
        let mut bit_index = 0usize;
        let total_bits = data.len() * 8;

        let mut right = size - 1;
        while right >= 1 {
            // The vertical timing column is not part of any lane
            if right == 6 {
                right = 5;
            }
            let upward = (right + 1) & 2 == 0;
            for vert in 0..size {
                let y = if upward { size - 1 - vert } else { vert };
                for j in 0..2 {
                    let x = (right - j) as usize;
                    if self.function.get(x, y as usize) || bit_index >= total_bits {
                        continue;
                    }
                    let dark = (data[bit_index >> 3] >> (7 - (bit_index & 7))) & 1 == 1;
                    self.modules.set(x, y as usize, dark);
                    bit_index += 1;
                }
            }
            right -= 2;
        }
        debug_assert_eq!(bit_index, total_bits, "data did not fill the symbol");
    }

    /// XOR the mask over all data modules; applying twice restores the matrix
    pub fn apply_mask(&mut self, mask: MaskPattern) {
        for y in 0..self.size {
            for x in 0..self.size {
                if !self.function.get(x, y) && mask.is_masked(y, x) {
                    self.modules.toggle(x, y);
                }
            }
        }
    }

    /// Penalty score over the four ISO 18004 rules
    pub fn penalty(&self) -> u32 {
        let size = self.size;
        let mut score = 0u32;

        // Rule 1: runs of 5 or more identical modules in a row or column
        for y in 0..size {
            let mut run_color = self.modules.get(0, y);
            let mut run_len = 1u32;
            for x in 1..size {
                let color = self.modules.get(x, y);
                if color == run_color {
                    run_len += 1;
                } else {
                    score += run_penalty(run_len);
                    run_color = color;
                    run_len = 1;
                }
            }
            score += run_penalty(run_len);
        }
        for x in 0..size {
            let mut run_color = self.modules.get(x, 0);
            let mut run_len = 1u32;
            for y in 1..size {
                let color = self.modules.get(x, y);
                if color == run_color {
                    run_len += 1;
                } else {
                    score += run_penalty(run_len);
                    run_color = color;
                    run_len = 1;
                }
            }
            score += run_penalty(run_len);
        }

        // Rule 2: solid 2x2 blocks
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let color = self.modules.get(x, y);
                if color == self.modules.get(x + 1, y)
                    && color == self.modules.get(x, y + 1)
                    && color == self.modules.get(x + 1, y + 1)
                {
                    score += 3;
                }
            }
        }

        // Rule 3: the 1:1:3:1:1 finder-like sequence in rows and columns
        const FINDER_SEQ: [bool; 7] = [true, false, true, true, true, false, true];
        for y in 0..size {
            for x in 0..size - 6 {
                if (0..7).all(|k| self.modules.get(x + k, y) == FINDER_SEQ[k]) {
                    score += 40;
                }
            }
        }
        for x in 0..size {
            for y in 0..size - 6 {
                if (0..7).all(|k| self.modules.get(x, y + k) == FINDER_SEQ[k]) {
                    score += 40;
                }
            }
        }

        // Rule 4: dark-module balance in 5% steps away from 50%
        let dark = self.modules.count_set();
        let total = size * size;
        let percent = (dark * 100 / total) as i32;
        score += 10 * ((percent - 50).unsigned_abs() / 5);

        score
    }
}

fn run_penalty(len: u32) -> u32 {
    if len >= 5 {
        3 + (len - 5)
    } else {
        0
    }
}

fn bit(value: u32, index: usize) -> bool {
    (value >> index) & 1 == 1
}
