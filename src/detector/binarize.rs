//! Adaptive greyscale-to-binary conversion with per-region thresholds.
//!
//! The image is split into 8x8-pixel regions. Each region thresholds at its
//! mean, except regions with almost no dynamic range, which borrow from the
//! neighbours already computed above and to the left. The applied threshold
//! is smoothed over a 5x5 window of regions.

use crate::models::BitMatrix;

const REGION_SIZE: usize = 8;
const MIN_DYNAMIC_RANGE: u32 = 24;

/// Binarize a luma buffer; true = dark
pub fn binarize(luma: &[u8], width: usize, height: usize) -> BitMatrix {
    debug_assert!(luma.len() >= width * height);
    let h_regions = (width + REGION_SIZE - 1) / REGION_SIZE;
    let v_regions = (height + REGION_SIZE - 1) / REGION_SIZE;

    // Per-region black point
    let mut black_points = vec![0.0f32; h_regions * v_regions];
    for vr in 0..v_regions {
        for hr in 0..h_regions {
            let x0 = hr * REGION_SIZE;
            let y0 = vr * REGION_SIZE;
            let x1 = (x0 + REGION_SIZE).min(width);
            let y1 = (y0 + REGION_SIZE).min(height);

            let mut sum = 0u32;
            let mut min = u8::MAX;
            let mut max = u8::MIN;
            for y in y0..y1 {
                for x in x0..x1 {
                    let v = luma[y * width + x];
                    sum += v as u32;
                    min = min.min(v);
                    max = max.max(v);
                }
            }
            let count = ((x1 - x0) * (y1 - y0)) as f32;
            let mut average = sum as f32 / count;

            if (max - min) as u32 <= MIN_DYNAMIC_RANGE {
                // Flat region: assume background at half the minimum, unless
                // the neighbours above/left already found a darker scene
                average = min as f32 / 2.0;
                if vr > 0 && hr > 0 {
                    let up = black_points[(vr - 1) * h_regions + hr];
                    let left = black_points[vr * h_regions + hr - 1];
                    let up_left = black_points[(vr - 1) * h_regions + hr - 1];
                    let neighbour_avg = (up + 2.0 * left + up_left) / 4.0;
                    if (min as f32) < neighbour_avg {
                        average = neighbour_avg;
                    }
                }
            }
            black_points[vr * h_regions + hr] = average;
        }
    }

    // Apply the mean threshold of the surrounding 5x5 region window
    let mut out = BitMatrix::new(width, height);
    for vr in 0..v_regions {
        for hr in 0..h_regions {
            let center_x = if h_regions >= 5 {
                hr.clamp(2, h_regions - 3)
            } else {
                hr
            };
            let center_y = if v_regions >= 5 {
                vr.clamp(2, v_regions - 3)
            } else {
                vr
            };

            let mut sum = 0.0f32;
            for dy in -2i32..=2 {
                for dx in -2i32..=2 {
                    let wx = (center_x as i32 + dx).clamp(0, h_regions as i32 - 1) as usize;
                    let wy = (center_y as i32 + dy).clamp(0, v_regions as i32 - 1) as usize;
                    sum += black_points[wy * h_regions + wx];
                }
            }
            let threshold = sum / 25.0;

            let x0 = hr * REGION_SIZE;
            let y0 = vr * REGION_SIZE;
            let x1 = (x0 + REGION_SIZE).min(width);
            let y1 = (y0 + REGION_SIZE).min(height);
            for y in y0..y1 {
                for x in x0..x1 {
                    if luma[y * width + x] as f32 <= threshold {
                        out.set(x, y, true);
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_image_separates_cleanly() {
        let (width, height) = (64, 64);
        let mut luma = vec![250u8; width * height];
        for y in 0..height {
            for x in 0..32 {
                luma[y * width + x] = 0;
            }
        }
        let bin = binarize(&luma, width, height);
        assert!(bin.get(4, 30));
        assert!(bin.get(30, 4));
        assert!(!bin.get(40, 30));
        assert!(!bin.get(60, 60));
    }

    #[test]
    fn uniform_light_image_is_all_light() {
        let luma = vec![200u8; 48 * 48];
        let bin = binarize(&luma, 48, 48);
        assert_eq!(bin.count_set(), 0);
    }

    #[test]
    fn checkerboard_survives_binarization() {
        let (width, height) = (40, 40);
        let mut luma = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                luma[y * width + x] = if (x / 4 + y / 4) % 2 == 0 { 30 } else { 220 };
            }
        }
        let bin = binarize(&luma, width, height);
        assert!(bin.get(1, 1));
        assert!(!bin.get(5, 1));
        assert!(bin.get(5, 5));
    }

    #[test]
    fn odd_sized_images_do_not_panic() {
        let luma = vec![128u8; 13 * 7];
        let bin = binarize(&luma, 13, 7);
        assert_eq!(bin.width(), 13);
        assert_eq!(bin.height(), 7);
    }
}
