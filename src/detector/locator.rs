//! Finder and alignment pattern location over a binarized image.
//!
//! Rows are scanned for the 1:1:3:1:1 run signature of finder patterns and
//! the 1:1:1 signature of alignment patterns. Overlapping hits on adjacent
//! rows aggregate into quads; quad centres are scored by tracing rays in
//! four directions and measuring how well the runs fit the expected ratios.
//! The best-scoring triple of finder candidates becomes the symbol corners.

use rayon::prelude::*;

use crate::config;
use crate::debug;
use crate::models::{BitMatrix, Point};

/// A located symbol: three finder centres, the alignment point, and the
/// estimated geometry
#[derive(Debug, Clone)]
pub struct SymbolLocation {
    /// Top-left finder pattern centre
    pub top_left: Point,
    /// Top-right finder pattern centre
    pub top_right: Point,
    /// Bottom-left finder pattern centre
    pub bottom_left: Point,
    /// Alignment pattern centre, or its expected position
    pub alignment: Point,
    /// Symbol side length in modules
    pub dimension: usize,
    /// Estimated module pitch in pixels
    pub module_size: f32,
}

/// Horizontal slice of a candidate centre square on one row
#[derive(Debug, Clone, Copy)]
struct Line {
    start_x: f32,
    end_x: f32,
}

/// Vertically-aggregated stack of overlapping lines
#[derive(Debug, Clone, Copy)]
struct Quad {
    top: Line,
    top_y: usize,
    bottom: Line,
    bottom_y: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    center: Point,
    size: f32,
    score: f32,
}

const FINDER_RATIOS: [f32; 5] = [1.0, 1.0, 3.0, 1.0, 1.0];
const ALIGNMENT_RATIOS: [f32; 3] = [1.0, 1.0, 1.0];

/// Locate a QR symbol in a binarized image
pub fn locate(matrix: &BitMatrix) -> Option<SymbolLocation> {
    let (finder_quads, alignment_quads) = collect_quads(matrix);

    let mut finders: Vec<Candidate> = finder_quads
        .iter()
        .filter(|q| q.bottom_y - q.top_y >= 2)
        .filter_map(|q| {
            let x = (q.top.start_x + q.top.end_x + q.bottom.start_x + q.bottom.end_x) / 4.0;
            let y = (q.top_y + q.bottom_y) as f32 / 2.0;
            let center = Point::new(x, y);
            let size = ((q.top.end_x - q.top.start_x) + (q.bottom.end_x - q.bottom.start_x)) / 2.0;
            let score = score_pattern(matrix, &center, &FINDER_RATIOS)?;
            Some(Candidate {
                center,
                size,
                score,
            })
        })
        .collect();
    finders.sort_by(|a, b| a.score.total_cmp(&b.score));

    if cfg!(debug_assertions) && debug::debug_enabled() {
        eprintln!(
            "LOCATE: {} finder quads -> {} scored candidates",
            finder_quads.len(),
            finders.len()
        );
    }
    if finders.len() < 3 {
        return None;
    }

    // Pair each of the strongest candidates with its two best partners,
    // penalising size mismatch, and keep the cheapest triple overall
    let mut best_triple: Option<([Candidate; 3], f32)> = None;
    for seed in finders.iter().take(config::finder_candidate_budget()) {
        let mut others: Vec<Candidate> = finders
            .iter()
            .filter(|c| {
                c.center != seed.center
            })
            .map(|c| Candidate {
                score: c.score + (c.size - seed.size) * (c.size - seed.size) / seed.size,
                ..*c
            })
            .collect();
        others.sort_by(|a, b| a.score.total_cmp(&b.score));
        if others.len() < 2 {
            continue;
        }
        let score = seed.score + others[0].score + others[1].score;
        if best_triple.as_ref().map_or(true, |(_, s)| score < *s) {
            best_triple = Some(([*seed, others[0], others[1]], score));
        }
    }
    let (triple, _) = best_triple?;

    let (top_left, top_right, bottom_left) = orient(&triple);

    // Module pitch from the centre rays of all three patterns
    let sizes = [
        pattern_module_size(matrix, &top_left.center),
        pattern_module_size(matrix, &top_right.center),
        pattern_module_size(matrix, &bottom_left.center),
    ];
    let measured: Vec<f32> = sizes.into_iter().flatten().collect();
    if measured.is_empty() {
        return None;
    }
    let module_size = measured.iter().sum::<f32>() / measured.len() as f32;
    if module_size < 1.0 {
        return None;
    }

    let d_top = top_left.center.distance(top_right.center);
    let d_left = top_left.center.distance(bottom_left.center);
    let mut dimension = (((d_top / module_size).round() as usize)
        + ((d_left / module_size).round() as usize))
        / 2
        + 7;
    match dimension % 4 {
        0 => dimension += 1,
        2 => dimension -= 1,
        3 => dimension += 2,
        _ => {}
    }
    if !(21..=177).contains(&dimension) {
        return None;
    }

    // Expected alignment pattern position, 3 modules in from the implied
    // bottom-right corner
    let modules_between = (d_top + d_left) / 2.0 / module_size;
    let correction = 1.0 - 3.0 / modules_between;
    let br_x = top_right.center.x + bottom_left.center.x - top_left.center.x;
    let br_y = top_right.center.y + bottom_left.center.y - top_left.center.y;
    let expected = Point::new(
        top_left.center.x + correction * (br_x - top_left.center.x),
        top_left.center.y + correction * (br_y - top_left.center.y),
    );

    let alignment = if modules_between >= 15.0 {
        let best = alignment_quads
            .iter()
            .filter_map(|q| {
                let x = (q.top.start_x + q.top.end_x + q.bottom.start_x + q.bottom.end_x) / 4.0;
                let y = (q.top_y + q.bottom_y) as f32 / 2.0;
                let center = Point::new(x, y);
                let score =
                    score_pattern(matrix, &center, &ALIGNMENT_RATIOS)? + center.distance(expected);
                Some((center, score))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        best.map_or(expected, |(center, _)| center)
    } else {
        // Version 1 carries no alignment pattern
        expected
    };

    Some(SymbolLocation {
        top_left: top_left.center,
        top_right: top_right.center,
        bottom_left: bottom_left.center,
        alignment,
        dimension,
        module_size,
    })
}

/// The corner nearest the other two is top-left; the cross product decides
/// which of the remaining pair is top-right
fn orient(triple: &[Candidate; 3]) -> (Candidate, Candidate, Candidate) {
    let d01 = triple[0].center.distance(triple[1].center);
    let d02 = triple[0].center.distance(triple[2].center);
    let d12 = triple[1].center.distance(triple[2].center);

    let (tl, mut a, mut b) = if d12 >= d01 && d12 >= d02 {
        (triple[0], triple[1], triple[2])
    } else if d02 >= d01 {
        (triple[1], triple[0], triple[2])
    } else {
        (triple[2], triple[0], triple[1])
    };

    // In image coordinates (y down), (TR-TL) x (BL-TL) is positive for a
    // correctly-labelled symbol
    let cross = (a.center.x - tl.center.x) * (b.center.y - tl.center.y)
        - (a.center.y - tl.center.y) * (b.center.x - tl.center.x);
    if cross < 0.0 {
        std::mem::swap(&mut a, &mut b);
    }
    (tl, a, b)
}

/// Scan every row for finder/alignment line hits and stack them into quads
fn collect_quads(matrix: &BitMatrix) -> (Vec<Quad>, Vec<Quad>) {
    let height = matrix.height();

    let rows: Vec<(Vec<Line>, Vec<Line>)> = if height >= config::parallel_scan_min_height() {
        (0..height).into_par_iter().map(|y| scan_row(matrix, y)).collect()
    } else {
        (0..height).map(|y| scan_row(matrix, y)).collect()
    };

    let mut finder_quads = QuadTracker::new();
    let mut alignment_quads = QuadTracker::new();
    for (y, (finder_lines, alignment_lines)) in rows.into_iter().enumerate() {
        finder_quads.advance(y, &finder_lines);
        alignment_quads.advance(y, &alignment_lines);
    }
    (finder_quads.finish(), alignment_quads.finish())
}

/// Merges per-row lines into vertically-contiguous quads
struct QuadTracker {
    active: Vec<Quad>,
    done: Vec<Quad>,
}

impl QuadTracker {
    fn new() -> Self {
        Self {
            active: Vec::new(),
            done: Vec::new(),
        }
    }

    fn advance(&mut self, y: usize, lines: &[Line]) {
        // Retire quads the previous row did not extend
        let mut i = 0;
        while i < self.active.len() {
            if self.active[i].bottom_y + 1 < y {
                self.done.push(self.active.swap_remove(i));
            } else {
                i += 1;
            }
        }

        'next_line: for line in lines {
            for quad in &mut self.active {
                if quad.bottom_y + 1 == y && overlaps(&quad.bottom, line) {
                    quad.bottom = *line;
                    quad.bottom_y = y;
                    continue 'next_line;
                }
            }
            self.active.push(Quad {
                top: *line,
                top_y: y,
                bottom: *line,
                bottom_y: y,
            });
        }
    }

    fn finish(mut self) -> Vec<Quad> {
        self.done.append(&mut self.active);
        self.done
    }
}

fn overlaps(a: &Line, b: &Line) -> bool {
    a.start_x <= b.end_x && b.start_x <= a.end_x
}

/// Run-length scan of one row. Finder hits need five runs approximating
/// 1:1:3:1:1 with the new pixel light; alignment hits need three runs
/// approximating 1:1:1 with the new pixel dark.
fn scan_row(matrix: &BitMatrix, y: usize) -> (Vec<Line>, Vec<Line>) {
    let width = matrix.width();
    let mut finder_lines = Vec::new();
    let mut alignment_lines = Vec::new();

    let mut scans = [0usize; 5];
    let mut last_color = matrix.get(0, y);
    let mut run_len = 1usize;

    let check = |scans: &[usize; 5], x: usize, color: bool, finder: &mut Vec<Line>, alignment: &mut Vec<Line>| {
        // Finder: the run that just ended is the rightmost dark flank
        let total: usize = scans.iter().sum();
        if total > 0 && !color && scans.iter().all(|&s| s > 0) {
            let avg = total as f32 / 7.0;
            let fits = (scans[0] as f32 - avg).abs() < avg
                && (scans[1] as f32 - avg).abs() < avg
                && (scans[2] as f32 - 3.0 * avg).abs() < 3.0 * avg
                && (scans[3] as f32 - avg).abs() < avg
                && (scans[4] as f32 - avg).abs() < avg;
            if fits {
                let end_x = (x - scans[3] - scans[4]) as f32;
                finder.push(Line {
                    start_x: end_x - scans[2] as f32,
                    end_x,
                });
            }
        }
        // Alignment: three trailing runs, the new pixel dark
        if color && scans[2] > 0 && scans[3] > 0 && scans[4] > 0 {
            let avg = (scans[2] + scans[3] + scans[4]) as f32 / 3.0;
            let fits = (scans[2] as f32 - avg).abs() < avg
                && (scans[3] as f32 - avg).abs() < avg
                && (scans[4] as f32 - avg).abs() < avg;
            if fits {
                let end_x = (x - scans[4]) as f32;
                alignment.push(Line {
                    start_x: end_x - scans[3] as f32,
                    end_x,
                });
            }
        }
    };

    for x in 1..width {
        let color = matrix.get(x, y);
        if color == last_color {
            run_len += 1;
            continue;
        }
        scans = [scans[1], scans[2], scans[3], scans[4], run_len];
        check(&scans, x, color, &mut finder_lines, &mut alignment_lines);
        last_color = color;
        run_len = 1;
    }
    // Flush the final run as if one more pixel of the opposite colour followed
    scans = [scans[1], scans[2], scans[3], scans[4], run_len];
    check(&scans, width, !last_color, &mut finder_lines, &mut alignment_lines);

    (finder_lines, alignment_lines)
}

/// Squared-error fit of the runs through `center` against `ratios`, summed
/// over four rays, plus the variance of the per-ray module estimates
fn score_pattern(matrix: &BitMatrix, center: &Point, ratios: &[f32]) -> Option<f32> {
    let directions = [(1i32, 0i32), (0, 1), (1, 1), (1, -1)];
    let ratio_total: f32 = ratios.iter().sum();

    let mut error_sum = 0.0f32;
    let mut averages = [0.0f32; 4];
    for (i, &(dx, dy)) in directions.iter().enumerate() {
        let runs = ray_runs(matrix, center, dx, dy, ratios.len())?;
        let total: f32 = runs.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let avg = total / ratio_total;
        averages[i] = avg;
        for (run, ratio) in runs.iter().zip(ratios) {
            let expected = ratio * avg;
            error_sum += (run - expected) * (run - expected);
        }
    }

    let mean = averages.iter().sum::<f32>() / 4.0;
    let size_variance: f32 = averages.iter().map(|a| (a - mean) * (a - mean)).sum();
    Some(error_sum + size_variance)
}

/// Horizontal and vertical 1:1:3:1:1 rays through a finder centre, averaged
/// and divided by 7 to estimate the module pitch
fn pattern_module_size(matrix: &BitMatrix, center: &Point) -> Option<f32> {
    let horizontal: f32 = ray_runs(matrix, center, 1, 0, 5)?.iter().sum();
    let vertical: f32 = ray_runs(matrix, center, 0, 1, 5)?.iter().sum();
    Some((horizontal + vertical) / 14.0)
}

/// Alternating run lengths of a full ray through `center`, which must sit in
/// a dark run. `count` is odd; the centre run is the middle entry.
fn ray_runs(
    matrix: &BitMatrix,
    center: &Point,
    dx: i32,
    dy: i32,
    count: usize,
) -> Option<Vec<f32>> {
    let cx = center.x.floor() as i32;
    let cy = center.y.floor() as i32;
    if cx < 0 || cy < 0 || cx >= matrix.width() as i32 || cy >= matrix.height() as i32 {
        return None;
    }
    if !matrix.get(cx as usize, cy as usize) {
        return None;
    }
    let half = count / 2 + 1;
    let back = trace_half(matrix, cx, cy, -dx, -dy, half)?;
    let forward = trace_half(matrix, cx, cy, dx, dy, half)?;

    let mut runs = Vec::with_capacity(count);
    for i in (1..half).rev() {
        runs.push(back[i]);
    }
    // The centre pixel was counted by both halves
    runs.push(back[0] + forward[0] - 1.0);
    for run in forward.iter().take(half).skip(1) {
        runs.push(*run);
    }
    Some(runs)
}

/// Runs outward from (cx, cy), starting with the dark run under the centre.
/// Fails when the image edge arrives before `half` runs complete.
fn trace_half(
    matrix: &BitMatrix,
    cx: i32,
    cy: i32,
    dx: i32,
    dy: i32,
    half: usize,
) -> Option<Vec<f32>> {
    let w = matrix.width() as i32;
    let h = matrix.height() as i32;
    let mut runs = Vec::with_capacity(half);
    let mut expected = true;
    let mut len = 0u32;
    let (mut x, mut y) = (cx, cy);

    loop {
        let inside = x >= 0 && y >= 0 && x < w && y < h;
        if inside && matrix.get(x as usize, y as usize) == expected {
            len += 1;
            x += dx;
            y += dy;
            continue;
        }
        runs.push(len as f32);
        if runs.len() == half {
            return Some(runs);
        }
        if !inside {
            return None;
        }
        expected = !expected;
        len = 0;
    }
}
