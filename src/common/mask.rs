//! Mask pattern selection and penalty scoring (spec §4.10/C10).
//!
//! The eight predicates below follow ISO/IEC 18004 Table 23's literal
//! numbering. Candidates are scored against scratch grids built from the
//! matrix's existing colors plus the per-candidate data toggle and format
//! bits, rather than by cloning the whole [`crate::common::matrix::Matrix`]
//! (reservation plane included) eight times over.

use super::matrix::{format_info_cells, wrap_coord, Matrix};
use super::metadata::{generate_format_info_qr, Color, ECLevel, MaskPattern};

pub(crate) fn predicate(id: u8) -> fn(usize, usize) -> bool {
    match id {
        0 => |r, c| (r + c) % 2 == 0,
        1 => |r, _c| r % 2 == 0,
        2 => |_r, c| c % 3 == 0,
        3 => |r, c| (r + c) % 3 == 0,
        4 => |r, c| (r / 2 + c / 3) % 2 == 0,
        5 => |r, c| (r * c) % 2 + (r * c) % 3 == 0,
        6 => |r, c| ((r * c) % 2 + (r * c) % 3) % 2 == 0,
        7 => |r, c| ((r + c) % 2 + (r * c) % 3) % 2 == 0,
        _ => unreachable!("mask id must be 0..8: {id}"),
    }
}

/// Builds the post-mask, post-format-paint color grid for candidate
/// `mask_id` without mutating `matrix`, for scoring only.
fn render_candidate(matrix: &Matrix, ecl: ECLevel, mask_id: u8) -> Vec<Color> {
    let w = matrix.width();
    let mask_fn = predicate(mask_id);
    let mut grid = Vec::with_capacity(w * w);
    for r in 0..w {
        for c in 0..w {
            let (ri, ci) = (r as i32, c as i32);
            let mut color = matrix.get(ri, ci);
            if !matrix.is_reserved(ri, ci) && mask_fn(r, c) {
                color = !color;
            }
            grid.push(color);
        }
    }

    let format_bits = generate_format_info_qr(ecl, MaskPattern::new(mask_id));
    for (coord, color) in format_info_cells(format_bits) {
        let (r, c) = (wrap_coord(coord.0, w), wrap_coord(coord.1, w));
        grid[r * w + c] = color;
    }
    grid
}

// Penalty scoring (ISO/IEC 18004 §8.8.2, rules N1-N4)
//------------------------------------------------------------------------------

fn n1_penalty(grid: &[Color], w: usize) -> u32 {
    let mut penalty = 0;
    for r in 0..w {
        penalty += run_penalty((0..w).map(|c| grid[r * w + c]));
    }
    for c in 0..w {
        penalty += run_penalty((0..w).map(|r| grid[r * w + c]));
    }
    penalty
}

fn run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let mut penalty = 0;
    let mut run_color = None;
    let mut run_len = 0u32;
    for color in line {
        if Some(color) == run_color {
            run_len += 1;
        } else {
            if run_len >= 5 {
                penalty += 3 + (run_len - 5);
            }
            run_color = Some(color);
            run_len = 1;
        }
    }
    if run_len >= 5 {
        penalty += 3 + (run_len - 5);
    }
    penalty
}

fn n2_penalty(grid: &[Color], w: usize) -> u32 {
    let mut penalty = 0;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let tl = grid[r * w + c];
            if tl == grid[r * w + c + 1] && tl == grid[(r + 1) * w + c] && tl == grid[(r + 1) * w + c + 1]
            {
                penalty += 3;
            }
        }
    }
    penalty
}

const FINDER_LIKE: [Color; 7] = {
    use Color::{Dark as D, Light as L};
    [D, L, D, D, D, L, D]
};

fn n3_penalty(grid: &[Color], w: usize) -> u32 {
    let mut penalty = 0;
    for r in 0..w {
        penalty += n3_line_penalty((0..w).map(|c| grid[r * w + c]).collect::<Vec<_>>().as_slice());
    }
    for c in 0..w {
        penalty += n3_line_penalty((0..w).map(|r| grid[r * w + c]).collect::<Vec<_>>().as_slice());
    }
    penalty
}

fn n3_line_penalty(line: &[Color]) -> u32 {
    let w = line.len();
    if w < 7 {
        return 0;
    }
    let mut penalty = 0;
    for i in 0..=w - 7 {
        if line[i..i + 7] != FINDER_LIKE {
            continue;
        }
        let light_before = i >= 4 && (i - 4..i).all(|j| line[j] == Color::Light);
        let light_after = i + 11 <= w && (i + 7..i + 11).all(|j| line[j] == Color::Light);
        if light_before {
            penalty += 40;
        }
        if light_after {
            penalty += 40;
        }
    }
    penalty
}

fn n4_penalty(grid: &[Color], w: usize) -> u32 {
    let total = (w * w) as i64;
    let dark = grid.iter().filter(|&&c| c == Color::Dark).count() as i64;
    let percent = (dark * 100 + total / 2) / total;
    let diff = (percent - 50).unsigned_abs();
    10 * (diff / 5) as u32
}

fn score(grid: &[Color], w: usize) -> u32 {
    n1_penalty(grid, w) + n2_penalty(grid, w) + n3_penalty(grid, w) + n4_penalty(grid, w)
}

/// Scores all eight candidate masks and returns the lowest-scoring id,
/// ties broken by the lowest id (spec §4.10).
pub(crate) fn select_best_mask(matrix: &Matrix, ecl: ECLevel) -> u8 {
    let w = matrix.width();
    (0..8u8)
        .map(|id| (id, score(&render_candidate(matrix, ecl, id), w)))
        .min_by_key(|&(id, score)| (score, id))
        .map(|(id, _)| id)
        .expect("eight candidates are always scored")
}
