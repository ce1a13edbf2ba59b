//! Module matrix construction (spec §4.9/C9): fixed patterns, reservation
//! bit-plane, and zig-zag data placement.

use super::bit_utils::BitStream;
use super::error::{QrError, QrResult};
use super::iter::EncRegionIter;
use super::metadata::{
    Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_QR_MAIN,
    FORMAT_INFO_COORDS_QR_SIDE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL,
    VERSION_INFO_COORDS_TR,
};
use super::metadata::{generate_format_info_qr, generate_version_info, MaskPattern};

/// A module coordinate can be given as a small negative offset from the far
/// edge (e.g. `-8` means "8 modules in from the right/bottom"), mirroring
/// the static coordinate tables in `metadata.rs`. Resolves to `0..width`.
pub(crate) fn wrap_coord(x: i32, width: usize) -> usize {
    let w = width as i32;
    debug_assert!(x >= -w && x < w, "coordinate {x} out of range for width {width}");
    (if x < 0 { x + w } else { x }) as usize
}

/// The module grid plus a parallel reservation bit-plane (spec §9 design
/// note): once a cell is reserved (a finder, separator, timing, alignment,
/// dark module, format-info, or version-info cell) it is never treated as a
/// data cell again, so placement and masking only need a "not reserved"
/// predicate rather than matching on a sentinel baked into the color grid.
#[derive(Debug, Clone)]
pub(crate) struct Matrix {
    width: usize,
    colors: Vec<Color>,
    reserved: Vec<bool>,
}

impl Matrix {
    fn index(&self, r: i32, c: i32) -> usize {
        let r = wrap_coord(r, self.width);
        let c = wrap_coord(c, self.width);
        r * self.width + c
    }

    pub(crate) fn get(&self, r: i32, c: i32) -> Color {
        self.colors[self.index(r, c)]
    }

    fn set(&mut self, r: i32, c: i32, color: Color) {
        let i = self.index(r, c);
        self.colors[i] = color;
    }

    fn reserve(&mut self, r: i32, c: i32) {
        let i = self.index(r, c);
        self.reserved[i] = true;
    }

    pub(crate) fn is_reserved(&self, r: i32, c: i32) -> bool {
        self.reserved[self.index(r, c)]
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    /// Builds the skeleton for `version`: all fixed patterns painted and
    /// reserved, the format-info region reserved (painted later once the
    /// mask is chosen), and version-info painted immediately (it does not
    /// depend on the mask).
    pub(crate) fn new(version: Version) -> Self {
        let width = version.width();
        let mut matrix =
            Self { width, colors: vec![Color::Light; width * width], reserved: vec![false; width * width] };

        matrix.draw_finder_patterns();
        matrix.draw_timing_patterns();
        matrix.draw_alignment_patterns(version);
        matrix.draw_dark_module();
        matrix.reserve_format_area();
        matrix.draw_version_info(version);

        matrix
    }

    // Finder patterns + separators (spec §4.9)
    //--------------------------------------------------------------------

    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    /// Paints a 9x9 block centered on `(r, c)`: the 7x7 nested finder (dark
    /// outer ring, light ring, 3x3 dark center) plus the 1-module light
    /// separator ring around it.
    fn draw_finder_pattern_at(&mut self, r: i32, c: i32) {
        let (dr_left, dr_right) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                let color = match (i, j) {
                    (4 | -4, _) | (_, 4 | -4) => Color::Light,
                    (3 | -3, _) | (_, 3 | -3) => Color::Dark,
                    (2 | -2, _) | (_, 2 | -2) => Color::Light,
                    _ => Color::Dark,
                };
                self.set(r + i, c + j, color);
                self.reserve(r + i, c + j);
            }
        }
    }

    // Timing patterns (spec §4.9)
    //--------------------------------------------------------------------

    fn draw_timing_patterns(&mut self) {
        let w = self.width as i32;
        let last = w - 9;
        self.draw_timing_line(6, 8, 6, last);
        self.draw_timing_line(8, 6, last, 6);
    }

    fn draw_timing_line(&mut self, r1: i32, c1: i32, r2: i32, c2: i32) {
        debug_assert!(r1 == r2 || c1 == c2, "timing line must be horizontal or vertical");
        if r1 == r2 {
            for j in c1..=c2 {
                let color = if j & 1 == 0 { Color::Dark } else { Color::Light };
                self.set(r1, j, color);
                self.reserve(r1, j);
            }
        } else {
            for i in r1..=r2 {
                let color = if i & 1 == 0 { Color::Dark } else { Color::Light };
                self.set(i, c1, color);
                self.reserve(i, c1);
            }
        }
    }

    // Alignment patterns (spec §4.9)
    //--------------------------------------------------------------------

    fn draw_alignment_patterns(&mut self, version: Version) {
        let w = self.width as i32;
        let centers = version.alignment_pattern();
        for &r in centers {
            for &c in centers {
                // Skip the three positions that collide with a finder pattern.
                if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
                    continue;
                }
                self.draw_alignment_pattern_at(r, c);
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i32, c: i32) {
        for i in -2..=2 {
            for j in -2..=2 {
                let color = match (i, j) {
                    (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Color::Dark,
                    _ => Color::Light,
                };
                self.set(r + i, c + j, color);
                self.reserve(r + i, c + j);
            }
        }
    }

    // Dark module (spec §4.9: single dark cell at (4v+9, 8))
    //--------------------------------------------------------------------

    fn draw_dark_module(&mut self) {
        self.set(-8, 8, Color::Dark);
        self.reserve(-8, 8);
    }

    // Format & version information (spec §4.9/§4.11/C11)
    //--------------------------------------------------------------------

    fn reserve_format_area(&mut self) {
        for &(r, c) in FORMAT_INFO_COORDS_QR_MAIN.iter().chain(FORMAT_INFO_COORDS_QR_SIDE.iter()) {
            self.reserve(r, c);
        }
    }

    /// Paints the 15-bit format info twice (spec Figure 25), including the
    /// always-dark module that coincides with one of the side coordinates.
    pub(crate) fn paint_format_bits(&mut self, bits: u32) {
        for (coord, color) in format_info_cells(bits) {
            self.set(coord.0, coord.1, color);
        }
    }

    fn draw_version_info(&mut self, version: Version) {
        if *version < 7 {
            return;
        }
        let info = generate_version_info(version);
        self.draw_version_number(info, &VERSION_INFO_COORDS_BL);
        self.draw_version_number(info, &VERSION_INFO_COORDS_TR);
    }

    fn draw_version_number(&mut self, number: u32, coords: &[(i32, i32)]) {
        let bit_len = VERSION_INFO_BIT_LEN;
        for (i, &(r, c)) in coords.iter().enumerate() {
            let mask = 1 << (bit_len - 1 - i);
            let color = if number & mask != 0 { Color::Dark } else { Color::Light };
            self.set(r, c, color);
            self.reserve(r, c);
        }
    }

    // Data placement (spec §4.9 zig-zag walk)
    //--------------------------------------------------------------------

    /// Walks the zig-zag data region and writes one bit per unreserved
    /// cell. Fails with `Internal` if the stream and the available data
    /// cells don't line up exactly (spec §7: should be unreachable).
    pub(crate) fn place_data(&mut self, version: Version, stream: BitStream) -> QrResult<()> {
        let mut coords = EncRegionIter::new(version);
        for bit in stream {
            let color = if bit { Color::Dark } else { Color::Light };
            loop {
                match coords.next() {
                    Some((r, c)) if !self.is_reserved(r, c) => {
                        self.set(r, c, color);
                        break;
                    }
                    Some(_) => continue,
                    None => {
                        return Err(QrError::Internal(
                            "data stream longer than available data cells",
                        ))
                    }
                }
            }
        }
        for (r, c) in coords {
            if !self.is_reserved(r, c) {
                return Err(QrError::Internal("data stream shorter than available data cells"));
            }
        }
        Ok(())
    }

    // Mask application (spec §4.10/C10)
    //--------------------------------------------------------------------

    /// Toggles every unreserved cell where `mask(r, c)` holds and paints the
    /// final format info for `(ecl, mask_id)`. Applied exactly once, to the
    /// winning mask.
    pub(crate) fn apply_mask(&mut self, mask_id: u8, ecl: ECLevel) {
        let mask_fn = super::mask::predicate(mask_id);
        let w = self.width as i32;
        for r in 0..w {
            for c in 0..w {
                if !self.is_reserved(r, c) && mask_fn(r as usize, c as usize) {
                    let color = self.get(r, c);
                    self.set(r, c, !color);
                }
            }
        }
        let format_bits = generate_format_info_qr(ecl, MaskPattern::new(mask_id));
        self.paint_format_bits(format_bits);
    }

    pub(crate) fn count_dark_modules(&self) -> usize {
        self.colors.iter().filter(|&&c| c == Color::Dark).count()
    }
}

/// The 15 format-info bits, doubled per Figure 25, as `(coord, color)`
/// pairs. Shared between the real matrix (final paint) and the masker's
/// scratch grids (per-candidate scoring), so the bit layout is defined once.
pub(crate) fn format_info_cells(bits: u32) -> Vec<((i32, i32), Color)> {
    let bit_len = FORMAT_INFO_BIT_LEN;
    let mut cells = Vec::with_capacity(31);
    for coords in [&FORMAT_INFO_COORDS_QR_MAIN[..], &FORMAT_INFO_COORDS_QR_SIDE[..]] {
        for (i, &(r, c)) in coords.iter().enumerate() {
            let mask = 1 << (bit_len - 1 - i);
            let color = if bits & mask != 0 { Color::Dark } else { Color::Light };
            cells.push(((r, c), color));
        }
    }
    // The module at (-8, 8) is a fixed dark module per ISO/IEC 18004, not a
    // real format bit, even though it falls on the side coordinate list.
    cells.push(((-8, 8), Color::Dark));
    cells
}

#[cfg(test)]
mod matrix_tests {
    use super::*;

    #[test]
    fn test_finder_pattern_is_nested_rings() {
        let matrix = Matrix::new(Version(1));
        // top-left finder, centered on (3, 3): outer ring dark, next ring
        // light, 3x3 core dark.
        assert_eq!(matrix.get(0, 0), Color::Dark);
        assert_eq!(matrix.get(1, 1), Color::Light);
        assert_eq!(matrix.get(3, 3), Color::Dark);
        assert_eq!(matrix.get(2, 2), Color::Dark);
        for i in 0..7 {
            assert!(matrix.is_reserved(0, i));
            assert!(matrix.is_reserved(i, 0));
        }
    }

    #[test]
    fn test_finder_separator_is_light() {
        let matrix = Matrix::new(Version(1));
        // row/col 7 bound the top-left finder on its inward sides.
        for i in 0..8 {
            assert_eq!(matrix.get(7, i), Color::Light);
            assert_eq!(matrix.get(i, 7), Color::Light);
        }
    }

    #[test]
    fn test_three_finder_patterns_present() {
        let matrix = Matrix::new(Version(1));
        let w = matrix.width() as i32;
        assert_eq!(matrix.get(3, 3), Color::Dark); // top-left center
        assert_eq!(matrix.get(3, w - 4), Color::Dark); // top-right center
        assert_eq!(matrix.get(w - 4, 3), Color::Dark); // bottom-left center
        assert!(!matrix.is_reserved(w - 4, w - 4)); // no bottom-right finder
    }

    #[test]
    fn test_version_1_has_no_alignment_pattern() {
        let matrix = Matrix::new(Version(1));
        assert!(!matrix.is_reserved(18, 18));
    }

    #[test]
    fn test_alignment_pattern_v3() {
        let matrix = Matrix::new(Version(3));
        // v3's single alignment center is at (22, 22)
        assert_eq!(matrix.get(22, 22), Color::Dark);
        assert!(matrix.is_reserved(22, 22));
        assert_eq!(matrix.get(20, 20), Color::Dark);
        assert_eq!(matrix.get(21, 21), Color::Light);
    }

    #[test]
    fn test_dark_module_position() {
        let matrix = Matrix::new(Version(1));
        let w = matrix.width() as i32;
        assert_eq!(matrix.get(4 * 1 + 9, 8), Color::Dark);
        assert_eq!(w - 8, 4 * 1 + 9);
    }

    #[test]
    fn test_version_info_painted_for_v7() {
        let matrix = Matrix::new(Version(7));
        let w = matrix.width() as i32;
        // VERSION_INFO_COORDS_BL's (0, -9) and TR's (-9, 0) both resolve to
        // the same two 6x3 blocks flanking the bottom-left/top-right finders.
        assert!(matrix.is_reserved(0, w - 9));
        assert!(matrix.is_reserved(w - 9, 0));
    }

    #[test]
    fn test_version_info_absent_below_v7() {
        let matrix = Matrix::new(Version(6));
        let w = matrix.width() as i32;
        assert!(!matrix.is_reserved(0, w - 9));
    }

    #[test]
    fn test_place_data_fills_every_unreserved_cell() {
        let version = Version(1);
        let matrix_skeleton = Matrix::new(version);
        let data_cells = (0..matrix_skeleton.width() as i32)
            .flat_map(|r| (0..matrix_skeleton.width() as i32).map(move |c| (r, c)))
            .filter(|&(r, c)| !matrix_skeleton.is_reserved(r, c))
            .count();

        let mut matrix = matrix_skeleton;
        let mut stream = BitStream::new(data_cells);
        for i in 0..data_cells {
            stream.push(i % 2 == 0);
        }
        matrix.place_data(version, stream).unwrap();
    }

    #[test]
    fn test_place_data_rejects_short_stream() {
        let version = Version(1);
        let mut matrix = Matrix::new(version);
        let stream = BitStream::new(1);
        assert!(matrix.place_data(version, stream).is_err());
    }

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(-1, 21), 20);
        assert_eq!(wrap_coord(0, 21), 0);
        assert_eq!(wrap_coord(20, 21), 20);
    }
}
