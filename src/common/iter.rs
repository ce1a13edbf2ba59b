use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Walks a version's grid in the zig-zag order data modules are placed in:
/// column pairs right-to-left, skipping the vertical timing column, alternating
/// upward/downward passes, right cell before left cell within each row.
pub(crate) struct EncRegionIter {
    r: i32,
    c: i32,
    width: i32,
    vert_timing_col: i32,
}

impl EncRegionIter {
    pub fn new(version: Version) -> Self {
        let w = version.width() as i32;
        Self { r: w - 1, c: w - 1, width: w, vert_timing_col: 6 }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i32, i32);
    fn next(&mut self) -> Option<Self::Item> {
        let adjusted_col = if self.c <= self.vert_timing_col { self.c + 1 } else { self.c };
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == self.vert_timing_col + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use super::EncRegionIter;
    use crate::common::metadata::Version;

    #[test]
    fn test_enc_region_iter_covers_every_module_once() {
        for v in 1..=40 {
            let version = Version(v);
            let w = version.width();
            let mut seen = vec![vec![false; w]; w];
            let mut count = 0;
            for (r, c) in EncRegionIter::new(version) {
                assert!(!seen[r as usize][c as usize], "visited ({r},{c}) twice at version {v}");
                seen[r as usize][c as usize] = true;
                count += 1;
            }
            assert_eq!(count, w * w);
        }
    }

    #[test]
    fn test_enc_region_iter_skips_timing_column() {
        let version = Version(1);
        for (_, c) in EncRegionIter::new(version) {
            assert_ne!(c, 6);
        }
    }
}
