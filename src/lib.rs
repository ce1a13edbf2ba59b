#![allow(
    clippy::items_after_test_module,
    mixed_script_confusables,
    clippy::suspicious_arithmetic_impl,
    clippy::suspicious_op_assign_impl
)]

//! QR code generation core (ISO/IEC 18004): analyzes input text, picks the
//! smallest fitting version, assembles and error-corrects the bit stream,
//! places it in a module matrix, and masks it. See [`create_qr_code`] for
//! the one-call entry point, or [`builder::QrCodeBuilder`] for a fluent one.

pub mod builder;
pub(crate) mod common;

pub use builder::QrCodeBuilder;
pub use common::eci::EciMode;
pub use common::error::{QrError, QrResult};
pub use common::metadata::{ECLevel, MaskPattern, Version};

const MIN_QUIET_ZONE: usize = 0;
const MAX_QUIET_ZONE: usize = 10;

/// A finished QR symbol: `modules[r][c]` is `true` for a dark module,
/// including the quiet zone border baked in at construction time.
#[derive(Debug, Clone)]
pub struct QrMatrix {
    pub version: Version,
    pub ecl: ECLevel,
    pub mask: MaskPattern,
    pub size: usize,
    pub modules: Vec<Vec<bool>>,
}

impl QrMatrix {
    fn from_matrix(
        version: Version,
        ecl: ECLevel,
        mask: MaskPattern,
        matrix: &common::matrix::Matrix,
        quiet_zone: usize,
    ) -> Self {
        let inner_size = matrix.width();
        let size = inner_size + 2 * quiet_zone;
        let mut modules = vec![vec![false; size]; size];
        for r in 0..inner_size {
            for c in 0..inner_size {
                modules[r + quiet_zone][c + quiet_zone] =
                    matrix.get(r as i32, c as i32) == common::metadata::Color::Dark;
            }
        }
        Self { version, ecl, mask, size, modules }
    }

    /// Renders the symbol as text, two characters per module so terminal
    /// output reads roughly square.
    pub fn to_ascii(&self) -> String {
        use common::metadata::Color;

        let mut out = String::with_capacity(self.size * (2 * self.size + 1));
        for row in &self.modules {
            for &dark in row {
                let color = if dark { Color::Dark } else { Color::Light };
                out.push_str(color.select("  ", "██"));
            }
            out.push('\n');
        }
        out
    }

    /// Rasterizes the symbol to a grayscale image, `module_size` pixels per
    /// module, dark modules as black.
    pub fn to_gray_image(&self, module_size: u32) -> image::GrayImage {
        let px = self.size as u32 * module_size;
        image::GrayImage::from_fn(px, px, |x, y| {
            let r = (y / module_size) as usize;
            let c = (x / module_size) as usize;
            let dark = self.modules[r][c];
            image::Luma([if dark { 0u8 } else { 255u8 }])
        })
    }
}

/// Encodes `text` into a QR symbol (spec §6).
///
/// `eci_mode` controls how non-ASCII text is transcoded (`EciMode::Default`
/// tries Numeric/Alphanumeric/Byte classification first); `utf8_bom` prefixes
/// the ECI byte payload with a UTF-8 BOM when `eci_mode` is `Utf8`.
/// `quiet_zone` is the light border width in modules (0..=10). `version`
/// pins a specific symbol version (1..=40); `None` picks the smallest version
/// that fits.
pub fn create_qr_code(
    text: &str,
    ecc_level: ECLevel,
    eci_mode: EciMode,
    utf8_bom: bool,
    quiet_zone: usize,
    version: Option<Version>,
) -> QrResult<QrMatrix> {
    if !(MIN_QUIET_ZONE..=MAX_QUIET_ZONE).contains(&quiet_zone) {
        return Err(QrError::InvalidArgument("quiet_zone must be in 0..=10"));
    }

    let (version, mask, matrix) = builder::generate(text, ecc_level, eci_mode, utf8_bom, version)?;
    Ok(QrMatrix::from_matrix(version, ecc_level, mask, &matrix, quiet_zone))
}

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_create_qr_code_rejects_oversized_quiet_zone() {
        let result = create_qr_code("hi", ECLevel::M, EciMode::Default, false, 11, None);
        assert!(matches!(result, Err(QrError::InvalidArgument(_))));
    }

    #[test]
    fn test_create_qr_code_applies_quiet_zone_border() {
        let qr = create_qr_code("hi", ECLevel::M, EciMode::Default, false, 4, None).unwrap();
        assert_eq!(qr.size, 21 + 2 * 4);
        for c in 0..qr.size {
            assert!(!qr.modules[0][c]);
            assert!(!qr.modules[qr.size - 1][c]);
        }
    }

    #[test]
    fn test_create_qr_code_empty_text_is_valid() {
        let result = create_qr_code("", ECLevel::L, EciMode::Default, false, 4, None);
        assert!(result.is_ok());
    }

    #[test]
    fn test_create_qr_code_rejects_oversized_version() {
        let data = "1234567890".repeat(400);
        let result = create_qr_code(&data, ECLevel::H, EciMode::Default, false, 4, Some(Version(10)));
        assert!(matches!(result, Err(QrError::VersionCapacityExceeded)));
    }
}
