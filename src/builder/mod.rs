//! Core encoding pipeline (C4-C11) plus the fluent [`QrCodeBuilder`] (C0),
//! grounded in the teacher's `QRBuilder::build`.

use crate::common::eci::{self, EciMode};
use crate::common::error::{QrError, QrResult};
use crate::common::mask;
use crate::common::matrix::Matrix;
use crate::common::metadata::{ECLevel, MaskPattern, Version};
use crate::common::mode::{self, Mode, PADDING_CODEWORDS};
use crate::common::rs;
use crate::QrMatrix;

/// Whether `eci` forces Byte mode even when the text is pure numeric or
/// alphanumeric: an explicit non-`Default` ECI request is a statement about
/// the byte representation of the text, which only Byte mode carries.
fn select_mode(text: &str, eci: EciMode) -> Mode {
    if eci != EciMode::Default {
        Mode::Byte
    } else {
        mode::classify(text)
    }
}

/// Bits required to hold `header` (if any), the mode indicator, the
/// character count, and the payload at version `ver` (spec §4.5).
fn required_bits(ver: Version, mode: Mode, has_header: bool, payload_len: usize) -> usize {
    let eci_bits = if has_header { 12 } else { 0 };
    eci_bits + Version::mode_bits() + ver.char_cnt_bits(mode) + mode.encoded_len(payload_len)
}

/// Picks the smallest version able to hold the payload, or validates an
/// explicit one (spec §4.5).
fn select_version(
    ecl: ECLevel,
    mode: Mode,
    has_header: bool,
    payload_len: usize,
    explicit: Option<Version>,
) -> QrResult<Version> {
    if let Some(ver) = explicit {
        if !(1..=40).contains(&ver.0) {
            return Err(QrError::InvalidArgument("version must be in 1..=40"));
        }
        let required = required_bits(ver, mode, has_header, payload_len);
        if required > ver.data_bit_capacity(ecl) {
            return Err(QrError::VersionCapacityExceeded);
        }
        return Ok(ver);
    }

    (1..=40)
        .map(Version)
        .find(|&ver| required_bits(ver, mode, has_header, payload_len) <= ver.data_bit_capacity(ecl))
        .ok_or(QrError::DataTooLong)
}

/// Writes the Numeric/Alphanumeric/Byte payload into `stream` per spec
/// §4.5/§4.6's grouping rules.
fn push_payload(stream: &mut crate::common::bit_utils::BitStream, mode: Mode, bytes: &[u8]) {
    match mode {
        Mode::Numeric => {
            for chunk in bytes.chunks(3) {
                let bits = match chunk.len() {
                    3 => 10,
                    2 => 7,
                    1 => 4,
                    _ => unreachable!("chunks(3) never yields an empty slice"),
                };
                stream.push_bits(mode.encode_chunk(chunk), bits);
            }
        }
        Mode::Alphanumeric => {
            for chunk in bytes.chunks(2) {
                let bits = if chunk.len() == 2 { 11 } else { 6 };
                stream.push_bits(mode.encode_chunk(chunk), bits);
            }
        }
        Mode::Byte => {
            for &b in bytes {
                stream.push_byte(b);
            }
        }
        Mode::Kanji | Mode::Eci | Mode::Terminator => {
            unreachable!("payload mode is always Numeric/Alphanumeric/Byte")
        }
    }
}

/// The full C4-C11 pipeline: analyze, select version, assemble the bit
/// stream, error-correct, interleave, place, and mask. Returns the finished
/// [`Matrix`] plus the version/ECC level/mask actually used.
pub(crate) fn generate(
    text: &str,
    ecl: ECLevel,
    eci: EciMode,
    utf8_bom: bool,
    explicit_version: Option<Version>,
) -> QrResult<(Version, MaskPattern, Matrix)> {
    let mode = select_mode(text, eci);
    if mode == Mode::Kanji {
        return Err(QrError::UnsupportedMode);
    }

    let (header, payload, char_count) = match mode {
        Mode::Byte => {
            let resolved = eci::resolve(text, eci, utf8_bom);
            let char_count = resolved.bytes.len();
            (resolved.header, resolved.bytes, char_count)
        }
        _ => (None, text.as_bytes().to_vec(), text.chars().count()),
    };

    let version = select_version(ecl, mode, header.is_some(), char_count, explicit_version)?;

    let capacity_bits = version.data_bit_capacity(ecl);
    let mut stream = crate::common::bit_utils::BitStream::new(capacity_bits);

    if let Some(assignment) = header {
        stream.push_bits(Mode::Eci as u16, Version::mode_bits());
        stream.push_byte(assignment);
    }
    stream.push_bits(mode as u16, Version::mode_bits());
    stream.push_bits(char_count as u16, version.char_cnt_bits(mode));
    push_payload(&mut stream, mode, &payload);

    let terminator_bits = (capacity_bits - stream.len()).min(4);
    stream.push_bits(0u16, terminator_bits);

    let pad_to_byte = (8 - stream.len() % 8) % 8;
    stream.push_bits(0u16, pad_to_byte);

    let mut toggle = 0usize;
    while stream.len() < capacity_bits {
        stream.push_byte(PADDING_CODEWORDS[toggle]);
        toggle = 1 - toggle;
    }

    let blocks = rs::blockify(stream.data(), version, ecl);
    let interleaved = rs::interleave(&blocks, version);

    let mut matrix = Matrix::new(version);
    matrix.place_data(version, interleaved)?;

    let mask_id = mask::select_best_mask(&matrix, ecl);
    matrix.apply_mask(mask_id, ecl);

    Ok((version, MaskPattern::new(mask_id), matrix))
}

/// Fluent alternative to [`crate::create_qr_code`] (C0), grounded in the
/// teacher's `QRBuilder`.
pub struct QrCodeBuilder<'a> {
    text: &'a str,
    ecl: ECLevel,
    eci: EciMode,
    utf8_bom: bool,
    quiet_zone: usize,
    ver: Option<Version>,
}

impl<'a> QrCodeBuilder<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, ecl: ECLevel::M, eci: EciMode::Default, utf8_bom: false, quiet_zone: 4, ver: None }
    }

    pub fn text(&mut self, text: &'a str) -> &mut Self {
        self.text = text;
        self
    }

    pub fn ec_level(&mut self, ecl: ECLevel) -> &mut Self {
        self.ecl = ecl;
        self
    }

    pub fn eci_mode(&mut self, eci: EciMode) -> &mut Self {
        self.eci = eci;
        self
    }

    pub fn utf8_bom(&mut self, utf8_bom: bool) -> &mut Self {
        self.utf8_bom = utf8_bom;
        self
    }

    pub fn quiet_zone(&mut self, quiet_zone: usize) -> &mut Self {
        self.quiet_zone = quiet_zone;
        self
    }

    pub fn version(&mut self, ver: Version) -> &mut Self {
        self.ver = Some(ver);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.ver = None;
        self
    }

    pub fn metadata(&self) -> String {
        match self.ver {
            Some(v) => format!("{{ Version: {:?}, EC Level: {:?} }}", *v, self.ecl),
            None => format!("{{ Version: None, EC Level: {:?} }}", self.ecl),
        }
    }

    pub fn build(&self) -> QrResult<QrMatrix> {
        println!("\nConstructing QR {}...", self.metadata());
        let result = crate::create_qr_code(
            self.text,
            self.ecl,
            self.eci,
            self.utf8_bom,
            self.quiet_zone,
            self.ver,
        );
        match &result {
            Ok(qr) => println!("QR generated successfully: version {:?}, size {}", *qr.version, qr.size),
            Err(e) => println!("QR generation failed: {e}"),
        }
        result
    }
}
