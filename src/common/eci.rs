/// Which character set a Byte-mode payload is declared to be in.
///
/// `Default` lets the analyzer pick: ISO-8859-1 with no header when every
/// code point fits in a byte, UTF-8 with an ECI(26) header otherwise.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum EciMode {
    Default,
    Iso8859_1,
    Utf8,
}

/// 8-bit ECI assignment numbers this crate understands, ISO/IEC 18004 Annex F.
pub(crate) const ECI_ISO_8859_1: u8 = 3;
pub(crate) const ECI_UTF8: u8 = 26;

/// The UTF-8 byte order mark, prepended to the payload when `utf8_bom` is set.
pub(crate) const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// True when every `char` in `text` fits in a single ISO-8859-1 byte (code point <= 0xFF).
pub(crate) fn is_iso8859_1_losslessly(text: &str) -> bool {
    text.chars().all(|c| (c as u32) <= 0xFF)
}

/// Byte-encode `text` as ISO-8859-1 (Latin-1): one byte per code point.
///
/// Caller guarantees `is_iso8859_1_losslessly(text)`.
pub(crate) fn encode_iso8859_1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

/// Resolved selection: the ECI header to emit (if any) and the encoded byte payload.
pub(crate) struct ResolvedEci {
    pub header: Option<u8>,
    pub bytes: Vec<u8>,
}

/// Implements spec §4.4/§4.6's ECI selection rule for Byte mode.
pub(crate) fn resolve(text: &str, eci: EciMode, utf8_bom: bool) -> ResolvedEci {
    match eci {
        EciMode::Default => {
            if is_iso8859_1_losslessly(text) {
                ResolvedEci { header: None, bytes: encode_iso8859_1(text) }
            } else {
                ResolvedEci { header: Some(ECI_UTF8), bytes: utf8_bytes(text, utf8_bom) }
            }
        }
        EciMode::Iso8859_1 => {
            ResolvedEci { header: Some(ECI_ISO_8859_1), bytes: encode_iso8859_1(text) }
        }
        EciMode::Utf8 => {
            ResolvedEci { header: Some(ECI_UTF8), bytes: utf8_bytes(text, utf8_bom) }
        }
    }
}

fn utf8_bytes(text: &str, utf8_bom: bool) -> Vec<u8> {
    let (encoded, _, _) = encoding_rs::UTF_8.encode(text);
    let mut bytes = Vec::with_capacity(encoded.len() + 3);
    if utf8_bom {
        bytes.extend_from_slice(&UTF8_BOM);
    }
    bytes.extend_from_slice(&encoded);
    bytes
}

#[cfg(test)]
mod eci_tests {
    use super::*;

    #[test]
    fn test_default_pure_latin1_has_no_header() {
        let resolved = resolve("Zurich", EciMode::Default, false);
        assert_eq!(resolved.header, None);
        assert_eq!(resolved.bytes, b"Zurich");
    }

    #[test]
    fn test_default_latin1_with_accents_has_no_header() {
        let resolved = resolve("Zürich", EciMode::Default, false);
        assert_eq!(resolved.header, None);
        assert_eq!(resolved.bytes, encode_iso8859_1("Zürich"));
    }

    #[test]
    fn test_default_non_latin1_uses_utf8() {
        let resolved = resolve("こんにちは", EciMode::Default, false);
        assert_eq!(resolved.header, Some(ECI_UTF8));
        assert_eq!(resolved.bytes, "こんにちは".as_bytes());
    }

    #[test]
    fn test_explicit_utf8_with_bom() {
        let resolved = resolve("hi", EciMode::Utf8, true);
        assert_eq!(resolved.header, Some(ECI_UTF8));
        assert_eq!(resolved.bytes, [0xEF, 0xBB, 0xBF, b'h', b'i']);
    }

    #[test]
    fn test_explicit_iso8859_1_forces_header() {
        let resolved = resolve("hi", EciMode::Iso8859_1, false);
        assert_eq!(resolved.header, Some(ECI_ISO_8859_1));
        assert_eq!(resolved.bytes, b"hi");
    }
}
