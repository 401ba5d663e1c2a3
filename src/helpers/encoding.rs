//! Text encoding detection and normalization.
//! Converts raw file bytes to UTF-8, the canonical representation the rest of
//! the pipeline operates on.

use encoding_rs::Encoding;
use encoding_rs::UTF_16BE;
use encoding_rs::UTF_16LE;

pub(crate) const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Caller-supplied override for automatic encoding detection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EncodingHint {
    /// Sniff byte-order marks, then validate as UTF-8
    #[default]
    Auto,
    /// Bytes are UTF-8, bypass the validator
    Utf8,
    /// Bytes use the injected legacy code page, bypass the validator
    Legacy,
}

impl EncodingHint {
    /// Parses the configuration spelling: "auto", "utf8"/"utf-8", or "cp<N>".
    /// Returns the hint and the code page number when one is named.
    pub fn parse(name: &str) -> Option<(EncodingHint, Option<u16>)> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "auto" => Some((EncodingHint::Auto, None)),
            "utf8" | "utf-8" => Some((EncodingHint::Utf8, None)),
            _ => name
                .strip_prefix("cp")
                .and_then(|digits| digits.parse().ok())
                .map(|code_page| (EncodingHint::Legacy, Some(code_page))),
        }
    }
}

/// Injected capability for converting legacy code-page bytes to UTF-8.
/// Keeps the pipeline platform-agnostic; `None` means the decoder cannot
/// represent the input and the caller should fall back.
pub trait LegacyDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<String>;
}

/// Library-backed legacy decoder for a single Windows code page.
pub struct CodePageDecoder {
    encoding: &'static Encoding,
}

impl CodePageDecoder {
    /// Creates a decoder for the given Windows code page id, if known.
    pub fn new(code_page: u16) -> Option<CodePageDecoder> {
        codepage::to_encoding(code_page).map(|encoding| CodePageDecoder { encoding })
    }
}

impl LegacyDecoder for CodePageDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<String> {
        let (text, _, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            None
        } else {
            Some(text.into_owned())
        }
    }
}

/// Normalizes raw bytes to UTF-8 text.
///
/// Detection order: UTF-8 BOM, UTF-16 LE/BE BOM, structural UTF-8 validation,
/// injected legacy decoder, lossy UTF-8 passthrough. An explicit hint skips
/// detection entirely. Never fails; ambiguous input degrades to a best-effort
/// lossy conversion.
pub fn decode(bytes: &[u8], hint: EncodingHint, legacy: Option<&dyn LegacyDecoder>) -> String {
    match hint {
        EncodingHint::Utf8 => {
            let rest = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);
            return String::from_utf8_lossy(rest).into_owned();
        }
        EncodingHint::Legacy => {
            return legacy
                .and_then(|decoder| decoder.decode(bytes))
                .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned());
        }
        EncodingHint::Auto => (),
    }

    if let Some(rest) = bytes.strip_prefix(&UTF8_BOM) {
        return String::from_utf8_lossy(rest).into_owned();
    }
    if bytes.starts_with(&UTF16_LE_BOM) {
        let (text, _, _) = UTF_16LE.decode(bytes);
        return text.into_owned();
    }
    if bytes.starts_with(&UTF16_BE_BOM) {
        let (text, _, _) = UTF_16BE.decode(bytes);
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_owned(),
        Err(_) => legacy
            .and_then(|decoder| decoder.decode(bytes))
            .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_strips_utf8_bom() {
        let bytes = [0xEF, 0xBB, 0xBF, b'a', b'b'];
        assert_eq!(decode(&bytes, EncodingHint::Auto, None), "ab");
    }

    #[test]
    fn decode_passes_plain_utf8_through_unchanged() {
        let text = "Idx,Name\n1,물약\n";
        assert_eq!(decode(text.as_bytes(), EncodingHint::Auto, None), text);
    }

    #[test]
    fn decode_utf16_little_endian_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "héllo".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&bytes, EncodingHint::Auto, None), "héllo");
    }

    #[test]
    fn decode_utf16_big_endian_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "héllo".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode(&bytes, EncodingHint::Auto, None), "héllo");
    }

    #[test]
    fn decode_invalid_utf8_uses_legacy_decoder() {
        // 0xE9 is "é" in Windows-1252 but not valid UTF-8 on its own
        let decoder = CodePageDecoder::new(1252).expect("cp1252");
        assert_eq!(decode(&[b'c', 0xE9], EncodingHint::Auto, Some(&decoder)), "cé");
    }

    #[test]
    fn decode_invalid_utf8_without_decoder_is_lossy() {
        let text = decode(&[b'a', 0xFF, b'b'], EncodingHint::Auto, None);
        assert_eq!(text, "a\u{FFFD}b");
    }

    #[test]
    fn decode_legacy_hint_bypasses_validation() {
        let decoder = CodePageDecoder::new(1252).expect("cp1252");
        // "é" is valid UTF-8 bytes, but the hint forces the code-page reading
        assert_eq!(decode("é".as_bytes(), EncodingHint::Legacy, Some(&decoder)), "Ã©");
    }

    #[test]
    fn hint_parses_configuration_spellings() {
        assert_eq!(EncodingHint::parse("auto"), Some((EncodingHint::Auto, None)));
        assert_eq!(EncodingHint::parse("UTF-8"), Some((EncodingHint::Utf8, None)));
        assert_eq!(EncodingHint::parse("cp949"), Some((EncodingHint::Legacy, Some(949))));
        assert_eq!(EncodingHint::parse("latin1"), None);
    }
}
