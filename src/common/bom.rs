//! Byte Order Mark (BOM) utilities for markup parts.
//!
//! OOXML producers write parts as UTF-8 (with or without a BOM) and, rarely,
//! as UTF-16 with a BOM. Parts are decoded to `String` for parsing and encoded
//! back to the same byte form when re-serialized.

use encoding_rs::{UTF_16BE, UTF_16LE};

/// UTF-8 BOM bytes.
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
/// UTF-16 little-endian BOM bytes.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
/// UTF-16 big-endian BOM bytes.
pub const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Byte encoding of a markup part as found in the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceEncoding {
    /// UTF-8 without a BOM.
    #[default]
    Utf8,
    /// UTF-8 preceded by a BOM.
    Utf8Bom,
    /// UTF-16 little-endian preceded by a BOM.
    Utf16Le,
    /// UTF-16 big-endian preceded by a BOM.
    Utf16Be,
}

impl SourceEncoding {
    /// Returns the BOM bytes written before the content, if any.
    #[inline]
    pub const fn bom(&self) -> &'static [u8] {
        match self {
            SourceEncoding::Utf8 => &[],
            SourceEncoding::Utf8Bom => &UTF8_BOM,
            SourceEncoding::Utf16Le => &UTF16_LE_BOM,
            SourceEncoding::Utf16Be => &UTF16_BE_BOM,
        }
    }

    /// Encoding label used in the XML declaration.
    pub const fn label(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 | SourceEncoding::Utf8Bom => "UTF-8",
            SourceEncoding::Utf16Le | SourceEncoding::Utf16Be => "UTF-16",
        }
    }
}

/// Detects the encoding of a part from its leading bytes.
pub fn detect_bom(bytes: &[u8]) -> SourceEncoding {
    if bytes.starts_with(&UTF8_BOM) {
        SourceEncoding::Utf8Bom
    } else if bytes.starts_with(&UTF16_LE_BOM) {
        SourceEncoding::Utf16Le
    } else if bytes.starts_with(&UTF16_BE_BOM) {
        SourceEncoding::Utf16Be
    } else {
        SourceEncoding::Utf8
    }
}

/// Decodes a part into text, reporting the encoding it was stored in.
///
/// Returns `None` when the bytes are not valid in the detected encoding.
pub fn decode(bytes: &[u8]) -> Option<(String, SourceEncoding)> {
    let encoding = detect_bom(bytes);
    let body = &bytes[encoding.bom().len()..];

    let text = match encoding {
        SourceEncoding::Utf8 | SourceEncoding::Utf8Bom => std::str::from_utf8(body).ok()?.to_owned(),
        SourceEncoding::Utf16Le => {
            let (text, had_errors) = UTF_16LE.decode_without_bom_handling(body);
            if had_errors {
                return None;
            }
            text.into_owned()
        },
        SourceEncoding::Utf16Be => {
            let (text, had_errors) = UTF_16BE.decode_without_bom_handling(body);
            if had_errors {
                return None;
            }
            text.into_owned()
        },
    };

    Some((text, encoding))
}

/// Encodes text back into the byte form described by `encoding`, BOM included.
pub fn encode(text: &str, encoding: SourceEncoding) -> Vec<u8> {
    let bom = encoding.bom();
    match encoding {
        SourceEncoding::Utf8 | SourceEncoding::Utf8Bom => {
            let mut out = Vec::with_capacity(bom.len() + text.len());
            out.extend_from_slice(bom);
            out.extend_from_slice(text.as_bytes());
            out
        },
        SourceEncoding::Utf16Le => {
            let mut out = Vec::with_capacity(bom.len() + text.len() * 2);
            out.extend_from_slice(bom);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out
        },
        SourceEncoding::Utf16Be => {
            let mut out = Vec::with_capacity(bom.len() + text.len() * 2);
            out.extend_from_slice(bom);
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
            out
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_bom() {
        assert_eq!(detect_bom(b"<a/>"), SourceEncoding::Utf8);
        assert_eq!(detect_bom(&[0xEF, 0xBB, 0xBF, b'<']), SourceEncoding::Utf8Bom);
        assert_eq!(detect_bom(&[0xFF, 0xFE, b'<', 0]), SourceEncoding::Utf16Le);
        assert_eq!(detect_bom(&[0xFE, 0xFF, 0, b'<']), SourceEncoding::Utf16Be);
    }

    #[test]
    fn test_utf16_le_round_trip() {
        let bytes = encode("<a>é</a>", SourceEncoding::Utf16Le);
        assert_eq!(&bytes[..2], &UTF16_LE_BOM);

        let (text, encoding) = decode(&bytes).unwrap();
        assert_eq!(text, "<a>é</a>");
        assert_eq!(encoding, SourceEncoding::Utf16Le);
    }

    #[test]
    fn test_utf8_bom_is_kept() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"<a/>");

        let (text, encoding) = decode(&bytes).unwrap();
        assert_eq!(text, "<a/>");
        assert_eq!(encode(&text, encoding), bytes);
    }

    #[test]
    fn test_invalid_utf8() {
        assert!(decode(&[b'<', 0xC3, 0x28]).is_none());
    }
}
