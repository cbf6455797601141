//! Textual boundary codecs: hex and base64, plus input format tags and
//! the best-effort presentation of decrypted plaintext.
//!
//! Hex and base64 are the engine's only serialization formats. Decode
//! failures surface as [`CipherLabError::InvalidHex`] /
//! [`CipherLabError::InvalidBase64`]; they never panic.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::CipherLabError;

/// How a textual key or IV parameter is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    /// Hex string, decoded to raw bytes.
    Hex,
    /// UTF-8 text, hashed or used verbatim depending on the consumer.
    #[default]
    Utf8,
}

impl TextFormat {
    /// Parses a format tag, case-insensitively. Anything that is not
    /// `"hex"` is treated as UTF-8, matching the request contract.
    pub fn parse(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("hex") {
            TextFormat::Hex
        } else {
            TextFormat::Utf8
        }
    }
}

/// How a textual data payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    /// Hex string.
    Hex,
    /// Base64 string.
    Base64,
    /// Raw UTF-8 text.
    #[default]
    Utf8,
}

impl DataFormat {
    /// Parses a payload format tag, case-insensitively. Unknown tags fall
    /// back to UTF-8.
    pub fn parse(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("hex") {
            DataFormat::Hex
        } else if tag.eq_ignore_ascii_case("base64") {
            DataFormat::Base64
        } else {
            DataFormat::Utf8
        }
    }
}

/// Decodes a hex string, tolerating embedded spaces and newlines.
///
/// # Errors
/// Returns [`CipherLabError::InvalidHex`] on any malformed input.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, CipherLabError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    hex::decode(cleaned).map_err(|_| CipherLabError::InvalidHex)
}

/// Encodes bytes as a lowercase hex string.
pub fn encode_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decodes a standard base64 string, tolerating surrounding whitespace.
///
/// # Errors
/// Returns [`CipherLabError::InvalidBase64`] on any malformed input.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, CipherLabError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    STANDARD
        .decode(cleaned)
        .map_err(|_| CipherLabError::InvalidBase64)
}

/// Encodes bytes as a standard base64 string.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Renders decrypted bytes as best-effort text.
///
/// Valid UTF-8 made of printable ASCII (plus `\n`, `\r`, `\t`) is returned
/// verbatim. Valid UTF-8 containing NULs, control characters or non-ASCII
/// is returned as a quoted, escaped debug string so that garbage from a
/// wrong key or mutated table stays visible. Invalid UTF-8 falls back to
/// lowercase hex. This never fails: a wrong key yields odd output, not an
/// error.
pub fn present_plaintext(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => {
            if text.contains('\0') || text.chars().any(|c| !is_displayable(c)) {
                format!("{:?}", text)
            } else {
                text.to_string()
            }
        }
        Err(_) => hex::encode(bytes),
    }
}

/// Printable ASCII plus the whitespace characters the workbench passes
/// through unescaped.
fn is_displayable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_format_parse() {
        assert_eq!(TextFormat::parse("hex"), TextFormat::Hex);
        assert_eq!(TextFormat::parse("HEX"), TextFormat::Hex);
        assert_eq!(TextFormat::parse("utf-8"), TextFormat::Utf8);
        assert_eq!(TextFormat::parse("anything"), TextFormat::Utf8);
    }

    #[test]
    fn test_data_format_parse() {
        assert_eq!(DataFormat::parse("Hex"), DataFormat::Hex);
        assert_eq!(DataFormat::parse("BASE64"), DataFormat::Base64);
        assert_eq!(DataFormat::parse("utf-8"), DataFormat::Utf8);
    }

    #[test]
    fn test_decode_hex_with_spaces() {
        let result = decode_hex("01 23 45\n67").unwrap();
        assert_eq!(result, vec![0x01, 0x23, 0x45, 0x67]);
    }

    #[test]
    fn test_decode_hex_invalid() {
        assert_eq!(decode_hex("zz"), Err(CipherLabError::InvalidHex));
        assert_eq!(decode_hex("abc"), Err(CipherLabError::InvalidHex));
    }

    #[test]
    fn test_base64_roundtrip() {
        let data = b"cipherlab";
        let encoded = encode_base64(data);
        assert_eq!(decode_base64(&encoded).unwrap(), data);
    }

    #[test]
    fn test_decode_base64_invalid() {
        assert_eq!(decode_base64("!!!"), Err(CipherLabError::InvalidBase64));
    }

    #[test]
    fn test_present_plaintext_clean() {
        assert_eq!(present_plaintext(b"hello world\n"), "hello world\n");
    }

    #[test]
    fn test_present_plaintext_nul_escaped() {
        let rendered = present_plaintext(b"abc\x00def");
        assert!(rendered.starts_with('"'), "expected escaped form: {}", rendered);
        assert!(rendered.contains("\\0") || rendered.contains("\\u"));
    }

    #[test]
    fn test_present_plaintext_invalid_utf8_hex() {
        assert_eq!(present_plaintext(&[0xff, 0xfe, 0x01]), "fffe01");
    }
}
