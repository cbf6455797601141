//! Block padding schemes.
//!
//! Padding is a property of the request, independent of the cipher mode.
//! The quirks here are contractual: ZeroPadding always appends a full
//! block when the input is already aligned, and its removal strips every
//! trailing zero byte. That removal is lossy for plaintexts that really
//! end in zeros. It is documented behavior, not a defect to correct.

use rand::RngCore;

use crate::error::CipherLabError;

/// Padding scheme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// Pad bytes all carry the pad length.
    #[default]
    Pkcs7,
    /// Random fill with the pad length in the last byte.
    Iso10126,
    /// Zero fill with the pad length in the last byte.
    AnsiX923,
    /// Zero fill, no length marker. Lossy to strip.
    Zero,
    /// No padding at all; block-chained input must already be aligned.
    None,
}

impl Padding {
    /// Parses a padding name, case-insensitively.
    ///
    /// # Errors
    /// [`CipherLabError::UnsupportedPadding`] for unrecognized names.
    pub fn parse(name: &str) -> Result<Self, CipherLabError> {
        match name.to_ascii_lowercase().as_str() {
            "pkcs7" => Ok(Padding::Pkcs7),
            "iso10126" => Ok(Padding::Iso10126),
            "ansix923" => Ok(Padding::AnsiX923),
            "zeropadding" | "zero" => Ok(Padding::Zero),
            "nopadding" | "none" => Ok(Padding::None),
            other => Err(CipherLabError::UnsupportedPadding(other.to_string())),
        }
    }

    /// Pads `data` out to a multiple of `block_size`.
    ///
    /// PKCS7, ISO 10126, ANSI X9.23 and ZeroPadding all append a full
    /// block when the input is already aligned, so the unpad side always
    /// has something to strip. NoPadding leaves data untouched.
    ///
    /// # Errors
    /// [`CipherLabError::NotBlockAligned`] for NoPadding with a misaligned
    /// length.
    pub fn pad(&self, data: &[u8], block_size: usize) -> Result<Vec<u8>, CipherLabError> {
        let remainder = data.len() % block_size;
        let pad_len = block_size - remainder;

        let mut padded = data.to_vec();
        match self {
            Padding::Pkcs7 => {
                padded.extend(std::iter::repeat(pad_len as u8).take(pad_len));
            }
            Padding::Iso10126 => {
                let mut fill = vec![0u8; pad_len - 1];
                rand::thread_rng().fill_bytes(&mut fill);
                padded.extend_from_slice(&fill);
                padded.push(pad_len as u8);
            }
            Padding::AnsiX923 => {
                padded.extend(std::iter::repeat(0u8).take(pad_len - 1));
                padded.push(pad_len as u8);
            }
            Padding::Zero => {
                padded.extend(std::iter::repeat(0u8).take(pad_len));
            }
            Padding::None => {
                if remainder != 0 {
                    return Err(CipherLabError::NotBlockAligned { block_size });
                }
            }
        }
        Ok(padded)
    }

    /// Strips padding from decrypted data.
    ///
    /// ZeroPadding removes every trailing zero byte and never fails.
    /// NoPadding returns the data as-is.
    ///
    /// # Errors
    /// [`CipherLabError::InvalidPadding`] when the trailing bytes do not
    /// form valid padding for the scheme.
    pub fn unpad(&self, data: &[u8], block_size: usize) -> Result<Vec<u8>, CipherLabError> {
        match self {
            Padding::Pkcs7 => {
                let pad_len = Self::marker(data, block_size)?;
                let (body, pad) = data.split_at(data.len() - pad_len);
                if pad.iter().any(|&b| b as usize != pad_len) {
                    return Err(CipherLabError::InvalidPadding);
                }
                Ok(body.to_vec())
            }
            Padding::Iso10126 => {
                let pad_len = Self::marker(data, block_size)?;
                Ok(data[..data.len() - pad_len].to_vec())
            }
            Padding::AnsiX923 => {
                let pad_len = Self::marker(data, block_size)?;
                let (body, pad) = data.split_at(data.len() - pad_len);
                if pad[..pad_len - 1].iter().any(|&b| b != 0) {
                    return Err(CipherLabError::InvalidPadding);
                }
                Ok(body.to_vec())
            }
            Padding::Zero => {
                let end = data
                    .iter()
                    .rposition(|&b| b != 0)
                    .map_or(0, |pos| pos + 1);
                Ok(data[..end].to_vec())
            }
            Padding::None => Ok(data.to_vec()),
        }
    }

    /// Reads and range-checks the pad-length marker in the final byte.
    fn marker(data: &[u8], block_size: usize) -> Result<usize, CipherLabError> {
        let pad_len = *data.last().ok_or(CipherLabError::InvalidPadding)? as usize;
        if pad_len == 0 || pad_len > block_size || pad_len > data.len() {
            return Err(CipherLabError::InvalidPadding);
        }
        Ok(pad_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(Padding::parse("PKCS7").unwrap(), Padding::Pkcs7);
        assert_eq!(Padding::parse("iso10126").unwrap(), Padding::Iso10126);
        assert_eq!(Padding::parse("AnsiX923").unwrap(), Padding::AnsiX923);
        assert_eq!(Padding::parse("ZeroPadding").unwrap(), Padding::Zero);
        assert_eq!(Padding::parse("NoPadding").unwrap(), Padding::None);
        assert_eq!(
            Padding::parse("pkcs5"),
            Err(CipherLabError::UnsupportedPadding("pkcs5".to_string()))
        );
    }

    #[test]
    fn test_pkcs7_pad_unpad() {
        let padded = Padding::Pkcs7.pad(b"hello", 8).unwrap();
        assert_eq!(padded, b"hello\x03\x03\x03");
        assert_eq!(Padding::Pkcs7.unpad(&padded, 8).unwrap(), b"hello");
    }

    #[test]
    fn test_pkcs7_aligned_input_gets_full_block() {
        let padded = Padding::Pkcs7.pad(b"12345678", 8).unwrap();
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[8..], &[8u8; 8]);
    }

    #[test]
    fn test_pkcs7_rejects_bad_padding() {
        assert_eq!(
            Padding::Pkcs7.unpad(b"hello\x03\x02\x03", 8),
            Err(CipherLabError::InvalidPadding)
        );
        assert_eq!(
            Padding::Pkcs7.unpad(b"hello\x00\x00\x00", 8),
            Err(CipherLabError::InvalidPadding)
        );
        assert_eq!(
            Padding::Pkcs7.unpad(b"oversize\x09", 8),
            Err(CipherLabError::InvalidPadding)
        );
        assert_eq!(
            Padding::Pkcs7.unpad(b"", 8),
            Err(CipherLabError::InvalidPadding)
        );
    }

    #[test]
    fn test_iso10126_roundtrip_ignores_fill() {
        let padded = Padding::Iso10126.pad(b"abc", 8).unwrap();
        assert_eq!(padded.len(), 8);
        assert_eq!(padded[7], 5);
        assert_eq!(Padding::Iso10126.unpad(&padded, 8).unwrap(), b"abc");
    }

    #[test]
    fn test_ansix923_pad_unpad() {
        let padded = Padding::AnsiX923.pad(b"abc", 8).unwrap();
        assert_eq!(padded, b"abc\x00\x00\x00\x00\x05");
        assert_eq!(Padding::AnsiX923.unpad(&padded, 8).unwrap(), b"abc");
        assert_eq!(
            Padding::AnsiX923.unpad(b"abc\x00\x01\x00\x00\x05", 8),
            Err(CipherLabError::InvalidPadding)
        );
    }

    #[test]
    fn test_zero_pads_full_block_when_aligned() {
        let padded = Padding::Zero.pad(b"12345678", 8).unwrap();
        assert_eq!(padded.len(), 16);
        assert_eq!(&padded[8..], &[0u8; 8]);
    }

    #[test]
    fn test_zero_unpad_is_lossy_for_trailing_zeros() {
        // The contract: trailing plaintext zeros do not survive.
        let padded = Padding::Zero.pad(b"data\x00\x00", 8).unwrap();
        assert_eq!(Padding::Zero.unpad(&padded, 8).unwrap(), b"data");
    }

    #[test]
    fn test_zero_unpad_all_zero_input() {
        assert!(Padding::Zero.unpad(&[0u8; 16], 8).unwrap().is_empty());
    }

    #[test]
    fn test_none_requires_alignment() {
        assert_eq!(Padding::None.pad(b"12345678", 8).unwrap(), b"12345678");
        assert_eq!(
            Padding::None.pad(b"1234567", 8),
            Err(CipherLabError::NotBlockAligned { block_size: 8 })
        );
        assert_eq!(Padding::None.unpad(b"12345678", 8).unwrap(), b"12345678");
    }
}
