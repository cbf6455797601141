//! Error types for the cipherlab engine.

use std::fmt;

/// Errors produced by the cipherlab engine.
///
/// Every variant is call-scoped: a failing operation affects only that
/// call's result, never the process. UTF-8 decode failure of decrypted
/// plaintext is deliberately *not* represented here — it is recovered
/// locally with a fallback representation (see [`crate::encoding`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherLabError {
    /// Key string is empty.
    EmptyKey,
    /// Input data is empty.
    EmptyData,
    /// Input is not a valid hex string.
    InvalidHex,
    /// Input is not a valid base64 string.
    InvalidBase64,
    /// IV does not match the cipher's block size.
    InvalidIvLength { expected: usize, actual: usize },
    /// An explicit IV was supplied for ECB mode, which takes none.
    IvNotAllowed,
    /// AES/RC4 substitution table does not have exactly 256 entries.
    InvalidSboxLength { actual: usize },
    /// DES substitution tables are not 8 tables of 4 rows x 16 columns
    /// with 4-bit values.
    InvalidDesSboxShape,
    /// The named mode is not supported by the selected cipher.
    UnsupportedMode(String),
    /// The named padding scheme is unknown.
    UnsupportedPadding(String),
    /// NoPadding requires input aligned to the cipher's block size.
    NotBlockAligned { block_size: usize },
    /// Decoded ciphertext is too short to carry the prepended IV.
    CiphertextTooShort { needed: usize },
    /// Padding bytes found on unpad are inconsistent with the scheme.
    InvalidPadding,
}

impl fmt::Display for CipherLabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherLabError::EmptyKey => {
                write!(f, "Key must not be empty")
            }
            CipherLabError::EmptyData => {
                write!(f, "Input data must not be empty")
            }
            CipherLabError::InvalidHex => {
                write!(f, "Input is not a valid hex string")
            }
            CipherLabError::InvalidBase64 => {
                write!(f, "Input is not a valid base64 string")
            }
            CipherLabError::InvalidIvLength { expected, actual } => {
                write!(f, "IV must be {} bytes long (got {})", expected, actual)
            }
            CipherLabError::IvNotAllowed => {
                write!(f, "ECB mode does not take an IV")
            }
            CipherLabError::InvalidSboxLength { actual } => {
                write!(
                    f,
                    "Substitution table must have 256 entries (got {})",
                    actual
                )
            }
            CipherLabError::InvalidDesSboxShape => {
                write!(
                    f,
                    "DES substitution tables must be 8 tables of 4 rows x 16 columns of 4-bit values"
                )
            }
            CipherLabError::UnsupportedMode(mode) => {
                write!(f, "Unsupported cipher mode: {}", mode)
            }
            CipherLabError::UnsupportedPadding(padding) => {
                write!(f, "Unsupported padding scheme: {}", padding)
            }
            CipherLabError::NotBlockAligned { block_size } => {
                write!(
                    f,
                    "NoPadding requires data length to be a multiple of {} bytes",
                    block_size
                )
            }
            CipherLabError::CiphertextTooShort { needed } => {
                write!(
                    f,
                    "Ciphertext is too short to carry the {}-byte prepended IV",
                    needed
                )
            }
            CipherLabError::InvalidPadding => {
                write!(f, "Invalid padding bytes on unpad")
            }
        }
    }
}

impl std::error::Error for CipherLabError {}
