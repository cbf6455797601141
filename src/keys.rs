//! Key-material and IV derivation.
//!
//! Every cipher gets its key from textual input in one of two ways: a hex
//! string decoded to raw bytes, or UTF-8 text pushed through a one-way
//! hash sized for the cipher. AES and 3DES hash with SHA-256; DES and IVs
//! hash with the crate's own MD5 engine. The derived material is immutable
//! from here on, the cipher cores never rewrite it.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::encoding::{decode_hex, TextFormat};
use crate::error::CipherLabError;
use crate::md5::md5;

/// Derives AES key material.
///
/// Hex input decodes to its exact bytes; the cipher core's normalization
/// policy then resolves the length. UTF-8 input is SHA-256 hashed to 32
/// bytes, always selecting AES-256.
///
/// # Errors
/// [`CipherLabError::EmptyKey`] on empty input, [`CipherLabError::InvalidHex`]
/// on a malformed hex key.
pub fn derive_aes_key(key: &str, format: TextFormat) -> Result<Vec<u8>, CipherLabError> {
    if key.is_empty() {
        return Err(CipherLabError::EmptyKey);
    }
    match format {
        TextFormat::Hex => {
            let bytes = decode_hex(key)?;
            if bytes.is_empty() {
                return Err(CipherLabError::EmptyKey);
            }
            Ok(bytes)
        }
        TextFormat::Utf8 => Ok(Sha256::digest(key.as_bytes())[..32].to_vec()),
    }
}

/// Derives a single-DES key.
///
/// Hex input is zero-padded below 8 bytes and truncated above; UTF-8 input
/// is MD5 hashed and truncated to 8.
///
/// # Errors
/// [`CipherLabError::EmptyKey`] on empty input, [`CipherLabError::InvalidHex`]
/// on a malformed hex key.
pub fn derive_des_key(key: &str, format: TextFormat) -> Result<[u8; 8], CipherLabError> {
    if key.is_empty() {
        return Err(CipherLabError::EmptyKey);
    }
    let mut out = [0u8; 8];
    match format {
        TextFormat::Hex => {
            let bytes = decode_hex(key)?;
            if bytes.is_empty() {
                return Err(CipherLabError::EmptyKey);
            }
            let take = bytes.len().min(8);
            out[..take].copy_from_slice(&bytes[..take]);
        }
        TextFormat::Utf8 => {
            out.copy_from_slice(&md5(key.as_bytes())[..8]);
        }
    }
    Ok(out)
}

/// Derives the three 8-byte keys of a 3DES bundle.
///
/// Hex input shorter than 24 bytes is cyclically self-extended to 24,
/// longer input is truncated; UTF-8 input is SHA-256 hashed and truncated
/// to 24. The 24 bytes split into k1, k2, k3 in order.
///
/// # Errors
/// [`CipherLabError::EmptyKey`] on empty input, [`CipherLabError::InvalidHex`]
/// on a malformed hex key.
pub fn derive_triple_des_keys(
    key: &str,
    format: TextFormat,
) -> Result<([u8; 8], [u8; 8], [u8; 8]), CipherLabError> {
    if key.is_empty() {
        return Err(CipherLabError::EmptyKey);
    }
    let material: Vec<u8> = match format {
        TextFormat::Hex => {
            let bytes = decode_hex(key)?;
            if bytes.is_empty() {
                return Err(CipherLabError::EmptyKey);
            }
            bytes.iter().copied().cycle().take(24).collect()
        }
        TextFormat::Utf8 => Sha256::digest(key.as_bytes())[..24].to_vec(),
    };
    let mut k1 = [0u8; 8];
    let mut k2 = [0u8; 8];
    let mut k3 = [0u8; 8];
    k1.copy_from_slice(&material[..8]);
    k2.copy_from_slice(&material[8..16]);
    k3.copy_from_slice(&material[16..24]);
    Ok((k1, k2, k3))
}

/// Derives RC4 key material: hex decodes, UTF-8 passes through as raw
/// bytes. RC4 has no fixed key size so no hashing is involved.
///
/// # Errors
/// [`CipherLabError::EmptyKey`] on empty input, [`CipherLabError::InvalidHex`]
/// on a malformed hex key.
pub fn derive_rc4_key(key: &str, format: TextFormat) -> Result<Vec<u8>, CipherLabError> {
    if key.is_empty() {
        return Err(CipherLabError::EmptyKey);
    }
    let bytes = match format {
        TextFormat::Hex => decode_hex(key)?,
        TextFormat::Utf8 => key.as_bytes().to_vec(),
    };
    if bytes.is_empty() {
        return Err(CipherLabError::EmptyKey);
    }
    Ok(bytes)
}

/// Derives an IV of exactly `block_size` bytes from textual input.
///
/// Hex input must decode to exactly `block_size` bytes. UTF-8 input is
/// used verbatim when its byte length already matches; anything else is
/// MD5 hashed and truncated to `block_size`.
///
/// # Errors
/// [`CipherLabError::InvalidIvLength`] when hex input has the wrong
/// length, [`CipherLabError::InvalidHex`] when it is malformed.
pub fn derive_iv(iv: &str, format: TextFormat, block_size: usize) -> Result<Vec<u8>, CipherLabError> {
    match format {
        TextFormat::Hex => {
            let bytes = decode_hex(iv)?;
            if bytes.len() != block_size {
                return Err(CipherLabError::InvalidIvLength {
                    expected: block_size,
                    actual: bytes.len(),
                });
            }
            Ok(bytes)
        }
        TextFormat::Utf8 => {
            let bytes = iv.as_bytes();
            if bytes.len() == block_size {
                Ok(bytes.to_vec())
            } else {
                Ok(md5(bytes)[..block_size].to_vec())
            }
        }
    }
}

/// Fresh random IV of `block_size` bytes.
pub fn random_iv(block_size: usize) -> Vec<u8> {
    let mut iv = vec![0u8; block_size];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}
