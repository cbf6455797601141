//! Mode-of-operation driver, generic over any block cipher core.
//!
//! ECB and CBC chain whole blocks and require aligned input. CFB, OFB
//! and CTR turn the cipher into a keystream generator and accept a
//! partial final block by truncating the last keystream block. The
//! driver works through `&dyn BlockCipher` so AES, DES and 3DES all run
//! through the same code paths.

use crate::error::CipherLabError;

/// A block cipher core the mode driver can chain.
///
/// `encrypt_block`/`decrypt_block` receive exactly `block_size()` bytes
/// and return the same count. The driver upholds that contract.
pub trait BlockCipher {
    /// Block size in bytes (16 for AES, 8 for DES/3DES).
    fn block_size(&self) -> usize;
    /// Encrypts one block.
    fn encrypt_block(&self, block: &[u8]) -> Vec<u8>;
    /// Decrypts one block.
    fn decrypt_block(&self, block: &[u8]) -> Vec<u8>;
}

/// Chaining mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Independent blocks, no chaining, no IV.
    Ecb,
    /// Cipher block chaining.
    #[default]
    Cbc,
    /// Full-block cipher feedback.
    Cfb,
    /// Output feedback.
    Ofb,
    /// Big-endian counter.
    Ctr,
}

impl Mode {
    /// Parses a mode name, case-insensitively.
    ///
    /// # Errors
    /// [`CipherLabError::UnsupportedMode`] for unrecognized names.
    pub fn parse(name: &str) -> Result<Self, CipherLabError> {
        match name.to_ascii_lowercase().as_str() {
            "ecb" => Ok(Mode::Ecb),
            "cbc" => Ok(Mode::Cbc),
            "cfb" => Ok(Mode::Cfb),
            "ofb" => Ok(Mode::Ofb),
            "ctr" => Ok(Mode::Ctr),
            other => Err(CipherLabError::UnsupportedMode(other.to_string())),
        }
    }

    /// True for the keystream modes that tolerate a partial final block.
    pub fn is_stream(&self) -> bool {
        matches!(self, Mode::Cfb | Mode::Ofb | Mode::Ctr)
    }

    /// True for every mode except ECB.
    pub fn uses_iv(&self) -> bool {
        !matches!(self, Mode::Ecb)
    }
}

/// Encrypts `data` under `mode`. `iv` is ignored by ECB and must be
/// `block_size` bytes for every other mode (the caller derives it).
///
/// # Errors
/// [`CipherLabError::NotBlockAligned`] when ECB/CBC input is not a
/// multiple of the block size.
pub fn encrypt(
    cipher: &dyn BlockCipher,
    mode: Mode,
    data: &[u8],
    iv: &[u8],
) -> Result<Vec<u8>, CipherLabError> {
    let block_size = cipher.block_size();
    match mode {
        Mode::Ecb => {
            require_aligned(data, block_size)?;
            let mut out = Vec::with_capacity(data.len());
            for block in data.chunks_exact(block_size) {
                out.extend_from_slice(&cipher.encrypt_block(block));
            }
            Ok(out)
        }
        Mode::Cbc => {
            require_aligned(data, block_size)?;
            let mut out = Vec::with_capacity(data.len());
            let mut previous = iv.to_vec();
            for block in data.chunks_exact(block_size) {
                let mixed = xor(block, &previous);
                previous = cipher.encrypt_block(&mixed);
                out.extend_from_slice(&previous);
            }
            Ok(out)
        }
        Mode::Cfb => {
            let mut out = Vec::with_capacity(data.len());
            let mut register = iv.to_vec();
            for chunk in data.chunks(block_size) {
                let keystream = cipher.encrypt_block(&register);
                let ciphertext = xor(chunk, &keystream);
                // The feedback register only advances on full blocks; a
                // partial tail ends the message anyway.
                if ciphertext.len() == block_size {
                    register = ciphertext.clone();
                }
                out.extend_from_slice(&ciphertext);
            }
            Ok(out)
        }
        Mode::Ofb => Ok(keystream_xor(cipher, data, iv, next_ofb)),
        Mode::Ctr => Ok(keystream_xor(cipher, data, iv, next_ctr)),
    }
}

/// Decrypts `data` under `mode`. Same IV contract as [`encrypt`].
///
/// # Errors
/// [`CipherLabError::NotBlockAligned`] when ECB/CBC input is not a
/// multiple of the block size.
pub fn decrypt(
    cipher: &dyn BlockCipher,
    mode: Mode,
    data: &[u8],
    iv: &[u8],
) -> Result<Vec<u8>, CipherLabError> {
    let block_size = cipher.block_size();
    match mode {
        Mode::Ecb => {
            require_aligned(data, block_size)?;
            let mut out = Vec::with_capacity(data.len());
            for block in data.chunks_exact(block_size) {
                out.extend_from_slice(&cipher.decrypt_block(block));
            }
            Ok(out)
        }
        Mode::Cbc => {
            require_aligned(data, block_size)?;
            let mut out = Vec::with_capacity(data.len());
            let mut previous = iv.to_vec();
            for block in data.chunks_exact(block_size) {
                let plain = cipher.decrypt_block(block);
                out.extend_from_slice(&xor(&plain, &previous));
                previous = block.to_vec();
            }
            Ok(out)
        }
        Mode::Cfb => {
            let mut out = Vec::with_capacity(data.len());
            let mut register = iv.to_vec();
            for chunk in data.chunks(block_size) {
                let keystream = cipher.encrypt_block(&register);
                out.extend_from_slice(&xor(chunk, &keystream));
                if chunk.len() == block_size {
                    register = chunk.to_vec();
                }
            }
            Ok(out)
        }
        // OFB and CTR keystreams are direction-agnostic.
        Mode::Ofb => Ok(keystream_xor(cipher, data, iv, next_ofb)),
        Mode::Ctr => Ok(keystream_xor(cipher, data, iv, next_ctr)),
    }
}

fn require_aligned(data: &[u8], block_size: usize) -> Result<(), CipherLabError> {
    if data.len() % block_size != 0 {
        return Err(CipherLabError::NotBlockAligned { block_size });
    }
    Ok(())
}

/// XOR of `a` against the prefix of `b`; output length is `a.len()`.
fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(&x, &y)| x ^ y).collect()
}

/// Shared driver for the two pure-keystream modes: `advance` turns the
/// current register state into the next keystream block.
fn keystream_xor(
    cipher: &dyn BlockCipher,
    data: &[u8],
    iv: &[u8],
    advance: fn(&dyn BlockCipher, &mut Vec<u8>) -> Vec<u8>,
) -> Vec<u8> {
    let block_size = cipher.block_size();
    let mut register = iv.to_vec();
    let mut out = Vec::with_capacity(data.len());
    for chunk in data.chunks(block_size) {
        let keystream = advance(cipher, &mut register);
        out.extend_from_slice(&xor(chunk, &keystream));
    }
    out
}

/// OFB: the keystream block becomes the next register state.
fn next_ofb(cipher: &dyn BlockCipher, register: &mut Vec<u8>) -> Vec<u8> {
    let keystream = cipher.encrypt_block(register);
    *register = keystream.clone();
    keystream
}

/// CTR: encrypt the counter, then increment it as a big-endian integer
/// with byte-wise wrap-around.
fn next_ctr(cipher: &dyn BlockCipher, counter: &mut Vec<u8>) -> Vec<u8> {
    let keystream = cipher.encrypt_block(counter);
    for byte in counter.iter_mut().rev() {
        let (incremented, overflow) = byte.overflowing_add(1);
        *byte = incremented;
        if !overflow {
            break;
        }
    }
    keystream
}

#[cfg(test)]
mod tests {
    use super::*;

    /// XOR-with-key toy cipher; keystream modes only need determinism.
    struct XorCipher {
        key: u8,
    }

    impl BlockCipher for XorCipher {
        fn block_size(&self) -> usize {
            4
        }
        fn encrypt_block(&self, block: &[u8]) -> Vec<u8> {
            block.iter().map(|&b| b ^ self.key).collect()
        }
        fn decrypt_block(&self, block: &[u8]) -> Vec<u8> {
            self.encrypt_block(block)
        }
    }

    const CIPHER: XorCipher = XorCipher { key: 0x5A };

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("ECB").unwrap(), Mode::Ecb);
        assert_eq!(Mode::parse("cbc").unwrap(), Mode::Cbc);
        assert_eq!(Mode::parse("Ctr").unwrap(), Mode::Ctr);
        assert_eq!(
            Mode::parse("gcm"),
            Err(CipherLabError::UnsupportedMode("gcm".to_string()))
        );
    }

    #[test]
    fn test_stream_classification() {
        assert!(!Mode::Ecb.is_stream());
        assert!(!Mode::Cbc.is_stream());
        assert!(Mode::Cfb.is_stream());
        assert!(Mode::Ofb.is_stream());
        assert!(Mode::Ctr.is_stream());
        assert!(!Mode::Ecb.uses_iv());
        assert!(Mode::Cbc.uses_iv());
    }

    #[test]
    fn test_ecb_alignment_enforced() {
        assert_eq!(
            encrypt(&CIPHER, Mode::Ecb, b"12345", &[]),
            Err(CipherLabError::NotBlockAligned { block_size: 4 })
        );
        assert_eq!(
            decrypt(&CIPHER, Mode::Cbc, b"123", &[0u8; 4]),
            Err(CipherLabError::NotBlockAligned { block_size: 4 })
        );
    }

    #[test]
    fn test_block_mode_roundtrips() {
        let iv = [9u8; 4];
        for mode in [Mode::Ecb, Mode::Cbc] {
            let ciphertext = encrypt(&CIPHER, mode, b"12345678", &iv).unwrap();
            let plaintext = decrypt(&CIPHER, mode, &ciphertext, &iv).unwrap();
            assert_eq!(plaintext, b"12345678", "{:?}", mode);
        }
    }

    #[test]
    fn test_stream_modes_accept_partial_tail() {
        let iv = [3u8; 4];
        for mode in [Mode::Cfb, Mode::Ofb, Mode::Ctr] {
            let ciphertext = encrypt(&CIPHER, mode, b"nine bytes!", &iv).unwrap();
            assert_eq!(ciphertext.len(), 11, "{:?}", mode);
            let plaintext = decrypt(&CIPHER, mode, &ciphertext, &iv).unwrap();
            assert_eq!(plaintext, b"nine bytes!", "{:?}", mode);
        }
    }

    #[test]
    fn test_cbc_chains_blocks() {
        // Identical plaintext blocks must produce distinct ciphertext.
        let iv = [1u8; 4];
        let ciphertext = encrypt(&CIPHER, Mode::Cbc, b"aaaaaaaa", &iv).unwrap();
        assert_ne!(&ciphertext[..4], &ciphertext[4..]);
        let ecb = encrypt(&CIPHER, Mode::Ecb, b"aaaaaaaa", &[]).unwrap();
        assert_eq!(&ecb[..4], &ecb[4..]);
    }

    #[test]
    fn test_ctr_counter_wraps() {
        let mut counter = vec![0xFF, 0xFF, 0xFF, 0xFF];
        next_ctr(&CIPHER, &mut counter);
        assert_eq!(counter, vec![0, 0, 0, 0]);

        let mut counter = vec![0x00, 0x01, 0xFF, 0xFF];
        next_ctr(&CIPHER, &mut counter);
        assert_eq!(counter, vec![0x00, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn test_ofb_first_keystream_is_encrypted_iv() {
        let iv = [7u8; 4];
        let ciphertext = encrypt(&CIPHER, Mode::Ofb, &[0u8; 4], &iv).unwrap();
        assert_eq!(ciphertext, CIPHER.encrypt_block(&iv));
    }

    #[test]
    fn test_iv_changes_ciphertext() {
        let a = encrypt(&CIPHER, Mode::Cbc, b"12345678", &[0u8; 4]).unwrap();
        let b = encrypt(&CIPHER, Mode::Cbc, b"12345678", &[1u8; 4]).unwrap();
        assert_ne!(a, b);
    }
}
