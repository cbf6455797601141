//! MD5 compression engine with pluggable constants.
//!
//! A from-scratch Merkle–Damgård construction: the initial state words,
//! the 64-entry K table and the 64-entry rotation table can each be
//! replaced independently for hash-analysis experiments. Overrides with
//! the wrong length silently fall back to the standard tables — that
//! tolerance is part of the contract, not an accident.

/// Standard initial state words A, B, C, D.
pub const MD5_STANDARD_INIT: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

/// Standard K constant table (64 entries).
pub const MD5_STANDARD_K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613,
    0xfd469501, 0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193,
    0xa679438e, 0x49b40821, 0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d,
    0x02441453, 0xd8a1e681, 0xe7d3fbc8, 0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a, 0xfffa3942, 0x8771f681, 0x6d9d6122,
    0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70, 0x289b7ec6, 0xeaa127fa,
    0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665, 0xf4292244,
    0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb,
    0xeb86d391,
];

/// Standard per-step left-rotation amounts (64 entries).
pub const MD5_STANDARD_SHIFTS: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, //
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, //
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, //
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// MD5 engine parameterized by its constants.
#[derive(Debug, Clone)]
pub struct Md5 {
    init: [u32; 4],
    k_table: [u32; 64],
    shifts: [u32; 64],
}

impl Md5 {
    /// Builds an engine with optional overrides.
    ///
    /// Each override must supply exactly the standard entry count (4 init
    /// words, 64 K constants, 64 shifts); any other length falls back to
    /// the standard table for that slot without error.
    pub fn new(init: Option<&[u32]>, k_table: Option<&[u32]>, shifts: Option<&[u32]>) -> Self {
        let mut engine = Md5::standard();
        if let Some(values) = init {
            if values.len() == 4 {
                engine.init.copy_from_slice(values);
            }
        }
        if let Some(values) = k_table {
            if values.len() == 64 {
                engine.k_table.copy_from_slice(values);
            }
        }
        if let Some(values) = shifts {
            if values.len() == 64 {
                engine.shifts.copy_from_slice(values);
            }
        }
        engine
    }

    /// The standard MD5 engine.
    pub fn standard() -> Self {
        Md5 {
            init: MD5_STANDARD_INIT,
            k_table: MD5_STANDARD_K,
            shifts: MD5_STANDARD_SHIFTS,
        }
    }

    /// Hashes a message to its 16-byte digest (little-endian word order).
    pub fn digest(&self, message: &[u8]) -> [u8; 16] {
        let mut state = self.init;

        // Preprocessing: 0x80, zero-fill to 56 mod 64, bit length as u64 LE.
        let bit_len = (message.len() as u64).wrapping_mul(8);
        let mut padded = message.to_vec();
        padded.push(0x80);
        while padded.len() % 64 != 56 {
            padded.push(0x00);
        }
        padded.extend_from_slice(&bit_len.to_le_bytes());

        for chunk in padded.chunks_exact(64) {
            self.compress(&mut state, chunk);
        }

        let mut out = [0u8; 16];
        for (i, word) in state.iter().enumerate() {
            out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// One 64-byte chunk through the 64-step compression loop.
    fn compress(&self, state: &mut [u32; 4], chunk: &[u8]) {
        let mut m = [0u32; 16];
        for (i, word) in m.iter_mut().enumerate() {
            *word = u32::from_le_bytes([
                chunk[i * 4],
                chunk[i * 4 + 1],
                chunk[i * 4 + 2],
                chunk[i * 4 + 3],
            ]);
        }

        let [mut a, mut b, mut c, mut d] = *state;

        for i in 0..64 {
            let (f, g) = match i {
                0..=15 => ((b & c) | (!b & d), i),
                16..=31 => ((d & b) | (!d & c), (5 * i + 1) % 16),
                32..=47 => (b ^ c ^ d, (3 * i + 5) % 16),
                _ => (c ^ (b | !d), (7 * i) % 16),
            };
            let f = f
                .wrapping_add(a)
                .wrapping_add(self.k_table[i])
                .wrapping_add(m[g]);
            a = d;
            d = c;
            c = b;
            b = b.wrapping_add(f.rotate_left(self.shifts[i] % 32));
        }

        state[0] = state[0].wrapping_add(a);
        state[1] = state[1].wrapping_add(b);
        state[2] = state[2].wrapping_add(c);
        state[3] = state[3].wrapping_add(d);
    }
}

impl Default for Md5 {
    fn default() -> Self {
        Self::standard()
    }
}

/// Standard MD5 digest of `data`. Used by the key/IV derivation paths.
pub fn md5(data: &[u8]) -> [u8; 16] {
    Md5::standard().digest(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message() {
        assert_eq!(hex::encode(md5(b"")), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_abc() {
        assert_eq!(hex::encode(md5(b"abc")), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_quick_brown_fox() {
        assert_eq!(
            hex::encode(md5(b"The quick brown fox jumps over the lazy dog")),
            "9e107d9d372bb6826bd81d3542a419d6"
        );
    }

    #[test]
    fn test_multi_block_message() {
        // 120 bytes: two compression blocks after padding.
        let message = vec![b'a'; 120];
        let digest = md5(&message);
        let again = md5(&message);
        assert_eq!(digest, again);
        assert_ne!(digest, md5(&vec![b'a'; 119]));
    }

    #[test]
    fn test_custom_init_changes_digest() {
        let custom = Md5::new(Some(&[0, 0, 0, 0]), None, None);
        assert_ne!(custom.digest(b"abc"), md5(b"abc"));
    }

    #[test]
    fn test_custom_k_table_changes_digest() {
        let k: Vec<u32> = (0..64).collect();
        let custom = Md5::new(None, Some(&k), None);
        assert_ne!(custom.digest(b"abc"), md5(b"abc"));
    }

    #[test]
    fn test_wrong_length_override_falls_back() {
        let short_init = [1u32, 2, 3];
        let engine = Md5::new(Some(&short_init), Some(&[0u32; 63]), Some(&[7u32; 65]));
        assert_eq!(engine.digest(b"abc"), md5(b"abc"));
    }

    #[test]
    fn test_oversized_shift_wraps() {
        // Shift amounts are taken mod 32 so a mutated table cannot panic.
        let shifts = [33u32; 64];
        let engine = Md5::new(None, None, Some(&shifts));
        let _ = engine.digest(b"does not panic");
    }
}
