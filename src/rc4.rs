//! RC4 stream engine with a pluggable KSA swap rule.
//!
//! The key-scheduling phase can seed its state from a caller-supplied
//! 256-entry table instead of the identity permutation, and the swap step
//! can be switched to a mutated rule that XORs the loop indices into the
//! exchanged values. The mutated rule is *not* a permutation swap — the
//! state array stops being a bijection — and that divergence is the whole
//! point: it is preserved bit-for-bit, never corrected.

/// RC4 engine configuration.
#[derive(Debug, Clone, Default)]
pub struct Rc4 {
    swap_bytes: bool,
    seed_table: Option<[u8; 256]>,
}

impl Rc4 {
    /// Builds an engine.
    ///
    /// `swap_bytes` selects the mutated KSA swap rule
    /// (`S[i], S[j] = S[j]^i, S[i]^j`). `seed_table` replaces the identity
    /// permutation as the initial state; it is not required to be a
    /// bijection.
    pub fn new(swap_bytes: bool, seed_table: Option<[u8; 256]>) -> Self {
        Rc4 {
            swap_bytes,
            seed_table,
        }
    }

    /// Key Scheduling Algorithm: builds the internal state from the key.
    fn ksa(&self, key: &[u8]) -> [u8; 256] {
        let mut s = match self.seed_table {
            Some(table) => table,
            None => {
                let mut identity = [0u8; 256];
                for (i, slot) in identity.iter_mut().enumerate() {
                    *slot = i as u8;
                }
                identity
            }
        };

        let mut j = 0usize;
        for i in 0..256 {
            j = (j + s[i] as usize + key[i % key.len()] as usize) % 256;
            if self.swap_bytes {
                // Mutated rule: XOR the indices in. Deliberately not a
                // valid swap.
                let (a, b) = (s[i], s[j]);
                s[i] = b ^ i as u8;
                s[j] = a ^ j as u8;
            } else {
                s.swap(i, j);
            }
        }
        s
    }

    /// Pseudo-Random Generation Algorithm: emits `length` keystream bytes.
    fn prga(s: &mut [u8; 256], length: usize) -> Vec<u8> {
        let mut i = 0usize;
        let mut j = 0usize;
        let mut keystream = Vec::with_capacity(length);
        for _ in 0..length {
            i = (i + 1) % 256;
            j = (j + s[i] as usize) % 256;
            s.swap(i, j);
            let k = s[(s[i] as usize + s[j] as usize) % 256];
            keystream.push(k);
        }
        keystream
    }

    /// XORs `data` with the keystream derived from `key`.
    ///
    /// Encryption and decryption are the same operation. State never
    /// survives a call: each invocation reruns the KSA from scratch.
    pub fn apply(&self, data: &[u8], key: &[u8]) -> Vec<u8> {
        let mut s = self.ksa(key);
        let keystream = Self::prga(&mut s, data.len());
        data.iter()
            .zip(keystream.iter())
            .map(|(&d, &k)| d ^ k)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vector_key_plaintext() {
        // Classic RC4 test vector.
        let rc4 = Rc4::default();
        let ciphertext = rc4.apply(b"Plaintext", b"Key");
        assert_eq!(hex::encode_upper(&ciphertext), "BBF316E8D940AF0AD3");
    }

    #[test]
    fn test_known_vector_wiki() {
        let rc4 = Rc4::default();
        let ciphertext = rc4.apply(b"pedia", b"Wiki");
        assert_eq!(hex::encode_upper(&ciphertext), "1021BF0420");
    }

    #[test]
    fn test_encrypt_decrypt_symmetry() {
        let rc4 = Rc4::default();
        let plaintext = b"stream ciphers are self-inverse";
        let ciphertext = rc4.apply(plaintext, b"secret");
        assert_eq!(rc4.apply(&ciphertext, b"secret"), plaintext);
    }

    #[test]
    fn test_mutated_swap_changes_output() {
        let standard = Rc4::new(false, None);
        let mutated = Rc4::new(true, None);
        assert_ne!(
            standard.apply(b"Plaintext", b"Key"),
            mutated.apply(b"Plaintext", b"Key")
        );
    }

    #[test]
    fn test_mutated_swap_roundtrips() {
        // Even with a non-permutation state, XOR keystreams cancel.
        let mutated = Rc4::new(true, None);
        let plaintext = b"self-consistency over compliance";
        let ciphertext = mutated.apply(plaintext, b"Key");
        assert_eq!(mutated.apply(&ciphertext, b"Key"), plaintext);
    }

    #[test]
    fn test_custom_seed_table_changes_output() {
        let reversed = {
            let mut table = [0u8; 256];
            for (i, slot) in table.iter_mut().enumerate() {
                *slot = 255 - i as u8;
            }
            table
        };
        let seeded = Rc4::new(false, Some(reversed));
        let standard = Rc4::default();
        assert_ne!(
            seeded.apply(b"Plaintext", b"Key"),
            standard.apply(b"Plaintext", b"Key")
        );
        // And still roundtrips with itself.
        let ciphertext = seeded.apply(b"Plaintext", b"Key");
        assert_eq!(seeded.apply(&ciphertext, b"Key"), b"Plaintext");
    }

    #[test]
    fn test_empty_data() {
        let rc4 = Rc4::default();
        assert!(rc4.apply(b"", b"Key").is_empty());
    }

    #[test]
    fn test_keystream_length_matches_input() {
        let rc4 = Rc4::default();
        for len in [1usize, 15, 16, 17, 255, 1024] {
            let data = vec![0xA5u8; len];
            assert_eq!(rc4.apply(&data, b"k").len(), len);
        }
    }
}
