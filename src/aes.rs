//! AES-like block cipher core with mutation hooks.
//!
//! A from-scratch substitution–permutation network over a 4x4 byte state.
//! With the standard S-box and both mutation flags off this is exactly
//! AES-128/192/256; the hooks deform it for cipher-analysis work:
//!
//! - `swap_key_schedule` reverses the four bytes of the substituted word
//!   in the key schedule before the round constant is XORed in.
//! - `swap_data_round` swaps state rows 0↔3 and 1↔2 within every column
//!   right after SubBytes, in every round including the final one. The
//!   swap is its own inverse, so decryption reapplies it at the symmetric
//!   point instead of undoing it.
//!
//! The round key schedule is built once per engine construction and the
//! engine lives for a single top-level call; custom S-boxes can differ
//! between calls, so nothing is cached across them.

use crate::mode::BlockCipher;
use crate::sbox::AesSbox;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Round constants, enough for the 256-bit key schedule (index `i / Nk`).
const RCON: [u8; 11] = [
    0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36,
];

/// 4x4 byte state, row-major: `state[row][col]`.
type State = [[u8; 4]; 4];

/// One round key: four words of four bytes, `rk[word][byte]`.
type RoundKey = [[u8; 4]; 4];

/// AES-like cipher engine holding the expanded key schedule.
#[derive(Debug, Clone)]
pub struct Aes {
    round_keys: Vec<RoundKey>,
    sbox: AesSbox,
    rounds: usize,
    swap_data_round: bool,
}

impl Aes {
    /// Builds an engine and runs the key expansion.
    ///
    /// Key lengths other than 16/24/32 are normalized, never rejected:
    /// shorter than 16 is zero-padded to 16; lengths strictly between 16
    /// and 24 truncate to 16, between 24 and 32 truncate to 24, above 32
    /// truncate to 32. Round count is 10/12/14 accordingly.
    pub fn new(key: &[u8], sbox: AesSbox, swap_key_schedule: bool, swap_data_round: bool) -> Self {
        let key = normalize_key(key);
        let rounds = match key.len() {
            16 => 10,
            24 => 12,
            _ => 14,
        };
        let round_keys = expand_key(&key, &sbox, rounds, swap_key_schedule);
        Aes {
            round_keys,
            sbox,
            rounds,
            swap_data_round,
        }
    }

    /// Encrypts one 16-byte block.
    pub fn encrypt_block16(&self, block: &[u8; 16]) -> [u8; 16] {
        let mut state = load_state(block);

        add_round_key(&mut state, &self.round_keys[0]);

        for round in 1..self.rounds {
            self.sub_bytes(&mut state);
            if self.swap_data_round {
                magic_swap_state(&mut state);
            }
            shift_rows(&mut state);
            mix_columns(&mut state);
            add_round_key(&mut state, &self.round_keys[round]);
        }

        self.sub_bytes(&mut state);
        if self.swap_data_round {
            magic_swap_state(&mut state);
        }
        shift_rows(&mut state);
        add_round_key(&mut state, &self.round_keys[self.rounds]);

        store_state(&state)
    }

    /// Decrypts one 16-byte block.
    ///
    /// Rounds run in reverse operation order with the inverse S-box. The
    /// data-round swap is self-inverse, so it is applied (not un-applied)
    /// after InvSubBytes, mirroring its position after SubBytes on the
    /// encrypt side.
    pub fn decrypt_block16(&self, block: &[u8; 16]) -> [u8; 16] {
        let mut state = load_state(block);

        add_round_key(&mut state, &self.round_keys[self.rounds]);

        for round in (1..self.rounds).rev() {
            inv_shift_rows(&mut state);
            self.inv_sub_bytes(&mut state);
            if self.swap_data_round {
                magic_swap_state(&mut state);
            }
            add_round_key(&mut state, &self.round_keys[round]);
            inv_mix_columns(&mut state);
        }

        inv_shift_rows(&mut state);
        self.inv_sub_bytes(&mut state);
        if self.swap_data_round {
            magic_swap_state(&mut state);
        }
        add_round_key(&mut state, &self.round_keys[0]);

        store_state(&state)
    }

    /// Number of rounds (10, 12 or 14).
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn sub_bytes(&self, state: &mut State) {
        for row in state.iter_mut() {
            for byte in row.iter_mut() {
                *byte = self.sbox.sub(*byte);
            }
        }
    }

    fn inv_sub_bytes(&self, state: &mut State) {
        for row in state.iter_mut() {
            for byte in row.iter_mut() {
                *byte = self.sbox.inv_sub(*byte);
            }
        }
    }
}

impl BlockCipher for Aes {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(block);
        self.encrypt_block16(&buf).to_vec()
    }

    fn decrypt_block(&self, block: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; 16];
        buf.copy_from_slice(block);
        self.decrypt_block16(&buf).to_vec()
    }
}

/// Key length tolerance policy (see [`Aes::new`]).
fn normalize_key(key: &[u8]) -> Vec<u8> {
    match key.len() {
        16 | 24 | 32 => key.to_vec(),
        n if n < 16 => {
            let mut padded = key.to_vec();
            padded.resize(16, 0);
            padded
        }
        n if n < 24 => key[..16].to_vec(),
        n if n < 32 => key[..24].to_vec(),
        _ => key[..32].to_vec(),
    }
}

/// Word-oriented key expansion producing `rounds + 1` round keys.
fn expand_key(key: &[u8], sbox: &AesSbox, rounds: usize, swap_key_schedule: bool) -> Vec<RoundKey> {
    let nk = key.len() / 4;
    let total_words = 4 * (rounds + 1);

    let mut words: Vec<[u8; 4]> = Vec::with_capacity(total_words);
    for chunk in key.chunks_exact(4) {
        words.push([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    for i in nk..total_words {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp.rotate_left(1); // RotWord
            for byte in temp.iter_mut() {
                *byte = sbox.sub(*byte);
            }
            if swap_key_schedule {
                temp.reverse();
            }
            temp[0] ^= RCON[i / nk];
        } else if nk > 6 && i % nk == 4 {
            for byte in temp.iter_mut() {
                *byte = sbox.sub(*byte);
            }
        }
        let mut word = words[i - nk];
        for (w, t) in word.iter_mut().zip(temp.iter()) {
            *w ^= t;
        }
        words.push(word);
    }

    words
        .chunks_exact(4)
        .map(|chunk| [chunk[0], chunk[1], chunk[2], chunk[3]])
        .collect()
}

/// Column-major fill: `state[row][col] = block[4 * col + row]`.
fn load_state(block: &[u8; 16]) -> State {
    let mut state = [[0u8; 4]; 4];
    for (col, chunk) in block.chunks_exact(4).enumerate() {
        for (row, &byte) in chunk.iter().enumerate() {
            state[row][col] = byte;
        }
    }
    state
}

fn store_state(state: &State) -> [u8; 16] {
    let mut out = [0u8; 16];
    for col in 0..4 {
        for row in 0..4 {
            out[4 * col + row] = state[row][col];
        }
    }
    out
}

fn add_round_key(state: &mut State, round_key: &RoundKey) {
    for (i, row) in state.iter_mut().enumerate() {
        for (j, byte) in row.iter_mut().enumerate() {
            *byte ^= round_key[j][i];
        }
    }
}

fn shift_rows(state: &mut State) {
    state[1].rotate_left(1);
    state[2].rotate_left(2);
    state[3].rotate_left(3);
}

fn inv_shift_rows(state: &mut State) {
    state[1].rotate_right(1);
    state[2].rotate_right(2);
    state[3].rotate_right(3);
}

/// Data-round mutation: swap rows 0↔3 and 1↔2 within every column.
fn magic_swap_state(state: &mut State) {
    for col in 0..4 {
        let (a, b) = (state[0][col], state[3][col]);
        state[0][col] = b;
        state[3][col] = a;
        let (a, b) = (state[1][col], state[2][col]);
        state[1][col] = b;
        state[2][col] = a;
    }
}

/// GF(2^8) multiply-by-2 with the AES reduction polynomial 0x1B.
#[inline]
fn xtime(a: u8) -> u8 {
    if a & 0x80 != 0 {
        (a << 1) ^ 0x1b
    } else {
        a << 1
    }
}

fn mix_columns(state: &mut State) {
    for col in 0..4 {
        let s0 = state[0][col];
        let s1 = state[1][col];
        let s2 = state[2][col];
        let s3 = state[3][col];
        let t = s0 ^ s1 ^ s2 ^ s3;
        state[0][col] = s0 ^ t ^ xtime(s0 ^ s1);
        state[1][col] = s1 ^ t ^ xtime(s1 ^ s2);
        state[2][col] = s2 ^ t ^ xtime(s2 ^ s3);
        state[3][col] = s3 ^ t ^ xtime(s3 ^ s0);
    }
}

fn inv_mix_columns(state: &mut State) {
    for col in 0..4 {
        let u = xtime(xtime(state[0][col] ^ state[2][col]));
        let v = xtime(xtime(state[1][col] ^ state[3][col]));
        state[0][col] ^= u;
        state[1][col] ^= v;
        state[2][col] ^= u;
        state[3][col] ^= v;
    }
    mix_columns(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbox::AesSbox;

    fn standard_aes(key: &[u8]) -> Aes {
        Aes::new(key, AesSbox::standard(), false, false)
    }

    #[test]
    fn test_aes128_zero_vector() {
        let aes = standard_aes(&[0u8; 16]);
        let ciphertext = aes.encrypt_block16(&[0u8; 16]);
        assert_eq!(hex::encode(ciphertext), "66e94bd4ef8a2c3b884cfa59ca342b2e");
    }

    #[test]
    fn test_aes192_zero_vector() {
        let aes = standard_aes(&[0u8; 24]);
        let ciphertext = aes.encrypt_block16(&[0u8; 16]);
        assert_eq!(hex::encode(ciphertext), "aae06992acbf52a3e8f4a96ec9300bd7");
    }

    #[test]
    fn test_aes256_zero_vector() {
        let aes = standard_aes(&[0u8; 32]);
        let ciphertext = aes.encrypt_block16(&[0u8; 16]);
        assert_eq!(hex::encode(ciphertext), "dc95c078a2408989ad48a21492842087");
    }

    #[test]
    fn test_fips197_appendix_c_vector() {
        let key: Vec<u8> = (0u8..16).collect();
        let plaintext: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let aes = standard_aes(&key);
        let ciphertext = aes.encrypt_block16(&plaintext);
        assert_eq!(hex::encode(ciphertext), "69c4e0d86a7b0430d8cdb78070b4c55a");
        assert_eq!(aes.decrypt_block16(&ciphertext), plaintext);
    }

    #[test]
    fn test_round_counts() {
        assert_eq!(standard_aes(&[0u8; 16]).rounds(), 10);
        assert_eq!(standard_aes(&[0u8; 24]).rounds(), 12);
        assert_eq!(standard_aes(&[0u8; 32]).rounds(), 14);
    }

    #[test]
    fn test_key_normalization_policy() {
        // Short keys zero-pad to 16; odd lengths truncate downward.
        assert_eq!(standard_aes(&[0xAA; 5]).rounds(), 10);
        assert_eq!(standard_aes(&[0xAA; 17]).rounds(), 10);
        assert_eq!(standard_aes(&[0xAA; 25]).rounds(), 12);
        assert_eq!(standard_aes(&[0xAA; 40]).rounds(), 14);

        // Zero-padding a short key equals the explicit padded key.
        let short = standard_aes(b"abc");
        let mut padded = b"abc".to_vec();
        padded.resize(16, 0);
        let explicit = standard_aes(&padded);
        let block = [0x5Au8; 16];
        assert_eq!(short.encrypt_block16(&block), explicit.encrypt_block16(&block));
    }

    #[test]
    fn test_roundtrip_all_key_sizes() {
        let block: [u8; 16] = *b"cipherlab block!";
        for key_len in [16usize, 24, 32] {
            let key = vec![0x3Cu8; key_len];
            let aes = standard_aes(&key);
            let ciphertext = aes.encrypt_block16(&block);
            assert_eq!(aes.decrypt_block16(&ciphertext), block, "key_len={}", key_len);
        }
    }

    #[test]
    fn test_swap_key_schedule_changes_output() {
        let plain = Aes::new(&[7u8; 16], AesSbox::standard(), false, false);
        let swapped = Aes::new(&[7u8; 16], AesSbox::standard(), true, false);
        let block = [0u8; 16];
        assert_ne!(plain.encrypt_block16(&block), swapped.encrypt_block16(&block));
        // Self-consistent under the same flag.
        let ciphertext = swapped.encrypt_block16(&block);
        assert_eq!(swapped.decrypt_block16(&ciphertext), block);
    }

    #[test]
    fn test_swap_data_round_changes_output() {
        let plain = Aes::new(&[7u8; 16], AesSbox::standard(), false, false);
        let swapped = Aes::new(&[7u8; 16], AesSbox::standard(), false, true);
        let block = *b"0123456789abcdef";
        assert_ne!(plain.encrypt_block16(&block), swapped.encrypt_block16(&block));
        let ciphertext = swapped.encrypt_block16(&block);
        assert_eq!(swapped.decrypt_block16(&ciphertext), block);
    }

    #[test]
    fn test_both_mutations_roundtrip() {
        let aes = Aes::new(b"mutation bench k", AesSbox::standard(), true, true);
        let block = *b"a block of bytes";
        let ciphertext = aes.encrypt_block16(&block);
        assert_ne!(ciphertext, block);
        assert_eq!(aes.decrypt_block16(&ciphertext), block);
    }

    #[test]
    fn test_custom_bijective_sbox_roundtrip() {
        // A rotated identity table: bijective but nothing like Rijndael.
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = (i as u8).wrapping_add(1);
        }
        let aes = Aes::new(&[9u8; 16], AesSbox::from_table(table), false, false);
        let block = [0xEEu8; 16];
        let ciphertext = aes.encrypt_block16(&block);
        assert_eq!(aes.decrypt_block16(&ciphertext), block);
    }

    #[test]
    fn test_magic_swap_is_self_inverse() {
        let mut state = load_state(b"fedcba9876543210");
        let original = state;
        magic_swap_state(&mut state);
        assert_ne!(state, original);
        magic_swap_state(&mut state);
        assert_eq!(state, original);
    }

    #[test]
    fn test_state_load_store_roundtrip() {
        let block = *b"The 16-byte load";
        assert_eq!(store_state(&load_state(&block)), block);
    }
}
