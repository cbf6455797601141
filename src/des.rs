//! DES Feistel core and the 3DES EDE composition.
//!
//! Permutation tables operate on bit arrays, one byte per bit, MSB-first
//! within each source byte. Table entries are the classic 1-based bit
//! positions. The 16 round subkeys are regenerated inside every block
//! call rather than cached on the struct: the table set can differ per
//! top-level call, so the schedule cost is paid per block. That is a
//! documented performance characteristic of this engine, not a bug.

use crate::mode::BlockCipher;
use crate::sbox::DesSboxes;

/// DES block size in bytes.
pub const DES_BLOCK_SIZE: usize = 8;

/// Initial permutation.
const IP: [usize; 64] = [
    58, 50, 42, 34, 26, 18, 10, 2, 60, 52, 44, 36, 28, 20, 12, 4, //
    62, 54, 46, 38, 30, 22, 14, 6, 64, 56, 48, 40, 32, 24, 16, 8, //
    57, 49, 41, 33, 25, 17, 9, 1, 59, 51, 43, 35, 27, 19, 11, 3, //
    61, 53, 45, 37, 29, 21, 13, 5, 63, 55, 47, 39, 31, 23, 15, 7,
];

/// Final permutation, the inverse of [`IP`].
const IP_INV: [usize; 64] = [
    40, 8, 48, 16, 56, 24, 64, 32, 39, 7, 47, 15, 55, 23, 63, 31, //
    38, 6, 46, 14, 54, 22, 62, 30, 37, 5, 45, 13, 53, 21, 61, 29, //
    36, 4, 44, 12, 52, 20, 60, 28, 35, 3, 43, 11, 51, 19, 59, 27, //
    34, 2, 42, 10, 50, 18, 58, 26, 33, 1, 41, 9, 49, 17, 57, 25,
];

/// Expansion table, 32 bits to 48.
const E: [usize; 48] = [
    32, 1, 2, 3, 4, 5, 4, 5, 6, 7, 8, 9, //
    8, 9, 10, 11, 12, 13, 12, 13, 14, 15, 16, 17, //
    16, 17, 18, 19, 20, 21, 20, 21, 22, 23, 24, 25, //
    24, 25, 26, 27, 28, 29, 28, 29, 30, 31, 32, 1,
];

/// Round-function output permutation.
const P: [usize; 32] = [
    16, 7, 20, 21, 29, 12, 28, 17, 1, 15, 23, 26, 5, 18, 31, 10, //
    2, 8, 24, 14, 32, 27, 3, 9, 19, 13, 30, 6, 22, 11, 4, 25,
];

/// Key permutation: 64-bit key to 56 bits, parity bits dropped.
const PC1: [usize; 56] = [
    57, 49, 41, 33, 25, 17, 9, 1, 58, 50, 42, 34, 26, 18, //
    10, 2, 59, 51, 43, 35, 27, 19, 11, 3, 60, 52, 44, 36, //
    63, 55, 47, 39, 31, 23, 15, 7, 62, 54, 46, 38, 30, 22, //
    14, 6, 61, 53, 45, 37, 29, 21, 13, 5, 28, 20, 12, 4,
];

/// Subkey compression: 56 bits to the 48-bit round subkey.
const PC2: [usize; 48] = [
    14, 17, 11, 24, 1, 5, 3, 28, 15, 6, 21, 10, //
    23, 19, 12, 4, 26, 8, 16, 7, 27, 20, 13, 2, //
    41, 52, 31, 37, 47, 55, 30, 40, 51, 45, 33, 48, //
    44, 49, 39, 56, 34, 53, 46, 42, 50, 36, 29, 32,
];

/// Per-round left-rotation counts for the C/D key halves.
const SHIFTS: [usize; 16] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

/// Single-DES engine: an 8-byte key plus its (possibly custom) tables.
#[derive(Debug, Clone)]
pub struct Des {
    key: [u8; 8],
    sboxes: DesSboxes,
}

impl Des {
    /// Builds an engine. The key is used as-is; length adjustment happens
    /// upstream in key derivation.
    pub fn new(key: [u8; 8], sboxes: DesSboxes) -> Self {
        Des { key, sboxes }
    }

    /// Encrypts one 8-byte block.
    pub fn encrypt_block8(&self, block: &[u8; 8]) -> [u8; 8] {
        self.run(block, false)
    }

    /// Decrypts one 8-byte block: same network, subkeys reversed.
    pub fn decrypt_block8(&self, block: &[u8; 8]) -> [u8; 8] {
        self.run(block, true)
    }

    fn run(&self, block: &[u8; 8], reverse_subkeys: bool) -> [u8; 8] {
        let mut subkeys = self.subkeys();
        if reverse_subkeys {
            subkeys.reverse();
        }

        let bits = bytes_to_bits(block);
        let permuted = permute(&bits, &IP);
        let (mut left, mut right) = {
            let (l, r) = permuted.split_at(32);
            (l.to_vec(), r.to_vec())
        };

        for subkey in &subkeys {
            let f_out = self.feistel(&right, subkey);
            let new_right: Vec<u8> = left.iter().zip(f_out.iter()).map(|(&l, &f)| l ^ f).collect();
            left = right;
            right = new_right;
        }

        // The last round omits the halves swap: combine as R || L.
        let mut combined = right;
        combined.extend_from_slice(&left);
        let out_bits = permute(&combined, &IP_INV);

        let mut out = [0u8; 8];
        out.copy_from_slice(&bits_to_bytes(&out_bits));
        out
    }

    /// The 16 round subkeys, 48 bits each, derived fresh per call.
    fn subkeys(&self) -> Vec<Vec<u8>> {
        let key_bits = bytes_to_bits(&self.key);
        let permuted = permute(&key_bits, &PC1);
        let mut c = permuted[..28].to_vec();
        let mut d = permuted[28..].to_vec();

        let mut subkeys = Vec::with_capacity(16);
        for &shift in SHIFTS.iter() {
            c.rotate_left(shift);
            d.rotate_left(shift);
            let mut combined = c.clone();
            combined.extend_from_slice(&d);
            subkeys.push(permute(&combined, &PC2));
        }
        subkeys
    }

    /// F(R, K): expand, XOR subkey, substitute 6-bit groups, permute.
    fn feistel(&self, right: &[u8], subkey: &[u8]) -> Vec<u8> {
        let expanded = permute(right, &E);
        let mixed: Vec<u8> = expanded
            .iter()
            .zip(subkey.iter())
            .map(|(&e, &k)| e ^ k)
            .collect();

        let mut substituted = Vec::with_capacity(32);
        for (index, group) in mixed.chunks_exact(6).enumerate() {
            let row = (group[0] << 1 | group[5]) as usize;
            let col = (group[1] << 3 | group[2] << 2 | group[3] << 1 | group[4]) as usize;
            let nibble = self.sboxes.lookup(index, row, col);
            for bit in (0..4).rev() {
                substituted.push((nibble >> bit) & 1);
            }
        }

        permute(&substituted, &P)
    }
}

impl BlockCipher for Des {
    fn block_size(&self) -> usize {
        DES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(block);
        self.encrypt_block8(&buf).to_vec()
    }

    fn decrypt_block(&self, block: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(block);
        self.decrypt_block8(&buf).to_vec()
    }
}

/// 3DES in EDE composition over three independent keys: encrypt with k1,
/// decrypt with k2, encrypt with k3. All three stages share one table set.
#[derive(Debug, Clone)]
pub struct TripleDes {
    stage1: Des,
    stage2: Des,
    stage3: Des,
}

impl TripleDes {
    /// Builds the three stages from an already-split key bundle.
    pub fn new(k1: [u8; 8], k2: [u8; 8], k3: [u8; 8], sboxes: DesSboxes) -> Self {
        TripleDes {
            stage1: Des::new(k1, sboxes.clone()),
            stage2: Des::new(k2, sboxes.clone()),
            stage3: Des::new(k3, sboxes),
        }
    }

    /// Enc(k1) then Dec(k2) then Enc(k3).
    pub fn encrypt_block8(&self, block: &[u8; 8]) -> [u8; 8] {
        let step = self.stage1.encrypt_block8(block);
        let step = self.stage2.decrypt_block8(&step);
        self.stage3.encrypt_block8(&step)
    }

    /// Dec(k3) then Enc(k2) then Dec(k1).
    pub fn decrypt_block8(&self, block: &[u8; 8]) -> [u8; 8] {
        let step = self.stage3.decrypt_block8(block);
        let step = self.stage2.encrypt_block8(&step);
        self.stage1.decrypt_block8(&step)
    }
}

impl BlockCipher for TripleDes {
    fn block_size(&self) -> usize {
        DES_BLOCK_SIZE
    }

    fn encrypt_block(&self, block: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(block);
        self.encrypt_block8(&buf).to_vec()
    }

    fn decrypt_block(&self, block: &[u8]) -> Vec<u8> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(block);
        self.decrypt_block8(&buf).to_vec()
    }
}

/// Unpacks bytes to a bit array, MSB-first within each byte.
fn bytes_to_bits(bytes: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

/// Repacks a bit array into bytes, MSB-first.
fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
        .collect()
}

/// Applies a 1-based permutation table to a bit array.
fn permute(bits: &[u8], table: &[usize]) -> Vec<u8> {
    table.iter().map(|&pos| bits[pos - 1]).collect()
}
