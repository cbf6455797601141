//! # cipherlab
//!
//! A from-scratch cryptographic workbench engine: complete, independent
//! reimplementations of AES, DES/3DES, MD5 and RC4 over raw bytes, each
//! exposing mutation points (custom substitution tables, custom round
//! constants and rotation tables, altered key-schedule and intra-round
//! transforms) for cipher-analysis and teaching work, plus a generic
//! mode-of-operation and padding driver for the block ciphers.
//!
//! This is explicitly **not** a secure-by-default library. It allows
//! weak and self-inconsistent configurations on purpose, pays the key
//! schedule cost on every block, and makes no side-channel or
//! constant-time claims. Use a vetted cryptography crate for anything
//! that must actually be secret.
//!
//! ## Quick start
//!
//! The request layer in [`api`] is the intended entry point:
//!
//! ```
//! use cipherlab::{AesRequest, aes_encrypt, aes_decrypt};
//!
//! let ciphertext = aes_encrypt(&AesRequest {
//!     data: "attack at dawn".to_string(),
//!     key: "campfire".to_string(),
//!     ..Default::default()
//! })?;
//!
//! let plaintext = aes_decrypt(&AesRequest {
//!     data: ciphertext,
//!     key: "campfire".to_string(),
//!     ..AesRequest::decrypt_defaults()
//! })?;
//! assert_eq!(plaintext, "attack at dawn");
//! # Ok::<(), cipherlab::CipherLabError>(())
//! ```
//!
//! The cores themselves ([`aes::Aes`], [`des::Des`], [`md5::Md5`],
//! [`rc4::Rc4`]) are public for callers that want raw bytes in and out.

#![deny(clippy::all)]

pub mod aes;
pub mod api;
pub mod des;
pub mod encoding;
pub mod error;
pub mod keys;
pub mod md5;
pub mod mode;
pub mod padding;
pub mod rc4;
pub mod sbox;
pub mod store;

pub use aes::Aes;
pub use api::{
    aes_decrypt, aes_encrypt, des_decrypt, des_encrypt, md5_digest, rc4_decrypt, rc4_encrypt,
    triple_des_decrypt, triple_des_encrypt, AesRequest, DesRequest, Md5Request, Rc4Request,
};
pub use des::{Des, TripleDes};
pub use encoding::{DataFormat, TextFormat};
pub use error::CipherLabError;
pub use md5::{md5, Md5};
pub use mode::{BlockCipher, Mode};
pub use padding::Padding;
pub use rc4::Rc4;
pub use sbox::{AesSbox, DesSboxes};
pub use store::{MemorySboxStore, NamedTable, SboxStore};
