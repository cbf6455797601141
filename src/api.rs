//! Textual request layer: the sole external call shape of the engine.
//!
//! Requests carry strings for mode and padding names, format tags for
//! keys/IVs/payloads, and optional table overrides or mutation flags. The
//! operations map them onto the typed cores, run the mode driver, and
//! return base64 ciphertext (encrypt) or best-effort text (decrypt).
//!
//! IV framing convention: when the caller omits the IV on encrypt, one is
//! generated and its raw bytes are prepended to the ciphertext before
//! base64 encoding; decrypt without an IV then reads the first block off
//! the decoded ciphertext. A caller-supplied IV travels out-of-band and
//! is never prepended or stripped.

use crate::aes::Aes;
use crate::des::{Des, TripleDes};
use crate::encoding::{
    decode_base64, decode_hex, encode_base64, encode_hex, present_plaintext, DataFormat,
    TextFormat,
};
use crate::error::CipherLabError;
use crate::keys::{
    derive_aes_key, derive_des_key, derive_iv, derive_rc4_key, derive_triple_des_keys, random_iv,
};
use crate::md5::Md5;
use crate::mode::{self, BlockCipher, Mode};
use crate::padding::Padding;
use crate::rc4::Rc4;
use crate::sbox::{AesSbox, DesSboxes};

/// Parameters of an AES encrypt/decrypt call.
#[derive(Debug, Clone)]
pub struct AesRequest {
    /// Payload text, interpreted per `data_format`.
    pub data: String,
    /// Payload interpretation; encrypt defaults to UTF-8, decrypt callers
    /// normally leave this as the base64 default via [`AesRequest::decrypt_defaults`].
    pub data_format: DataFormat,
    /// Key text.
    pub key: String,
    /// Key interpretation: hex decodes, UTF-8 hashes.
    pub key_format: TextFormat,
    /// Optional IV text; empty or absent means auto-generation.
    pub iv: Option<String>,
    /// IV interpretation.
    pub iv_format: TextFormat,
    /// Mode name, case-insensitive.
    pub mode: String,
    /// Padding name, case-insensitive.
    pub padding: String,
    /// Substitution table override; `None` selects the standard S-box.
    pub sbox: Option<AesSbox>,
    /// Key-schedule mutation flag.
    pub swap_key_schedule: bool,
    /// Data-round mutation flag.
    pub swap_data_round: bool,
}

impl Default for AesRequest {
    fn default() -> Self {
        AesRequest {
            data: String::new(),
            data_format: DataFormat::Utf8,
            key: String::new(),
            key_format: TextFormat::Utf8,
            iv: None,
            iv_format: TextFormat::Utf8,
            mode: "cbc".to_string(),
            padding: "pkcs7".to_string(),
            sbox: None,
            swap_key_schedule: false,
            swap_data_round: false,
        }
    }
}

impl AesRequest {
    /// Default request shaped for decryption: base64 payload.
    pub fn decrypt_defaults() -> Self {
        AesRequest {
            data_format: DataFormat::Base64,
            ..Default::default()
        }
    }
}

/// Parameters of a DES or 3DES encrypt/decrypt call.
#[derive(Debug, Clone)]
pub struct DesRequest {
    /// Payload text, interpreted per `data_format`.
    pub data: String,
    /// Payload interpretation.
    pub data_format: DataFormat,
    /// Key text.
    pub key: String,
    /// Key interpretation.
    pub key_format: TextFormat,
    /// Optional IV text; empty or absent means the legacy all-zero IV.
    pub iv: Option<String>,
    /// IV interpretation.
    pub iv_format: TextFormat,
    /// Mode name, case-insensitive. 3DES accepts only ECB and CBC.
    pub mode: String,
    /// Padding name, case-insensitive.
    pub padding: String,
    /// Substitution table override; `None` selects the standard tables.
    pub sboxes: Option<DesSboxes>,
}

impl Default for DesRequest {
    fn default() -> Self {
        DesRequest {
            data: String::new(),
            data_format: DataFormat::Utf8,
            key: String::new(),
            key_format: TextFormat::Utf8,
            iv: None,
            iv_format: TextFormat::Utf8,
            mode: "cbc".to_string(),
            padding: "pkcs7".to_string(),
            sboxes: None,
        }
    }
}

impl DesRequest {
    /// Default request shaped for decryption: base64 payload.
    pub fn decrypt_defaults() -> Self {
        DesRequest {
            data_format: DataFormat::Base64,
            ..Default::default()
        }
    }
}

/// Parameters of an RC4 call. Encrypt and decrypt share the engine; only
/// the payload interpretation differs.
#[derive(Debug, Clone)]
pub struct Rc4Request {
    /// Payload text, interpreted per `data_format`.
    pub data: String,
    /// Payload interpretation.
    pub data_format: DataFormat,
    /// Key text.
    pub key: String,
    /// Key interpretation: hex decodes, UTF-8 is used as raw bytes.
    pub key_format: TextFormat,
    /// Mutated KSA swap rule flag.
    pub swap_bytes: bool,
    /// Seed table replacing the identity permutation in the KSA.
    pub seed_table: Option<[u8; 256]>,
}

impl Default for Rc4Request {
    fn default() -> Self {
        Rc4Request {
            data: String::new(),
            data_format: DataFormat::Utf8,
            key: String::new(),
            key_format: TextFormat::Utf8,
            swap_bytes: false,
            seed_table: None,
        }
    }
}

/// Parameters of an MD5 digest call.
#[derive(Debug, Clone, Default)]
pub struct Md5Request {
    /// Message text, interpreted per `data_format`.
    pub data: String,
    /// Message interpretation.
    pub data_format: DataFormat,
    /// Initial state override (exactly 4 words, else standard).
    pub init: Option<Vec<u32>>,
    /// K table override (exactly 64 entries, else standard).
    pub k_table: Option<Vec<u32>>,
    /// Rotation table override (exactly 64 entries, else standard).
    pub shifts: Option<Vec<u32>>,
    /// Digest rendering: `Base64` emits base64, anything else lowercase hex.
    pub output_format: DataFormat,
}

/// AES encryption: returns base64 ciphertext.
///
/// # Errors
/// Validation, decode and padding errors per the request contract.
pub fn aes_encrypt(request: &AesRequest) -> Result<String, CipherLabError> {
    let key = derive_aes_key(&request.key, request.key_format)?;
    let cipher = Aes::new(
        &key,
        request.sbox.clone().unwrap_or_else(AesSbox::standard),
        request.swap_key_schedule,
        request.swap_data_round,
    );
    block_encrypt(
        &cipher,
        &request.data,
        request.data_format,
        request.iv.as_deref(),
        request.iv_format,
        &request.mode,
        &request.padding,
        AutoIv::Random,
    )
}

/// AES decryption: returns best-effort plaintext text.
///
/// # Errors
/// Validation, decode and padding errors per the request contract. A
/// wrong key produces garbage output, not an error.
pub fn aes_decrypt(request: &AesRequest) -> Result<String, CipherLabError> {
    let key = derive_aes_key(&request.key, request.key_format)?;
    let cipher = Aes::new(
        &key,
        request.sbox.clone().unwrap_or_else(AesSbox::standard),
        request.swap_key_schedule,
        request.swap_data_round,
    );
    block_decrypt(
        &cipher,
        &request.data,
        request.data_format,
        request.iv.as_deref(),
        request.iv_format,
        &request.mode,
        &request.padding,
    )
}

/// Single-DES encryption: returns base64 ciphertext.
///
/// # Errors
/// Validation, decode and padding errors per the request contract.
pub fn des_encrypt(request: &DesRequest) -> Result<String, CipherLabError> {
    let key = derive_des_key(&request.key, request.key_format)?;
    let cipher = Des::new(key, request.sboxes.clone().unwrap_or_default());
    block_encrypt(
        &cipher,
        &request.data,
        request.data_format,
        request.iv.as_deref(),
        request.iv_format,
        &request.mode,
        &request.padding,
        AutoIv::Zero,
    )
}

/// Single-DES decryption: returns best-effort plaintext text.
///
/// # Errors
/// Validation, decode and padding errors per the request contract.
pub fn des_decrypt(request: &DesRequest) -> Result<String, CipherLabError> {
    let key = derive_des_key(&request.key, request.key_format)?;
    let cipher = Des::new(key, request.sboxes.clone().unwrap_or_default());
    block_decrypt(
        &cipher,
        &request.data,
        request.data_format,
        request.iv.as_deref(),
        request.iv_format,
        &request.mode,
        &request.padding,
    )
}

/// 3DES encryption, ECB/CBC only: returns base64 ciphertext.
///
/// # Errors
/// [`CipherLabError::UnsupportedMode`] for any mode beyond ECB/CBC, plus
/// the usual validation, decode and padding errors.
pub fn triple_des_encrypt(request: &DesRequest) -> Result<String, CipherLabError> {
    let cipher = build_triple_des(request)?;
    block_encrypt(
        &cipher,
        &request.data,
        request.data_format,
        request.iv.as_deref(),
        request.iv_format,
        &request.mode,
        &request.padding,
        AutoIv::Zero,
    )
}

/// 3DES decryption, ECB/CBC only: returns best-effort plaintext text.
///
/// # Errors
/// Same contract as [`triple_des_encrypt`].
pub fn triple_des_decrypt(request: &DesRequest) -> Result<String, CipherLabError> {
    let cipher = build_triple_des(request)?;
    block_decrypt(
        &cipher,
        &request.data,
        request.data_format,
        request.iv.as_deref(),
        request.iv_format,
        &request.mode,
        &request.padding,
    )
}

/// RC4 encryption: returns base64 ciphertext.
///
/// # Errors
/// [`CipherLabError::EmptyKey`] / [`CipherLabError::EmptyData`] and
/// decode errors.
pub fn rc4_encrypt(request: &Rc4Request) -> Result<String, CipherLabError> {
    let key = derive_rc4_key(&request.key, request.key_format)?;
    let data = decode_payload(&request.data, request.data_format)?;
    let engine = Rc4::new(request.swap_bytes, request.seed_table);
    Ok(encode_base64(&engine.apply(&data, &key)))
}

/// RC4 decryption: returns best-effort plaintext text.
///
/// # Errors
/// Same contract as [`rc4_encrypt`].
pub fn rc4_decrypt(request: &Rc4Request) -> Result<String, CipherLabError> {
    let key = derive_rc4_key(&request.key, request.key_format)?;
    let data = decode_payload(&request.data, request.data_format)?;
    let engine = Rc4::new(request.swap_bytes, request.seed_table);
    Ok(present_plaintext(&engine.apply(&data, &key)))
}

/// MD5 digest of the request message, rendered per `output_format`.
///
/// # Errors
/// [`CipherLabError::EmptyData`] and payload decode errors. Table
/// overrides never fail; wrong lengths fall back to the standard tables.
pub fn md5_digest(request: &Md5Request) -> Result<String, CipherLabError> {
    let data = decode_payload(&request.data, request.data_format)?;
    let engine = Md5::new(
        request.init.as_deref(),
        request.k_table.as_deref(),
        request.shifts.as_deref(),
    );
    let digest = engine.digest(&data);
    Ok(match request.output_format {
        DataFormat::Base64 => encode_base64(&digest),
        _ => encode_hex(&digest),
    })
}

/// IV origin when the caller omits one.
enum AutoIv {
    /// Fresh random bytes (AES).
    Random,
    /// All zeros (DES/3DES legacy behavior).
    Zero,
}

fn build_triple_des(request: &DesRequest) -> Result<TripleDes, CipherLabError> {
    let parsed = Mode::parse(&request.mode)?;
    if !matches!(parsed, Mode::Ecb | Mode::Cbc) {
        return Err(CipherLabError::UnsupportedMode(format!(
            "{} (3DES supports only ECB and CBC)",
            request.mode.to_ascii_lowercase()
        )));
    }
    let (k1, k2, k3) = derive_triple_des_keys(&request.key, request.key_format)?;
    Ok(TripleDes::new(
        k1,
        k2,
        k3,
        request.sboxes.clone().unwrap_or_default(),
    ))
}

/// Decodes a request payload and rejects empty results.
fn decode_payload(data: &str, format: DataFormat) -> Result<Vec<u8>, CipherLabError> {
    if data.is_empty() {
        return Err(CipherLabError::EmptyData);
    }
    let bytes = match format {
        DataFormat::Hex => decode_hex(data)?,
        DataFormat::Base64 => decode_base64(data)?,
        DataFormat::Utf8 => data.as_bytes().to_vec(),
    };
    if bytes.is_empty() {
        return Err(CipherLabError::EmptyData);
    }
    Ok(bytes)
}

/// Resolves the caller IV for encryption. Returns the IV bytes plus
/// whether they must be prepended to the ciphertext.
fn resolve_encrypt_iv(
    mode: Mode,
    iv: Option<&str>,
    iv_format: TextFormat,
    block_size: usize,
    auto: AutoIv,
) -> Result<(Vec<u8>, bool), CipherLabError> {
    let supplied = iv.filter(|text| !text.is_empty());
    if !mode.uses_iv() {
        if supplied.is_some() {
            return Err(CipherLabError::IvNotAllowed);
        }
        return Ok((Vec::new(), false));
    }
    match supplied {
        Some(text) => Ok((derive_iv(text, iv_format, block_size)?, false)),
        None => {
            let generated = match auto {
                AutoIv::Random => random_iv(block_size),
                AutoIv::Zero => vec![0u8; block_size],
            };
            Ok((generated, true))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn block_encrypt(
    cipher: &dyn BlockCipher,
    data: &str,
    data_format: DataFormat,
    iv: Option<&str>,
    iv_format: TextFormat,
    mode_name: &str,
    padding_name: &str,
    auto: AutoIv,
) -> Result<String, CipherLabError> {
    let plaintext = decode_payload(data, data_format)?;
    let mode = Mode::parse(mode_name)?;
    let padding = Padding::parse(padding_name)?;
    let block_size = cipher.block_size();

    let (iv_bytes, prepend) = resolve_encrypt_iv(mode, iv, iv_format, block_size, auto)?;

    // Stream modes skip the pad stage only for NoPadding; any other
    // scheme is applied even though it is redundant there.
    let padded = if mode.is_stream() && padding == Padding::None {
        plaintext
    } else {
        padding.pad(&plaintext, block_size)?
    };

    let ciphertext = mode::encrypt(cipher, mode, &padded, &iv_bytes)?;

    let framed = if prepend {
        let mut out = iv_bytes;
        out.extend_from_slice(&ciphertext);
        out
    } else {
        ciphertext
    };
    Ok(encode_base64(&framed))
}

fn block_decrypt(
    cipher: &dyn BlockCipher,
    data: &str,
    data_format: DataFormat,
    iv: Option<&str>,
    iv_format: TextFormat,
    mode_name: &str,
    padding_name: &str,
) -> Result<String, CipherLabError> {
    let mut ciphertext = decode_payload(data, data_format)?;
    let mode = Mode::parse(mode_name)?;
    let padding = Padding::parse(padding_name)?;
    let block_size = cipher.block_size();

    let supplied = iv.filter(|text| !text.is_empty());
    let iv_bytes = if !mode.uses_iv() {
        if supplied.is_some() {
            return Err(CipherLabError::IvNotAllowed);
        }
        Vec::new()
    } else {
        match supplied {
            Some(text) => derive_iv(text, iv_format, block_size)?,
            None => {
                // No out-of-band IV: the first block of the ciphertext is it.
                if ciphertext.len() < block_size {
                    return Err(CipherLabError::CiphertextTooShort { needed: block_size });
                }
                let rest = ciphertext.split_off(block_size);
                let head = ciphertext;
                ciphertext = rest;
                head
            }
        }
    };

    let plaintext = mode::decrypt(cipher, mode, &ciphertext, &iv_bytes)?;

    let unpadded = if mode.is_stream() && padding == Padding::None {
        plaintext
    } else {
        padding.unpad(&plaintext, block_size)?
    };

    Ok(present_plaintext(&unpadded))
}
