//! Secret vault.
//!
//! Seals individual string values with AES-256-GCM into the self-describing
//! `secure://<iv>:<ciphertext>:<authTag>` format and opens them again. Every
//! seal draws a fresh 96-bit IV from the OS generator. Opening fails closed:
//! a bad prefix, malformed structure or tag mismatch yields `CryptoError`,
//! never partial plaintext.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use crate::core::constants::SECURE_PREFIX;
use crate::error::{CryptoError, Result};

/// Raw key length in bytes.
pub const KEY_BYTES: usize = 32;

const IV_BYTES: usize = 12;
const TAG_BYTES: usize = 16;

/// A 256-bit secret key, wiped from memory on drop.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<[u8; KEY_BYTES]>);

impl SecretKey {
    /// Normalize a key given as 64 hex characters or 44 base64 characters.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` for any other length or an encoding
    /// that does not decode to exactly 32 bytes.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let bytes = Zeroizing::new(match raw.len() {
            64 => hex::decode(raw)
                .map_err(|e| CryptoError::InvalidKey(format!("invalid hex: {}", e)))?,
            44 => STANDARD
                .decode(raw)
                .map_err(|e| CryptoError::InvalidKey(format!("invalid base64: {}", e)))?,
            n => {
                return Err(CryptoError::InvalidKey(format!(
                    "expected 64 hex or 44 base64 characters, got {}",
                    n
                ))
                .into())
            }
        });

        Self::from_slice(&bytes)
    }

    fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_BYTES {
            return Err(CryptoError::InvalidKey(format!(
                "key must decode to {} bytes, got {}",
                KEY_BYTES,
                bytes.len()
            ))
            .into());
        }
        let mut key = Zeroizing::new([0u8; KEY_BYTES]);
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let generated = Aes256Gcm::generate_key(&mut OsRng);
        let mut key = Zeroizing::new([0u8; KEY_BYTES]);
        key.copy_from_slice(generated.as_slice());
        Self(key)
    }

    /// Lowercase hex form, suitable for a key file.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.0.as_slice()))
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(self.0.as_slice())
            .map_err(|_| CryptoError::InvalidKey("rejected by cipher".to_string()).into())
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Component encoding of a sealed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Base64,
    Hex,
}

impl Encoding {
    fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => STANDARD.encode(bytes),
            Self::Hex => hex::encode(bytes),
        }
    }

    fn decode(self, component: &str) -> Result<Vec<u8>> {
        let decoded = match self {
            Self::Base64 => STANDARD.decode(component).map_err(|e| e.to_string()),
            Self::Hex => hex::decode(component).map_err(|e| e.to_string()),
        };
        decoded.map_err(|e| CryptoError::Malformed(e).into())
    }

    /// Hex when every component is hex in either case; base64 otherwise.
    /// A base64 tag always ends in `==`, so it never reads as hex.
    fn detect(components: &[&str]) -> Self {
        let is_hex = |s: &str| s.bytes().all(|b| b.is_ascii_hexdigit());
        if components.iter().all(|c| is_hex(c)) {
            Self::Hex
        } else {
            Self::Base64
        }
    }
}

/// Whether `value` carries the sealed-value prefix.
pub fn is_sealed(value: &str) -> bool {
    value.starts_with(SECURE_PREFIX)
}

/// Seal `plaintext` with base64 components.
///
/// # Errors
///
/// Returns `CryptoError::EncryptionFailed` if the cipher rejects the input.
pub fn seal(plaintext: &str, key: &SecretKey) -> Result<String> {
    seal_with(plaintext, key, Encoding::Base64)
}

/// Seal `plaintext` using the given component encoding.
pub fn seal_with(plaintext: &str, key: &SecretKey, encoding: Encoding) -> Result<String> {
    let cipher = key.cipher()?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let mut sealed = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::EncryptionFailed)?;
    let tag = sealed.split_off(sealed.len() - TAG_BYTES);

    Ok(format!(
        "{}{}:{}:{}",
        SECURE_PREFIX,
        encoding.encode(nonce.as_slice()),
        encoding.encode(&sealed),
        encoding.encode(&tag)
    ))
}

/// Open a sealed value.
///
/// # Errors
///
/// - `CryptoError::MissingPrefix` if the value does not start with `secure://`
/// - `CryptoError::Malformed` if it does not have three decodable components
///   of the expected sizes
/// - `CryptoError::DecryptionFailed` if authentication fails
pub fn open(sealed: &str, key: &SecretKey) -> Result<String> {
    let body = sealed
        .strip_prefix(SECURE_PREFIX)
        .ok_or(CryptoError::MissingPrefix)?;

    let components: Vec<&str> = body.split(':').collect();
    let [iv, ciphertext, tag] = components.as_slice() else {
        return Err(CryptoError::Malformed(format!(
            "expected 3 components, found {}",
            components.len()
        ))
        .into());
    };

    let encoding = Encoding::detect(&components);
    let iv = encoding.decode(iv)?;
    let mut payload = encoding.decode(ciphertext)?;
    let tag = encoding.decode(tag)?;

    if iv.len() != IV_BYTES {
        return Err(CryptoError::Malformed(format!("iv must be {} bytes", IV_BYTES)).into());
    }
    if tag.len() != TAG_BYTES {
        return Err(CryptoError::Malformed(format!("tag must be {} bytes", TAG_BYTES)).into());
    }

    payload.extend_from_slice(&tag);
    let plaintext = key
        .cipher()?
        .decrypt(Nonce::from_slice(&iv), payload.as_slice())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed.into())
}

/// Return `value` as usable plaintext, opening it only if it is sealed.
///
/// Nothing is cached; callers get a fresh copy at each point of use.
///
/// # Errors
///
/// Returns `CryptoError::NoKey` when a sealed value is met without a key,
/// or any error from [`open`].
pub fn reveal(value: &str, key: Option<&SecretKey>) -> Result<String> {
    if !is_sealed(value) {
        return Ok(value.to_string());
    }
    let key = key.ok_or(CryptoError::NoKey)?;
    open(value, key)
}
