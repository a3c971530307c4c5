//! Encryption of private key material at rest.
//!
//! A [`KeyVault`] holds the process-wide 256-bit encryption key and turns raw
//! private keys into [`EncryptedSecret`] blobs suitable for storage in an
//! external agent record, and back again.
//!
//! # Storage format
//!
//! A blob serializes as two lower-case hex strings joined by a colon:
//!
//! ```text
//! hex(iv):hex(ciphertext)
//! ```
//!
//! where the IV is exactly 16 bytes and the ciphertext is the plaintext
//! length rounded up to the 16-byte AES block (48 bytes for a 32-byte key).
//! A fresh random IV is generated on every encryption, so encrypting the
//! same secret twice never yields the same blob.
//!
//! # Security properties
//!
//! The cipher is AES-256-CBC with PKCS#7 padding. CBC provides
//! confidentiality but **no authentication**: a corrupted or tampered
//! ciphertext can decrypt to garbage without an error being raised. Callers
//! that need integrity must verify the decrypted key out of band (e.g. by
//! re-deriving the expected address). This matches the stored-blob format
//! this vault is required to read and write; do not assume decryption
//! success implies the blob was untouched.

use std::fmt;
use std::str::FromStr;

use aes::Aes256;
use alloy::primitives::B256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// AES block size, which is also the IV length.
const BLOCK_SIZE: usize = 16;

/// Length of both the encryption key and the plaintext private key.
const KEY_SIZE: usize = 32;

/// Errors raised by [`KeyVault`] operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum VaultError {
    /// The serialized blob (or key input) is malformed.
    #[error("malformed encrypted blob: {0}")]
    Format(String),

    /// The cipher rejected the input (wrong key length, corrupt ciphertext).
    #[error("cipher failure: {0}")]
    Crypto(String),
}

/// A private key encrypted for storage.
///
/// Produced by [`KeyVault::encrypt`] and parsed back from its string form
/// with [`FromStr`]. The ciphertext is opaque; only the [`KeyVault`] holding
/// the original encryption key can recover the plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecret {
    /// Initialization vector, freshly random per encryption.
    pub iv: [u8; BLOCK_SIZE],
    /// AES-256-CBC ciphertext, PKCS#7 padded.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for EncryptedSecret {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let &[iv_hex, ct_hex] = parts.as_slice() else {
            return Err(VaultError::Format(format!(
                "expected 'iv:ciphertext', got {} part(s)",
                parts.len()
            )));
        };

        let iv_bytes = hex::decode(iv_hex)
            .map_err(|e| VaultError::Format(format!("invalid IV hex: {e}")))?;
        let iv: [u8; BLOCK_SIZE] = iv_bytes
            .try_into()
            .map_err(|b: Vec<u8>| {
                VaultError::Format(format!("IV must be {BLOCK_SIZE} bytes, got {}", b.len()))
            })?;

        let ciphertext = hex::decode(ct_hex)
            .map_err(|e| VaultError::Format(format!("invalid ciphertext hex: {e}")))?;
        if ciphertext.is_empty() {
            return Err(VaultError::Format("empty ciphertext".into()));
        }

        Ok(Self { iv, ciphertext })
    }
}

/// Symmetric vault for private keys at rest.
///
/// One vault is constructed at startup from the process-wide encryption
/// passphrase and shared wherever keys are persisted or loaded. Plaintext
/// keys are only ever returned to the caller; they are never logged.
#[derive(Clone)]
pub struct KeyVault {
    key: [u8; KEY_SIZE],
}

impl fmt::Debug for KeyVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyVault").finish_non_exhaustive()
    }
}

impl KeyVault {
    /// Create a vault from a raw 32-byte encryption key.
    #[must_use]
    pub const fn new(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Create a vault from a passphrase string.
    ///
    /// Accepts either a 64-character hex string (decoded to 32 bytes) or a
    /// raw string whose UTF-8 encoding is exactly 32 bytes. Anything else is
    /// rejected; startup configuration treats that as fatal.
    pub fn from_passphrase(passphrase: &str) -> Result<Self, VaultError> {
        let bytes = if passphrase.len() == 2 * KEY_SIZE
            && passphrase.bytes().all(|b| b.is_ascii_hexdigit())
        {
            hex::decode(passphrase)
                .map_err(|e| VaultError::Crypto(format!("invalid hex passphrase: {e}")))?
        } else {
            passphrase.as_bytes().to_vec()
        };

        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            VaultError::Crypto(format!(
                "encryption key must decode to exactly {KEY_SIZE} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Self::new(key))
    }

    /// Encrypt a 32-byte secret under a fresh random IV.
    #[must_use]
    pub fn encrypt(&self, secret: &B256) -> EncryptedSecret {
        let iv: [u8; BLOCK_SIZE] = rand::random();
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(secret.as_slice());
        EncryptedSecret { iv, ciphertext }
    }

    /// Encrypt a private key given as a hex string.
    ///
    /// Strips an optional `0x` display prefix before decoding; the decoded
    /// key must be exactly 32 bytes.
    pub fn encrypt_key(&self, key_hex: &str) -> Result<EncryptedSecret, VaultError> {
        let stripped = key_hex.strip_prefix("0x").unwrap_or(key_hex);
        let bytes = hex::decode(stripped)
            .map_err(|e| VaultError::Format(format!("invalid private key hex: {e}")))?;
        let key: [u8; KEY_SIZE] = bytes.try_into().map_err(|b: Vec<u8>| {
            VaultError::Format(format!(
                "private key must be {KEY_SIZE} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(self.encrypt(&B256::from(key)))
    }

    /// Decrypt a stored blob back into the 32-byte secret.
    ///
    /// Fails with [`VaultError::Crypto`] when the ciphertext length is not a
    /// whole number of blocks, when unpadding fails, or when the recovered
    /// plaintext is not 32 bytes. Note the caveat in the module docs: CBC is
    /// unauthenticated, so a wrong key or tampered blob may also decrypt
    /// "successfully" into garbage.
    pub fn decrypt(&self, blob: &EncryptedSecret) -> Result<B256, VaultError> {
        if blob.ciphertext.is_empty() || blob.ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(VaultError::Crypto(format!(
                "ciphertext length {} is not a multiple of the {BLOCK_SIZE}-byte block size",
                blob.ciphertext.len()
            )));
        }

        let plaintext = Aes256CbcDec::new(&self.key.into(), &blob.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&blob.ciphertext)
            .map_err(|_| VaultError::Crypto("ciphertext failed unpadding".into()))?;

        let key: [u8; KEY_SIZE] = plaintext.try_into().map_err(|b: Vec<u8>| {
            VaultError::Crypto(format!(
                "decrypted secret is {} bytes, expected {KEY_SIZE}",
                b.len()
            ))
        })?;
        Ok(B256::from(key))
    }

    /// Decrypt a blob directly from its serialized string form.
    pub fn decrypt_str(&self, blob: &str) -> Result<B256, VaultError> {
        self.decrypt(&blob.parse()?)
    }

    // Used by configuration decoding; the key never leaves the crate.
    pub(crate) const fn into_key(self) -> [u8; 32] {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> KeyVault {
        KeyVault::new([7u8; 32])
    }

    fn secret() -> B256 {
        B256::from([0xabu8; 32])
    }

    #[test]
    fn round_trip() {
        let v = vault();
        let blob = v.encrypt(&secret());
        assert_eq!(v.decrypt(&blob).unwrap(), secret());
    }

    #[test]
    fn round_trip_through_string_form() {
        let v = vault();
        let serialized = v.encrypt(&secret()).to_string();
        assert_eq!(v.decrypt_str(&serialized).unwrap(), secret());
    }

    #[test]
    fn fresh_iv_per_encryption() {
        let v = vault();
        let a = v.encrypt(&secret());
        let b = v.encrypt(&secret());
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn serialized_shape() {
        let v = vault();
        let blob = v.encrypt(&secret());
        // 32-byte plaintext pads up to three 16-byte blocks.
        assert_eq!(blob.ciphertext.len(), 48);

        let s = blob.to_string();
        let (iv_hex, ct_hex) = s.split_once(':').unwrap();
        assert_eq!(iv_hex.len(), 32);
        assert_eq!(ct_hex.len(), 96);
        assert_eq!(s, s.to_lowercase());
    }

    #[test]
    fn missing_delimiter_is_a_format_error() {
        let err = "not-a-valid-blob".parse::<EncryptedSecret>().unwrap_err();
        assert!(matches!(err, VaultError::Format(_)));
    }

    #[test]
    fn too_many_parts_is_a_format_error() {
        let err = "aa:bb:cc".parse::<EncryptedSecret>().unwrap_err();
        assert!(matches!(err, VaultError::Format(_)));
    }

    #[test]
    fn bad_hex_is_a_format_error() {
        let err = "zz:aabb".parse::<EncryptedSecret>().unwrap_err();
        assert!(matches!(err, VaultError::Format(_)));
    }

    #[test]
    fn short_iv_is_a_format_error() {
        let err = "aabb:aabbccdd".parse::<EncryptedSecret>().unwrap_err();
        assert!(matches!(err, VaultError::Format(_)));
    }

    #[test]
    fn ragged_ciphertext_is_a_crypto_error() {
        let v = vault();
        let mut blob = v.encrypt(&secret());
        blob.ciphertext.pop();
        assert!(matches!(v.decrypt(&blob).unwrap_err(), VaultError::Crypto(_)));
    }

    #[test]
    fn tampering_never_silently_round_trips() {
        // CBC is unauthenticated: flipping a ciphertext byte either fails
        // unpadding or yields a different plaintext. It must never hand back
        // the original secret.
        let v = vault();
        let mut blob = v.encrypt(&secret());
        blob.ciphertext[0] ^= 0x01;
        match v.decrypt(&blob) {
            Ok(garbage) => assert_ne!(garbage, secret()),
            Err(e) => assert!(matches!(e, VaultError::Crypto(_))),
        }
    }

    #[test]
    fn wrong_key_never_silently_round_trips() {
        let blob = vault().encrypt(&secret());
        let other = KeyVault::new([9u8; 32]);
        match other.decrypt(&blob) {
            Ok(garbage) => assert_ne!(garbage, secret()),
            Err(e) => assert!(matches!(e, VaultError::Crypto(_))),
        }
    }

    #[test]
    fn passphrase_hex_form() {
        let v = KeyVault::from_passphrase(&"ab".repeat(32)).unwrap();
        assert_eq!(v.key, [0xab; 32]);
    }

    #[test]
    fn passphrase_raw_form() {
        let raw = KeyVault::from_passphrase("this-passphrase-is-32-bytes-long").unwrap();
        assert_eq!(&raw.key, b"this-passphrase-is-32-bytes-long");

        // 32 chars of hex digits are still a raw passphrase; only the
        // 64-char form is decoded.
        let short_hex = KeyVault::from_passphrase("0123456789abcdef0123456789abcdef").unwrap();
        assert_eq!(&short_hex.key, b"0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn passphrase_wrong_length_rejected() {
        assert!(matches!(
            KeyVault::from_passphrase("too short").unwrap_err(),
            VaultError::Crypto(_)
        ));
        assert!(matches!(
            KeyVault::from_passphrase(&"a".repeat(40)).unwrap_err(),
            VaultError::Crypto(_)
        ));
    }

    #[test]
    fn encrypt_key_strips_display_prefix() {
        let v = vault();
        let hex_key = format!("0x{}", "cd".repeat(32));
        let blob = v.encrypt_key(&hex_key).unwrap();
        assert_eq!(v.decrypt(&blob).unwrap(), B256::from([0xcd; 32]));
    }

    #[test]
    fn encrypt_key_rejects_wrong_length() {
        let err = vault().encrypt_key("0xdeadbeef").unwrap_err();
        assert!(matches!(err, VaultError::Format(_)));
    }

    #[test]
    fn debug_redacts_key() {
        let rendered = format!("{:?}", vault());
        assert!(!rendered.contains("07"));
    }
}
