//! Password-based authenticated encryption.
//!
//! - scrypt for key derivation from password + random salt
//! - AES-256-GCM for authenticated encryption, no associated data

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

/// Salt size for scrypt.
pub const SALT_LEN: usize = 16;

/// Nonce size for AES-GCM.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag size.
pub const TAG_LEN: usize = 16;

/// Derived key size (AES-256).
pub const KEY_LEN: usize = 32;

/// Smallest blob that can carry a salt and a nonce.
pub const MIN_BLOB_LEN: usize = SALT_LEN + NONCE_LEN;

/// Bytes added to a plaintext by sealing it.
pub const SEAL_OVERHEAD: usize = MIN_BLOB_LEN + TAG_LEN;

/// Errors that can occur during password encryption.
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Encrypted blob too small: {len} bytes, need at least {MIN_BLOB_LEN}")]
    BlobTooShort { len: usize },

    #[error("Authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("Invalid scrypt parameters: {0}")]
    InvalidParams(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

/// scrypt cost parameters.
///
/// `log_n` is log2 of the CPU/memory cost `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl Default for KdfParams {
    /// N = 2^14, r = 8, p = 1.
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

impl KdfParams {
    pub fn new(log_n: u8, r: u32, p: u32) -> Self {
        Self { log_n, r, p }
    }

    /// Checks that scrypt accepts these parameters.
    pub fn validate(&self) -> Result<(), PasswordError> {
        self.to_scrypt().map(|_| ())
    }

    fn to_scrypt(self) -> Result<scrypt::Params, PasswordError> {
        scrypt::Params::new(self.log_n, self.r, self.p, KEY_LEN)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))
    }
}

/// Seals and opens payload bodies with a password.
#[derive(Debug, Clone)]
pub struct PasswordCipher {
    params: scrypt::Params,
}

impl PasswordCipher {
    /// Creates a cipher using the given KDF cost parameters.
    pub fn new(params: KdfParams) -> Result<Self, PasswordError> {
        Ok(Self {
            params: params.to_scrypt()?,
        })
    }

    fn derive_key(
        &self,
        password: &str,
        salt: &[u8],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, PasswordError> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        scrypt::scrypt(password.as_bytes(), salt, &self.params, &mut *key)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(key)
    }

    /// Encrypts `plaintext`.
    ///
    /// The output format is: salt (16) || nonce (12) || ciphertext (includes auth tag)
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> Result<Vec<u8>, PasswordError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let key = self.derive_key(password, &salt)?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(&*key)
            .map_err(|e| PasswordError::EncryptionFailed(e.to_string()))?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|e| PasswordError::EncryptionFailed(e.to_string()))?;

        let mut result = Vec::with_capacity(MIN_BLOB_LEN + ciphertext.len());
        result.extend_from_slice(&salt);
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&ciphertext);

        debug!(
            plaintext_len = plaintext.len(),
            sealed_len = result.len(),
            "sealed payload"
        );
        Ok(result)
    }

    /// Decrypts a blob produced by [`PasswordCipher::encrypt`].
    ///
    /// A wrong password and a tampered blob both yield
    /// [`PasswordError::AuthenticationFailed`].
    pub fn decrypt(&self, blob: &[u8], password: &str) -> Result<Vec<u8>, PasswordError> {
        if blob.len() < MIN_BLOB_LEN {
            return Err(PasswordError::BlobTooShort { len: blob.len() });
        }

        let (salt, rest) = blob.split_at(SALT_LEN);
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
        let key = self.derive_key(password, salt)?;

        let cipher = Aes256Gcm::new_from_slice(&*key)
            .map_err(|e| PasswordError::EncryptionFailed(e.to_string()))?;
        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| PasswordError::AuthenticationFailed)
    }
}

/// Encrypts `plaintext` under `password` with the given KDF parameters.
pub fn encrypt_payload(
    plaintext: &[u8],
    password: &str,
    params: KdfParams,
) -> Result<Vec<u8>, PasswordError> {
    PasswordCipher::new(params)?.encrypt(plaintext, password)
}

/// Decrypts a blob produced by [`encrypt_payload`].
pub fn decrypt_payload(
    blob: &[u8],
    password: &str,
    params: KdfParams,
) -> Result<Vec<u8>, PasswordError> {
    PasswordCipher::new(params)?.decrypt(blob, password)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordCipher {
        PasswordCipher::new(KdfParams::new(4, 8, 1)).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = fast();
        let plaintext = b"Hello, Lizard!";

        let encrypted = cipher.encrypt(plaintext, "my_secret_password").unwrap();
        let decrypted = cipher.decrypt(&encrypted, "my_secret_password").unwrap();

        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_blob_layout() {
        let cipher = fast();
        let encrypted = cipher.encrypt(b"abc", "pw").unwrap();
        // salt + nonce + 3 bytes ciphertext + tag
        assert_eq!(encrypted.len(), 3 + SEAL_OVERHEAD);
    }

    #[test]
    fn test_wrong_password_fails() {
        let cipher = fast();
        let encrypted = cipher.encrypt(b"Secret data", "correct").unwrap();
        let result = cipher.decrypt(&encrypted, "wrong");

        assert!(matches!(result, Err(PasswordError::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let cipher = fast();
        let mut encrypted = cipher.encrypt(b"Secret data", "pw").unwrap();
        let last = encrypted.len() - 1;
        encrypted[last] ^= 0x01;

        assert!(matches!(
            cipher.decrypt(&encrypted, "pw"),
            Err(PasswordError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_empty_plaintext() {
        let cipher = fast();
        let encrypted = cipher.encrypt(b"", "test").unwrap();
        assert!(cipher.decrypt(&encrypted, "test").unwrap().is_empty());
    }

    #[test]
    fn test_blob_too_short() {
        let result = fast().decrypt(&[0u8; 27], "test");
        assert!(matches!(result, Err(PasswordError::BlobTooShort { len: 27 })));
    }

    #[test]
    fn test_fresh_salt_and_nonce() {
        let cipher = fast();
        let a = cipher.encrypt(b"same", "pw").unwrap();
        let b = cipher.encrypt(b"same", "pw").unwrap();
        assert_ne!(a[..MIN_BLOB_LEN], b[..MIN_BLOB_LEN]);
    }

    #[test]
    fn test_default_params() {
        let params = KdfParams::default();
        assert_eq!((params.log_n, params.r, params.p), (14, 8, 1));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(KdfParams::new(4, 0, 1).validate().is_err());
    }

    #[test]
    fn test_free_functions_agree() {
        let params = KdfParams::new(4, 8, 1);
        let blob = encrypt_payload(b"payload", "pw", params).unwrap();
        assert_eq!(decrypt_payload(&blob, "pw", params).unwrap(), b"payload");
    }
}
