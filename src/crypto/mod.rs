//! Confidentiality layer for Lizard payloads.
//!
//! Payload bodies can be sealed with a password before they are framed and
//! embedded. The sealed body is an opaque byte string to every other layer:
//!
//! ```text
//! salt (16) || nonce (12) || AES-256-GCM ciphertext || tag (16)
//! ```
//!
//! Keys are derived with scrypt; cost parameters are passed in via
//! [`KdfParams`] rather than fixed at compile time.

pub mod password;

pub use password::{
    decrypt_payload, encrypt_payload, KdfParams, PasswordCipher, PasswordError, KEY_LEN,
    MIN_BLOB_LEN, NONCE_LEN, SALT_LEN, SEAL_OVERHEAD, TAG_LEN,
};
