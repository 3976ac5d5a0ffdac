//! Hide and reveal payloads end to end.
//!
//! Embedding: optionally seal the body with a password, frame it in an
//! envelope, check capacity, then write the envelope into the carrier.
//! Extraction reverses the steps; a body whose content type is the
//! encrypted marker is opened with the caller's password.

use std::path::Path;

use tracing::{debug, info};

use crate::config::LizardConfig;
use crate::crypto::{PasswordCipher, SEAL_OVERHEAD};
use crate::envelope::{self, Envelope};
use crate::error::StegoError;
use crate::stego::{ensure_fits, StegoCarrier};

/// A payload to hide: body plus the metadata stored in the envelope header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Payload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// An inline text payload, named and typed per `config`.
    pub fn text(text: &str, config: &LizardConfig) -> Self {
        Self::new(
            config.envelope.text_filename.clone(),
            config.envelope.text_content_type.clone(),
            text.as_bytes().to_vec(),
        )
    }

    /// A payload read from a file, stored under its base name.
    pub fn from_file(
        path: &Path,
        content_type: Option<&str>,
        config: &LizardConfig,
    ) -> Result<Self, StegoError> {
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("payload.bin")
            .to_string();
        let content_type = content_type
            .unwrap_or(&config.envelope.file_content_type)
            .to_string();
        Ok(Self::new(filename, content_type, data))
    }
}

/// A payload recovered from a carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealedPayload {
    pub filename: String,
    /// Content type as stored in the header; the encrypted marker for
    /// password-protected payloads.
    pub content_type: String,
    /// True if the body was decrypted.
    pub was_encrypted: bool,
    pub data: Vec<u8>,
}

impl RevealedPayload {
    /// Returns the body as text when it is a UTF-8 `.txt` with a `text/*`
    /// content type.
    pub fn as_text(&self) -> Option<&str> {
        if !self.content_type.starts_with("text/") || !self.filename.ends_with(".txt") {
            return None;
        }
        std::str::from_utf8(&self.data).ok()
    }
}

/// Embeds and extracts payloads using one configuration.
#[derive(Debug, Clone)]
pub struct Lizard {
    config: LizardConfig,
    cipher: PasswordCipher,
}

impl Lizard {
    /// Creates a pipeline; fails if the KDF parameters are invalid.
    pub fn new(config: LizardConfig) -> Result<Self, StegoError> {
        let cipher = PasswordCipher::new(config.kdf)?;
        Ok(Self { config, cipher })
    }

    pub fn config(&self) -> &LizardConfig {
        &self.config
    }

    fn is_encrypted(&self, content_type: &str) -> bool {
        content_type == self.config.envelope.encrypted_content_type
    }

    /// Frames a payload, sealing it first if `password` is given.
    pub fn seal(&self, payload: Payload, password: Option<&str>) -> Result<Envelope, StegoError> {
        match password {
            Some(password) => {
                let sealed = self.cipher.encrypt(&payload.data, password)?;
                Envelope::new(
                    payload.filename,
                    self.config.envelope.encrypted_content_type.clone(),
                    sealed,
                )
            }
            None => Envelope::new(payload.filename, payload.content_type, payload.data),
        }
    }

    /// Unwraps an envelope, decrypting the body if it is marked encrypted.
    pub fn open(
        &self,
        envelope: Envelope,
        password: Option<&str>,
    ) -> Result<RevealedPayload, StegoError> {
        let (header, body) = envelope.into_parts();

        if !self.is_encrypted(&header.content_type) {
            return Ok(RevealedPayload {
                filename: header.filename,
                content_type: header.content_type,
                was_encrypted: false,
                data: body,
            });
        }

        let password = password.ok_or(StegoError::PasswordRequired)?;
        let data = self.cipher.decrypt(&body, password)?;
        Ok(RevealedPayload {
            filename: header.filename,
            content_type: header.content_type,
            was_encrypted: true,
            data,
        })
    }

    /// Largest payload body, in bytes, that fits in `capacity` bytes once
    /// framed (and sealed, if `encrypted`).
    pub fn max_payload_len(
        &self,
        capacity: usize,
        filename: &str,
        content_type: &str,
        encrypted: bool,
    ) -> usize {
        let (content_type, overhead) = if encrypted {
            (self.config.envelope.encrypted_content_type.as_str(), SEAL_OVERHEAD)
        } else {
            (content_type, 0)
        };
        let fits = |len: usize| {
            envelope::encoded_len_for(filename, content_type, len + overhead)
                .map(|total| total <= capacity)
                .unwrap_or(false)
        };

        if !fits(0) {
            return 0;
        }
        // Envelope size grows monotonically with the body.
        let (mut lo, mut hi) = (0usize, capacity);
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if fits(mid) {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        lo
    }

    /// Hides `payload` in a copy of `carrier`.
    ///
    /// The carrier is left untouched if the envelope does not fit.
    pub fn hide<C: StegoCarrier>(
        &self,
        carrier: &C,
        payload: Payload,
        password: Option<&str>,
    ) -> Result<C, StegoError> {
        let envelope = self.seal(payload, password)?;
        let bytes = envelope.to_bytes();
        ensure_fits(carrier, bytes.len())?;

        debug!(
            envelope_len = bytes.len(),
            capacity = carrier.capacity(),
            encrypted = password.is_some(),
            "capacity check passed"
        );
        let output = carrier.embed(&bytes)?;
        info!(filename = envelope.filename(), bytes = bytes.len(), "payload hidden");
        Ok(output)
    }

    /// Recovers the payload hidden in `carrier`.
    pub fn reveal<C: StegoCarrier>(
        &self,
        carrier: &C,
        password: Option<&str>,
    ) -> Result<RevealedPayload, StegoError> {
        let envelope = carrier.extract()?;
        let revealed = self.open(envelope, password)?;
        info!(
            filename = %revealed.filename,
            bytes = revealed.data.len(),
            encrypted = revealed.was_encrypted,
            "payload revealed"
        );
        Ok(revealed)
    }
}
