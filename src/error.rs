//! Error types shared by the codec layers.

use thiserror::Error;

use crate::crypto::PasswordError;

/// Coarse error categories callers can branch on.
///
/// `Format` covers both "not a stego file" and "corrupted stego file"; the two
/// cannot be told apart from sample bits alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFormat,
    Capacity,
    Format,
    Authentication,
    PasswordRequired,
    Carrier,
    Io,
}

/// Errors that can occur while embedding or extracting a payload.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Unsupported audio format: only 16-bit integer PCM is supported, got {bits_per_sample}-bit {sample_format}")]
    UnsupportedFormat {
        bits_per_sample: u16,
        sample_format: String,
    },

    #[error("Payload too large for carrier: need {required} bytes, capacity is {available} bytes")]
    Capacity { required: usize, available: usize },

    #[error("Invalid stego data: {0}")]
    Format(String),

    #[error("Decryption failed: wrong password or corrupted data")]
    Authentication,

    #[error("Payload is encrypted; a password is required")]
    PasswordRequired,

    #[error("Encryption error: {0}")]
    Crypto(String),

    #[error("Carrier decode error: {0}")]
    CarrierDecode(String),

    #[error("Carrier encode error: {0}")]
    CarrierEncode(String),

    #[error("Unsupported carrier type: {0}")]
    UnsupportedCarrier(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StegoError {
    /// Shorthand for a [`StegoError::Format`] with the given reason.
    pub fn format(reason: impl Into<String>) -> Self {
        StegoError::Format(reason.into())
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StegoError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            StegoError::Capacity { .. } => ErrorKind::Capacity,
            StegoError::Format(_) => ErrorKind::Format,
            StegoError::Authentication => ErrorKind::Authentication,
            StegoError::PasswordRequired => ErrorKind::PasswordRequired,
            StegoError::Crypto(_)
            | StegoError::CarrierDecode(_)
            | StegoError::CarrierEncode(_)
            | StegoError::UnsupportedCarrier(_) => ErrorKind::Carrier,
            StegoError::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<PasswordError> for StegoError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::BlobTooShort { .. } => StegoError::Format(err.to_string()),
            PasswordError::AuthenticationFailed => StegoError::Authentication,
            PasswordError::InvalidParams(_) | PasswordError::EncryptionFailed(_) => {
                StegoError::Crypto(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_errors_map_to_kinds() {
        let short: StegoError = PasswordError::BlobTooShort { len: 3 }.into();
        assert_eq!(short.kind(), ErrorKind::Format);

        let auth: StegoError = PasswordError::AuthenticationFailed.into();
        assert_eq!(auth.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_capacity_message_reports_counts() {
        let err = StegoError::Capacity {
            required: 25,
            available: 24,
        };
        assert_eq!(
            err.to_string(),
            "Payload too large for carrier: need 25 bytes, capacity is 24 bytes"
        );
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }
}
