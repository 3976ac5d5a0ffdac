//! # Lizard - hide files in images and audio
//!
//! Lizard hides an arbitrary byte payload in the least significant bits of a
//! carrier and recovers it losslessly later.
//!
//! ## Overview
//!
//! - **Images** (PNG, BMP): one bit per R, G, B channel, row-major order
//! - **Audio** (16-bit PCM WAV): one bit per interleaved sample
//! - Payloads are framed as `[u32 BE header length][JSON header][body]`
//!   so the filename and content type travel with the data
//! - Bodies can be sealed with a password (scrypt + AES-256-GCM) before
//!   they are framed
//!
//! ## Example Usage
//!
//! ```rust
//! use image::RgbImage;
//! use lizard::stego::{ImageCarrier, StegoCarrier};
//! use lizard::{Lizard, LizardConfig, Payload};
//!
//! let lizard = Lizard::new(LizardConfig::default()).unwrap();
//! let carrier = ImageCarrier::from_rgb(RgbImage::new(64, 64));
//!
//! let payload = Payload::new("message.txt", "text/plain", b"hello".to_vec());
//! let hidden = lizard.hide(&carrier, payload, None).unwrap();
//!
//! let revealed = lizard.reveal(&hidden, None).unwrap();
//! assert_eq!(revealed.as_text(), Some("hello"));
//! ```
//!
//! ## Modules
//!
//! - [`bits`]: packed bit strings
//! - [`envelope`]: payload framing
//! - [`crypto`]: password-based encryption of payload bodies
//! - [`stego`]: image and audio LSB carriers, capacity gate
//! - [`pipeline`]: end-to-end hide/reveal
//! - [`config`]: TOML configuration

pub mod bits;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod pipeline;
pub mod stego;

#[cfg(test)]
mod proptests;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, LizardConfig};
pub use crypto::{decrypt_payload, encrypt_payload, KdfParams, PasswordCipher};
pub use envelope::{Envelope, EnvelopeHeader};
pub use error::{ErrorKind, StegoError};
pub use pipeline::{Lizard, Payload, RevealedPayload};
pub use stego::{AudioCarrier, Carrier, CarrierKind, ImageCarrier, StegoCarrier};
