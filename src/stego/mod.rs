//! Steganography carriers.
//!
//! Supports:
//! - Image LSB steganography (PNG, BMP): one bit per R, G, B channel
//! - Audio LSB steganography (16-bit PCM WAV): one bit per sample

pub mod audio;
pub mod capacity;
pub mod image;
pub mod lsb;

use std::path::{Path, PathBuf};

pub use self::audio::AudioCarrier;
pub use self::capacity::{check_capacity, ensure_fits};
pub use self::image::ImageCarrier;
pub use self::lsb::LsbSlots;

use crate::envelope::Envelope;
use crate::error::StegoError;

/// A decoded carrier that can hold an envelope in its LSBs.
pub trait StegoCarrier: Sized {
    /// Capacity in bytes. Derived from geometry on every call.
    fn capacity(&self) -> usize;

    /// Returns a copy of the carrier with `envelope` written into its LSBs.
    fn embed(&self, envelope: &[u8]) -> Result<Self, StegoError>;

    /// Recovers the envelope hidden in the carrier's LSBs.
    fn extract(&self) -> Result<Envelope, StegoError>;

    /// Recovers the envelope in its serialized wire layout.
    fn extract_bytes(&self) -> Result<Vec<u8>, StegoError> {
        self.extract().map(|envelope| envelope.to_bytes())
    }
}

/// Carrier families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarrierKind {
    Image,
    Audio,
}

impl CarrierKind {
    /// Detects the carrier family from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "png" | "bmp" => Some(CarrierKind::Image),
            "wav" => Some(CarrierKind::Audio),
            _ => None,
        }
    }

    /// Detects the carrier family from a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Extension of the re-encoded output.
    pub fn output_extension(self) -> &'static str {
        match self {
            CarrierKind::Image => "png",
            CarrierKind::Audio => "wav",
        }
    }

    /// `path` with its extension replaced by the re-encoded format's.
    pub fn output_path(self, path: &Path) -> PathBuf {
        path.with_extension(self.output_extension())
    }
}

/// A carrier that is either an image or an audio stream.
#[derive(Debug, Clone)]
pub enum Carrier {
    Image(ImageCarrier),
    Audio(AudioCarrier),
}

impl Carrier {
    /// Loads a carrier, detecting its type from the file extension.
    pub fn from_file(path: &Path) -> Result<Self, StegoError> {
        let kind = CarrierKind::from_path(path)
            .ok_or_else(|| StegoError::UnsupportedCarrier(path.display().to_string()))?;
        let bytes = std::fs::read(path)?;
        Self::from_bytes(kind, &bytes)
    }

    /// Decodes a carrier of the given kind from container bytes.
    pub fn from_bytes(kind: CarrierKind, bytes: &[u8]) -> Result<Self, StegoError> {
        match kind {
            CarrierKind::Image => ImageCarrier::from_bytes(bytes).map(Carrier::Image),
            CarrierKind::Audio => AudioCarrier::from_bytes(bytes).map(Carrier::Audio),
        }
    }

    pub fn kind(&self) -> CarrierKind {
        match self {
            Carrier::Image(_) => CarrierKind::Image,
            Carrier::Audio(_) => CarrierKind::Audio,
        }
    }

    /// Re-encodes the carrier: PNG for images, WAV for audio.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StegoError> {
        match self {
            Carrier::Image(c) => c.to_png_bytes(),
            Carrier::Audio(c) => c.to_wav_bytes(),
        }
    }

    /// Writes the re-encoded carrier to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StegoError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

impl StegoCarrier for Carrier {
    fn capacity(&self) -> usize {
        match self {
            Carrier::Image(c) => c.capacity(),
            Carrier::Audio(c) => c.capacity(),
        }
    }

    fn embed(&self, envelope: &[u8]) -> Result<Self, StegoError> {
        match self {
            Carrier::Image(c) => c.embed(envelope).map(Carrier::Image),
            Carrier::Audio(c) => c.embed(envelope).map(Carrier::Audio),
        }
    }

    fn extract(&self) -> Result<Envelope, StegoError> {
        match self {
            Carrier::Image(c) => c.extract(),
            Carrier::Audio(c) => c.extract(),
        }
    }
}
