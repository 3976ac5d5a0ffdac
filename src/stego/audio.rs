//! LSB steganography for audio files.
//!
//! Hides data in the least significant bits of audio samples.
//! Supports WAV files with 16-bit integer PCM samples.
//!
//! Slots are the interleaved samples in file order: frame 0 channel 0,
//! frame 0 channel 1, ..., frame 1 channel 0, ...

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};

use super::capacity::ensure_fits;
use super::lsb::{self, LsbSlots};
use super::StegoCarrier;
use crate::envelope::Envelope;
use crate::error::StegoError;

/// The only sample width the codec handles.
const SUPPORTED_BITS_PER_SAMPLE: u16 = 16;

/// The LSB is set through the sample's unsigned 16-bit pattern.
impl LsbSlots for [i16] {
    fn slot_count(&self) -> usize {
        self.len()
    }

    fn read_lsb(&self, slot: usize) -> u8 {
        (self[slot] as u16 & 1) as u8
    }

    fn write_lsb(&mut self, slot: usize, bit: u8) {
        let pattern = (self[slot] as u16 & !1) | u16::from(bit & 1);
        self[slot] = pattern as i16;
    }
}

/// Audio carrier.
///
/// WAV files with an unsupported sample format still load so their capacity
/// can be reported (as zero); embedding and extraction reject them.
#[derive(Debug, Clone)]
pub struct AudioCarrier {
    /// Audio specification (sample rate, channels, etc.)
    spec: WavSpec,
    /// Frames as declared by the container.
    frame_count: usize,
    /// Interleaved 16-bit samples; empty for unsupported formats.
    samples: Vec<i16>,
}

fn is_pcm16(spec: &WavSpec) -> bool {
    spec.sample_format == SampleFormat::Int && spec.bits_per_sample == SUPPORTED_BITS_PER_SAMPLE
}

impl AudioCarrier {
    /// Creates a new AudioCarrier from WAV bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let reader = WavReader::new(Cursor::new(bytes))
            .map_err(|e| StegoError::CarrierDecode(e.to_string()))?;

        Self::from_reader(reader)
    }

    fn from_reader<R: Read + Seek>(reader: WavReader<R>) -> Result<Self, StegoError> {
        let spec = reader.spec();
        let frame_count = usize::try_from(reader.duration())
            .map_err(|_| StegoError::CarrierDecode("frame count exceeds usize".to_string()))?;

        if !is_pcm16(&spec) {
            warn!(
                bits_per_sample = spec.bits_per_sample,
                "WAV is not 16-bit integer PCM; carrier has no capacity"
            );
            return Ok(Self {
                spec,
                frame_count,
                samples: Vec::new(),
            });
        }

        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StegoError::CarrierDecode(e.to_string()))?;

        Ok(Self {
            spec,
            frame_count,
            samples,
        })
    }

    /// Creates a 16-bit PCM carrier from interleaved samples.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_pcm16(channels: u16, sample_rate: u32, mut samples: Vec<i16>) -> Self {
        let channels = channels.max(1);
        let frames = samples.len() / usize::from(channels);
        samples.truncate(frames * usize::from(channels));

        Self {
            spec: WavSpec {
                channels,
                sample_rate,
                bits_per_sample: SUPPORTED_BITS_PER_SAMPLE,
                sample_format: SampleFormat::Int,
            },
            frame_count: frames,
            samples,
        }
    }

    /// Returns true if the carrier is 16-bit integer PCM.
    pub fn is_supported(&self) -> bool {
        is_pcm16(&self.spec)
    }

    fn require_supported(&self) -> Result<(), StegoError> {
        if self.is_supported() {
            return Ok(());
        }
        Err(StegoError::UnsupportedFormat {
            bits_per_sample: self.spec.bits_per_sample,
            sample_format: match self.spec.sample_format {
                SampleFormat::Int => "integer".to_string(),
                SampleFormat::Float => "float".to_string(),
            },
        })
    }

    /// Returns the duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.spec.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count as f64 / self.spec.sample_rate as f64
    }

    /// Saves the audio to a WAV file with the original spec.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StegoError> {
        self.require_supported()?;
        let writer = WavWriter::create(path, self.spec)
            .map_err(|e| StegoError::CarrierEncode(e.to_string()))?;
        self.write_samples(writer)
    }

    /// Returns the audio as WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, StegoError> {
        self.require_supported()?;
        let mut bytes = Vec::new();
        {
            let writer = WavWriter::new(Cursor::new(&mut bytes), self.spec)
                .map_err(|e| StegoError::CarrierEncode(e.to_string()))?;
            self.write_samples(writer)?;
        }
        Ok(bytes)
    }

    fn write_samples<W: std::io::Write + Seek>(
        &self,
        mut writer: WavWriter<W>,
    ) -> Result<(), StegoError> {
        for sample in &self.samples {
            writer
                .write_sample(*sample)
                .map_err(|e| StegoError::CarrierEncode(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| StegoError::CarrierEncode(e.to_string()))
    }

    /// Returns the audio specification.
    pub fn spec(&self) -> &WavSpec {
        &self.spec
    }

    pub fn channels(&self) -> u16 {
        self.spec.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.spec.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

impl StegoCarrier for AudioCarrier {
    /// `floor(frames * channels / 8)` bytes; zero for unsupported formats.
    fn capacity(&self) -> usize {
        if !self.is_supported() {
            return 0;
        }
        lsb::capacity_bytes(self.samples.as_slice())
    }

    fn embed(&self, envelope: &[u8]) -> Result<Self, StegoError> {
        self.require_supported()?;
        ensure_fits(self, envelope.len())?;

        let mut samples = self.samples.clone();
        lsb::embed_bits(samples.as_mut_slice(), envelope)?;

        info!(
            channels = self.spec.channels,
            frames = self.frame_count,
            bytes = envelope.len(),
            "embedded envelope in audio"
        );
        Ok(Self {
            spec: self.spec,
            frame_count: self.frame_count,
            samples,
        })
    }

    fn extract(&self) -> Result<Envelope, StegoError> {
        self.require_supported()?;
        debug!(samples = self.samples.len(), "extracting envelope from audio");
        lsb::extract_envelope(self.samples.as_slice())
    }
}
