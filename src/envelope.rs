//! Self-describing payload framing.
//!
//! Layout: `[4 bytes header length, big-endian][JSON header][body]`.
//!
//! The header is a JSON object with `filename`, `content_type` and
//! `payload_length`. The body carries no length prefix of its own; its length
//! lives in the header.

use std::io;

use serde::{Deserialize, Serialize};

use crate::error::StegoError;

/// Size of the big-endian header length prefix.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Metadata stored in front of the hidden body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    pub payload_length: u32,
}

/// A parsed envelope.
///
/// Keeps the header bytes exactly as they were read so [`Envelope::to_bytes`]
/// reproduces the embedded layout bit for bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    header: EnvelopeHeader,
    header_bytes: Vec<u8>,
    body: Vec<u8>,
}

/// JSON formatter emitting `", "` and `": "` separators.
///
/// Keeps headers byte-compatible with envelopes written by the web frontend.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

fn encode_header(header: &EnvelopeHeader) -> Result<Vec<u8>, StegoError> {
    let mut out = Vec::with_capacity(64 + header.filename.len() + header.content_type.len());
    let mut ser = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    header
        .serialize(&mut ser)
        .map_err(|e| StegoError::format(format!("header encode failed: {e}")))?;
    Ok(out)
}

/// Decodes a header region. Fails on invalid UTF-8, invalid JSON, or a
/// missing or out-of-range `payload_length`.
pub(crate) fn decode_header(bytes: &[u8]) -> Result<EnvelopeHeader, StegoError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| StegoError::format("header is not valid UTF-8"))?;
    serde_json::from_str(text).map_err(|e| StegoError::format(format!("corrupt header: {e}")))
}

/// Reads the big-endian header length from the first four bytes.
pub(crate) fn read_length_prefix(prefix: &[u8]) -> Option<usize> {
    let raw: [u8; LENGTH_PREFIX_LEN] = prefix.get(..LENGTH_PREFIX_LEN)?.try_into().ok()?;
    Some(u32::from_be_bytes(raw) as usize)
}

impl Envelope {
    /// Frames `body` with a header describing it.
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        body: Vec<u8>,
    ) -> Result<Self, StegoError> {
        let payload_length = u32::try_from(body.len())
            .map_err(|_| StegoError::format("payload exceeds 4 GiB"))?;
        let header = EnvelopeHeader {
            filename: filename.into(),
            content_type: content_type.into(),
            payload_length,
        };
        let header_bytes = encode_header(&header)?;
        if u32::try_from(header_bytes.len()).is_err() {
            return Err(StegoError::format("header exceeds 4 GiB"));
        }
        Ok(Self {
            header,
            header_bytes,
            body,
        })
    }

    /// Assembles an envelope from already-validated pieces read off a carrier.
    pub(crate) fn from_raw(header: EnvelopeHeader, header_bytes: Vec<u8>, body: Vec<u8>) -> Self {
        debug_assert_eq!(header.payload_length as usize, body.len());
        Self {
            header,
            header_bytes,
            body,
        }
    }

    pub fn header(&self) -> &EnvelopeHeader {
        &self.header
    }

    pub fn filename(&self) -> &str {
        &self.header.filename
    }

    pub fn content_type(&self) -> &str {
        &self.header.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the envelope, returning header and body.
    pub fn into_parts(self) -> (EnvelopeHeader, Vec<u8>) {
        (self.header, self.body)
    }

    /// Length of the serialized envelope in bytes.
    pub fn encoded_len(&self) -> usize {
        LENGTH_PREFIX_LEN + self.header_bytes.len() + self.body.len()
    }

    /// Serializes to the wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        // Length fits in u32; checked in `new` and bounded by the prefix on read.
        out.extend_from_slice(&(self.header_bytes.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.header_bytes);
        out.extend_from_slice(&self.body);
        out
    }
}

/// Serialized size of an envelope whose body is `body_len` bytes.
pub fn encoded_len_for(
    filename: &str,
    content_type: &str,
    body_len: usize,
) -> Result<usize, StegoError> {
    let payload_length =
        u32::try_from(body_len).map_err(|_| StegoError::format("payload exceeds 4 GiB"))?;
    let header = EnvelopeHeader {
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        payload_length,
    };
    Ok(LENGTH_PREFIX_LEN + encode_header(&header)?.len() + body_len)
}

/// Builds the serialized envelope for `body`.
pub fn build(filename: &str, content_type: &str, body: &[u8]) -> Result<Vec<u8>, StegoError> {
    Ok(Envelope::new(filename, content_type, body.to_vec())?.to_bytes())
}

/// Parses a serialized envelope. Bytes past the declared body are ignored.
pub fn parse(blob: &[u8]) -> Result<Envelope, StegoError> {
    let header_len = read_length_prefix(blob)
        .ok_or_else(|| StegoError::format("blob too small to contain header length"))?;
    let header_end = LENGTH_PREFIX_LEN
        .checked_add(header_len)
        .filter(|end| *end <= blob.len())
        .ok_or_else(|| StegoError::format("incomplete header"))?;

    let header_bytes = &blob[LENGTH_PREFIX_LEN..header_end];
    let header = decode_header(header_bytes)?;

    let body_end = header_end
        .checked_add(header.payload_length as usize)
        .filter(|end| *end <= blob.len())
        .ok_or_else(|| StegoError::format("incomplete payload"))?;
    let body = blob[header_end..body_end].to_vec();

    Ok(Envelope::from_raw(header, header_bytes.to_vec(), body))
}
