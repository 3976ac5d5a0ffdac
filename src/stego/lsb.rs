//! Shared LSB traversal engine.
//!
//! Every carrier exposes its addressable least-significant bits as a flat,
//! ordered sequence of slots. Embedding and extraction both walk that
//! sequence from slot 0, so the bit order is defined in exactly one place
//! per carrier: its [`LsbSlots`] implementation.

use tracing::debug;

use crate::bits::{bits_to_bytes, bytes_to_bits, BitString};
use crate::envelope::{self, Envelope, LENGTH_PREFIX_LEN};
use crate::error::StegoError;

/// Bits in the header length prefix.
const PREFIX_BITS: usize = LENGTH_PREFIX_LEN * 8;

/// An ordered sequence of writable least-significant bits.
pub trait LsbSlots {
    /// Number of addressable slots.
    fn slot_count(&self) -> usize;

    /// Reads the LSB at `slot` as `0` or `1`.
    fn read_lsb(&self, slot: usize) -> u8;

    /// Overwrites the LSB at `slot` with `bit` (`0` or `1`).
    fn write_lsb(&mut self, slot: usize, bit: u8);
}

/// Byte capacity of a slot sequence.
pub fn capacity_bytes<S: LsbSlots + ?Sized>(slots: &S) -> usize {
    slots.slot_count() / 8
}

/// Writes `payload` into the first `payload.len() * 8` slots.
///
/// Slots past the payload are left untouched. Nothing is written when the
/// payload does not fit.
pub fn embed_bits<S: LsbSlots + ?Sized>(slots: &mut S, payload: &[u8]) -> Result<(), StegoError> {
    let bits = bytes_to_bits(payload);
    let available = slots.slot_count();
    if bits.len() > available {
        return Err(StegoError::Capacity {
            required: payload.len(),
            available: available / 8,
        });
    }

    for (slot, bit) in bits.iter().enumerate() {
        slots.write_lsb(slot, bit);
    }

    debug!(bits = bits.len(), slots = available, "embedded payload bits");
    Ok(())
}

/// Reads `byte_len` bytes starting at `start_slot`, or `None` if the
/// carrier runs out of slots first.
pub fn read_bytes<S: LsbSlots + ?Sized>(
    slots: &S,
    start_slot: usize,
    byte_len: usize,
) -> Option<Vec<u8>> {
    let end = byte_len
        .checked_mul(8)
        .and_then(|bits| start_slot.checked_add(bits))?;
    if end > slots.slot_count() {
        return None;
    }

    let bits: BitString = (start_slot..end).map(|slot| slots.read_lsb(slot)).collect();
    Some(bits_to_bytes(bits))
}

/// Recovers an envelope from the slot sequence.
///
/// Reads the 32-bit length prefix first, then only the slots the declared
/// header and body need.
pub fn extract_envelope<S: LsbSlots + ?Sized>(slots: &S) -> Result<Envelope, StegoError> {
    let prefix = read_bytes(slots, 0, LENGTH_PREFIX_LEN)
        .ok_or_else(|| StegoError::format("no data found: carrier holds fewer than 32 bits"))?;
    let header_len = envelope::read_length_prefix(&prefix)
        .ok_or_else(|| StegoError::format("no data found"))?;

    let header_bytes = read_bytes(slots, PREFIX_BITS, header_len)
        .ok_or_else(|| StegoError::format("incomplete header"))?;
    let header = envelope::decode_header(&header_bytes)?;

    // header_len * 8 was already bounds-checked by read_bytes above
    let body_start = PREFIX_BITS + header_len * 8;
    let body = read_bytes(slots, body_start, header.payload_length as usize)
        .ok_or_else(|| StegoError::format("incomplete payload"))?;

    debug!(
        header_len,
        payload_len = body.len(),
        slots = slots.slot_count(),
        "extracted envelope"
    );
    Ok(Envelope::from_raw(header, header_bytes, body))
}
