//! Packed big-endian bit strings.
//!
//! Bits are stored eight to a byte, most significant bit first, so a bit
//! string over a carrier costs one eighth of the carrier's slot count.

/// A growable sequence of bits, packed MSB first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitString {
    bytes: Vec<u8>,
    len: usize,
}

impl BitString {
    /// Creates an empty bit string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty bit string with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Number of bits held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no bits are held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends one bit. Any non-zero value is treated as `1`.
    pub fn push(&mut self, bit: u8) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit != 0 {
            // offset == 0 always pushed above, so last() exists
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.len += 1;
    }

    /// Returns the bit at `index` as `0` or `1`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.len {
            return None;
        }
        Some((self.bytes[index / 8] >> (7 - index % 8)) & 1)
    }

    /// Iterates over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.len).map(move |i| (self.bytes[i / 8] >> (7 - i % 8)) & 1)
    }

    /// Packs the bits into bytes, zero-padding a trailing partial byte.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl FromIterator<u8> for BitString {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut bits = BitString::with_capacity(iter.size_hint().0);
        for bit in iter {
            bits.push(bit);
        }
        bits
    }
}

/// Converts bytes to their big-endian bit representation.
pub fn bytes_to_bits(data: &[u8]) -> BitString {
    BitString {
        bytes: data.to_vec(),
        len: data.len() * 8,
    }
}

/// Converts a bit string back to bytes, right-padding the last byte with zeros.
pub fn bits_to_bytes(bits: BitString) -> Vec<u8> {
    bits.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_bits_is_msb_first() {
        let bits = bytes_to_bits(&[0b1010_0001]);
        let collected: Vec<u8> = bits.iter().collect();
        assert_eq!(collected, vec![1, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_roundtrip() {
        let data = b"lizard";
        assert_eq!(bits_to_bytes(bytes_to_bits(data)), data);
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let bits: BitString = [1u8, 1, 1].into_iter().collect();
        assert_eq!(bits.len(), 3);
        assert_eq!(bits_to_bytes(bits), vec![0b1110_0000]);
    }

    #[test]
    fn test_push_and_get() {
        let mut bits = BitString::new();
        for bit in [0, 1, 1, 0, 1, 0, 0, 1, 1] {
            bits.push(bit);
        }
        assert_eq!(bits.len(), 9);
        assert_eq!(bits.get(1), Some(1));
        assert_eq!(bits.get(8), Some(1));
        assert_eq!(bits.get(9), None);
        assert_eq!(bits.into_bytes(), vec![0b0110_1001, 0b1000_0000]);
    }

    #[test]
    fn test_empty() {
        let bits = bytes_to_bits(&[]);
        assert!(bits.is_empty());
        assert!(bits_to_bytes(bits).is_empty());
    }
}
