//! Raw measurement accumulation.

/// Bytes returned by one measurement read: temperature then humidity, MSB first.
pub const MEASUREMENT_BYTES: usize = 4;

/// Holds the two raw 16-bit words while the read transaction fills them in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasurementBuffer {
    bytes: [u8; MEASUREMENT_BYTES],
    captured: usize,
}

impl MeasurementBuffer {
    /// Creates an empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0; MEASUREMENT_BYTES],
            captured: 0,
        }
    }

    /// Stores the next byte in read order and returns how many have landed.
    ///
    /// Bytes past the fourth are ignored until [`clear`](Self::clear).
    pub fn capture(&mut self, byte: u8) -> usize {
        if let Some(slot) = self.bytes.get_mut(self.captured) {
            *slot = byte;
            self.captured += 1;
        }
        self.captured
    }

    /// `true` once all four bytes of the current cycle have been captured.
    pub const fn is_complete(&self) -> bool {
        self.captured == MEASUREMENT_BYTES
    }

    /// Raw temperature word, or `None` while the cycle is still partial.
    pub fn temperature(&self) -> Option<u16> {
        self.is_complete()
            .then(|| u16::from_be_bytes([self.bytes[0], self.bytes[1]]))
    }

    /// Raw humidity word, or `None` while the cycle is still partial.
    pub fn humidity(&self) -> Option<u16> {
        self.is_complete()
            .then(|| u16::from_be_bytes([self.bytes[2], self.bytes[3]]))
    }

    /// Starts a new cycle.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Keeps the top `bits` of a raw 16-bit word.
#[inline]
pub const fn top_bits(raw: u16, bits: u8) -> u16 {
    if bits == 0 {
        0
    } else if bits >= 16 {
        raw
    } else {
        raw >> (16 - bits)
    }
}
