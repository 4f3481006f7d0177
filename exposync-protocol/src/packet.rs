//! In-progress packet buffer
//!
//! Exactly one packet is accumulated at a time. The buffer is reset after
//! every completion or rejection.

use heapless::Vec;

use crate::magellan::{STATUS_SENTENCE_LEN, TIME_SENTENCE_LEN};
use crate::tsip::TIMING_PACKET_LEN;

/// Maximum packet size in bytes (after DLE de-stuffing)
pub const MAX_PACKET_SIZE: usize = 32;

/// Copy of a packet's bytes, kept for diagnostics
pub type RawPacket = Vec<u8, MAX_PACKET_SIZE>;

/// Protocol of the packet currently being accumulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketKind {
    /// Not synchronized to any packet
    Unknown,
    /// TSIP 0x8F-AB primary timing packet
    Binary,
    /// Magellan `$$A` time sentence
    TextTime,
    /// Magellan `$$H` status sentence
    TextStatus,
}

impl PacketKind {
    /// Exact packet length for this kind, or 0 while unsynchronized
    pub const fn expected_len(self) -> usize {
        match self {
            PacketKind::Unknown => 0,
            PacketKind::Binary => TIMING_PACKET_LEN,
            PacketKind::TextTime => TIME_SENTENCE_LEN,
            PacketKind::TextStatus => STATUS_SENTENCE_LEN,
        }
    }
}

/// The packet currently being accumulated
#[derive(Debug, Clone)]
pub struct Packet {
    kind: PacketKind,
    bytes: Vec<u8, MAX_PACKET_SIZE>,
}

impl Default for Packet {
    fn default() -> Self {
        Self::new()
    }
}

impl Packet {
    /// Create an empty, unsynchronized packet
    pub const fn new() -> Self {
        Self {
            kind: PacketKind::Unknown,
            bytes: Vec::new(),
        }
    }

    /// Start a packet of the given kind, seeded with its preamble bytes
    pub fn begin(&mut self, kind: PacketKind, preamble: &[u8]) {
        self.bytes.clear();
        self.kind = kind;
        for &b in preamble.iter().take(kind.expected_len()) {
            // Preamble never exceeds the expected length, which is <= capacity
            let _ = self.bytes.push(b);
        }
    }

    /// Append one byte
    ///
    /// Returns `true` once the packet has reached its expected length.
    /// Bytes beyond the expected length are never stored.
    pub fn push(&mut self, byte: u8) -> bool {
        if !self.is_complete() {
            let _ = self.bytes.push(byte);
        }
        self.is_complete()
    }

    /// Check if the expected length has been reached
    pub fn is_complete(&self) -> bool {
        self.kind != PacketKind::Unknown && self.bytes.len() >= self.kind.expected_len()
    }

    /// Discard the packet and return to the unsynchronized state
    pub fn reset(&mut self) {
        self.kind = PacketKind::Unknown;
        self.bytes.clear();
    }

    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_lengths() {
        assert_eq!(PacketKind::Binary.expected_len(), 21);
        assert_eq!(PacketKind::TextTime.expected_len(), 13);
        assert_eq!(PacketKind::TextStatus.expected_len(), 16);
        assert_eq!(PacketKind::Unknown.expected_len(), 0);
    }

    #[test]
    fn test_packet_fills_to_expected_length() {
        let mut packet = Packet::new();
        packet.begin(PacketKind::TextTime, b"$$A");
        assert_eq!(packet.len(), 3);

        for i in 0..9 {
            assert!(!packet.push(i));
        }
        assert!(packet.push(0x0A));
        assert_eq!(packet.len(), 13);

        // Overflow bytes are dropped
        assert!(packet.push(0xFF));
        assert_eq!(packet.len(), 13);
    }

    #[test]
    fn test_reset_empties_packet() {
        let mut packet = Packet::new();
        packet.begin(PacketKind::Binary, &[0x10, 0x8F, 0xAB]);
        packet.push(1);
        packet.reset();
        assert!(packet.is_empty());
        assert_eq!(packet.kind(), PacketKind::Unknown);
        assert!(!packet.is_complete());
    }
}
