//! Protocol error types
//!
//! Every error is recoverable: the packet in progress is discarded and the
//! synchronizer resumes from the next byte.

use crate::packet::{RawPacket, MAX_PACKET_SIZE};

/// Reasons a packet was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Text sentence preamble with a type code we don't decode
    UnknownSentence(u8),
    /// Completed packet has the wrong terminator
    Malformed(RawPacket),
    /// Text sentence checksum mismatch
    ChecksumMismatch {
        computed: u8,
        received: u8,
        raw: RawPacket,
    },
    /// Date fields cannot be converted to a calendar date
    InvalidDate(RawPacket),
}

impl DecodeError {
    pub(crate) fn malformed(packet: &[u8]) -> Self {
        DecodeError::Malformed(raw_copy(packet))
    }
}

/// Copy up to [`MAX_PACKET_SIZE`] bytes for a diagnostic
pub(crate) fn raw_copy(packet: &[u8]) -> RawPacket {
    let len = packet.len().min(MAX_PACKET_SIZE);
    let mut raw = RawPacket::new();
    // Length is clamped to capacity
    let _ = raw.extend_from_slice(&packet[..len]);
    raw
}
