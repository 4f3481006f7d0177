//! Byte-at-a-time GPS stream decoder
//!
//! Combines the synchronizer with the two protocol decoders. While no packet
//! is in progress, bytes go to the synchronizer; once a preamble is found,
//! bytes accumulate into the packet until it reaches its fixed length, at
//! which point it is validated, decoded, and the packet is reset whatever the
//! outcome.

use crate::error::DecodeError;
use crate::magellan::{self, SENTENCE_MARKER};
use crate::packet::{Packet, PacketKind};
use crate::sync::{PacketSync, SyncOutcome};
use crate::timestamp::Timestamp;
use crate::tsip::{self, Destuffer};

/// Something the decoder learned from the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpsEvent {
    /// Synchronized to the start of a packet
    Synced { kind: PacketKind, skipped: u16 },
    /// A complete, valid timestamp
    Time(Timestamp),
    /// A valid status sentence
    LockStatus {
        locked: bool,
        /// The locked flag differs from the previous status sentence
        changed: bool,
    },
}

/// GPS stream decoder
#[derive(Debug, Clone)]
pub struct GpsDecoder {
    sync: PacketSync,
    packet: Packet,
    destuffer: Destuffer,
    /// Last lock state reported by a text status sentence
    text_locked: bool,
}

impl Default for GpsDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl GpsDecoder {
    pub const fn new() -> Self {
        Self {
            sync: PacketSync::new(),
            packet: Packet::new(),
            destuffer: Destuffer::new(),
            text_locked: false,
        }
    }

    /// Abandon any partial packet and resynchronize from scratch
    pub fn reset(&mut self) {
        self.sync.reset();
        self.packet.reset();
        self.destuffer.reset();
    }

    /// Kind of the packet in progress
    pub fn packet_kind(&self) -> PacketKind {
        self.packet.kind()
    }

    /// Number of bytes accumulated in the packet in progress
    pub fn packet_len(&self) -> usize {
        self.packet.len()
    }

    /// Lock state last reported by the text protocol
    pub fn text_locked(&self) -> bool {
        self.text_locked
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(event))` when the byte completed a preamble or a
    /// packet, `Ok(None)` when more bytes are needed, or `Err` when a packet
    /// was rejected.
    pub fn feed(&mut self, byte: u8) -> Result<Option<GpsEvent>, DecodeError> {
        match self.packet.kind() {
            PacketKind::Unknown => self.scan(byte),
            PacketKind::Binary => {
                self.sync.observe(byte);
                let complete = match self.destuffer.accept(byte) {
                    Some(b) => self.packet.push(b),
                    None => false,
                };
                if complete {
                    self.finish_binary().map(Some)
                } else {
                    Ok(None)
                }
            }
            PacketKind::TextTime | PacketKind::TextStatus => {
                self.sync.observe(byte);
                if self.packet.push(byte) {
                    self.finish_text().map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn scan(&mut self, byte: u8) -> Result<Option<GpsEvent>, DecodeError> {
        match self.sync.scan(byte) {
            SyncOutcome::Searching => Ok(None),
            SyncOutcome::UnknownSentence { code } => Err(DecodeError::UnknownSentence(code)),
            SyncOutcome::Found { kind, skipped } => {
                match kind {
                    PacketKind::Binary => self.packet.begin(kind, &tsip::PREAMBLE),
                    _ => self
                        .packet
                        .begin(kind, &[SENTENCE_MARKER, SENTENCE_MARKER, byte]),
                }
                self.destuffer.reset();
                Ok(Some(GpsEvent::Synced { kind, skipped }))
            }
        }
    }

    fn finish_binary(&mut self) -> Result<GpsEvent, DecodeError> {
        let result = tsip::decode_timing_packet(self.packet.as_slice());
        self.packet.reset();
        result.map(GpsEvent::Time)
    }

    fn finish_text(&mut self) -> Result<GpsEvent, DecodeError> {
        let kind = self.packet.kind();
        let result = match kind {
            PacketKind::TextStatus => {
                magellan::decode_status(self.packet.as_slice()).map(|locked| {
                    let changed = locked != self.text_locked;
                    self.text_locked = locked;
                    GpsEvent::LockStatus { locked, changed }
                })
            }
            _ => magellan::decode_time(self.packet.as_slice(), self.text_locked)
                .map(GpsEvent::Time),
        };
        self.packet.reset();
        result
    }
}
