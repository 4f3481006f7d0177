//! Packet synchronizer
//!
//! Scans the byte stream for a packet preamble. Both protocols are only
//! recognized when the preamble directly follows the terminator of the
//! previous packet, so the synchronizer keeps a short look-behind window of
//! every byte consumed, including the bytes a decoder accumulated.

use crate::magellan::{self, SENTENCE_MARKER};
use crate::packet::PacketKind;
use crate::tsip::{self, DLE, ETX};

/// Number of bytes remembered behind the current byte
const HISTORY_LEN: usize = 4;

/// Preamble bytes consumed before the byte that completes a match
const PREAMBLE_LEAD: u16 = 2;

/// Terminator bytes expected directly before a text preamble (`LF`)
const TEXT_LOOK_BEHIND: u16 = 1;

/// Terminator bytes expected directly before a binary preamble (`DLE ETX`)
const BINARY_LOOK_BEHIND: u16 = 2;

/// Skipped-byte counts above this are worth reporting
pub const SKIP_WARN_THRESHOLD: u16 = 1;

/// Result of scanning one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    /// No preamble yet
    Searching,
    /// Preamble recognized; the packet starts two bytes before this one
    Found {
        kind: PacketKind,
        /// Bytes discarded before the preamble
        skipped: u16,
    },
    /// A text sentence with a type code we don't decode
    UnknownSentence { code: u8 },
}

/// Preamble scanner with look-behind history
#[derive(Debug, Clone)]
pub struct PacketSync {
    /// Previously consumed bytes, oldest first
    history: [u8; HISTORY_LEN],
    /// Bytes scanned since the last recognized preamble
    scanned: u16,
}

impl Default for PacketSync {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketSync {
    pub const fn new() -> Self {
        Self {
            history: [0; HISTORY_LEN],
            scanned: 0,
        }
    }

    /// Forget all history and the skip count
    pub fn reset(&mut self) {
        self.history = [0; HISTORY_LEN];
        self.scanned = 0;
    }

    /// Record a byte consumed outside of scanning
    pub fn observe(&mut self, byte: u8) {
        self.history.copy_within(1.., 0);
        self.history[HISTORY_LEN - 1] = byte;
    }

    /// `n`-th byte before the current one (1 = immediately preceding)
    fn prev(&self, n: usize) -> u8 {
        self.history[HISTORY_LEN - n]
    }

    /// Scan one byte while no packet is in progress
    pub fn scan(&mut self, byte: u8) -> SyncOutcome {
        let outcome = self.classify(byte);
        self.observe(byte);

        match outcome {
            SyncOutcome::Searching => {
                self.scanned = self.scanned.saturating_add(1);
            }
            SyncOutcome::Found { .. } | SyncOutcome::UnknownSentence { .. } => {
                self.scanned = 0;
            }
        }
        outcome
    }

    /// Scanned bytes that were neither preamble nor the expected terminator
    ///
    /// The terminator only counts here when it was scanned rather than
    /// consumed by a decoder.
    fn skipped(&self, look_behind: u16) -> u16 {
        self.scanned.saturating_sub(PREAMBLE_LEAD + look_behind)
    }

    fn classify(&self, byte: u8) -> SyncOutcome {

        // "$$" after the previous sentence's line feed, then the type code
        if self.prev(1) == SENTENCE_MARKER
            && self.prev(2) == SENTENCE_MARKER
            && self.prev(3) == magellan::LF
        {
            return match byte {
                magellan::TIME_CODE => SyncOutcome::Found {
                    kind: PacketKind::TextTime,
                    skipped: self.skipped(TEXT_LOOK_BEHIND),
                },
                magellan::STATUS_CODE => SyncOutcome::Found {
                    kind: PacketKind::TextStatus,
                    skipped: self.skipped(TEXT_LOOK_BEHIND),
                },
                code => SyncOutcome::UnknownSentence { code },
            };
        }

        // DLE 0x8F 0xAB after the previous packet's DLE ETX
        if byte == tsip::TIMING_SUBCODE
            && self.prev(1) == tsip::TIMING_PACKET_ID
            && self.prev(2) == DLE
            && self.prev(3) == ETX
            && self.prev(4) == DLE
        {
            return SyncOutcome::Found {
                kind: PacketKind::Binary,
                skipped: self.skipped(BINARY_LOOK_BEHIND),
            };
        }

        SyncOutcome::Searching
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(sync: &mut PacketSync, bytes: &[u8]) -> SyncOutcome {
        let mut last = SyncOutcome::Searching;
        for &b in bytes {
            last = sync.scan(b);
            if last != SyncOutcome::Searching {
                break;
            }
        }
        last
    }

    #[test]
    fn test_finds_text_time_preamble() {
        let mut sync = PacketSync::new();
        // Line feed was scanned rather than consumed by a decoder
        let outcome = scan_all(&mut sync, b"\n$$A");
        assert_eq!(
            outcome,
            SyncOutcome::Found {
                kind: PacketKind::TextTime,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_finds_text_status_preamble() {
        let mut sync = PacketSync::new();
        let outcome = scan_all(&mut sync, b"xx\n$$H");
        assert_eq!(
            outcome,
            SyncOutcome::Found {
                kind: PacketKind::TextStatus,
                skipped: 2
            }
        );
    }

    #[test]
    fn test_text_preamble_requires_line_feed() {
        let mut sync = PacketSync::new();
        assert_eq!(scan_all(&mut sync, b"x$$A"), SyncOutcome::Searching);
    }

    #[test]
    fn test_finds_binary_preamble() {
        let mut sync = PacketSync::new();
        let outcome = scan_all(&mut sync, &[0x55, 0x66, DLE, ETX, DLE, 0x8F, 0xAB]);
        assert_eq!(
            outcome,
            SyncOutcome::Found {
                kind: PacketKind::Binary,
                skipped: 2
            }
        );
    }

    #[test]
    fn test_scanned_terminator_not_counted_as_skipped() {
        let mut sync = PacketSync::new();
        let binary = scan_all(&mut sync, &[DLE, ETX, DLE, 0x8F, 0xAB]);
        let mut sync = PacketSync::new();
        let text = scan_all(&mut sync, b"\n$$H");
        for outcome in [binary, text] {
            assert!(matches!(outcome, SyncOutcome::Found { skipped: 0, .. }));
        }
    }

    #[test]
    fn test_binary_preamble_requires_previous_terminator() {
        let mut sync = PacketSync::new();
        assert_eq!(
            scan_all(&mut sync, &[0x00, 0x00, DLE, 0x8F, 0xAB]),
            SyncOutcome::Searching
        );
    }

    #[test]
    fn test_unknown_sentence_resets_skip_count() {
        let mut sync = PacketSync::new();
        let outcome = scan_all(&mut sync, b"garbage\n$$Z");
        assert_eq!(outcome, SyncOutcome::UnknownSentence { code: b'Z' });
        assert_eq!(sync.scanned, 0);

        // Body of the unknown sentence counts as skipped
        let outcome = scan_all(&mut sync, b"123\n$$A");
        assert_eq!(
            outcome,
            SyncOutcome::Found {
                kind: PacketKind::TextTime,
                skipped: 3
            }
        );
    }

    #[test]
    fn test_observed_bytes_feed_history() {
        let mut sync = PacketSync::new();
        // Terminator consumed by a decoder, not scanned
        sync.observe(0x0A);
        assert_eq!(sync.scan(b'$'), SyncOutcome::Searching);
        assert_eq!(sync.scan(b'$'), SyncOutcome::Searching);
        assert_eq!(
            sync.scan(b'A'),
            SyncOutcome::Found {
                kind: PacketKind::TextTime,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_reset_clears_history() {
        let mut sync = PacketSync::new();
        sync.observe(0x0A);
        sync.observe(b'$');
        sync.observe(b'$');
        sync.reset();
        assert_eq!(sync.scan(b'A'), SyncOutcome::Searching);
    }
}
