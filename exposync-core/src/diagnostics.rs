//! Diagnostics
//!
//! Everything worth reporting about the receiver link, as data. The engine
//! and the firmware tasks emit these into a [`DiagnosticSink`]; what happens
//! to them (logging, queueing for the debug port) is up to the sink and never
//! feeds back into control flow.

use exposync_protocol::{DecodeError, PacketKind, RawPacket};

/// Link diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// Bytes discarded while searching for a preamble
    SkippedBytes { kind: PacketKind, skipped: u16 },
    /// Text sentence with a type code we don't decode
    UnknownSentence(u8),
    /// Completed packet had the wrong terminator
    MalformedPacket(RawPacket),
    /// Text sentence checksum mismatch
    ChecksumMismatch {
        computed: u8,
        received: u8,
        raw: RawPacket,
    },
    /// Date fields could not be converted
    InvalidDate(RawPacket),
    /// Timestamp arrived without its PPS edge; a countdown step was forced
    MissedPps,
    /// Serial silence watchdog expired
    LinkLost,
    /// Receive ring full, byte dropped
    RxOverflow,
}

impl From<DecodeError> for Diagnostic {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::UnknownSentence(code) => Diagnostic::UnknownSentence(code),
            DecodeError::Malformed(raw) => Diagnostic::MalformedPacket(raw),
            DecodeError::ChecksumMismatch {
                computed,
                received,
                raw,
            } => Diagnostic::ChecksumMismatch {
                computed,
                received,
                raw,
            },
            DecodeError::InvalidDate(raw) => Diagnostic::InvalidDate(raw),
        }
    }
}

/// Destination for diagnostics
pub trait DiagnosticSink {
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self(diagnostic)
    }
}
