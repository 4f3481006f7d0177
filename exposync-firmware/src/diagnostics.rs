//! Diagnostic sink
//!
//! Logs every diagnostic as it happens and forwards it to the debug task.
//! Forwarding never blocks; when the channel is full the diagnostic is only
//! counted.

use defmt::*;
use portable_atomic::{AtomicU32, Ordering};

use exposync_core::{Diagnostic, DiagnosticSink};

use crate::channels::DIAGNOSTICS;

/// Diagnostics dropped because the debug task fell behind
pub static DROPPED: AtomicU32 = AtomicU32::new(0);

/// Firmware diagnostic sink
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        log(&diagnostic);
        if DIAGNOSTICS.try_send(diagnostic).is_err() {
            DROPPED.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn log(diagnostic: &Diagnostic) {
    match diagnostic {
        Diagnostic::SkippedBytes { kind, skipped } => {
            warn!("Skipped {} bytes before {:?} packet", skipped, kind)
        }
        Diagnostic::UnknownSentence(code) => {
            debug!("Ignoring unknown sentence type {=u8:#x}", *code)
        }
        Diagnostic::MalformedPacket(raw) => warn!("Malformed packet: {=[u8]:x}", raw.as_slice()),
        Diagnostic::ChecksumMismatch {
            computed,
            received,
            raw,
        } => warn!(
            "Checksum mismatch: computed {=u8:#x}, received {=u8:#x}: {=[u8]:a}",
            *computed,
            *received,
            raw.as_slice()
        ),
        Diagnostic::InvalidDate(raw) => warn!("Invalid date in packet: {=[u8]:x}", raw.as_slice()),
        Diagnostic::MissedPps => warn!("Timestamp without PPS edge; countdown step forced"),
        Diagnostic::LinkLost => warn!("GPS link lost"),
        Diagnostic::RxOverflow => warn!("GPS receive buffer full, byte dropped"),
    }
}
