//! GPS processing engine
//!
//! The main-loop side of the receiver link. Drains the receive ring through
//! the decoder, publishes timestamps into the [`DeviceContext`], and reports
//! everything noteworthy as a [`Diagnostic`].

use exposync_protocol::sync::SKIP_WARN_THRESHOLD;
use exposync_protocol::{DecodeError, GpsDecoder, GpsEvent, Timestamp};

use crate::context::DeviceContext;
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Result of one processing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Processed {
    /// Timestamp or lock state changed; collaborators should refresh
    pub updated: bool,
    /// A compensating countdown step ended an exposure; fire the trigger
    pub fired: bool,
    /// Exposure boundary recorded by this pass
    pub synctime: Option<Timestamp>,
}

/// Decoder driver
#[derive(Debug, Clone, Default)]
pub struct GpsEngine {
    decoder: GpsDecoder,
}

impl GpsEngine {
    pub const fn new() -> Self {
        Self {
            decoder: GpsDecoder::new(),
        }
    }

    pub fn decoder(&self) -> &GpsDecoder {
        &self.decoder
    }

    /// Process buffered bytes
    ///
    /// Stops after the first completed packet, valid or not, so a burst of
    /// packets is spread over several passes. Returns what changed.
    pub fn process(&mut self, ctx: &DeviceContext, sink: &mut dyn DiagnosticSink) -> Processed {
        if ctx.take_resync() {
            self.decoder.reset();
        }

        while let Some(byte) = ctx.pop_rx() {
            match self.decoder.feed(byte) {
                Ok(None) => {}
                Ok(Some(GpsEvent::Synced { kind, skipped })) => {
                    if skipped > SKIP_WARN_THRESHOLD {
                        sink.emit(Diagnostic::SkippedBytes { kind, skipped });
                    }
                }
                Ok(Some(GpsEvent::Time(ts))) => {
                    let publication = ctx.publish_time(ts);
                    if publication.missed_pps {
                        sink.emit(Diagnostic::MissedPps);
                    }
                    return Processed {
                        updated: true,
                        fired: publication.fired,
                        synctime: publication.synchronized.then_some(ts),
                    };
                }
                Ok(Some(GpsEvent::LockStatus { locked, changed })) => {
                    if changed {
                        ctx.publish_lock(locked);
                    }
                    return Processed {
                        updated: changed,
                        ..Processed::default()
                    };
                }
                Err(DecodeError::UnknownSentence(code)) => {
                    // Scanning continues with the next byte
                    sink.emit(Diagnostic::UnknownSentence(code));
                }
                Err(err) => {
                    sink.emit(err.into());
                    return Processed::default();
                }
            }
        }
        Processed::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exposync_protocol::magellan::{encode_status_sentence, encode_time_sentence, RawTime};
    use exposync_protocol::tsip::{encode_timing_packet, DLE, ETX};

    fn feed(ctx: &DeviceContext, bytes: &[u8]) {
        for &b in bytes {
            ctx.on_rx_byte(b).unwrap();
        }
    }

    fn collect(engine: &mut GpsEngine, ctx: &DeviceContext) -> (Processed, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let processed = engine.process(ctx, &mut |d: Diagnostic| diagnostics.push(d));
        (processed, diagnostics)
    }

    fn sample() -> Timestamp {
        Timestamp {
            hours: 12,
            minutes: 30,
            seconds: 0,
            day: 14,
            month: 3,
            year: 2024,
            locked: true,
        }
    }

    #[test]
    fn test_publishes_binary_timestamp() {
        let ctx = DeviceContext::default();
        let mut engine = GpsEngine::new();
        feed(&ctx, &[DLE, ETX]);
        feed(&ctx, &encode_timing_packet(&sample()));

        let (processed, diagnostics) = collect(&mut engine, &ctx);
        assert!(processed.updated);
        // A scanned lead-in terminator is expected framing, not noise
        assert!(diagnostics.is_empty());
        assert_eq!(ctx.snapshot().timestamp, Some(sample()));
    }

    #[test]
    fn test_stops_after_one_packet() {
        let ctx = DeviceContext::default();
        let mut engine = GpsEngine::new();
        let mut next = sample();
        next.seconds = 1;
        feed(&ctx, &[DLE, ETX]);
        feed(&ctx, &encode_timing_packet(&sample()));
        feed(&ctx, &encode_timing_packet(&next));

        collect(&mut engine, &ctx);
        assert_eq!(ctx.snapshot().timestamp, Some(sample()));
        assert!(ctx.rx_pending() > 0);
        collect(&mut engine, &ctx);
        assert_eq!(ctx.snapshot().timestamp, Some(next));
    }

    #[test]
    fn test_skipped_bytes_reported() {
        let ctx = DeviceContext::default();
        let mut engine = GpsEngine::new();
        feed(&ctx, b"garbage\n");
        feed(&ctx, &encode_status_sentence(false));

        let (_, diagnostics) = collect(&mut engine, &ctx);
        assert!(matches!(
            diagnostics.first(),
            Some(Diagnostic::SkippedBytes { skipped, .. }) if *skipped > 1
        ));
    }

    #[test]
    fn test_checksum_error_reported() {
        let ctx = DeviceContext::default();
        let mut engine = GpsEngine::new();
        let mut sentence = encode_time_sentence(&RawTime {
            day: 1,
            month: 1,
            year: 1993,
            ..Default::default()
        });
        sentence[6] ^= 0x20;
        feed(&ctx, b"\n");
        feed(&ctx, &sentence);

        let (processed, diagnostics) = collect(&mut engine, &ctx);
        assert!(!processed.updated);
        assert!(matches!(
            diagnostics.last(),
            Some(Diagnostic::ChecksumMismatch { .. })
        ));
        assert_eq!(ctx.snapshot().timestamp, None);
    }

    #[test]
    fn test_lock_change_is_an_update() {
        let ctx = DeviceContext::default();
        let mut engine = GpsEngine::new();
        feed(&ctx, b"\n");
        feed(&ctx, &encode_status_sentence(true));
        assert!(collect(&mut engine, &ctx).0.updated);

        feed(&ctx, &encode_status_sentence(true));
        assert!(!collect(&mut engine, &ctx).0.updated);
    }
}
