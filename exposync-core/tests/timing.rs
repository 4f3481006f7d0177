//! End-to-end behavior of the receiver link and exposure countdown
//!
//! Drives a `DeviceContext` the way the firmware does: bytes through the
//! receive path, PPS edges, watchdog ticks, and the engine in between.

use exposync_core::{
    CountdownMode, DeviceContext, Diagnostic, GpsEngine, LinkState, Processed,
};
use exposync_protocol::magellan::{encode_status_sentence, encode_time_sentence, RawTime};
use exposync_protocol::tsip::{encode_timing_packet, DLE, ETX};
use exposync_protocol::{correct_epoch, Timestamp};

// Host critical-section implementation
use critical_section as _;

struct Rig {
    ctx: DeviceContext,
    engine: GpsEngine,
    diagnostics: Vec<Diagnostic>,
}

impl Rig {
    fn new(watchdog_timeout_ms: u32) -> Self {
        Self {
            ctx: DeviceContext::new(watchdog_timeout_ms),
            engine: GpsEngine::new(),
            diagnostics: Vec::new(),
        }
    }

    fn receive(&self, bytes: &[u8]) {
        for &b in bytes {
            self.ctx.on_rx_byte(b).unwrap();
        }
    }

    /// Run the engine until the receive ring is drained
    fn process(&mut self) -> Vec<Processed> {
        let mut passes = Vec::new();
        loop {
            let diagnostics = &mut self.diagnostics;
            let processed = self
                .engine
                .process(&self.ctx, &mut |d: Diagnostic| diagnostics.push(d));
            passes.push(processed);
            if self.ctx.rx_pending() == 0 {
                return passes;
            }
        }
    }

    /// One second of a healthy binary receiver: PPS edge then timestamp
    fn second(&mut self, ts: Timestamp) -> (bool, Processed) {
        let fired = self.ctx.on_pps();
        self.receive(&encode_timing_packet(&ts));
        let processed = self.process().into_iter().find(|p| p.updated).unwrap();
        (fired, processed)
    }
}

fn at(seconds: u8, locked: bool) -> Timestamp {
    Timestamp {
        hours: 12,
        minutes: 30,
        seconds,
        day: 14,
        month: 3,
        year: 2024,
        locked,
    }
}

#[test]
fn test_binary_stream_publishes_timestamp() {
    let mut rig = Rig::new(4000);
    rig.receive(&[0x55, 0x12, DLE, ETX]);
    rig.receive(&encode_timing_packet(&at(0, true)));
    rig.process();

    let snap = rig.ctx.snapshot();
    assert_eq!(snap.timestamp, Some(at(0, true)));
    assert_eq!(snap.link, LinkState::TimeGood);
}

#[test]
fn test_text_stream_applies_epoch_correction() {
    let mut rig = Rig::new(4000);
    let raw = RawTime {
        hours: 23,
        minutes: 59,
        seconds: 58,
        day: 20,
        month: 5,
        year: 2004,
    };
    rig.receive(b"\r\n");
    rig.receive(&encode_status_sentence(true));
    rig.receive(&encode_time_sentence(&raw));
    rig.process();

    let ts = rig.ctx.snapshot().timestamp.unwrap();
    let expected = correct_epoch(20, 5, 2004).unwrap();
    assert_eq!((ts.day, ts.month, ts.year), (expected.day, expected.month, expected.year));
    assert_eq!((ts.hours, ts.minutes, ts.seconds), (23, 59, 58));
    assert!(ts.locked);
    assert_eq!(rig.ctx.link_state(), LinkState::TimeGood);
}

#[test]
fn test_watchdog_loses_link_once_and_resyncs() {
    let mut rig = Rig::new(4000);
    rig.receive(&[DLE, ETX]);
    rig.receive(&encode_timing_packet(&at(0, true)));
    rig.process();

    // A partial packet, then silence
    let wire = encode_timing_packet(&at(1, true));
    rig.receive(&wire[..12]);
    rig.process();
    assert!(rig.engine.decoder().packet_len() > 0);

    let mut lost = 0;
    for _ in 0..100 {
        if rig.ctx.watchdog_tick(100) {
            lost += 1;
        }
    }
    assert_eq!(lost, 1);
    assert_eq!(rig.ctx.link_state(), LinkState::Unavailable);

    // Next byte restarts synchronization; the partial packet is gone
    rig.receive(&[DLE]);
    assert_eq!(rig.ctx.link_state(), LinkState::Syncing);
    rig.process();
    assert_eq!(rig.engine.decoder().packet_len(), 0);

    rig.receive(&[ETX]);
    rig.receive(&encode_timing_packet(&at(7, true)));
    rig.process();
    assert_eq!(rig.ctx.snapshot().timestamp, Some(at(7, true)));
    assert!(rig.diagnostics.is_empty());
}

#[test]
fn test_exposure_fires_on_every_nth_edge() {
    let mut rig = Rig::new(4000);
    rig.ctx.configure_exposure(5);
    rig.receive(&[DLE, ETX]);

    // Not a multiple of five: keep syncing
    rig.receive(&encode_timing_packet(&at(3, true)));
    rig.process();
    assert_eq!(rig.ctx.snapshot().mode, CountdownMode::Syncing);
    rig.second(at(4, true));
    rig.second(at(5, true));
    assert_eq!(rig.ctx.snapshot().mode, CountdownMode::Enabled);

    let mut fired_at = Vec::new();
    for s in 6..=20u8 {
        let (fired, processed) = rig.second(at(s, true));
        if fired {
            fired_at.push(s);
            assert_eq!(processed.synctime, Some(at(s, true)));
        }
    }
    assert_eq!(fired_at, vec![10, 15, 20]);
    assert_eq!(rig.ctx.snapshot().synctime, Some(at(20, true)));
    assert!(rig.diagnostics.is_empty());
}

#[test]
fn test_missed_pps_keeps_boundaries() {
    let mut rig = Rig::new(4000);
    rig.ctx.configure_exposure(3);
    rig.receive(&[DLE, ETX]);
    rig.receive(&encode_timing_packet(&at(0, true)));
    rig.process();
    assert_eq!(rig.ctx.snapshot().mode, CountdownMode::Enabled);

    rig.second(at(1, true));

    // Edge for second 2 never arrives
    rig.receive(&encode_timing_packet(&at(2, true)));
    rig.process();
    assert_eq!(rig.diagnostics, vec![Diagnostic::MissedPps]);
    assert_eq!(rig.ctx.snapshot().window.count, 1);
    assert_eq!(rig.ctx.snapshot().mode, CountdownMode::Enabled);

    // The exposure still ends on second 3
    let (fired, _) = rig.second(at(3, true));
    assert!(fired);
}

#[test]
fn test_missed_final_edge_fires_from_timestamp() {
    let mut rig = Rig::new(4000);
    rig.ctx.configure_exposure(2);
    rig.receive(&[DLE, ETX]);
    rig.receive(&encode_timing_packet(&at(0, true)));
    rig.process();
    rig.second(at(1, true));

    rig.receive(&encode_timing_packet(&at(2, true)));
    let processed = rig.process().into_iter().find(|p| p.updated).unwrap();
    assert!(processed.fired);
    assert_eq!(processed.synctime, Some(at(2, true)));
}

#[test]
fn test_link_loss_after_final_edge_records_no_boundary() {
    let mut rig = Rig::new(4000);
    rig.ctx.configure_exposure(2);
    rig.receive(&[DLE, ETX]);
    rig.receive(&encode_timing_packet(&at(0, true)));
    rig.process();
    rig.second(at(1, true));

    // The exposure ends, but its timestamp never arrives
    assert!(rig.ctx.on_pps());
    while !rig.ctx.watchdog_tick(1000) {}
    assert_eq!(rig.ctx.snapshot().mode, CountdownMode::Syncing);

    rig.receive(&[DLE, ETX]);
    rig.receive(&encode_timing_packet(&at(37, true)));
    let processed = rig.process().into_iter().find(|p| p.updated).unwrap();
    assert_eq!(processed.synctime, None);
    assert_eq!(rig.ctx.snapshot().synctime, None);
    assert_eq!(rig.ctx.snapshot().mode, CountdownMode::Syncing);
}

#[test]
fn test_pps_ignored_until_time_good() {
    let mut rig = Rig::new(4000);
    rig.ctx.configure_exposure(1);
    rig.receive(&[DLE, ETX]);
    rig.receive(&encode_timing_packet(&at(0, false)));
    rig.process();
    assert_eq!(rig.ctx.link_state(), LinkState::Active);
    assert!(!rig.ctx.on_pps());
    assert_eq!(rig.ctx.snapshot().mode, CountdownMode::Syncing);
}

#[test]
fn test_garbage_between_packets_is_reported() {
    let mut rig = Rig::new(4000);
    rig.receive(b"noise noise\n");
    rig.receive(&encode_status_sentence(false));
    rig.receive(b"\x00\x01\x02\n$$Z0123\n");
    rig.receive(&encode_status_sentence(true));
    rig.process();

    assert!(rig
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::SkippedBytes { .. })));
    assert!(rig.diagnostics.contains(&Diagnostic::UnknownSentence(b'Z')));
}
