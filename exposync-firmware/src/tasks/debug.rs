//! Debug reporting task
//!
//! Collects diagnostics into link statistics, reports exposure boundaries,
//! and prints a periodic status summary.

use defmt::*;
use embassy_futures::select::{select4, Either4};
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;

use exposync_core::{Diagnostic, Snapshot};

use crate::channels::{DIAGNOSTICS, STATUS_UPDATE, SYNCTIME};
use crate::diagnostics::DROPPED;

/// Summary interval
const SUMMARY_INTERVAL_SECS: u64 = 60;

/// Link error counters since boot
#[derive(Debug, Default, Clone, Copy, Format)]
struct LinkStats {
    skipped_bytes: u32,
    unknown_sentences: u32,
    bad_packets: u32,
    missed_pps: u32,
    link_lost: u32,
    rx_overflows: u32,
}

impl LinkStats {
    fn record(&mut self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::SkippedBytes { skipped, .. } => {
                self.skipped_bytes = self.skipped_bytes.saturating_add(*skipped as u32)
            }
            Diagnostic::UnknownSentence(_) => self.unknown_sentences += 1,
            Diagnostic::MalformedPacket(_)
            | Diagnostic::ChecksumMismatch { .. }
            | Diagnostic::InvalidDate(_) => self.bad_packets += 1,
            Diagnostic::MissedPps => self.missed_pps += 1,
            Diagnostic::LinkLost => self.link_lost += 1,
            Diagnostic::RxOverflow => self.rx_overflows += 1,
        }
    }
}

#[embassy_executor::task]
pub async fn debug_task() {
    info!("Debug task started");

    let mut stats = LinkStats::default();
    let mut last: Option<Snapshot> = None;
    let mut ticker = Ticker::every(Duration::from_secs(SUMMARY_INTERVAL_SECS));

    loop {
        match select4(
            DIAGNOSTICS.receive(),
            SYNCTIME.wait(),
            STATUS_UPDATE.wait(),
            ticker.next(),
        )
        .await
        {
            Either4::First(diagnostic) => stats.record(&diagnostic),
            Either4::Second(ts) => {
                info!(
                    "Exposure boundary {}-{}-{} {}:{}:{} UTC",
                    ts.year, ts.month, ts.day, ts.hours, ts.minutes, ts.seconds
                );
            }
            Either4::Third(snapshot) => {
                if last.map(|s| s.link) != Some(snapshot.link) {
                    info!("GPS link: {:?}", snapshot.link);
                }
                last = Some(snapshot);
            }
            Either4::Fourth(()) => {
                let dropped = DROPPED.load(Ordering::Relaxed);
                info!("Link stats: {:?}, {} diagnostics dropped", stats, dropped);
                if let Some(s) = last {
                    info!(
                        "Countdown {:?}: {}/{} s",
                        s.mode,
                        s.progress(),
                        s.window.total
                    );
                }
            }
        }
    }
}
