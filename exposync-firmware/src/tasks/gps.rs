//! GPS processing task
//!
//! Runs the decoder over buffered bytes whenever the receive task reports
//! activity, and at a fixed poll interval in case a wake-up was coalesced.
//! Publishes results to the trigger, debug and status consumers.

use defmt::*;
use embassy_futures::select::select;
use embassy_futures::yield_now;
use embassy_time::{Duration, Ticker};

use exposync_core::GpsEngine;

use crate::channels::{DEVICE, RX_ACTIVITY, STATUS_UPDATE, SYNCTIME, TRIGGER};
use crate::diagnostics::LogSink;

/// Poll interval when no activity is signalled
const POLL_INTERVAL_MS: u64 = 50;

#[embassy_executor::task]
pub async fn gps_task() {
    info!("GPS task started");

    let mut engine = GpsEngine::new();
    let mut sink = LogSink;
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    loop {
        select(RX_ACTIVITY.wait(), ticker.next()).await;

        // One packet per pass; yield between passes so the PPS and
        // receive tasks are never held off by a backlog
        while DEVICE.rx_pending() > 0 {
            let processed = engine.process(&DEVICE, &mut sink);

            if processed.fired {
                TRIGGER.signal(());
            }
            if let Some(ts) = processed.synctime {
                SYNCTIME.signal(ts);
            }
            if processed.updated {
                STATUS_UPDATE.signal(DEVICE.snapshot());
            }
            yield_now().await;
        }
    }
}
