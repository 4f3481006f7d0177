//! Serial silence watchdog task
//!
//! Advances the link watchdog at a fixed rate. When the receiver has been
//! silent for the configured window, the link is declared lost once.

use defmt::*;
use embassy_time::{Duration, Ticker};

use exposync_core::{Diagnostic, DiagnosticSink};

use crate::channels::{DEVICE, STATUS_UPDATE};
use crate::diagnostics::LogSink;

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u32 = 100;

#[embassy_executor::task]
pub async fn watchdog_task() {
    info!("Watchdog task started");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS as u64));

    loop {
        ticker.next().await;
        if DEVICE.watchdog_tick(TICK_INTERVAL_MS) {
            LogSink.emit(Diagnostic::LinkLost);
            STATUS_UPDATE.signal(DEVICE.snapshot());
        }
    }
}
