//! Exposure trigger task
//!
//! Pulses the camera download line each time an exposure ends.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use exposync_core::TriggerOutput;

use crate::channels::TRIGGER;

#[embassy_executor::task]
pub async fn trigger_task(mut trigger: TriggerOutput<Output<'static>>, pulse_ms: u32) {
    info!("Trigger task started ({} ms pulse)", pulse_ms);

    loop {
        TRIGGER.wait().await;

        // GPIO writes are infallible on this chip
        match trigger.fire() {
            Ok(()) => {}
            Err(e) => match e {},
        }
        Timer::after_millis(pulse_ms as u64).await;
        match trigger.release() {
            Ok(()) => {}
            Err(e) => match e {},
        }
        debug!("Trigger pulse {}", trigger.pulses());
    }
}
