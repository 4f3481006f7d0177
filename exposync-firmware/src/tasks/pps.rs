//! PPS edge task
//!
//! The receiver's pulse-per-second output marks the exact start of each
//! UTC second. Each rising edge advances the exposure countdown.

use defmt::*;
use embassy_rp::gpio::Input;

use crate::channels::{DEVICE, TRIGGER};

#[embassy_executor::task]
pub async fn pps_task(mut pps: Input<'static>) {
    info!("PPS task started");

    loop {
        pps.wait_for_rising_edge().await;
        if DEVICE.on_pps() {
            TRIGGER.signal(());
            trace!("PPS: exposure boundary");
        }
    }
}
