//! GPS UART receive task
//!
//! Moves received bytes into the device context's receive ring and wakes
//! the GPS task. Decoding happens there, never here.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use exposync_core::{Diagnostic, DiagnosticSink};

use crate::channels::{DEVICE, RX_ACTIVITY};
use crate::diagnostics::LogSink;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn gps_rx_task(mut rx: BufferedUartRx) {
    info!("GPS RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                let mut dropped = false;
                for &byte in &buf[..n] {
                    if DEVICE.on_rx_byte(byte).is_err() {
                        dropped = true;
                    }
                }
                if dropped {
                    // Once per read, not once per byte
                    LogSink.emit(Diagnostic::RxOverflow);
                }
                RX_ACTIVITY.signal(());
            }
            Ok(_) => {}
            Err(e) => {
                warn!("GPS UART read error: {:?}", e);
            }
        }
    }
}
