//! GPS UART transmit task
//!
//! Drains the device context's transmit ring to the receiver.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use heapless::Vec;

use crate::channels::{DEVICE, TX_DRAINED, TX_QUEUED};

/// Bytes written per UART transfer
const TX_CHUNK: usize = 32;

#[embassy_executor::task]
pub async fn gps_tx_task(mut tx: BufferedUartTx) {
    info!("GPS TX task started");

    loop {
        let mut chunk: Vec<u8, TX_CHUNK> = Vec::new();
        while !chunk.is_full() {
            match DEVICE.pop_tx() {
                Some(byte) => {
                    // Capacity checked by the loop condition
                    let _ = chunk.push(byte);
                }
                None => break,
            }
        }

        if chunk.is_empty() {
            TX_DRAINED.signal(());
            TX_QUEUED.wait().await;
            continue;
        }

        if let Err(e) = tx.write_all(&chunk).await {
            warn!("GPS UART write error: {:?}", e);
        }
        TX_DRAINED.signal(());
    }
}
