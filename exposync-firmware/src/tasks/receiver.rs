//! Receiver start-up configuration
//!
//! Queues the configuration sequences for whichever protocol the attached
//! receiver speaks. A receiver ignores the other protocol's commands.

use defmt::*;

use exposync_core::config::GpsConfig;
use exposync_core::RingError;
use exposync_protocol::init::{BINARY_INIT, TEXT_INIT};

use crate::channels::{DEVICE, TX_DRAINED, TX_QUEUED};

/// Queue the enabled start-up sequences, binary first
pub async fn configure_receiver(config: &GpsConfig) {
    if config.configure_binary {
        queue(&BINARY_INIT).await;
        info!("Queued binary receiver configuration");
    }
    if config.configure_text {
        queue(TEXT_INIT).await;
        info!("Queued text receiver configuration");
    }
}

/// Queue bytes, waiting for the transmit task whenever the ring is full
///
/// Known limitation: this only makes progress because start-up is the sole
/// producer and writes a bounded amount, so the UART drain always catches up.
/// A producer that outpaces the drain would stall here indefinitely.
async fn queue(bytes: &[u8]) {
    for &byte in bytes {
        while let Err(RingError::Full) = DEVICE.try_queue_tx(byte) {
            TX_QUEUED.signal(());
            TX_DRAINED.wait().await;
        }
    }
    TX_QUEUED.signal(());
}
