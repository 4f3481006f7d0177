//! Inter-task communication
//!
//! The shared device context plus the signals and channels that wake tasks.
//! Uses embassy-sync primitives throughout.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use exposync_core::watchdog::DEFAULT_TIMEOUT_MS;
use exposync_core::{DeviceContext, Diagnostic, Snapshot};
use exposync_protocol::Timestamp;

/// Channel capacity for diagnostics
const DIAGNOSTIC_CHANNEL_SIZE: usize = 8;

/// All state shared between the receive path, PPS edge, watchdog and GPS loop
pub static DEVICE: DeviceContext = DeviceContext::new(DEFAULT_TIMEOUT_MS);

/// Bytes were pushed into the receive ring
pub static RX_ACTIVITY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Bytes were queued for the receiver
pub static TX_QUEUED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// The transmit task drained the queue
pub static TX_DRAINED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// An exposure ended; pulse the camera download line
pub static TRIGGER: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Timestamp of the most recent exposure boundary
pub static SYNCTIME: Signal<CriticalSectionRawMutex, Timestamp> = Signal::new();

/// Latest state for the status display
pub static STATUS_UPDATE: Signal<CriticalSectionRawMutex, Snapshot> = Signal::new();

/// Diagnostics for the debug task
pub static DIAGNOSTICS: Channel<CriticalSectionRawMutex, Diagnostic, DIAGNOSTIC_CHANNEL_SIZE> =
    Channel::new();
