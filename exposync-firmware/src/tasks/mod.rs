//! Embassy async tasks
//!
//! Each task runs independently and communicates through the shared device
//! context and the signals in `channels`.

pub mod debug;
pub mod gps;
pub mod gps_rx;
pub mod gps_tx;
pub mod pps;
pub mod receiver;
pub mod trigger;
pub mod watchdog;

pub use debug::debug_task;
pub use gps::gps_task;
pub use gps_rx::gps_rx_task;
pub use gps_tx::gps_tx_task;
pub use pps::pps_task;
pub use receiver::configure_receiver;
pub use trigger::trigger_task;
pub use watchdog::watchdog_task;
