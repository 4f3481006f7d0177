//! Configuration type definitions
//!
//! These types represent the timer configuration. The firmware embeds a
//! `timer.toml` at build time and parses it into [`TimerConfig`] at boot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::watchdog::DEFAULT_TIMEOUT_MS;

/// Receiver link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GpsConfig {
    /// Serial baud rate
    pub baudrate: u32,
    /// Serial silence before the link is declared lost
    pub watchdog_timeout_ms: u32,
    /// Send the binary-protocol start-up packet
    pub configure_binary: bool,
    /// Send the text-protocol start-up commands
    pub configure_text: bool,
}

impl Default for GpsConfig {
    fn default() -> Self {
        Self {
            baudrate: 9600,
            watchdog_timeout_ms: DEFAULT_TIMEOUT_MS,
            configure_binary: true,
            configure_text: true,
        }
    }
}

/// Exposure configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExposureConfig {
    /// Exposure length in seconds (0 = synchronization disabled)
    pub length_s: u16,
    /// Width of the trigger pulse
    pub trigger_pulse_ms: u32,
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            length_s: 0,
            trigger_pulse_ms: 10,
        }
    }
}

/// GPIO assignment
///
/// Informational; the board binds its pins statically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    pub gps_tx: u8,
    pub gps_rx: u8,
    pub pps: u8,
    pub trigger: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            gps_tx: 0,
            gps_rx: 1,
            pps: 2,
            trigger: 3,
        }
    }
}

/// Complete timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerConfig {
    pub gps: GpsConfig,
    pub exposure: ExposureConfig,
    pub pins: PinConfig,
}
