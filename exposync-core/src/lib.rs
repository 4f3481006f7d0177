//! Board-agnostic core logic for the GPS exposure timing unit
//!
//! This crate contains everything between the serial port and the camera
//! trigger line that does not depend on specific hardware:
//!
//! - Byte ring buffers shared between interrupt and main-loop context
//! - GPS link state and the serial silence watchdog
//! - Exposure countdown controller driven by PPS edges and timestamps
//! - Device context holding all cross-interrupt state behind critical sections
//! - GPS processing engine (the main-loop side of the receiver link)
//! - Exposure trigger output
//! - Configuration types and the embedded config parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod countdown;
pub mod diagnostics;
pub mod engine;
pub mod link;
pub mod ring;
pub mod trigger;
pub mod watchdog;

pub use config::{parse_config, ConfigError, TimerConfig};
pub use context::{DeviceContext, Publication, Snapshot};
pub use countdown::{Countdown, CountdownMode, ExposureWindow};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use engine::{GpsEngine, Processed};
pub use link::LinkState;
pub use ring::{RingBuffer, RingError};
pub use trigger::TriggerOutput;
pub use watchdog::LinkWatchdog;
