//! Configuration loading
//!
//! `timer.toml` is embedded at compile time (and validated by the build
//! script). It is parsed once at boot with the core's no-alloc parser.

use defmt::*;

use exposync_core::config::{parse_config, TimerConfig};

/// Embedded configuration
/// Edit timer.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../timer.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> TimerConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration");
            config
        }
        Err(e) => {
            // Only reachable if timer.toml changed without a rebuild check
            error!("timer.toml line {}: {:?}", e.line, e.kind);
            error!("Using default configuration");
            TimerConfig::default()
        }
    }
}
