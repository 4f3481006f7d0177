//! Configuration
//!
//! Typed configuration plus a minimal TOML-subset parser that needs no
//! allocator.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ConfigError, ConfigErrorKind};
pub use types::*;
