//! GPS Receiver Serial Protocols
//!
//! This crate turns the raw byte stream of the timing GPS receiver into
//! timestamps. Two receiver families are supported, each with a single fixed
//! packet shape:
//!
//! ```text
//! Binary (TSIP primary timing packet, DLE-stuffed, 21 bytes after de-stuffing)
//! ┌─────┬──────┬──────┬──────────────────────────────────────┬─────┬─────┐
//! │ DLE │ 0x8F │ 0xAB │ TOW, week, offset, flags, h/m/s, date │ DLE │ ETX │
//! └─────┴──────┴──────┴──────────────────────────────────────┴─────┴─────┘
//!
//! Text (Magellan, 13 or 16 bytes)
//! ┌─────┬─────┬──────┬──────────────┬──────────┬────┐
//! │ '$' │ '$' │ TYPE │ PAYLOAD      │ CHECKSUM │ LF │
//! └─────┴─────┴──────┴──────────────┴──────────┴────┘
//! ```
//!
//! Neither stream has framing guarantees. [`PacketSync`] scans for a preamble,
//! [`GpsDecoder`] accumulates and validates exactly one packet at a time.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod decoder;
pub mod epoch;
pub mod error;
pub mod init;
pub mod magellan;
pub mod packet;
pub mod sync;
pub mod timestamp;
pub mod tsip;

pub use decoder::{GpsDecoder, GpsEvent};
pub use epoch::{correct_epoch, days_in_month, is_leap_year, CalendarDate};
pub use error::DecodeError;
pub use packet::{Packet, PacketKind, RawPacket, MAX_PACKET_SIZE};
pub use sync::{PacketSync, SyncOutcome};
pub use timestamp::Timestamp;
