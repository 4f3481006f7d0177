//! Binary protocol: TSIP primary timing packet (0x8F-AB)
//!
//! Packets are framed by `DLE <id>` ... `DLE ETX`. A DLE inside the packet
//! body is sent twice; the pair collapses to a single data byte.
//!
//! Layout of the de-stuffed 21-byte timing packet:
//!
//! | Offset | Field                          |
//! |--------|--------------------------------|
//! | 0..3   | DLE, 0x8F, 0xAB                |
//! | 3..7   | GPS time of week               |
//! | 7..9   | GPS week                       |
//! | 9..11  | UTC offset                     |
//! | 11     | Timing flags (0x03 = locked)   |
//! | 12     | Seconds                        |
//! | 13     | Minutes                        |
//! | 14     | Hours                          |
//! | 15     | Day of month                   |
//! | 16     | Month                          |
//! | 17..19 | Year, big-endian               |
//! | 19..21 | DLE, ETX                       |

use heapless::Vec;

use crate::error::DecodeError;
use crate::timestamp::Timestamp;

/// Data link escape / frame marker
pub const DLE: u8 = 0x10;

/// End of text, second byte of the packet terminator
pub const ETX: u8 = 0x03;

/// Packet id of the timing superpacket
pub const TIMING_PACKET_ID: u8 = 0x8F;

/// Sub-code of the primary timing packet
pub const TIMING_SUBCODE: u8 = 0xAB;

/// De-stuffed length of the primary timing packet
pub const TIMING_PACKET_LEN: usize = 21;

/// Timing flags value reported while the receiver has a fix
pub const LOCKED_FLAGS: u8 = 0x03;

/// Preamble the decoder seeds a new packet with
pub const PREAMBLE: [u8; 3] = [DLE, TIMING_PACKET_ID, TIMING_SUBCODE];

const FLAGS: usize = 11;
const SECONDS: usize = 12;
const MINUTES: usize = 13;
const HOURS: usize = 14;
const DAY: usize = 15;
const MONTH: usize = 16;
const YEAR: usize = 17;

/// Collapses doubled DLE bytes
///
/// A DLE that follows an unpaired DLE is padding and is dropped. The pair
/// state is cleared by the dropped byte, so three DLEs in a row yield a data
/// DLE followed by a frame-marker DLE.
#[derive(Debug, Clone, Copy, Default)]
pub struct Destuffer {
    unpaired_dle: bool,
}

impl Destuffer {
    pub const fn new() -> Self {
        Self {
            unpaired_dle: false,
        }
    }

    pub fn reset(&mut self) {
        self.unpaired_dle = false;
    }

    /// Returns the byte to store, or `None` for a padding DLE
    pub fn accept(&mut self, byte: u8) -> Option<u8> {
        if byte == DLE && self.unpaired_dle {
            self.unpaired_dle = false;
            return None;
        }
        self.unpaired_dle = byte == DLE;
        Some(byte)
    }
}

/// Decode a complete, de-stuffed timing packet
pub fn decode_timing_packet(packet: &[u8]) -> Result<Timestamp, DecodeError> {
    if packet.len() != TIMING_PACKET_LEN
        || packet[TIMING_PACKET_LEN - 2] != DLE
        || packet[TIMING_PACKET_LEN - 1] != ETX
    {
        return Err(DecodeError::malformed(packet));
    }

    Ok(Timestamp {
        hours: packet[HOURS],
        minutes: packet[MINUTES],
        seconds: packet[SECONDS],
        day: packet[DAY],
        month: packet[MONTH],
        year: u16::from_be_bytes([packet[YEAR], packet[YEAR + 1]]),
        locked: packet[FLAGS] == LOCKED_FLAGS,
    })
}

/// Maximum wire size of a timing packet: every body byte could be a DLE
pub const MAX_ENCODED_LEN: usize = PREAMBLE.len() + 2 * (TIMING_PACKET_LEN - 5) + 2;

/// Encode a timing packet as it appears on the wire (for testing or simulation)
pub fn encode_timing_packet(ts: &Timestamp) -> Vec<u8, MAX_ENCODED_LEN> {
    let mut body = [0u8; TIMING_PACKET_LEN - 5];
    let offset = PREAMBLE.len();
    body[FLAGS - offset] = if ts.locked { LOCKED_FLAGS } else { 0x00 };
    body[SECONDS - offset] = ts.seconds;
    body[MINUTES - offset] = ts.minutes;
    body[HOURS - offset] = ts.hours;
    body[DAY - offset] = ts.day;
    body[MONTH - offset] = ts.month;
    body[YEAR - offset..YEAR - offset + 2].copy_from_slice(&ts.year.to_be_bytes());

    let mut wire = Vec::new();
    // Capacity covers the worst case, pushes cannot fail
    let _ = wire.extend_from_slice(&PREAMBLE);
    for &b in &body {
        let _ = wire.push(b);
        if b == DLE {
            let _ = wire.push(DLE);
        }
    }
    let _ = wire.extend_from_slice(&[DLE, ETX]);
    wire
}
