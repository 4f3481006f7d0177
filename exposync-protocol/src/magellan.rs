//! Text protocol: Magellan `$$A` time and `$$H` status sentences
//!
//! Sentences have a fixed length per type and end with a checksum byte and a
//! line feed. The checksum is the XOR of the payload bytes between the type
//! code and the checksum.
//!
//! Time sentence (13 bytes):
//! `$ $ A <rsvd> <hour> <min> <sec> <day> <month> <year_hi> <year_lo> <cks> LF`
//!
//! Status sentence (16 bytes):
//! `$ $ H <10 status bytes> <fix mode> <cks> LF`, fix mode 6 means locked.
//!
//! Dates in the time sentence use a shifted epoch, see [`crate::epoch`].

use heapless::Vec;

use crate::epoch::correct_epoch;
use crate::error::{raw_copy, DecodeError};
use crate::timestamp::Timestamp;

/// Sentence start marker, sent twice
pub const SENTENCE_MARKER: u8 = b'$';

/// Sentence terminator
pub const LF: u8 = 0x0A;

/// Type code of the time sentence
pub const TIME_CODE: u8 = b'A';

/// Type code of the status sentence
pub const STATUS_CODE: u8 = b'H';

/// Length of the time sentence
pub const TIME_SENTENCE_LEN: usize = 13;

/// Length of the status sentence
pub const STATUS_SENTENCE_LEN: usize = 16;

/// Fix mode reported while the receiver is locked
pub const STATUS_LOCKED: u8 = 6;

/// Offset of the type code
const TYPE: usize = 2;
/// First payload byte covered by the checksum
const PAYLOAD: usize = 3;

const HOURS: usize = 4;
const MINUTES: usize = 5;
const SECONDS: usize = 6;
const DAY: usize = 7;
const MONTH: usize = 8;
const YEAR: usize = 9;
const FIX_MODE: usize = 13;

/// XOR of the bytes between the type code and the checksum byte
///
/// `sentence` is the complete sentence including terminator.
pub fn checksum(sentence: &[u8]) -> u8 {
    let end = sentence.len().saturating_sub(2);
    sentence
        .get(PAYLOAD..end)
        .unwrap_or(&[])
        .iter()
        .fold(0, |acc, &b| acc ^ b)
}

/// Check the terminator and checksum of a complete sentence
pub fn validate(sentence: &[u8]) -> Result<(), DecodeError> {
    if sentence.len() <= PAYLOAD || sentence[sentence.len() - 1] != LF {
        return Err(DecodeError::malformed(sentence));
    }

    let computed = checksum(sentence);
    let received = sentence[sentence.len() - 2];
    if computed != received {
        return Err(DecodeError::ChecksumMismatch {
            computed,
            received,
            raw: raw_copy(sentence),
        });
    }
    Ok(())
}

/// Decode a time sentence
///
/// The receiver's lock state is not part of this sentence; `locked` is the
/// last value reported by a status sentence.
pub fn decode_time(sentence: &[u8], locked: bool) -> Result<Timestamp, DecodeError> {
    if sentence.len() != TIME_SENTENCE_LEN || sentence[TYPE] != TIME_CODE {
        return Err(DecodeError::malformed(sentence));
    }
    validate(sentence)?;

    let year = u16::from_be_bytes([sentence[YEAR], sentence[YEAR + 1]]);
    let date = correct_epoch(sentence[DAY], sentence[MONTH], year)
        .ok_or_else(|| DecodeError::InvalidDate(raw_copy(sentence)))?;

    Ok(Timestamp {
        hours: sentence[HOURS],
        minutes: sentence[MINUTES],
        seconds: sentence[SECONDS],
        day: date.day,
        month: date.month,
        year: date.year,
        locked,
    })
}

/// Decode a status sentence, returning the locked flag
pub fn decode_status(sentence: &[u8]) -> Result<bool, DecodeError> {
    if sentence.len() != STATUS_SENTENCE_LEN || sentence[TYPE] != STATUS_CODE {
        return Err(DecodeError::malformed(sentence));
    }
    validate(sentence)?;
    Ok(sentence[FIX_MODE] == STATUS_LOCKED)
}

/// Raw (uncorrected) fields of a time sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTime {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

/// Encode a time sentence (for testing or simulation)
pub fn encode_time_sentence(raw: &RawTime) -> Vec<u8, TIME_SENTENCE_LEN> {
    let [year_hi, year_lo] = raw.year.to_be_bytes();
    let mut sentence = [
        SENTENCE_MARKER,
        SENTENCE_MARKER,
        TIME_CODE,
        0,
        raw.hours,
        raw.minutes,
        raw.seconds,
        raw.day,
        raw.month,
        year_hi,
        year_lo,
        0,
        LF,
    ];
    sentence[TIME_SENTENCE_LEN - 2] = checksum(&sentence);
    Vec::from_slice(&sentence).unwrap_or_default()
}

/// Encode a status sentence (for testing or simulation)
pub fn encode_status_sentence(locked: bool) -> Vec<u8, STATUS_SENTENCE_LEN> {
    let mut sentence = [0u8; STATUS_SENTENCE_LEN];
    sentence[0] = SENTENCE_MARKER;
    sentence[1] = SENTENCE_MARKER;
    sentence[TYPE] = STATUS_CODE;
    sentence[FIX_MODE] = if locked { STATUS_LOCKED } else { 3 };
    sentence[STATUS_SENTENCE_LEN - 1] = LF;
    sentence[STATUS_SENTENCE_LEN - 2] = checksum(&sentence);
    Vec::from_slice(&sentence).unwrap_or_default()
}
