//! Base64 VLQ coding of the numbers inside a mapping segment.
//!
//! Each segment of mapping data is a short list of signed 32-bit integers.
//! An integer is split into 6-bit records and every record becomes one
//! base64 character.  The first record of an integer carries the sign in
//! its lowest bit (1 = negative) followed by the low 4 magnitude bits;
//! every record uses bit 5 (0x20) as a continuation flag, and subsequent
//! records carry 5 more magnitude bits each.  Integers never share a
//! base64 character and there is no padding.

use crate::errors::{Error, Result};

const B64_CHARS: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const B64: [i8; 123] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 62, -1, -1,
    -1, 63, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, -1, -1, -1, -1, -1, -1, -1, 0, 1, 2, 3, 4, 5,
    6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, -1, -1, -1, -1,
    -1, -1, 26, 27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46,
    47, 48, 49, 50, 51,
];

// one past the largest magnitude an i32 can carry, reachable only by i32::MIN
const MAX_MAGNITUDE: u64 = 1 << 31;

enum StepError {
    BadChar(char),
    Overflow,
}

fn decode_base64(c: char) -> std::result::Result<u8, StepError> {
    let decoded = match u32::from(c) {
        idx if (idx as usize) < B64.len() => B64[idx as usize],
        _ => -1,
    };
    if decoded < 0 {
        return Err(StepError::BadChar(c));
    }
    Ok(decoded as u8)
}

fn encode_base64(six_bit: u8) -> char {
    debug_assert!(six_bit < 64);
    B64_CHARS[six_bit as usize] as char
}

/// Appends the base64 VLQ run for a single value to `out`.
pub fn encode_vlq(out: &mut String, value: i32) {
    // unsigned_abs so that i32::MIN does not overflow
    let mut magnitude = value.unsigned_abs();

    let mut record = ((magnitude & 0xf) << 1) as u8 | u8::from(value < 0);
    magnitude >>= 4;
    while magnitude != 0 {
        out.push(encode_base64(record | 0x20));
        record = (magnitude & 0x1f) as u8;
        magnitude >>= 5;
    }
    out.push(encode_base64(record));
}

/// Encodes a list of values as one concatenated base64 VLQ string.
pub fn encode_vlq_segment(values: &[i32]) -> String {
    let mut rv = String::new();
    for &value in values {
        encode_vlq(&mut rv, value);
    }
    rv
}

/// Decoder state between two base64 characters.
enum State {
    /// not in the middle of an integer
    Idle,
    /// partway through an integer's records
    Accumulating {
        negative: bool,
        magnitude: u64,
        shift: u32,
    },
}

impl State {
    fn step(&mut self, c: char) -> std::result::Result<Option<i32>, StepError> {
        let six_bit = decode_base64(c)?;
        let five_bit = u64::from(six_bit & 0x1f);
        let continuation = six_bit & 0x20 != 0;

        match *self {
            State::Idle => {
                let negative = six_bit & 1 != 0;
                // fast path: one record, up to 4 magnitude bits
                if !continuation {
                    let magnitude = (five_bit >> 1) as i32;
                    return Ok(Some(if negative { -magnitude } else { magnitude }));
                }
                *self = State::Accumulating {
                    negative,
                    magnitude: five_bit >> 1,
                    shift: 4,
                };
            }
            State::Accumulating {
                negative,
                magnitude,
                shift,
            } => {
                // records this far in cannot contribute to a 32-bit value
                if shift > 31 {
                    return Err(StepError::Overflow);
                }
                let magnitude = magnitude | (five_bit << shift);
                if magnitude > MAX_MAGNITUDE {
                    return Err(StepError::Overflow);
                }
                if !continuation {
                    *self = State::Idle;
                    let value = if negative {
                        -(magnitude as i64)
                    } else {
                        magnitude as i64
                    };
                    // positive 2^31 is not representable
                    return i32::try_from(value)
                        .map(Some)
                        .map_err(|_| StepError::Overflow);
                }
                *self = State::Accumulating {
                    negative,
                    magnitude,
                    shift: shift + 5,
                };
            }
        }
        Ok(None)
    }
}

/// Decodes a base64 VLQ string into the values it carries.
///
/// The string must end on an integer boundary; running out of characters
/// mid-integer, or accumulating a magnitude that does not fit in 32 bits,
/// fails with `Error::VlqUnterminated` reporting the input and the values
/// decoded up to that point.  An empty string decodes to no values.
pub fn decode_vlq_segment(vlq: &str) -> Result<Vec<i32>> {
    let mut state = State::Idle;
    let mut values = vec![];

    for c in vlq.chars() {
        match state.step(c) {
            Ok(Some(value)) => values.push(value),
            Ok(None) => {}
            Err(StepError::BadChar(c)) => return Err(Error::InvalidBase64(c)),
            Err(StepError::Overflow) => {
                return Err(Error::VlqUnterminated {
                    vlq: vlq.to_string(),
                    values,
                })
            }
        }
    }

    if let State::Accumulating { .. } = state {
        return Err(Error::VlqUnterminated {
            vlq: vlq.to_string(),
            values,
        });
    }
    Ok(values)
}
