// src/payload.rs

//! Radio payload encoding.
//!
//! One archived reading is packed into exactly 8 bytes, two big-endian
//! 32-bit words, for the long-range uplink:
//!
//! | word             | 31-24       | 23-16 | 15-8    | 7-0           |
//! |------------------|-------------|-------|---------|---------------|
//! | `date_and_hours` | year - 2000 | month | day     | hour          |
//! | `time_and_temp`  | minute      | secs  | degrees | centi-degrees |
//!
//! The millennium digit of the year and everything past the second
//! fractional digit of the measurement are discarded; the receiving side
//! re-adds 2000. Any field wider than a byte truncates to its low byte —
//! an accepted precision loss of the format, not an error.

use core::fmt;

use crate::common::record::MeasurementRecord;

/// Size of the encoded uplink payload in bytes.
pub const PAYLOAD_LEN: usize = 8;

/// The measurement text was not `<digits>.<digits>` decimal text.
///
/// Extraction validates only the timestamp field, so a channel reading the
/// device could not take (`OverRange`, `NotYetSet`) surfaces here.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FormatError;

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "measurement is not <digits>.<digits> decimal text")
    }
}

/// The two packed words of one uplink payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EncodedPacket {
    pub date_and_hours: u32,
    pub time_and_temp: u32,
}

impl EncodedPacket {
    /// The 8-byte wire form: both words big-endian, `date_and_hours` first.
    pub fn to_bytes(&self) -> [u8; PAYLOAD_LEN] {
        let mut bytes = [0u8; PAYLOAD_LEN];
        bytes[..4].copy_from_slice(&self.date_and_hours.to_be_bytes());
        bytes[4..].copy_from_slice(&self.time_and_temp.to_be_bytes());
        bytes
    }

    pub fn from_bytes(bytes: [u8; PAYLOAD_LEN]) -> Self {
        EncodedPacket {
            date_and_hours: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            time_and_temp: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Unpacks the payload field by field, as the receiving side does,
    /// re-adding the millennium to the year.
    pub fn decode(&self) -> DecodedReading {
        let b = self.to_bytes();
        DecodedReading {
            year: 2000 + b[0] as u16,
            month: b[1],
            day: b[2],
            hour: b[3],
            minute: b[4],
            second: b[5],
            degrees: b[6],
            centidegrees: b[7],
        }
    }
}

/// A payload unpacked on the receiving side.
///
/// Only the integer part and first two fractional digits of the measurement
/// survive the encoding; further precision is lost by design.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DecodedReading {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub degrees: u8,
    pub centidegrees: u8,
}

/// Packs one measurement record into an uplink payload.
///
/// Deterministic and total over records whose measurement text satisfies the
/// decimal grammar; this is an invariant of extraction-produced records, so
/// a [`FormatError`] here indicates a record constructed around the
/// validator.
pub fn encode(record: &MeasurementRecord) -> Result<EncodedPacket, FormatError> {
    let (degrees, centidegrees) = split_measurement(&record.value)?;
    let ts = &record.timestamp;

    // The deployment is single-millennium: ship the low three digits of the
    // year and let the receiver re-add 2000.
    let year_byte = ts.year.wrapping_sub(2000) as u8;

    let date_and_hours = (u32::from(year_byte) << 24)
        | (u32::from(ts.month) << 16)
        | (u32::from(ts.day) << 8)
        | u32::from(ts.hour);

    let time_and_temp = (u32::from(ts.minute) << 24)
        | (u32::from(ts.second) << 16)
        | (u32::from(degrees) << 8)
        | u32::from(centidegrees);

    Ok(EncodedPacket {
        date_and_hours,
        time_and_temp,
    })
}

/// Splits `<digits>.<digits>` into (integer part, first two fractional
/// digits), each truncated to its low byte.
fn split_measurement(value: &str) -> Result<(u8, u8), FormatError> {
    let mut parts = value.split('.');
    let (whole, fraction) = match (parts.next(), parts.next(), parts.next()) {
        (Some(w), Some(f), None) => (w, f),
        _ => return Err(FormatError),
    };
    if whole.is_empty()
        || fraction.is_empty()
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(FormatError);
    }

    let leading = &fraction[..fraction.len().min(2)];
    Ok((decimal_byte(whole), decimal_byte(leading)))
}

/// The decimal value of a digit string, modulo 256 (the format's overflow
/// policy: no saturation, no rejection).
fn decimal_byte(digits: &str) -> u8 {
    digits
        .bytes()
        .fold(0u8, |acc, b| acc.wrapping_mul(10).wrapping_add(b - b'0'))
}
