// src/common/timestamp.rs

use core::fmt;
use core::str::FromStr;

use alloc::string::{String, ToString};

// --- DT80 record timestamp ---

/// A calendar timestamp in the device's record format:
/// `YYYY/MM/DD HH:MM:SS.fff`.
///
/// Numeric fields are range-checked only by their integer width; the device
/// is trusted for calendar validity. The sub-second fraction is kept as the
/// original digit text (the wire encoding never uses it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Sub-second digits, verbatim (e.g. `"000"`).
    pub fraction: String,
}

/// Returns true iff `text` is in the device's record timestamp format.
///
/// This is the single source of truth for "is this a data row": the CSV
/// header of a `copyd` response is filtered out precisely because its first
/// field fails this check. Grammar only — every component must be digit-only
/// in its expected position, with no further range checking.
pub fn is_valid_timestamp(text: &str) -> bool {
    split_fields(text).is_some()
}

/// Splits `YYYY/MM/DD HH:MM:SS.fff` into its seven digit fields, or `None`
/// if the grammar does not match.
fn split_fields(text: &str) -> Option<[&str; 7]> {
    let mut halves = text.split_whitespace();
    let date = halves.next()?;
    let time = halves.next()?;
    if halves.next().is_some() {
        return None;
    }

    let mut date_fields = date.split('/');
    let (year, month, day) = match (
        date_fields.next(),
        date_fields.next(),
        date_fields.next(),
        date_fields.next(),
    ) {
        (Some(y), Some(m), Some(d), None) => (y, m, d),
        _ => return None,
    };

    let mut time_fields = time.split(':');
    let (hour, minute, seconds) = match (
        time_fields.next(),
        time_fields.next(),
        time_fields.next(),
        time_fields.next(),
    ) {
        (Some(h), Some(m), Some(s), None) => (h, m, s),
        _ => return None,
    };

    let mut sec_fields = seconds.split('.');
    let (whole, fraction) = match (sec_fields.next(), sec_fields.next(), sec_fields.next()) {
        (Some(w), Some(f), None) => (w, f),
        _ => return None,
    };

    let fields = [year, month, day, hour, minute, whole, fraction];
    if fields
        .iter()
        .all(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
    {
        Some(fields)
    } else {
        None
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [year, month, day, hour, minute, whole, fraction] =
            split_fields(s).ok_or(TimestampParseError::InvalidFormat)?;

        let parse_u8 = |f: &str| u8::from_str(f).map_err(|_| TimestampParseError::FieldOverflow);

        Ok(Timestamp {
            year: u16::from_str(year).map_err(|_| TimestampParseError::FieldOverflow)?,
            month: parse_u8(month)?,
            day: parse_u8(day)?,
            hour: parse_u8(hour)?,
            minute: parse_u8(minute)?,
            second: parse_u8(whole)?,
            fraction: fraction.to_string(),
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}/{:02}/{:02} {:02}:{:02}:{:02}.{}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.fraction
        )
    }
}

/// Error during parsing of a device timestamp.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TimestampParseError {
    /// The text does not match the `YYYY/MM/DD HH:MM:SS.fff` grammar.
    InvalidFormat,
    /// A digit field is grammatically valid but too large for its width.
    FieldOverflow,
}

impl fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampParseError::InvalidFormat => {
                write!(f, "text is not in DT80 timestamp format")
            }
            TimestampParseError::FieldOverflow => {
                write!(f, "timestamp field out of range for its width")
            }
        }
    }
}
