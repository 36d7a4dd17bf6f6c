//! DT80 command definitions.
//!
//! The host port speaks a line-oriented text protocol; the two commands this
//! crate issues are `listd` (list configured acquisition jobs) and
//! `copyd archive=y start=<time>` (unload archived records from a start
//! time, inclusive). Both are CRLF-terminated on the wire.

use core::fmt::{self, Write};

use arrayvec::ArrayString;

use super::error::Dt80Error;

/// Maximum length of a formatted command, CRLF included.
pub const COMMAND_MAX_LEN: usize = 64;

/// Maximum length of a `copyd` start-time literal (`YYYY-MM-DDTHH:MM:SS.fff`).
pub const START_TIME_MAX_LEN: usize = 23;

/// Error rendering a command into its wire form.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CommandFormatError(pub &'static str);

impl fmt::Display for CommandFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// The tag a command resolves to at send time.
///
/// Response classification dispatches on this tag rather than re-matching
/// the command text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CommandKind {
    ListJobs,
    CopyData,
}

/// A `copyd` start-time literal, validated at construction.
///
/// The device accepts an ISO-8601-style timestamp such as
/// `2018-08-29T16:00:00.000`. Every date/time component must be digit-only;
/// anything else is rejected before it can reach the wire.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StartTime(ArrayString<START_TIME_MAX_LEN>);

impl StartTime {
    pub fn new(literal: &str) -> Result<Self, Dt80Error> {
        if !Self::is_valid_literal(literal) {
            return Err(Dt80Error::InvalidStartTime);
        }
        ArrayString::from(literal)
            .map(StartTime)
            .map_err(|_| Dt80Error::InvalidStartTime)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid_literal(literal: &str) -> bool {
        let mut halves = literal.split('T');
        let (date, time) = match (halves.next(), halves.next(), halves.next()) {
            (Some(d), Some(t), None) => (d, t),
            _ => return false,
        };

        let mut date_fields = date.split('-');
        for _ in 0..3 {
            match date_fields.next() {
                Some(f) if !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()) => {}
                _ => return false,
            }
        }
        if date_fields.next().is_some() {
            return false;
        }

        let mut time_fields = time.split(':');
        let (hour, minute, seconds) =
            match (time_fields.next(), time_fields.next(), time_fields.next()) {
                (Some(h), Some(m), Some(s)) if time_fields.next().is_none() => (h, m, s),
                _ => return false,
            };
        if hour.is_empty() || !hour.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        if minute.is_empty() || !minute.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }

        let mut sec_fields = seconds.split('.');
        match (sec_fields.next(), sec_fields.next(), sec_fields.next()) {
            (Some(whole), Some(frac), None) => {
                !whole.is_empty()
                    && !frac.is_empty()
                    && whole.bytes().all(|b| b.is_ascii_digit())
                    && frac.bytes().all(|b| b.is_ascii_digit())
            }
            _ => false,
        }
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a DT80 host-port command.
///
/// The `Display` implementation renders the command text without its
/// terminator; [`Command::format_into`] appends the CRLF the device expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the acquisition jobs currently configured on the device.
    ListJobs,

    /// Unload records logged at or after `start`, in CSV form with a header
    /// row. `archive: true` includes records already written to archive
    /// files.
    CopyData { archive: bool, start: StartTime },
}

impl Command {
    /// Returns the tag used to select the response parser.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::ListJobs => CommandKind::ListJobs,
            Command::CopyData { .. } => CommandKind::CopyData,
        }
    }

    /// Renders the CRLF-terminated wire form of the command.
    pub fn format_into(&self) -> Result<ArrayString<COMMAND_MAX_LEN>, CommandFormatError> {
        let mut buffer = ArrayString::new();
        write!(buffer, "{}\r\n", self)
            .map_err(|_| CommandFormatError("command exceeds wire buffer"))?;
        Ok(buffer)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ListJobs => f.write_str("listd"),
            Command::CopyData { archive, start } => {
                let flag = if *archive { 'y' } else { 'n' };
                write!(f, "copyd archive={} start={}", flag, start)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write; // Import the Write trait
    use heapless::String as HeaplessString;

    fn start(s: &str) -> StartTime {
        StartTime::new(s).unwrap()
    }

    #[test]
    fn test_command_formatting() {
        let cmd = Command::ListJobs;
        assert_eq!(cmd.format_into().unwrap().as_str(), "listd\r\n");

        let cmd = Command::CopyData {
            archive: true,
            start: start("2018-08-29T16:00:00.000"),
        };
        assert_eq!(
            cmd.format_into().unwrap().as_str(),
            "copyd archive=y start=2018-08-29T16:00:00.000\r\n"
        );

        let cmd = Command::CopyData {
            archive: false,
            start: start("2018-08-29T16:00:00.000"),
        };
        assert_eq!(
            cmd.format_into().unwrap().as_str(),
            "copyd archive=n start=2018-08-29T16:00:00.000\r\n"
        );
    }

    #[test]
    fn test_display_has_no_terminator() {
        let mut output = HeaplessString::<64>::new();
        write!(output, "{}", Command::ListJobs).unwrap();
        assert_eq!(output.as_str(), "listd");
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_command_kind() {
        assert_eq!(Command::ListJobs.kind(), CommandKind::ListJobs);
        let cmd = Command::CopyData {
            archive: true,
            start: start("2018-08-29T16:00:00.000"),
        };
        assert_eq!(cmd.kind(), CommandKind::CopyData);
    }

    #[test]
    fn test_valid_start_times() {
        assert!(StartTime::new("2018-08-29T16:00:00.000").is_ok());
        assert!(StartTime::new("2020-01-01T00:00:00.5").is_ok());
    }

    #[test]
    fn test_invalid_start_times() {
        // wrong date separator
        assert!(matches!(
            StartTime::new("2018/08/29T16:00:00.000"),
            Err(Dt80Error::InvalidStartTime)
        ));
        // missing 'T'
        assert!(StartTime::new("2018-08-29 16:00:00.000").is_err());
        // non-digit field
        assert!(StartTime::new("2018-08-2aT16:00:00.000").is_err());
        // missing fraction
        assert!(StartTime::new("2018-08-29T16:00:00").is_err());
        // too many date fields
        assert!(StartTime::new("2018-08-29-01T16:00:00.000").is_err());
        // too long for the wire buffer
        assert!(StartTime::new("2018-08-29T16:00:00.000000000").is_err());
    }
}
