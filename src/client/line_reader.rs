// src/client/line_reader.rs

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use crate::common::error::Dt80Error;
use crate::common::hal_traits::{Dt80Serial, Dt80Timer};

/// Assembles newline-terminated text lines from a byte-at-a-time serial
/// link.
///
/// The DT80 offers no framing beyond newlines and no flow control; bytes
/// trickle in on the device's schedule. The reader polls the link, sleeping
/// [`poll_interval`](LineReader::new) between attempts, and returns each
/// line decoded as UTF-8 with its trailing `\r\n`/`\n` stripped. A line that
/// has started is always read to its newline — the reader never returns a
/// truncated line.
pub struct LineReader<'a, IF>
where
    IF: Dt80Serial + Dt80Timer,
{
    link: &'a mut IF,
    poll_interval: Duration,
}

impl<'a, IF> LineReader<'a, IF>
where
    IF: Dt80Serial + Dt80Timer,
{
    pub fn new(link: &'a mut IF, poll_interval: Duration) -> Self {
        LineReader {
            link,
            poll_interval,
        }
    }

    /// Reads one line, waiting indefinitely until its newline arrives.
    ///
    /// This is the lockstep request/response discipline: the caller knows a
    /// line is coming and is willing to wait for it.
    pub fn read_line(&mut self) -> Result<String, Dt80Error<IF::Error>> {
        loop {
            if let Some(line) = self.read_line_inner(None)? {
                return Ok(line);
            }
        }
    }

    /// Reads one line in batch mode: if no byte arrives for `idle_timeout`
    /// while between lines, the response is considered fully drained and
    /// `Ok(None)` is returned.
    ///
    /// Mid-line the idle timeout does not apply — the device is still
    /// transmitting and the newline is waited for.
    pub fn read_line_idle(
        &mut self,
        idle_timeout: Duration,
    ) -> Result<Option<String>, Dt80Error<IF::Error>> {
        self.read_line_inner(Some(idle_timeout))
    }

    fn read_line_inner(
        &mut self,
        idle_timeout: Option<Duration>,
    ) -> Result<Option<String>, Dt80Error<IF::Error>> {
        let mut raw: Vec<u8> = Vec::new();
        let mut idle = Duration::ZERO;

        loop {
            match self.link.read_byte() {
                Ok(byte) => {
                    idle = Duration::ZERO;
                    if byte == b'\n' {
                        if raw.last() == Some(&b'\r') {
                            raw.pop();
                        }
                        return String::from_utf8(raw)
                            .map(Some)
                            .map_err(|e| Dt80Error::Decode(e.utf8_error()));
                    }
                    raw.push(byte);
                }
                Err(nb::Error::WouldBlock) => {
                    if raw.is_empty() {
                        if let Some(limit) = idle_timeout {
                            if idle >= limit {
                                return Ok(None);
                            }
                        }
                    }
                    self.link.delay(self.poll_interval);
                    idle += self.poll_interval;
                }
                Err(nb::Error::Other(e)) => return Err(Dt80Error::Io(e)),
            }
        }
    }
}
