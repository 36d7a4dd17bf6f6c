// src/client/mod.rs

//! The synchronous protocol client.
//!
//! One command/response exchange at a time: format the command, write it
//! CRLF-terminated, wait the command-specific settle delay, then drain
//! lines with inter-line pacing until the link goes idle. Classification
//! and extraction run over the fully drained batch; scaffolding and
//! malformed rows are simply absent from the result, never errors.

pub mod line_reader;

pub use line_reader::LineReader;

use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use crate::common::command::{Command, CommandKind, StartTime};
use crate::common::error::Dt80Error;
use crate::common::hal_traits::{Dt80Serial, Dt80Timer};
use crate::common::record::{JobDescriptor, MeasurementRecord};
use crate::common::response::{extract_jobs, extract_measurements, DEFAULT_CHANNEL};
use crate::common::timing;

/// The client's delay policy.
///
/// The device has no flow control, so draining is paced by delays rather
/// than acknowledgements. Defaults come from [`crate::common::timing`];
/// every value is injectable so tests can run against zero-latency fakes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ClientTiming {
    /// Wait after sending `listd` before the first read.
    pub listd_settle: Duration,
    /// Wait after sending `copyd` before the first read.
    pub copyd_settle: Duration,
    /// Pause after each drained `listd` line.
    pub listd_inter_line: Duration,
    /// Pause after each drained `copyd` line.
    pub copyd_inter_line: Duration,
    /// Poll interval while waiting for a byte.
    pub poll_interval: Duration,
    /// Quiet period between lines that ends the drain.
    pub idle_timeout: Duration,
}

impl Default for ClientTiming {
    fn default() -> Self {
        ClientTiming {
            listd_settle: timing::LISTD_SETTLE_DELAY,
            copyd_settle: timing::COPYD_SETTLE_DELAY,
            listd_inter_line: timing::LISTD_INTER_LINE_DELAY,
            copyd_inter_line: timing::COPYD_INTER_LINE_DELAY,
            poll_interval: timing::IDLE_POLL_INTERVAL,
            idle_timeout: timing::RESPONSE_IDLE_TIMEOUT,
        }
    }
}

impl ClientTiming {
    /// All-zero delays: drain exactly what is already buffered. Intended for
    /// simulators and tests where the peer responds instantly.
    pub fn immediate() -> Self {
        ClientTiming {
            listd_settle: Duration::ZERO,
            copyd_settle: Duration::ZERO,
            listd_inter_line: Duration::ZERO,
            copyd_inter_line: Duration::ZERO,
            poll_interval: Duration::ZERO,
            idle_timeout: Duration::ZERO,
        }
    }

    fn settle_delay(&self, kind: CommandKind) -> Duration {
        match kind {
            CommandKind::ListJobs => self.listd_settle,
            CommandKind::CopyData => self.copyd_settle,
        }
    }

    fn inter_line_delay(&self, kind: CommandKind) -> Duration {
        match kind {
            CommandKind::ListJobs => self.listd_inter_line,
            CommandKind::CopyData => self.copyd_inter_line,
        }
    }
}

/// Where the client is within one command issuance.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ExchangeState {
    Idle,
    CommandSent,
    Draining,
}

/// Represents a DT80 protocol client for synchronous operations.
///
/// Owns the transport exclusively: exchanges are never pipelined, and once
/// a command is sent the response is always fully drained — there is no
/// mid-drain abort.
#[derive(Debug)]
pub struct Dt80Client<IF>
where
    IF: Dt80Serial + Dt80Timer,
{
    interface: IF,
    timing: ClientTiming,
    channel: usize,
    state: ExchangeState,
}

impl<IF> Dt80Client<IF>
where
    IF: Dt80Serial + Dt80Timer,
{
    pub fn new(interface: IF) -> Self {
        Dt80Client {
            interface,
            timing: ClientTiming::default(),
            channel: DEFAULT_CHANNEL,
            state: ExchangeState::Idle,
        }
    }

    /// Replaces the delay policy.
    pub fn with_timing(mut self, timing: ClientTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Selects which CSV column `copy_records` forwards
    /// ([`DEFAULT_CHANNEL`] if unset).
    pub fn with_channel(mut self, channel: usize) -> Self {
        self.channel = channel;
        self
    }

    /// Releases the transport handle.
    pub fn into_inner(self) -> IF {
        self.interface
    }

    // --- Public Blocking Methods ---

    /// Issues `listd` and returns the configured acquisition jobs.
    ///
    /// An empty or entirely malformed response yields an empty vector; the
    /// caller may retry at its own cadence.
    pub fn list_jobs(&mut self) -> Result<Vec<JobDescriptor>, Dt80Error<IF::Error>> {
        let lines = self.execute(&Command::ListJobs)?;
        Ok(extract_jobs(lines.iter().map(String::as_str)))
    }

    /// Issues `copyd` and returns the records logged at or after `start`
    /// (inclusive), one per CSV data row, carrying the configured channel.
    pub fn copy_records(
        &mut self,
        archive: bool,
        start: StartTime,
    ) -> Result<Vec<MeasurementRecord>, Dt80Error<IF::Error>> {
        let lines = self.execute(&Command::CopyData { archive, start })?;
        Ok(extract_measurements(
            lines.iter().map(String::as_str),
            self.channel,
        ))
    }

    // --- Core Exchange Logic (Private) ---

    fn execute(&mut self, command: &Command) -> Result<Vec<String>, Dt80Error<IF::Error>> {
        debug_assert_eq!(self.state, ExchangeState::Idle);
        let result = self.run_exchange(command);
        self.state = ExchangeState::Idle;
        result
    }

    fn run_exchange(&mut self, command: &Command) -> Result<Vec<String>, Dt80Error<IF::Error>> {
        let wire = command.format_into().map_err(Dt80Error::CommandFormat)?;
        let kind = command.kind();

        self.send_command_bytes(wire.as_bytes())?;
        self.state = ExchangeState::CommandSent;

        // No flow control: give the device time to start responding.
        self.interface.delay(self.timing.settle_delay(kind));

        self.state = ExchangeState::Draining;
        self.drain_lines(kind)
    }

    fn send_command_bytes(&mut self, cmd_bytes: &[u8]) -> Result<(), Dt80Error<IF::Error>> {
        for byte in cmd_bytes {
            self.blocking_io(|iface| iface.write_byte(*byte))?;
        }
        self.blocking_io(|iface| iface.flush())
    }

    fn drain_lines(&mut self, kind: CommandKind) -> Result<Vec<String>, Dt80Error<IF::Error>> {
        let pace = self.timing.inter_line_delay(kind);
        let mut lines = Vec::new();
        loop {
            let next = LineReader::new(&mut self.interface, self.timing.poll_interval)
                .read_line_idle(self.timing.idle_timeout)?;
            match next {
                Some(line) => {
                    lines.push(line);
                    self.interface.delay(pace);
                }
                None => return Ok(lines),
            }
        }
    }

    /// Runs a non-blocking I/O operation until it stops returning
    /// `WouldBlock`.
    fn blocking_io<FN, T>(&mut self, mut f: FN) -> Result<T, Dt80Error<IF::Error>>
    where
        FN: FnMut(&mut IF) -> nb::Result<T, IF::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    self.interface.delay(self.timing.poll_interval);
                }
                Err(nb::Error::Other(e)) => return Err(Dt80Error::Io(e)),
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    // --- Mock Comm Error ---
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockCommError;

    // --- Mock Interface ---
    struct MockInterface {
        read_queue: Vec<u8>,
        read_pos: usize,
        write_log: Vec<u8>,
        flush_count: u32,
        slept_ms: u64,
    }

    impl MockInterface {
        fn new() -> Self {
            MockInterface {
                read_queue: Vec::new(),
                read_pos: 0,
                write_log: Vec::new(),
                flush_count: 0,
                slept_ms: 0,
            }
        }

        fn stage_read_data(&mut self, data: &[u8]) {
            self.read_queue = data.to_vec();
            self.read_pos = 0;
        }
    }

    impl Dt80Serial for MockInterface {
        type Error = MockCommError;

        fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
            if self.read_pos < self.read_queue.len() {
                let byte = self.read_queue[self.read_pos];
                self.read_pos += 1;
                Ok(byte)
            } else {
                Err(nb::Error::WouldBlock)
            }
        }

        fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
            self.write_log.push(byte);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            self.flush_count += 1;
            Ok(())
        }
    }

    impl Dt80Timer for MockInterface {
        fn delay_us(&mut self, us: u32) {
            self.slept_ms += (us as u64) / 1000;
        }
        fn delay_ms(&mut self, ms: u32) {
            self.slept_ms += ms as u64;
        }
    }

    const LISTD_RESPONSE: &[u8] = b"listd\r\n \
Job      Sch Type       Ov Lg Go  Recs      Capacity  First                Last                 File\r\n \
======== === ========== == == ==  ========  ========  ===================  ===================  ====\r\n\
*CONFIG   A   Data  Live Y  Y  Y       2380    249660  2018-08-09 10:30:00  2018-09-04 17:20:00  B:\\JOBS\\CONFIG\\A\\DATA_A.DBD\r\nDT80>\r\n";

    const COPYD_RESPONSE: &[u8] = b"DT80> \"Timestamp\",\"TZ\",\"T3 TC_1B (degC)\",\"T3 TC_1P (degC)\"\r\n\
2018/09/04 16:40:00.000,n,22.703516,OverRange\r\n\
2018/09/04 16:50:00.000,n,24.045942,OverRange\r\nUnload complete.\r\n";

    fn start() -> StartTime {
        StartTime::new("2018-08-29T16:00:00.000").unwrap()
    }

    #[test]
    fn test_list_jobs_end_to_end() {
        let mut interface = MockInterface::new();
        interface.stage_read_data(LISTD_RESPONSE);
        let mut client = Dt80Client::new(interface);

        let jobs = client.list_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].path, r"B:\JOBS\CONFIG\A\DATA_A.DBD");

        assert_eq!(&client.interface.write_log, b"listd\r\n");
        assert_eq!(client.interface.flush_count, 1);
        assert_eq!(client.state, ExchangeState::Idle);
    }

    #[test]
    fn test_list_jobs_observes_settle_delay() {
        let mut interface = MockInterface::new();
        interface.stage_read_data(LISTD_RESPONSE);
        let mut client = Dt80Client::new(interface);
        client.list_jobs().unwrap();
        assert!(
            client.interface.slept_ms
                >= timing::LISTD_SETTLE_DELAY.as_millis() as u64
        );
    }

    #[test]
    fn test_copy_records_end_to_end() {
        let mut interface = MockInterface::new();
        interface.stage_read_data(COPYD_RESPONSE);
        let mut client = Dt80Client::new(interface);

        let records = client.copy_records(true, start()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp.to_string(), "2018/09/04 16:40:00.000");
        assert_eq!(records[0].value, "22.703516");
        assert_eq!(records[1].value, "24.045942");

        assert_eq!(
            &client.interface.write_log,
            b"copyd archive=y start=2018-08-29T16:00:00.000\r\n"
        );
    }

    #[test]
    fn test_copy_records_with_channel() {
        let mut interface = MockInterface::new();
        interface.stage_read_data(b"2018/09/04 16:40:00.000,n,22.703516,19.5\r\n");
        let mut client = Dt80Client::new(interface).with_channel(3);
        let records = client.copy_records(true, start()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, "19.5");
    }

    #[test]
    fn test_empty_response_yields_empty_results() {
        let mut client = Dt80Client::new(MockInterface::new());
        assert!(client.list_jobs().unwrap().is_empty());
        assert!(client.copy_records(true, start()).unwrap().is_empty());
        assert_eq!(client.state, ExchangeState::Idle);
    }

    #[test]
    fn test_header_only_copyd_yields_no_records() {
        let mut interface = MockInterface::new();
        interface.stage_read_data(b"DT80> \"Timestamp\",\"TZ\",\"T3 TC_1B (degC)\"\r\n");
        let mut client = Dt80Client::new(interface);
        assert!(client.copy_records(true, start()).unwrap().is_empty());
    }

    #[test]
    fn test_immediate_timing_skips_all_delays() {
        let mut interface = MockInterface::new();
        interface.stage_read_data(LISTD_RESPONSE);
        let mut client = Dt80Client::new(interface).with_timing(ClientTiming::immediate());
        let jobs = client.list_jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(client.interface.slept_ms, 0);
    }

    #[test]
    fn test_state_resets_after_decode_error() {
        let mut interface = MockInterface::new();
        interface.stage_read_data(&[0xFF, 0xFE, b'\n']);
        let mut client = Dt80Client::new(interface);
        assert!(matches!(client.list_jobs(), Err(Dt80Error::Decode(_))));
        assert_eq!(client.state, ExchangeState::Idle);
        // The next exchange is usable again.
        assert!(client.list_jobs().unwrap().is_empty());
    }
}
