// src/impl_serialport.rs

//! Host-side transport adapter backed by the `serialport` crate.
//!
//! Maps a platform serial port onto [`Dt80Serial`]/[`Dt80Timer`]: an empty
//! receive buffer reads as `WouldBlock`, and delays are thread sleeps.
//! Requires the `impl-serialport` feature.

use std::boxed::Box;
use std::io::{Read, Write};
use std::thread;
use std::time::Duration;

use serialport::{DataBits, Parity, SerialPort, StopBits};

use crate::common::hal_traits::{Dt80Serial, Dt80Timer};

/// A DT80 host-port link over a platform serial device.
pub struct SerialPortLink {
    port: Box<dyn SerialPort>,
}

impl SerialPortLink {
    /// Opens `path` at `baud` with the device's fixed framing: 8 data bits,
    /// no parity, 1 stop bit.
    pub fn open(path: &str, baud: u32) -> serialport::Result<Self> {
        let port = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(Duration::from_millis(50))
            .open()?;
        Ok(SerialPortLink { port })
    }

    /// Wraps an already configured port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialPortLink { port }
    }
}

impl Dt80Serial for SerialPortLink {
    type Error = std::io::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        match self.port.bytes_to_read() {
            Ok(0) => Err(nb::Error::WouldBlock),
            Ok(_) => {
                let mut byte = [0u8; 1];
                self.port.read_exact(&mut byte).map_err(nb::Error::Other)?;
                Ok(byte[0])
            }
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.port.write_all(&[byte]).map_err(nb::Error::Other)?;
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.port.flush().map_err(nb::Error::Other)?;
        Ok(())
    }
}

impl Dt80Timer for SerialPortLink {
    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
