// src/common/hal_traits.rs

use core::fmt::Debug;
use core::time::Duration;

/// Abstraction for the delay operations the drain loop relies on.
pub trait Dt80Timer {
    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Delay for at least the given duration.
    fn delay(&mut self, duration: Duration) {
        let ms = duration.as_millis() as u32;
        if ms > 0 {
            self.delay_ms(ms);
            let residual_us = duration.subsec_micros() % 1000;
            if residual_us > 0 {
                self.delay_us(residual_us);
            }
        } else {
            self.delay_us(duration.subsec_micros());
        }
    }
}

/// Abstraction for synchronous (non-blocking) serial communication with the
/// DT80 host port.
///
/// The port is expected to run at the device's configured baud rate with
/// 8 data bits, no parity, 1 stop bit.
pub trait Dt80Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the serial interface.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is currently available. Other errors are returned as
    /// `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the serial interface.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or
    /// `Err(nb::Error::WouldBlock)` if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have
    /// been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}
