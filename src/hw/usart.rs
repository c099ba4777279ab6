// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART transmit wrapper.
//!
//! Used both as the Emm_V5 stepper bus ([`CommandSink`]) and as the debug log terminal
//! (`core::fmt::Write`). Writes block until every byte is in the TX register.
//!
//! Note: When using `writeln!`, be sure to include `\r` (CR) in the format string to ensure correct
//! line endings on the terminal.

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

use crate::drivers::CommandSink;

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    /// Take a serial port for TX only.
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    /// Take a serial port and hand back its RX half for interrupt-driven reception.
    pub fn with_rx<PINS: Pins<U>>(serial: Serial<U, PINS>) -> (Self, Rx<U>) {
        let (tx, rx) = serial.split();
        (Self { tx }, rx)
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> CommandSink for Usart<U> {
    type Error = core::convert::Infallible;

    fn send(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.write_bytes(frame);
        self.flush();
        Ok(())
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}
