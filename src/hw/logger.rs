// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `log` backend that prints to the debug USART.
//!
//! Each record becomes one `[LEVEL] target: message` line. Output happens inside a critical
//! section, so logging from the RX interrupt is safe but slow.

use core::cell::RefCell;
use core::fmt::Write;

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use stm32f7xx_hal::pac::USART3;

use crate::hw::usart::Usart;

pub struct UsartLogger {
    usart: Mutex<RefCell<Option<Usart<USART3>>>>,
}

static LOGGER: UsartLogger = UsartLogger {
    usart: Mutex::new(RefCell::new(None)),
};

/// Install the USART logger. Call once, before anything logs.
pub fn init(usart: Usart<USART3>, level: LevelFilter) -> Result<(), SetLoggerError> {
    interrupt::free(|cs| LOGGER.usart.borrow(cs).replace(Some(usart)));
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

impl Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(
                    usart,
                    "[{}] {}: {}\r\n",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(usart) = self.usart.borrow(cs).borrow_mut().as_mut() {
                usart.flush();
            }
        });
    }
}
