// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! SysTick millisecond clock.
//!
//! SysTick fires at 1 kHz and the `SysTick` exception handler calls [`tick`]. Reading the clock
//! is a single atomic load, so it is safe from tasks and interrupts alike.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::{syst::SystClkSource, SYST};
use stm32f7xx_hal::rcc::Clocks;

use crate::time::{elapsed, Clock};

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Advance the millisecond counter. Call from the SysTick handler only.
#[inline]
pub fn tick() {
    MILLIS.fetch_add(1, Ordering::Relaxed);
}

pub struct SysTickClock {
    _syst: SYST,
}

impl SysTickClock {
    /// Start SysTick at 1 kHz from the core clock.
    pub fn start(mut syst: SYST, clocks: &Clocks) -> Self {
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(clocks.sysclk().raw() / 1_000 - 1);
        syst.clear_current();
        syst.enable_counter();
        syst.enable_interrupt();
        Self { _syst: syst }
    }
}

impl Clock for SysTickClock {
    fn now_ms(&self) -> u32 {
        MILLIS.load(Ordering::Relaxed)
    }

    fn delay_ms(&mut self, ms: u32) {
        let start = self.now_ms();
        while elapsed(self.now_ms(), start) < ms {
            cortex_m::asm::nop();
        }
    }
}
