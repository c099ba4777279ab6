// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Laser pointer output.

use stm32f7xx_hal::gpio::{gpiod, Output, PushPull};

use crate::board::Indicator;

/// Whether the laser driver is switched active-high or active-low on the board wiring.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Laser switch that remembers its active level and last commanded state.
pub struct Laser {
    pin: gpiod::PD10<Output<PushPull>>,
    active: ActiveLevel,
    is_on: bool,
}

impl Laser {
    /// Wrap the pin, initializing the laser to OFF.
    pub fn new(pin: gpiod::PD10<Output<PushPull>>, active: ActiveLevel) -> Self {
        let mut laser = Self {
            pin,
            active,
            is_on: true,
        };
        laser.set(false);
        laser
    }

    pub fn set(&mut self, on: bool) {
        match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high(),
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low(),
        }
        self.is_on = on;
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

impl Indicator for Laser {
    fn set_indicator(&mut self, on: bool) {
        self.set(on);
    }
}
