// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! The physical turret: stepper bus, laser, keypad and clock bundled as one [`Board`].
//!
//! [`Board`]: crate::board::Board

use stm32f7xx_hal::pac::USART1;

use crate::board::Indicator;
use crate::drivers::EmmV5;
use crate::hw::{Keypad, Laser, SysTickClock, Usart};
use crate::input::{Key, KeyInput};
use crate::motors::{Actuator, Axis, Direction, HomeMode};
use crate::time::Clock;

pub struct Rig {
    pub drive: EmmV5<Usart<USART1>>,
    pub laser: Laser,
    pub keypad: Keypad,
    pub clock: SysTickClock,
}

impl Actuator for Rig {
    fn move_steps(
        &mut self,
        axis: Axis,
        dir: Direction,
        velocity: u16,
        acceleration: u8,
        steps: u32,
    ) {
        self.drive.move_steps(axis, dir, velocity, acceleration, steps);
    }

    fn stop(&mut self, axis: Axis) {
        self.drive.stop(axis);
    }

    fn home(&mut self, axis: Axis, mode: HomeMode) {
        self.drive.home(axis, mode);
    }

    fn set_pulse_width(&mut self, axis: Axis, pulse_us: u16) {
        self.drive.set_pulse_width(axis, pulse_us);
    }
}

impl Clock for Rig {
    fn now_ms(&self) -> u32 {
        self.clock.now_ms()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
    }
}

impl Indicator for Rig {
    fn set_indicator(&mut self, on: bool) {
        self.laser.set_indicator(on);
    }
}

impl KeyInput for Rig {
    fn scan(&mut self) -> Option<Key> {
        self.keypad.scan()
    }
}
