// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! What the control core needs from the board.

use crate::input::KeyInput;
use crate::motors::Actuator;
use crate::time::Clock;

/// Binary indicator output (the laser).
pub trait Indicator {
    fn set_indicator(&mut self, on: bool);
}

/// Everything the application drives: actuators, time, the indicator, and the keypad.
pub trait Board: Actuator + Clock + Indicator + KeyInput {}

impl<T: Actuator + Clock + Indicator + KeyInput> Board for T {}
