// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! MCU-level wrappers for the STM32F7 board.

pub mod clock;
pub mod keypad;
pub mod laser;
pub mod logger;
pub mod pins;
pub mod rig;
pub mod usart;

pub use clock::SysTickClock;
pub use keypad::Keypad;
pub use laser::{ActiveLevel, Laser};
pub use pins::BoardPins;
pub use rig::Rig;
pub use usart::Usart;
