// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Turret Firmware
//!
//! Control core for a two-axis pan/tilt laser turret: a vision sensor streams target pixel
//! coordinates over serial, and the turret searches for, acquires, and centers the target by
//! driving closed-loop steppers or hobby servos. Written in Rust, targeting an STM32F7 MCU.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`sched`] | Cooperative priority scheduler (the only concurrency primitive) |
//! | [`protocol`] | RX ring buffer, frame decoder, vision link state |
//! | [`control`] | PID, gain scheduling, median filter, step tables |
//! | [`tracking`] | Acquisition state machine and per-mode presets |
//! | [`motors`] | Actuator command interface, servo bookkeeping |
//! | [`drivers`] | Device-level command encoding (Emm_V5 steppers) |
//! | [`input`] | Keypad debounce |
//! | [`app`] | The owning context the scheduler dispatches into |
//! | `hw` | MCU-level wrappers (USART, laser, keypad, SysTick); `board` feature only |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod board;
pub mod control;
pub mod drivers;
pub mod input;
pub mod motors;
pub mod protocol;
pub mod sched;
pub mod time;
pub mod tracking;

#[cfg(feature = "board")]
pub mod hw;

pub use app::{TaskKind, Turret};
pub use board::{Board, Indicator};
pub use time::Clock;
