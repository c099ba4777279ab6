// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Operator input.

pub mod keypad;

pub use keypad::{Key, KeyDebouncer, KeyInput};
