// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Direct-wired keypad scan.

use crate::hw::pins::KeypadPins;
use crate::input::{Key, KeyInput};

pub struct Keypad {
    pins: KeypadPins,
}

impl Keypad {
    pub fn new(pins: KeypadPins) -> Self {
        Self { pins }
    }
}

impl KeyInput for Keypad {
    /// First held key in panel order. Keys are active low.
    fn scan(&mut self) -> Option<Key> {
        let p = &self.pins;
        let held = [
            (p.s1.is_low(), Key::S1),
            (p.s2.is_low(), Key::S2),
            (p.s3.is_low(), Key::S3),
            (p.s4.is_low(), Key::S4),
            (p.s5.is_low(), Key::S5),
            (p.s6.is_low(), Key::S6),
            (p.s7.is_low(), Key::S7),
            (p.s8.is_low(), Key::S8),
            (p.k0.is_low(), Key::K0),
            (p.k1.is_low(), Key::K1),
        ];
        held.iter().find(|(low, _)| *low).map(|&(_, key)| key)
    }
}
