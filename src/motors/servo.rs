// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pulse-width bookkeeping for hobby servos.
//!
//! Hobby servos have no position feedback, so the last commanded pulse is the position. Duty
//! arithmetic is left to the PWM peripheral; this only tracks and clamps the pulse in µs.

pub const PULSE_MIN_US: u16 = 500;
pub const PULSE_MAX_US: u16 = 2500;
pub const PULSE_CENTER_US: u16 = 1500;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ServoAxis {
    pulse: u16,
    min: u16,
    max: u16,
}

impl ServoAxis {
    pub const fn new(min: u16, max: u16) -> Self {
        let center = min + (max - min) / 2;
        Self {
            pulse: center,
            min,
            max,
        }
    }

    #[inline]
    pub fn pulse(&self) -> u16 {
        self.pulse
    }

    /// Shift the pulse by `delta` µs, clamped to the travel range. Returns the new pulse.
    pub fn nudge(&mut self, delta: i32) -> u16 {
        let next = (self.pulse as i32 + delta).clamp(self.min as i32, self.max as i32);
        self.pulse = next as u16;
        self.pulse
    }

    /// Jump to `pulse`, clamped to the travel range. Returns the stored pulse.
    pub fn set_pulse(&mut self, pulse: u16) -> u16 {
        self.pulse = pulse.clamp(self.min, self.max);
        self.pulse
    }
}

impl Default for ServoAxis {
    fn default() -> Self {
        Self::new(PULSE_MIN_US, PULSE_MAX_US)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_centered() {
        assert_eq!(ServoAxis::default().pulse(), PULSE_CENTER_US);
    }

    #[test]
    fn nudge_is_clamped() {
        let mut s = ServoAxis::default();
        assert_eq!(s.nudge(-300), 1200);
        assert_eq!(s.nudge(-5000), PULSE_MIN_US);
        assert_eq!(s.nudge(99_999), PULSE_MAX_US);
    }

    #[test]
    fn set_pulse_is_clamped_to_own_range() {
        let mut s = ServoAxis::new(1000, 2000);
        assert_eq!(s.set_pulse(1234), 1234);
        assert_eq!(s.set_pulse(600), 1000);
        assert_eq!(s.set_pulse(2400), 2000);
    }
}
