// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Millisecond time source.
//!
//! All timing in the turret is expressed as a wrapping `u32` millisecond tick. On the board this
//! is driven by SysTick; tests inject a fake clock whose delays simply advance the counter.

/// Wrapping millisecond clock with a blocking delay.
pub trait Clock {
    /// Current tick in milliseconds. Wraps after ~49.7 days.
    fn now_ms(&self) -> u32;

    /// Busy-wait for `ms` milliseconds. Blocks the whole system.
    fn delay_ms(&mut self, ms: u32);
}

/// Milliseconds elapsed from `since` to `now`, tolerant of tick rollover.
#[inline]
pub fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_handles_rollover() {
        assert_eq!(elapsed(10, 5), 5);
        assert_eq!(elapsed(4, u32::MAX - 5), 10);
        assert_eq!(elapsed(7, 7), 0);
    }
}
