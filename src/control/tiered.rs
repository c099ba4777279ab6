// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tiered step sizes for the simpler tracking modes that do not run a PID.

/// Step size chosen by error magnitude.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepTable {
    pub small: u32,
    pub medium: u32,
    pub large: u32,
    /// Errors below this get `small`.
    pub small_below: u32,
    /// Errors below this (and not below `small_below`) get `medium`.
    pub medium_below: u32,
}

impl StepTable {
    pub const DEFAULT_SMALL_BELOW: u32 = 10;
    pub const DEFAULT_MEDIUM_BELOW: u32 = 30;

    /// Table with the default 10 / 30 px thresholds.
    pub const fn new(small: u32, medium: u32, large: u32) -> Self {
        Self {
            small,
            medium,
            large,
            small_below: Self::DEFAULT_SMALL_BELOW,
            medium_below: Self::DEFAULT_MEDIUM_BELOW,
        }
    }

    pub const fn with_thresholds(mut self, small_below: u32, medium_below: u32) -> Self {
        self.small_below = small_below;
        self.medium_below = medium_below;
        self
    }

    pub fn step_for(&self, magnitude: u32) -> u32 {
        if magnitude < self.small_below {
            self.small
        } else if magnitude < self.medium_below {
            self.medium
        } else {
            self.large
        }
    }
}
