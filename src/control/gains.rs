// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error-magnitude gain scheduling.
//!
//! Large errors use the coarse tier, mid-range errors the medium tier and small errors the fine
//! tier. The selected tier is pushed into the [`Pid`] before each update.

use crate::control::pid::{Pid, PidGains};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GainSchedule {
    pub fine: PidGains,
    pub medium: PidGains,
    pub coarse: PidGains,
    /// Errors at or above this use `medium`.
    pub medium_from: u32,
    /// Errors at or above this use `coarse`.
    pub coarse_from: u32,
}

impl GainSchedule {
    /// Same gains at every error magnitude.
    pub const fn flat(gains: PidGains) -> Self {
        Self {
            fine: gains,
            medium: gains,
            coarse: gains,
            medium_from: u32::MAX,
            coarse_from: u32::MAX,
        }
    }

    pub const fn tiered(
        fine: PidGains,
        medium: PidGains,
        coarse: PidGains,
        medium_from: u32,
        coarse_from: u32,
    ) -> Self {
        Self {
            fine,
            medium,
            coarse,
            medium_from,
            coarse_from,
        }
    }

    /// Gains for an absolute error of `magnitude` pixels.
    pub fn select(&self, magnitude: u32) -> PidGains {
        if magnitude >= self.coarse_from {
            self.coarse
        } else if magnitude >= self.medium_from {
            self.medium
        } else {
            self.fine
        }
    }

    /// Load the tier for `magnitude` into `pid`.
    pub fn apply(&self, pid: &mut Pid, magnitude: u32) {
        pid.set_gains(self.select(magnitude));
    }
}
