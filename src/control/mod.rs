// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! This module provides reusable building blocks for closed-loop aiming.
//!
//! ## Modules
//!
//! - [`pid`] - General-purpose PID controller (positional and incremental).
//! - [`gains`] - Coarse/medium/fine gain scheduling on top of [`Pid`].
//! - [`median`] - Sliding-window median filter for sensor points.
//! - [`tiered`] - Error-banded step sizes for the non-PID tracking modes.

pub mod gains;
pub mod median;
pub mod pid;
pub mod tiered;

pub use gains::GainSchedule;
pub use median::MedianFilter;
pub use pid::{Pid, PidGains, PidKind};
pub use tiered::StepTable;
