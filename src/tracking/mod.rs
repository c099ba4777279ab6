// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Target Acquisition
//!
//! - [`config`] - Per-mode settings and the shipped presets.
//! - [`detect`] - Hit/miss debounce on the incoming target point.
//! - [`machine`] - The homing / search / track / complete state machine.

pub mod config;
pub mod detect;
pub mod machine;

pub use config::{
    AcquisitionConfig, AlignPolicy, AxisSet, Drive, KEY_TURN, LASER_HOLD, LASER_HOLD_STEPPED,
    QUICK_AIM, SERVO_AIM, SWEEP_ACQUIRE,
};
pub use detect::Detector;
pub use machine::{AcqState, Acquisition, HomingPhase, Progress, StopReason};
