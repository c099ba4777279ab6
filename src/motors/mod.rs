// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Actuator Abstractions
//!
//! This module contains the drive-facing interface used by the tracking logic. Device encodings
//! live in `drivers`.
//!
//! ## Modules
//!
//! - [`actuator`] - Axis/direction types and the [`Actuator`] command sink.
//! - [`servo`] - Pulse-width tracking for servo-driven axes.

pub mod actuator;
pub mod servo;

pub use actuator::{Actuator, Axis, Direction, HomeMode};
pub use servo::ServoAxis;
