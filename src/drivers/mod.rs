// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic.
//!
//! ## Existing drivers
//!
//! - [`emm_v5`] - Emm_V5 closed-loop stepper drives on a shared serial bus

pub mod emm_v5;

pub use emm_v5::{CommandSink, EmmV5};
