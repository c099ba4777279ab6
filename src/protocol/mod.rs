// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Vision sensor serial protocol.
//!
//! - [`ring`] - Interrupt-safe byte ring between the RX handler and the decoder.
//! - [`messages`] - Frame layout, checksum and payload decoding.
//! - [`parser`] - Resynchronizing frame extraction over the ring.
//! - [`link`] - Target/corner state fed by decoded frames.

pub mod link;
pub mod messages;
pub mod parser;
pub mod ring;

pub use link::{CornerCache, VisionLink};
pub use messages::{Corners, Message, PixelPoint};
pub use parser::Parser;
pub use ring::{Consumer, Producer, RingBuffer, RingError};
