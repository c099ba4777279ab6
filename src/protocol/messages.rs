// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Vision link frame format and payloads.
//!
//! ```text
//! 0xAA | LEN | payload[LEN - 3] | checksum
//! ```
//!
//! `LEN` counts every byte from the start byte through the checksum. The checksum is the low
//! eight bits of the sum of all preceding bytes.
//!
//! Coordinate frames carry the target at bytes `[2..4)` (X) and `[4..6)` (Y), big-endian. Frames
//! of at least [`CORNER_FRAME_LEN`] bytes also carry four corner points at `[6..22)`, ordered
//! left-upper, right-upper, left-lower, right-lower.

/// Sync byte for the protocol.
pub const START_BYTE: u8 = 0xAA;

/// Smallest well-formed frame: start, length, one payload byte, checksum.
pub const MIN_FRAME_LEN: usize = 4;

/// Largest frame the decoder will accept.
pub const MAX_FRAME_LEN: usize = 64;

/// Shortest frame that carries a target coordinate.
pub const TARGET_FRAME_LEN: usize = 7;

/// Shortest frame that also carries the four corner points.
pub const CORNER_FRAME_LEN: usize = 23;

/// Sensor-space pixel coordinate. `(0, 0)` means "no target".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelPoint {
    pub x: u16,
    pub y: u16,
}

impl PixelPoint {
    /// The "no target" sentinel.
    pub const NONE: PixelPoint = PixelPoint { x: 0, y: 0 };

    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// Corner set of the reference polygon.
pub type Corners = [PixelPoint; 4];

/// Decoded payload of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Target(PixelPoint),
    TargetWithCorners { target: PixelPoint, corners: Corners },
}

impl Message {
    /// Interpret a checksum-verified frame. Frames too short to hold a coordinate yield `None`.
    pub fn parse(frame: &[u8]) -> Option<Message> {
        if frame.len() < TARGET_FRAME_LEN {
            return None;
        }
        let target = point_at(frame, 2);

        if frame.len() >= CORNER_FRAME_LEN {
            let mut corners = [PixelPoint::NONE; 4];
            for (i, c) in corners.iter_mut().enumerate() {
                *c = point_at(frame, 6 + i * 4);
            }
            Some(Message::TargetWithCorners { target, corners })
        } else {
            Some(Message::Target(target))
        }
    }

    pub fn target(&self) -> PixelPoint {
        match self {
            Message::Target(t) => *t,
            Message::TargetWithCorners { target, .. } => *target,
        }
    }
}

#[inline]
fn point_at(frame: &[u8], at: usize) -> PixelPoint {
    PixelPoint {
        x: u16::from_be_bytes([frame[at], frame[at + 1]]),
        y: u16::from_be_bytes([frame[at + 2], frame[at + 3]]),
    }
}

/// 8-bit truncated sum.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Build a frame around `payload` into `out`. Returns the frame length, or `None` if it would
/// not fit in `out` or exceed [`MAX_FRAME_LEN`].
pub fn encode_frame(payload: &[u8], out: &mut [u8]) -> Option<usize> {
    let len = payload.len() + 3;
    if payload.is_empty() || len > MAX_FRAME_LEN || len > out.len() {
        return None;
    }
    out[0] = START_BYTE;
    out[1] = len as u8;
    out[2..2 + payload.len()].copy_from_slice(payload);
    out[len - 1] = checksum(&out[..len - 1]);
    Some(len)
}

/// Coordinate frame for `target`.
pub fn encode_target(target: PixelPoint) -> [u8; TARGET_FRAME_LEN] {
    let mut out = [0u8; TARGET_FRAME_LEN];
    let mut payload = [0u8; 4];
    put_point(&mut payload, 0, target);
    // The payload always fits.
    let _ = encode_frame(&payload, &mut out);
    out
}

/// Coordinate frame that also carries the corner set.
pub fn encode_with_corners(target: PixelPoint, corners: &Corners) -> [u8; CORNER_FRAME_LEN] {
    let mut out = [0u8; CORNER_FRAME_LEN];
    let mut payload = [0u8; 20];
    put_point(&mut payload, 0, target);
    for (i, c) in corners.iter().enumerate() {
        put_point(&mut payload, 4 + i * 4, *c);
    }
    let _ = encode_frame(&payload, &mut out);
    out
}

fn put_point(buf: &mut [u8], at: usize, p: PixelPoint) {
    buf[at..at + 2].copy_from_slice(&p.x.to_be_bytes());
    buf[at + 2..at + 4].copy_from_slice(&p.y.to_be_bytes());
}
