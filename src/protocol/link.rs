// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Vision link: turns buffered serial bytes into the current target point.
//!
//! Each [`VisionLink::poll`] drains every complete frame from the ring. Coordinate frames update
//! the current target, smoothed by the median filter unless filtering is bypassed. Corner sets
//! are collected separately and frozen once enough samples have been seen.

use log::{debug, info};

use crate::control::median::{median, MedianFilter, WINDOW};
use crate::protocol::messages::*;
use crate::protocol::parser::{Parser, ParserStats};
use crate::protocol::ring::Consumer;

/// Corner sets collected before the corners are frozen.
pub const CORNER_SAMPLES: usize = 5;

/// Per-corner median over the first few corner sets.
pub struct CornerCache {
    samples: [Corners; CORNER_SAMPLES],
    count: usize,
    frozen: Option<Corners>,
}

impl CornerCache {
    pub const fn new() -> Self {
        Self {
            samples: [[PixelPoint::NONE; 4]; CORNER_SAMPLES],
            count: 0,
            frozen: None,
        }
    }

    /// Record a corner set. Returns `true` when this sample froze the corners.
    pub fn push(&mut self, corners: &Corners) -> bool {
        if self.frozen.is_some() {
            return false;
        }
        self.samples[self.count] = *corners;
        self.count += 1;
        if self.count < CORNER_SAMPLES {
            return false;
        }

        let mut out = [PixelPoint::NONE; 4];
        for (corner, slot) in out.iter_mut().enumerate() {
            let mut xs = [0u16; CORNER_SAMPLES];
            let mut ys = [0u16; CORNER_SAMPLES];
            for (i, s) in self.samples.iter().enumerate() {
                xs[i] = s[corner].x;
                ys[i] = s[corner].y;
            }
            *slot = PixelPoint::new(median(xs), median(ys));
        }
        self.frozen = Some(out);
        true
    }

    /// Frozen corners, once initialized.
    pub fn corners(&self) -> Option<&Corners> {
        self.frozen.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.frozen.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for CornerCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder side of the vision serial link.
pub struct VisionLink<'a, const N: usize> {
    rx: Consumer<'a, N>,
    parser: Parser,
    filter: MedianFilter<WINDOW>,
    filter_enabled: bool,
    target: PixelPoint,
    corners: CornerCache,
    frame: [u8; MAX_FRAME_LEN],
}

impl<'a, const N: usize> VisionLink<'a, N> {
    pub fn new(rx: Consumer<'a, N>) -> Self {
        Self {
            rx,
            parser: Parser::new(),
            filter: MedianFilter::new(),
            filter_enabled: true,
            target: PixelPoint::NONE,
            corners: CornerCache::new(),
            frame: [0; MAX_FRAME_LEN],
        }
    }

    /// Decode every complete frame buffered so far. Returns the number of frames accepted.
    pub fn poll(&mut self) -> usize {
        let mut accepted = 0;
        loop {
            let len = self.parser.try_get_frame(&mut self.rx, &mut self.frame);
            if len == 0 {
                return accepted;
            }
            accepted += 1;

            let Some(msg) = Message::parse(&self.frame[..len]) else {
                continue;
            };
            if let Message::TargetWithCorners { corners, .. } = &msg {
                if self.corners.push(corners) {
                    info!("corners initialized: {:?}", self.corners.corners());
                }
            }
            self.update_target(msg.target());
        }
    }

    fn update_target(&mut self, raw: PixelPoint) {
        self.target = if self.filter_enabled {
            self.filter.push(raw)
        } else {
            raw
        };
    }

    /// Latest target; `(0, 0)` when nothing is in view.
    #[inline]
    pub fn target(&self) -> PixelPoint {
        self.target
    }

    /// Switch median smoothing on or off. Re-enabling starts from an empty window.
    pub fn set_filter_enabled(&mut self, enabled: bool) {
        if enabled && !self.filter_enabled {
            self.filter.clear();
        }
        if enabled != self.filter_enabled {
            debug!("median filter {}", if enabled { "on" } else { "off" });
        }
        self.filter_enabled = enabled;
    }

    pub fn is_filter_enabled(&self) -> bool {
        self.filter_enabled
    }

    pub fn corners(&self) -> &CornerCache {
        &self.corners
    }

    pub fn reset_corners(&mut self) {
        self.corners.reset();
    }

    pub fn stats(&self) -> ParserStats {
        self.parser.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ring::RingBuffer;

    #[test]
    fn poll_updates_target_with_passthrough_then_median() {
        let mut ring: RingBuffer<220> = RingBuffer::new();
        let (mut tx, rx) = ring.split();
        let mut link = VisionLink::new(rx);

        assert_eq!(link.target(), PixelPoint::NONE);
        assert_eq!(link.poll(), 0);

        tx.write(&encode_target(PixelPoint::new(100, 80))).unwrap();
        assert_eq!(link.poll(), 1);
        assert_eq!(link.target(), PixelPoint::new(100, 80));

        for p in [(102, 81), (500, 500), (101, 79), (99, 82)] {
            tx.write(&encode_target(PixelPoint::new(p.0, p.1))).unwrap();
        }
        assert_eq!(link.poll(), 4);
        // xs: 99 100 101 102 500; ys: 79 80 81 82 500
        assert_eq!(link.target(), PixelPoint::new(101, 81));
    }

    #[test]
    fn bypass_stores_raw_points() {
        let mut ring: RingBuffer<220> = RingBuffer::new();
        let (mut tx, rx) = ring.split();
        let mut link = VisionLink::new(rx);
        link.set_filter_enabled(false);

        for _ in 0..5 {
            tx.write(&encode_target(PixelPoint::new(10, 10))).unwrap();
        }
        tx.write(&encode_target(PixelPoint::new(200, 7))).unwrap();
        link.poll();
        assert_eq!(link.target(), PixelPoint::new(200, 7));

        // History was cleared, so the next point passes straight through.
        link.set_filter_enabled(true);
        tx.write(&encode_target(PixelPoint::new(55, 66))).unwrap();
        link.poll();
        assert_eq!(link.target(), PixelPoint::new(55, 66));
    }

    #[test]
    fn corners_freeze_after_five_sets() {
        let mut ring: RingBuffer<220> = RingBuffer::new();
        let (mut tx, rx) = ring.split();
        let mut link = VisionLink::new(rx);

        for i in 0..4u16 {
            let c = [
                PixelPoint::new(10 + i, 10),
                PixelPoint::new(300, 10 + i),
                PixelPoint::new(10, 200),
                PixelPoint::new(300, 200 - i),
            ];
            tx.write(&encode_with_corners(PixelPoint::new(150, 100), &c))
                .unwrap();
        }
        link.poll();
        assert!(!link.corners().is_initialized());

        let outlier = [PixelPoint::new(999, 999); 4];
        tx.write(&encode_with_corners(PixelPoint::new(150, 100), &outlier))
            .unwrap();
        link.poll();

        let frozen = *link.corners().corners().unwrap();
        assert_eq!(frozen[0], PixelPoint::new(12, 10));
        assert_eq!(frozen[1], PixelPoint::new(300, 12));
        assert_eq!(frozen[2], PixelPoint::new(10, 200));
        assert_eq!(frozen[3], PixelPoint::new(300, 199));

        // Later sets are ignored until reset.
        tx.write(&encode_with_corners(PixelPoint::new(150, 100), &outlier))
            .unwrap();
        link.poll();
        assert_eq!(link.corners().corners(), Some(&frozen));

        link.reset_corners();
        assert!(!link.corners().is_initialized());
    }

    #[test]
    fn short_frames_are_counted_but_ignored() {
        let mut ring: RingBuffer<220> = RingBuffer::new();
        let (mut tx, rx) = ring.split();
        let mut link = VisionLink::new(rx);

        let mut f = [0u8; 8];
        let n = encode_frame(&[1, 2], &mut f).unwrap();
        tx.write(&f[..n]).unwrap();
        assert_eq!(link.poll(), 1);
        assert_eq!(link.target(), PixelPoint::NONE);
    }
}
