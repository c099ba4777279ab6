// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Sliding-window median smoothing for sensor points.
//!
//! X and Y are filtered independently, so the returned point need not be one of the inputs.
//! Until the window has filled once, points pass through unchanged.

use crate::protocol::PixelPoint;

/// Window length used by the vision link.
pub const WINDOW: usize = 5;

pub struct MedianFilter<const W: usize = WINDOW> {
    xs: [u16; W],
    ys: [u16; W],
    index: usize,
    filled: bool,
}

impl<const W: usize> MedianFilter<W> {
    pub const fn new() -> Self {
        Self {
            xs: [0; W],
            ys: [0; W],
            index: 0,
            filled: false,
        }
    }

    /// Record `p` and return the smoothed point.
    pub fn push(&mut self, p: PixelPoint) -> PixelPoint {
        self.xs[self.index] = p.x;
        self.ys[self.index] = p.y;
        self.index = (self.index + 1) % W;
        if self.index == 0 {
            self.filled = true;
        }

        if !self.filled {
            return p;
        }

        PixelPoint {
            x: median(self.xs),
            y: median(self.ys),
        }
    }

    /// Forget all history.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn is_primed(&self) -> bool {
        self.filled
    }
}

impl<const W: usize> Default for MedianFilter<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Median of a fixed window, by full sort.
pub fn median<const W: usize>(mut values: [u16; W]) -> u16 {
    values.sort_unstable();
    values[W / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: u16, y: u16) -> PixelPoint {
        PixelPoint::new(x, y)
    }

    #[test]
    fn passthrough_until_window_fills() {
        let mut f: MedianFilter = MedianFilter::new();
        assert_eq!(f.push(p(10, 50)), p(10, 50));
        assert_eq!(f.push(p(300, 1)), p(300, 1));
        assert_eq!(f.push(p(20, 40)), p(20, 40));
        assert_eq!(f.push(p(5, 45)), p(5, 45));
        assert!(!f.is_primed());
    }

    #[test]
    fn fifth_push_returns_per_axis_median() {
        let mut f: MedianFilter = MedianFilter::new();
        for q in [p(10, 50), p(300, 1), p(20, 40), p(5, 45)] {
            f.push(q);
        }
        // xs: 5 10 15 20 300 -> 15; ys: 1 40 45 50 60 -> 45
        assert_eq!(f.push(p(15, 60)), p(15, 45));
        assert!(f.is_primed());
    }

    #[test]
    fn window_slides_after_filling() {
        let mut f: MedianFilter = MedianFilter::new();
        for i in 1..=5 {
            f.push(p(i * 10, i));
        }
        // Replaces the oldest sample (10, 1).
        assert_eq!(f.push(p(1000, 1000)), p(40, 4));
    }

    #[test]
    fn single_outlier_is_rejected() {
        let mut f: MedianFilter = MedianFilter::new();
        for _ in 0..5 {
            f.push(p(160, 120));
        }
        assert_eq!(f.push(p(0, 0)), p(160, 120));
    }

    #[test]
    fn clear_restarts_passthrough() {
        let mut f: MedianFilter = MedianFilter::new();
        for _ in 0..5 {
            f.push(p(1, 1));
        }
        f.clear();
        assert_eq!(f.push(p(9, 9)), p(9, 9));
    }
}
