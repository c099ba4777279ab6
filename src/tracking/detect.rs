// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Target detection debounce.
//!
//! A target is acquired after `acquire_hits` consecutive non-zero reports. Once acquired it is
//! only lost after `lose_misses` consecutive zero reports *and* at least `window_ms` since the last
//! good report, so a single dropped frame never interrupts tracking.

use crate::protocol::PixelPoint;
use crate::time::elapsed;
use crate::tracking::config::DetectionConfig;

#[derive(Clone, Debug)]
pub struct Detector {
    config: DetectionConfig,
    hits: u8,
    misses: u8,
    last_valid_ms: Option<u32>,
    acquired: bool,
}

impl Detector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            hits: 0,
            misses: 0,
            last_valid_ms: None,
            acquired: false,
        }
    }

    /// Feed the latest report. Returns whether the target is currently acquired.
    pub fn update(&mut self, point: PixelPoint, now: u32) -> bool {
        if point.is_none() {
            self.hits = 0;
            self.misses = self.misses.saturating_add(1);

            let window_passed = self
                .last_valid_ms
                .map_or(true, |t| elapsed(now, t) >= self.config.window_ms);
            if self.acquired && self.misses >= self.config.lose_misses && window_passed {
                self.acquired = false;
            }
        } else {
            self.misses = 0;
            self.hits = self.hits.saturating_add(1);
            self.last_valid_ms = Some(now);
            if self.hits >= self.config.acquire_hits {
                self.acquired = true;
            }
        }
        self.acquired
    }

    #[inline]
    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::config::DETECTION;

    const HIT: PixelPoint = PixelPoint::new(100, 100);
    const MISS: PixelPoint = PixelPoint::NONE;

    #[test]
    fn single_hit_is_not_enough() {
        let mut d = Detector::new(DETECTION);
        assert!(!d.update(HIT, 0));
        assert!(!d.update(MISS, 30));
        assert!(!d.update(HIT, 60));
        assert!(d.update(HIT, 90));
    }

    #[test]
    fn lost_only_after_misses_and_window() {
        let mut d = Detector::new(DETECTION);
        d.update(HIT, 0);
        assert!(d.update(HIT, 30));

        // Three misses, but still inside the 200 ms window.
        assert!(d.update(MISS, 60));
        assert!(d.update(MISS, 90));
        assert!(d.update(MISS, 120));
        assert!(d.update(MISS, 229));
        assert!(!d.update(MISS, 230));
    }

    #[test]
    fn window_alone_does_not_lose_target() {
        let mut d = Detector::new(DETECTION);
        d.update(HIT, 0);
        d.update(HIT, 10);
        // Long silence, but only two misses.
        assert!(d.update(MISS, 1000));
        assert!(d.update(MISS, 2000));
        assert!(!d.update(MISS, 3000));
    }

    #[test]
    fn hit_resets_miss_run() {
        let mut d = Detector::new(DETECTION);
        d.update(HIT, 0);
        d.update(HIT, 10);
        d.update(MISS, 300);
        d.update(MISS, 310);
        assert!(d.update(HIT, 320));
        assert!(d.update(MISS, 600));
        assert!(d.update(MISS, 610));
        assert!(!d.update(MISS, 620));
    }

    #[test]
    fn reset_forgets_acquisition() {
        let mut d = Detector::new(DETECTION);
        d.update(HIT, 0);
        d.update(HIT, 10);
        d.reset();
        assert!(!d.is_acquired());
        assert!(!d.update(HIT, 20));
    }
}
