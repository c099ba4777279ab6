// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Keypad debouncing.
//!
//! A key must read as held for [`DEBOUNCE_MS`] before it is reported, and must read as released
//! for the same time before another press can be reported.

use crate::time::elapsed;

pub const DEBOUNCE_MS: u32 = 20;

/// Keys on the operator panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    K0,
    K1,
}

/// Raw keypad scan.
pub trait KeyInput {
    /// Key currently held, if any.
    fn scan(&mut self) -> Option<Key>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    Pressed { key: Key, since: u32 },
    Confirmed { key: Key },
    Released { key: Key, since: u32 },
}

#[derive(Default)]
pub struct KeyDebouncer {
    state: State,
}

impl KeyDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw scan taken at `now`. Returns a key exactly once per debounced press.
    pub fn update(&mut self, raw: Option<Key>, now: u32) -> Option<Key> {
        let (next, event) = match self.state {
            State::Idle => match raw {
                Some(key) => (State::Pressed { key, since: now }, None),
                None => (State::Idle, None),
            },
            State::Pressed { key, since } => {
                if raw != Some(key) {
                    (State::Idle, None)
                } else if elapsed(now, since) >= DEBOUNCE_MS {
                    (State::Confirmed { key }, Some(key))
                } else {
                    (self.state, None)
                }
            }
            State::Confirmed { key } => {
                if raw == Some(key) {
                    (self.state, None)
                } else {
                    (State::Released { key, since: now }, None)
                }
            }
            State::Released { key, since } => {
                if raw == Some(key) {
                    (State::Confirmed { key }, None)
                } else if elapsed(now, since) >= DEBOUNCE_MS {
                    (State::Idle, None)
                } else {
                    (self.state, None)
                }
            }
        };
        self.state = next;
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_reported_once_after_debounce() {
        let mut d = KeyDebouncer::new();
        assert_eq!(d.update(Some(Key::S3), 0), None);
        assert_eq!(d.update(Some(Key::S3), 10), None);
        assert_eq!(d.update(Some(Key::S3), 20), Some(Key::S3));
        assert_eq!(d.update(Some(Key::S3), 40), None);
        assert_eq!(d.update(Some(Key::S3), 400), None);
    }

    #[test]
    fn short_glitch_is_ignored() {
        let mut d = KeyDebouncer::new();
        assert_eq!(d.update(Some(Key::S1), 0), None);
        assert_eq!(d.update(None, 5), None);
        assert_eq!(d.update(None, 40), None);
    }

    #[test]
    fn release_bounce_does_not_repeat() {
        let mut d = KeyDebouncer::new();
        d.update(Some(Key::K0), 0);
        assert_eq!(d.update(Some(Key::K0), 20), Some(Key::K0));
        assert_eq!(d.update(None, 25), None);
        assert_eq!(d.update(Some(Key::K0), 30), None);
        assert_eq!(d.update(None, 35), None);
        assert_eq!(d.update(None, 60), None);

        // Fully released; a new press counts again.
        assert_eq!(d.update(Some(Key::K0), 80), None);
        assert_eq!(d.update(Some(Key::K0), 100), Some(Key::K0));
    }
}
