// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![allow(dead_code)]

use turret::input::{Key, KeyInput};
use turret::motors::{Actuator, Axis, Direction, HomeMode};
use turret::{Clock, Indicator};

/// Everything the mock board was told to do, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    Move {
        axis: Axis,
        dir: Direction,
        velocity: u16,
        acceleration: u8,
        steps: u32,
    },
    Stop(Axis),
    Home(Axis, HomeMode),
    Pulse(Axis, u16),
    Indicator(bool),
}

/// Fake board: time only moves when the test (or a blocking delay) moves it.
#[derive(Debug, Default)]
pub struct MockBoard {
    pub now: u32,
    pub cmds: Vec<Cmd>,
    pub indicator: bool,
    pub held: Option<Key>,
}

impl MockBoard {
    pub fn at(now: u32) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now = self.now.wrapping_add(ms);
    }

    pub fn moves(&self) -> Vec<Cmd> {
        self.cmds
            .iter()
            .copied()
            .filter(|c| matches!(c, Cmd::Move { .. }))
            .collect()
    }

    pub fn count(&self, wanted: impl Fn(&Cmd) -> bool) -> usize {
        self.cmds.iter().filter(|c| wanted(c)).count()
    }
}

impl Actuator for MockBoard {
    fn move_steps(
        &mut self,
        axis: Axis,
        dir: Direction,
        velocity: u16,
        acceleration: u8,
        steps: u32,
    ) {
        self.cmds.push(Cmd::Move {
            axis,
            dir,
            velocity,
            acceleration,
            steps,
        });
    }

    fn stop(&mut self, axis: Axis) {
        self.cmds.push(Cmd::Stop(axis));
    }

    fn home(&mut self, axis: Axis, mode: HomeMode) {
        self.cmds.push(Cmd::Home(axis, mode));
    }

    fn set_pulse_width(&mut self, axis: Axis, pulse_us: u16) {
        self.cmds.push(Cmd::Pulse(axis, pulse_us));
    }
}

impl Clock for MockBoard {
    fn now_ms(&self) -> u32 {
        self.now
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms);
    }
}

impl Indicator for MockBoard {
    fn set_indicator(&mut self, on: bool) {
        self.indicator = on;
        self.cmds.push(Cmd::Indicator(on));
    }
}

impl KeyInput for MockBoard {
    fn scan(&mut self) -> Option<Key> {
        self.held
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
