// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Application context: the single owner of all turret state.
//!
//! The scheduler dispatches [`TaskKind`]s into [`Turret`], which decodes the vision link, scans
//! the keypad and advances whichever acquisition mode is active. Only one mode runs at a time;
//! starting another stops the current one first.

use log::info;

use crate::board::Board;
use crate::input::{Key, KeyDebouncer};
use crate::motors::{Axis, Direction};
use crate::protocol::VisionLink;
use crate::sched::{Dispatch, Priority, Scheduler, SchedulerError};
use crate::tracking::config::{
    AcquisitionConfig, Drive, KEY_TURN, LASER_HOLD, PULSES_PER_45_DEG, QUICK_AIM, SERVO_AIM,
    SWEEP_ACQUIRE,
};
use crate::tracking::Acquisition;

/// Periodic work of the firmware.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskKind {
    Decode,
    Keypad,
    Track,
    Status,
}

/// Registration entry for one task.
#[derive(Copy, Clone, Debug)]
pub struct TaskSpec {
    pub kind: TaskKind,
    pub period_ms: u32,
    pub priority: Priority,
    pub name: &'static str,
}

pub const TASKS: [TaskSpec; 4] = [
    TaskSpec {
        kind: TaskKind::Decode,
        period_ms: 10,
        priority: Priority::Critical,
        name: "decode",
    },
    TaskSpec {
        kind: TaskKind::Keypad,
        period_ms: 20,
        priority: Priority::Normal,
        name: "keypad",
    },
    TaskSpec {
        kind: TaskKind::Track,
        period_ms: 30,
        priority: Priority::High,
        name: "track",
    },
    TaskSpec {
        kind: TaskKind::Status,
        period_ms: 1000,
        priority: Priority::Low,
        name: "status",
    },
];

/// Register the standard task set.
pub fn register_tasks<const N: usize>(
    scheduler: &mut Scheduler<TaskKind, N>,
) -> Result<(), SchedulerError> {
    for t in TASKS.iter() {
        scheduler.register(t.kind, t.period_ms, t.priority, t.name)?;
    }
    Ok(())
}

/// Acquisition modes selectable from the keypad.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    LaserHold,
    QuickAim,
    ServoAim,
    Sweep,
    KeyTurn,
}

/// Fixed turn for each keyboard-triggered acquisition key.
pub fn key_turn(key: Key) -> Option<(Direction, u32)> {
    match key {
        Key::S5 => Some((Direction::Cw, 2 * PULSES_PER_45_DEG)),
        Key::S6 => Some((Direction::Cw, PULSES_PER_45_DEG * 2 / 3)),
        Key::S7 => Some((Direction::Ccw, 2 * PULSES_PER_45_DEG)),
        Key::S8 => Some((Direction::Cw, PULSES_PER_45_DEG * 32 / 9)),
        _ => None,
    }
}

pub struct Turret<'a, B: Board, const N: usize> {
    board: B,
    link: VisionLink<'a, N>,
    keys: KeyDebouncer,
    active: Option<(Mode, Acquisition)>,
    /// Last commanded servo pulses (X, Y), kept across runs.
    servo_pulses: Option<(u16, u16)>,
}

impl<'a, B: Board, const N: usize> Turret<'a, B, N> {
    pub fn new(board: B, link: VisionLink<'a, N>) -> Self {
        Self {
            board,
            link,
            keys: KeyDebouncer::new(),
            active: None,
            servo_pulses: None,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn link(&self) -> &VisionLink<'a, N> {
        &self.link
    }

    /// Acquisition of the most recently started mode, running or not.
    pub fn acquisition(&self) -> Option<&Acquisition> {
        self.active.as_ref().map(|(_, acq)| acq)
    }

    /// Mode currently running, if any.
    pub fn running_mode(&self) -> Option<Mode> {
        match &self.active {
            Some((mode, acq)) if acq.is_running() => Some(*mode),
            _ => None,
        }
    }

    /// Stop any running mode, then start `mode` with `config`.
    pub fn start(&mut self, mode: Mode, config: AcquisitionConfig) {
        self.stop();
        if let Some((_, prev)) = &self.active {
            if let Drive::Servo { .. } = prev.config().tracking.drive {
                self.servo_pulses = Some((prev.servo_pulse(Axis::X), prev.servo_pulse(Axis::Y)));
            }
        }

        let mut acq = Acquisition::new(config);
        if let Some((x, y)) = self.servo_pulses {
            acq.restore_servo_pulses(x, y);
        }
        self.link.set_filter_enabled(!config.bypass_filter);
        acq.start(&mut self.board);
        self.active = Some((mode, acq));
    }

    /// Stop `mode` if it is running, otherwise start it.
    pub fn toggle(&mut self, mode: Mode, config: AcquisitionConfig) {
        if self.running_mode() == Some(mode) {
            self.stop();
        } else {
            self.start(mode, config);
        }
    }

    pub fn stop(&mut self) {
        if let Some((_, acq)) = self.active.as_mut() {
            acq.stop(&mut self.board);
        }
        self.link.set_filter_enabled(true);
    }

    pub fn on_key(&mut self, key: Key) {
        info!("key {:?}", key);
        match key {
            Key::S1 => self.toggle(Mode::QuickAim, QUICK_AIM),
            Key::S2 => self.board.set_indicator(true),
            Key::S3 => self.start(Mode::Sweep, SWEEP_ACQUIRE),
            Key::S4 => self.toggle(Mode::LaserHold, LASER_HOLD),
            Key::S5 | Key::S6 | Key::S7 | Key::S8 => {
                if let Some((dir, pulses)) = key_turn(key) {
                    self.start(Mode::KeyTurn, KEY_TURN.with_initial_turn(dir, pulses));
                }
            }
            Key::K0 => self.toggle(Mode::ServoAim, SERVO_AIM),
            Key::K1 => self.stop(),
        }
    }

    fn decode(&mut self) {
        self.link.poll();
    }

    fn scan_keys(&mut self, now: u32) {
        let raw = self.board.scan();
        if let Some(key) = self.keys.update(raw, now) {
            self.on_key(key);
        }
    }

    fn track(&mut self) {
        let target = self.link.target();
        if let Some((_, acq)) = self.active.as_mut() {
            if acq.is_running() {
                acq.execute(&mut self.board, target);
                if !acq.is_running() {
                    self.link.set_filter_enabled(true);
                }
            }
        }
    }

    fn report(&self, now: u32) {
        let stats = self.link.stats();
        match &self.active {
            Some((mode, acq)) => info!(
                "[{} ms] {:?}: {:?} running={} last_stop={:?}",
                now,
                mode,
                acq.state(),
                acq.is_running(),
                acq.last_stop()
            ),
            None => info!("[{} ms] idle", now),
        }
        info!(
            "target {:?}, frames {} (checksum errors {}, skipped {})",
            self.link.target(),
            stats.frames,
            stats.checksum_failures,
            stats.skipped
        );
    }
}

impl<'a, B: Board, const N: usize> Dispatch<TaskKind> for Turret<'a, B, N> {
    fn run(&mut self, task: TaskKind, now: u32) {
        match task {
            TaskKind::Decode => self.decode(),
            TaskKind::Keypad => self.scan_keys(now),
            TaskKind::Track => self.track(),
            TaskKind::Status => self.report(now),
        }
    }
}
