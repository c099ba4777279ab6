// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Target acquisition state machine.
//!
//! ```text
//! Init ─► Homing(ZeroReturn ─► SettleAndDetect ─► OtherAxisReturn ─► InitialTurn ─► Done)
//!                                                                                    │
//!                                         ┌──────────────────────────────────────────┘
//!                                         ▼
//!                                     Searching ◄──► Tracking ─► Complete
//! ```
//!
//! [`Acquisition::execute`] is called once per scheduler tick with the latest target point. All
//! waits are time-based since the drive never reports completion. Homing phases that a mode does
//! not configure are skipped.
//!
//! Two timeouts are checked on every call, before any state logic: the per-search-attempt budget
//! (only while searching) and the total budget. Either one stops the machine. A stop always leaves
//! the machine exactly as a fresh one, so the next [`Acquisition::start`] is a cold start.

use log::{debug, info, warn};
use micromath::F32Ext;

use crate::board::Indicator;
use crate::control::Pid;
use crate::motors::{Actuator, Axis, Direction, ServoAxis};
use crate::protocol::PixelPoint;
use crate::time::{elapsed, Clock};
use crate::tracking::config::*;
use crate::tracking::detect::Detector;

/// Sub-phases of homing, in order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HomingPhase {
    #[default]
    ZeroReturn,
    SettleAndDetect,
    OtherAxisReturn,
    InitialTurn,
    Done,
}

impl HomingPhase {
    fn successor(self) -> HomingPhase {
        match self {
            HomingPhase::ZeroReturn => HomingPhase::SettleAndDetect,
            HomingPhase::SettleAndDetect => HomingPhase::OtherAxisReturn,
            HomingPhase::OtherAxisReturn => HomingPhase::InitialTurn,
            HomingPhase::InitialTurn | HomingPhase::Done => HomingPhase::Done,
        }
    }

    fn configured(self, homing: &HomingConfig) -> bool {
        match self {
            HomingPhase::ZeroReturn | HomingPhase::Done => true,
            HomingPhase::SettleAndDetect => homing.detect_ms.is_some(),
            HomingPhase::OtherAxisReturn => homing.other_axis_dwell_ms.is_some(),
            HomingPhase::InitialTurn => homing.initial_turn.is_some(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AcqState {
    #[default]
    Init,
    Homing(HomingPhase),
    Searching,
    Tracking,
    Complete,
}

/// Why the machine last stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Requested,
    Completed,
    TotalTimeout,
    SearchTimeout,
    TravelLimit,
}

/// Timer for one search attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchAttempt {
    pub started_ms: u32,
    pub budget_ms: u32,
}

/// Everything that a stop resets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub running: bool,
    pub state: AcqState,
    pub phase_started_ms: u32,
    pub total_started_ms: u32,
    pub attempt: Option<SearchAttempt>,
    /// Cumulative sweep travel, kept across target losses.
    pub travel_pulses: u32,
    pub last_step_ms: Option<u32>,
}

enum Flow {
    /// Nothing more to do this iteration.
    Stay,
    /// State changed; run the new state now.
    Next,
    Finish(StopReason),
}

/// Upper bound on state changes in one iteration.
const MAX_TRANSITIONS: usize = 10;

pub struct Acquisition {
    config: AcquisitionConfig,
    pid_x: Pid,
    pid_y: Pid,
    servo_x: ServoAxis,
    servo_y: ServoAxis,
    detector: Detector,
    progress: Progress,
    last_stop: Option<StopReason>,
}

impl Acquisition {
    pub fn new(config: AcquisitionConfig) -> Self {
        let aim = config.tracking.aim;
        let servo = match config.tracking.drive {
            Drive::Servo {
                min_pulse,
                max_pulse,
            } => ServoAxis::new(min_pulse, max_pulse),
            Drive::Stepper { .. } => ServoAxis::default(),
        };
        Self {
            pid_x: build_pid(&config.tracking.law, aim.x),
            pid_y: build_pid(&config.tracking.law, aim.y),
            servo_x: servo,
            servo_y: servo,
            detector: Detector::new(config.detection),
            progress: Progress::default(),
            last_stop: None,
            config,
        }
    }

    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.progress.running
    }

    pub fn state(&self) -> AcqState {
        self.progress.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    pub fn is_acquired(&self) -> bool {
        self.detector.is_acquired()
    }

    /// Last commanded servo pulse for `axis` (servo drives only).
    pub fn servo_pulse(&self, axis: Axis) -> u16 {
        match axis {
            Axis::X => self.servo_x.pulse(),
            Axis::Y => self.servo_y.pulse(),
        }
    }

    /// Carry over servo pulses left by an earlier run. Servos have no feedback, so the last
    /// commanded pulse is where the horn still is.
    pub fn restore_servo_pulses(&mut self, x: u16, y: u16) {
        if let Drive::Servo { .. } = self.config.tracking.drive {
            self.servo_x.set_pulse(x);
            self.servo_y.set_pulse(y);
        }
    }

    /// Begin a fresh run. A run already in progress is stopped first.
    pub fn start<H>(&mut self, hw: &mut H)
    where
        H: Actuator + Clock + Indicator,
    {
        if self.progress.running {
            self.finish(hw, StopReason::Requested);
        }

        let now = hw.now_ms();
        self.pid_x.reset();
        self.pid_y.reset();
        self.detector.reset();
        self.progress = Progress {
            running: true,
            phase_started_ms: now,
            total_started_ms: now,
            ..Progress::default()
        };
        self.last_stop = None;
        hw.set_indicator(self.config.indicator.at_start);

        info!("{}: start at {} ms", self.config.name, now);
    }

    /// Halt the drive and reset everything. Does nothing if not running.
    pub fn stop<H>(&mut self, hw: &mut H)
    where
        H: Actuator + Clock + Indicator,
    {
        if self.progress.running {
            self.finish(hw, StopReason::Requested);
        }
    }

    /// Advance the machine by one iteration using the latest `target`.
    pub fn execute<H>(&mut self, hw: &mut H, target: PixelPoint)
    where
        H: Actuator + Clock + Indicator,
    {
        if !self.progress.running {
            return;
        }

        let now = hw.now_ms();
        let acquired = self.detector.update(target, now);

        if let Some(limit) = self.config.total_timeout_ms {
            if elapsed(now, self.progress.total_started_ms) > limit {
                warn!("{}: total timeout after {} ms", self.config.name, limit);
                self.finish(hw, StopReason::TotalTimeout);
                return;
            }
        }
        if let Some(attempt) = self.progress.attempt {
            if elapsed(now, attempt.started_ms) > attempt.budget_ms {
                warn!(
                    "{}: search attempt timed out after {} ms",
                    self.config.name, attempt.budget_ms
                );
                self.finish(hw, StopReason::SearchTimeout);
                return;
            }
        }

        for _ in 0..MAX_TRANSITIONS {
            let flow = match self.progress.state {
                AcqState::Init => self.on_init(hw, now, acquired),
                AcqState::Homing(phase) => self.on_homing(hw, now, acquired, phase),
                AcqState::Searching => self.on_search(hw, now, acquired),
                AcqState::Tracking => self.on_track(hw, now, acquired, target),
                AcqState::Complete => Flow::Stay,
            };
            match flow {
                Flow::Stay => return,
                Flow::Next => continue,
                Flow::Finish(reason) => {
                    self.finish(hw, reason);
                    return;
                }
            }
        }
    }

    fn enter(&mut self, state: AcqState, now: u32) {
        debug!(
            "{}: {:?} -> {:?}",
            self.config.name, self.progress.state, state
        );
        self.progress.state = state;
        self.progress.phase_started_ms = now;
    }

    /// Switch to searching and arm the attempt timer. A resumed search gets the shorter budget.
    fn enter_search(&mut self, now: u32, resumed: bool) {
        self.enter(AcqState::Searching, now);
        self.progress.attempt = self.config.search.and_then(|s| {
            s.timeout_ms.map(|timeout| SearchAttempt {
                started_ms: now,
                budget_ms: if resumed {
                    s.resume_budget_ms.min(timeout)
                } else {
                    timeout
                },
            })
        });
    }

    fn enter_tracking(&mut self, now: u32) {
        self.progress.attempt = None;
        self.enter(AcqState::Tracking, now);
    }

    fn on_init<H: Actuator>(&mut self, hw: &mut H, now: u32, acquired: bool) -> Flow {
        let homing = self.config.homing;
        if acquired && homing.map_or(true, |h| h.skip_if_acquired) {
            self.enter_tracking(now);
            return Flow::Next;
        }

        match homing {
            Some(h) => {
                hw.home(h.axis, h.mode);
                self.enter(AcqState::Homing(HomingPhase::ZeroReturn), now);
            }
            None => self.enter_search(now, false),
        }
        Flow::Next
    }

    fn on_homing<H: Actuator>(
        &mut self,
        hw: &mut H,
        now: u32,
        acquired: bool,
        phase: HomingPhase,
    ) -> Flow {
        let Some(h) = self.config.homing else {
            self.enter_search(now, false);
            return Flow::Next;
        };

        let in_phase = elapsed(now, self.progress.phase_started_ms);
        let phase_done = match phase {
            HomingPhase::ZeroReturn => in_phase >= h.dwell_ms,
            HomingPhase::SettleAndDetect => {
                if acquired {
                    self.enter_tracking(now);
                    return Flow::Next;
                }
                in_phase >= h.detect_ms.unwrap_or(0)
            }
            HomingPhase::OtherAxisReturn => in_phase >= h.other_axis_dwell_ms.unwrap_or(0),
            HomingPhase::InitialTurn => in_phase >= h.initial_turn.map_or(0, |t| t.settle_ms),
            HomingPhase::Done => {
                self.enter_search(now, false);
                return Flow::Next;
            }
        };
        if !phase_done {
            return Flow::Stay;
        }

        let mut next = phase.successor();
        while !next.configured(&h) {
            next = next.successor();
        }
        match next {
            HomingPhase::OtherAxisReturn => hw.home(h.axis.other(), h.mode),
            HomingPhase::InitialTurn => {
                if let Some(t) = h.initial_turn {
                    hw.move_steps(t.axis, t.dir, t.velocity, t.acceleration, t.pulses);
                }
            }
            _ => {}
        }
        self.enter(AcqState::Homing(next), now);
        Flow::Next
    }

    fn on_search<H: Actuator>(&mut self, hw: &mut H, now: u32, acquired: bool) -> Flow {
        let search = self.config.search;

        if acquired {
            if let Some(s) = search {
                hw.stop(s.axis);
            }
            info!(
                "{}: target acquired after {} pulses of sweep",
                self.config.name, self.progress.travel_pulses
            );
            self.enter_tracking(now);
            return Flow::Next;
        }

        // Without a sweep, just wait for the target to show up.
        let Some(s) = search else {
            return Flow::Stay;
        };

        if let Some(t) = self.progress.last_step_ms {
            if elapsed(now, t) < s.settle_ms {
                return Flow::Stay;
            }
        }
        if self.progress.travel_pulses >= s.max_travel_pulses {
            warn!(
                "{}: sweep hit travel limit ({} pulses)",
                self.config.name, s.max_travel_pulses
            );
            return Flow::Finish(StopReason::TravelLimit);
        }

        hw.move_steps(s.axis, s.dir, s.velocity, s.acceleration, s.step_pulses);
        self.progress.travel_pulses += s.step_pulses;
        self.progress.last_step_ms = Some(now);
        debug!(
            "{}: sweep step, travel {}",
            self.config.name, self.progress.travel_pulses
        );
        Flow::Stay
    }

    fn on_track<H>(&mut self, hw: &mut H, now: u32, acquired: bool, target: PixelPoint) -> Flow
    where
        H: Actuator + Clock,
    {
        if !acquired {
            info!("{}: target lost, resuming search", self.config.name);
            self.pid_x.reset();
            self.pid_y.reset();
            self.enter_search(now, true);
            return Flow::Next;
        }
        // Debounce still holds the target through a dropped report; keep still.
        if target.is_none() {
            return Flow::Stay;
        }

        let cfg = self.config.tracking;
        let dx = target.x as i32 - cfg.aim.x as i32;
        let dy = target.y as i32 - cfg.aim.y as i32;
        let x_off = dx.unsigned_abs() >= cfg.deadzone;
        let y_off = cfg.axes.contains(Axis::Y) && dy.unsigned_abs() >= cfg.deadzone;

        if !x_off && !y_off {
            return match cfg.align {
                AlignPolicy::Complete => Flow::Finish(StopReason::Completed),
                AlignPolicy::Hold => Flow::Stay,
            };
        }

        if x_off {
            self.drive_axis(hw, Axis::X, dx, target.x);
        }
        if y_off {
            self.drive_axis(hw, Axis::Y, dy, target.y);
        }
        Flow::Stay
    }

    /// Issue one correction on `axis` for pixel `offset` (target minus aim).
    fn drive_axis<H>(&mut self, hw: &mut H, axis: Axis, offset: i32, measured: u16)
    where
        H: Actuator + Clock,
    {
        let cfg = self.config.tracking;
        let magnitude = offset.unsigned_abs();
        let toward = if offset > 0 {
            cfg.positive(axis)
        } else {
            cfg.positive(axis).reversed()
        };

        let steps = match cfg.law {
            TrackLaw::Pid(law) => {
                let pid = match axis {
                    Axis::X => &mut self.pid_x,
                    Axis::Y => &mut self.pid_y,
                };
                law.schedule.apply(pid, magnitude);
                let out = pid.compute(measured as f32).abs() as u32;
                if out == 0 {
                    0
                } else {
                    out.max(law.min_step).min(law.max_step)
                }
            }
            TrackLaw::Tiered(table) => table.step_for(magnitude),
        };
        if steps == 0 {
            return;
        }

        match cfg.drive {
            Drive::Stepper {
                velocity,
                acceleration,
            } => hw.move_steps(axis, toward, velocity, acceleration, steps),
            Drive::Servo { .. } => {
                let servo = match axis {
                    Axis::X => &mut self.servo_x,
                    Axis::Y => &mut self.servo_y,
                };
                let delta = match toward {
                    Direction::Cw => steps as i32,
                    Direction::Ccw => -(steps as i32),
                };
                let pulse = servo.nudge(delta);
                hw.set_pulse_width(axis, pulse);
            }
        }
        debug!("{:?} offset {} -> {:?} {}", axis, offset, toward, steps);
        hw.delay_ms(cfg.command_gap_ms);
    }

    /// Common teardown for every way a run ends.
    fn finish<H>(&mut self, hw: &mut H, reason: StopReason)
    where
        H: Actuator + Clock + Indicator,
    {
        if let Drive::Stepper { .. } = self.config.tracking.drive {
            hw.stop(Axis::X);
            hw.delay_ms(self.config.tracking.command_gap_ms);
            hw.stop(Axis::Y);
        }

        let completed = reason == StopReason::Completed;
        hw.set_indicator(if completed {
            true
        } else {
            self.config.indicator.on_stop
        });

        self.pid_x.reset();
        self.pid_y.reset();
        self.detector.reset();
        self.progress = Progress {
            state: if completed {
                AcqState::Complete
            } else {
                AcqState::Init
            },
            ..Progress::default()
        };
        self.last_stop = Some(reason);

        info!("{}: stopped ({:?})", self.config.name, reason);
    }
}

fn build_pid(law: &TrackLaw, aim: u16) -> Pid {
    match law {
        TrackLaw::Pid(l) => {
            Pid::new(0.0, 0.0, 0.0)
                .with_gains(l.schedule.coarse)
                .with_kind(l.kind)
                .with_output_limits(-l.output_limit, l.output_limit)
                .with_integral_limits(-l.integral_limit, l.integral_limit)
                .with_target(aim as f32)
        }
        TrackLaw::Tiered(_) => Pid::new(0.0, 0.0, 0.0).with_target(aim as f32),
    }
}
