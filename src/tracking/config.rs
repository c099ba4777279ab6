// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Per-mode acquisition settings.
//!
//! Every mode runs the same state machine; they differ only in which phases exist and in their
//! constants. The presets below are the tuned modes the turret ships with.

use crate::control::{GainSchedule, PidGains, PidKind, StepTable};
use crate::motors::{Axis, Direction, HomeMode};
use crate::protocol::PixelPoint;

/// Stepper pulses per 45° of pan.
pub const PULSES_PER_45_DEG: u32 = 400;

/// Fixed turn issued before tracking starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    pub axis: Axis,
    pub dir: Direction,
    pub pulses: u32,
    pub velocity: u16,
    pub acceleration: u8,
    /// Wait after issuing the turn.
    pub settle_ms: u32,
}

/// Zero-return sequence run before searching.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HomingConfig {
    pub axis: Axis,
    pub mode: HomeMode,
    /// Wait after the zero-return command.
    pub dwell_ms: u32,
    /// Look for the target for this long before moving on. `None` skips the phase.
    pub detect_ms: Option<u32>,
    /// Also home the other axis and wait this long. `None` skips the phase.
    pub other_axis_dwell_ms: Option<u32>,
    pub initial_turn: Option<Turn>,
    /// Go straight to tracking if the target is already acquired at start.
    pub skip_if_acquired: bool,
}

/// Bounded sweep along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub axis: Axis,
    pub dir: Direction,
    pub step_pulses: u32,
    /// Cumulative travel at which the search gives up.
    pub max_travel_pulses: u32,
    pub velocity: u16,
    pub acceleration: u8,
    /// Wait after each step before the next one.
    pub settle_ms: u32,
    /// Budget for one search attempt. `None` disables the per-attempt timeout.
    pub timeout_ms: Option<u32>,
    /// Budget for a search resumed after losing the target.
    pub resume_budget_ms: u32,
}

/// Detection debounce.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Consecutive non-zero reports needed to acquire.
    pub acquire_hits: u8,
    /// Consecutive zero reports needed to lose.
    pub lose_misses: u8,
    /// Minimum time since the last good report before the target can be lost.
    pub window_ms: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DETECTION
    }
}

/// Default debounce: 2 hits to acquire, 3 misses over at least 200 ms to lose.
pub const DETECTION: DetectionConfig = DetectionConfig {
    acquire_hits: 2,
    lose_misses: 3,
    window_ms: 200,
};

/// PID tracking law. Output magnitude becomes the step count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PidLaw {
    pub kind: PidKind,
    pub schedule: GainSchedule,
    pub output_limit: f32,
    pub integral_limit: f32,
    pub min_step: u32,
    pub max_step: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrackLaw {
    Pid(PidLaw),
    Tiered(StepTable),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Drive {
    Stepper { velocity: u16, acceleration: u8 },
    /// Steps are applied as µs of pulse width.
    Servo { min_pulse: u16, max_pulse: u16 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisSet {
    Both,
    XOnly,
}

impl AxisSet {
    pub fn contains(self, axis: Axis) -> bool {
        match (self, axis) {
            (AxisSet::Both, _) | (AxisSet::XOnly, Axis::X) => true,
            (AxisSet::XOnly, Axis::Y) => false,
        }
    }
}

/// What happens once every tracked axis is inside the dead zone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlignPolicy {
    /// Raise the indicator and stop.
    Complete,
    /// Keep tracking indefinitely.
    Hold,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackingConfig {
    /// Sensor pixel the turret aims through.
    pub aim: PixelPoint,
    pub deadzone: u32,
    pub law: TrackLaw,
    pub drive: Drive,
    pub axes: AxisSet,
    /// Direction that reduces a positive X offset (target right of the aim point).
    pub x_positive: Direction,
    /// Direction that reduces a positive Y offset (target below the aim point).
    pub y_positive: Direction,
    /// Blocking wait after each axis command.
    pub command_gap_ms: u32,
    pub align: AlignPolicy,
}

impl TrackingConfig {
    pub fn positive(&self, axis: Axis) -> Direction {
        match axis {
            Axis::X => self.x_positive,
            Axis::Y => self.y_positive,
        }
    }
}

/// Indicator (laser) level at start and after a stop that is not a completion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndicatorPolicy {
    pub at_start: bool,
    pub on_stop: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AcquisitionConfig {
    pub name: &'static str,
    pub homing: Option<HomingConfig>,
    pub search: Option<SearchConfig>,
    pub detection: DetectionConfig,
    pub tracking: TrackingConfig,
    pub indicator: IndicatorPolicy,
    pub total_timeout_ms: Option<u32>,
    /// Feed raw sensor points instead of median-filtered ones while running.
    pub bypass_filter: bool,
}

impl AcquisitionConfig {
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub const fn with_total_timeout(mut self, timeout_ms: Option<u32>) -> Self {
        self.total_timeout_ms = timeout_ms;
        self
    }

    pub const fn with_homing(mut self, homing: Option<HomingConfig>) -> Self {
        self.homing = homing;
        self
    }

    pub const fn with_search(mut self, search: Option<SearchConfig>) -> Self {
        self.search = search;
        self
    }

    pub const fn with_detection(mut self, detection: DetectionConfig) -> Self {
        self.detection = detection;
        self
    }

    pub const fn with_tracking(mut self, tracking: TrackingConfig) -> Self {
        self.tracking = tracking;
        self
    }

    pub const fn with_aim(mut self, aim: PixelPoint) -> Self {
        self.tracking.aim = aim;
        self
    }

    /// Replace the fixed pre-tracking turn, if this mode homes first.
    pub const fn with_initial_turn(mut self, dir: Direction, pulses: u32) -> Self {
        if let Some(mut homing) = self.homing {
            if let Some(mut turn) = homing.initial_turn {
                turn.dir = dir;
                turn.pulses = pulses;
                homing.initial_turn = Some(turn);
            }
            self.homing = Some(homing);
        }
        self
    }
}

const STEPPER_AXES: (Direction, Direction) = (Direction::Ccw, Direction::Ccw);

/// Continuous laser hold: PID on both axes, never completes, no time limit.
pub const LASER_HOLD: AcquisitionConfig = AcquisitionConfig {
    name: "laser-hold",
    homing: None,
    search: None,
    detection: DETECTION,
    tracking: TrackingConfig {
        aim: PixelPoint::new(160, 140),
        deadzone: 2,
        law: TrackLaw::Pid(PidLaw {
            kind: PidKind::Positional,
            schedule: GainSchedule::flat(PidGains::new(1.5, 0.02, 0.15)),
            output_limit: 80.0,
            integral_limit: 25.0,
            min_step: 1,
            max_step: 30,
        }),
        drive: Drive::Stepper {
            velocity: 40,
            acceleration: 20,
        },
        axes: AxisSet::Both,
        x_positive: STEPPER_AXES.0,
        y_positive: STEPPER_AXES.1,
        command_gap_ms: 10,
        align: AlignPolicy::Hold,
    },
    indicator: IndicatorPolicy {
        at_start: true,
        on_stop: false,
    },
    total_timeout_ms: None,
    bypass_filter: false,
};

/// Laser hold with tiered steps instead of PID.
pub const LASER_HOLD_STEPPED: AcquisitionConfig = LASER_HOLD
    .with_name("laser-hold-stepped")
    .with_tracking(TrackingConfig {
        deadzone: 3,
        law: TrackLaw::Tiered(StepTable::new(3, 5, 10)),
        drive: Drive::Stepper {
            velocity: 10,
            acceleration: 5,
        },
        command_gap_ms: 20,
        ..LASER_HOLD.tracking
    });

/// One-shot stepper aim with a hard time limit.
pub const QUICK_AIM: AcquisitionConfig = AcquisitionConfig {
    name: "quick-aim",
    homing: None,
    search: None,
    detection: DETECTION,
    tracking: TrackingConfig {
        aim: PixelPoint::new(160, 140),
        deadzone: 2,
        law: TrackLaw::Tiered(StepTable::new(2, 5, 10)),
        drive: Drive::Stepper {
            velocity: 10,
            acceleration: 5,
        },
        axes: AxisSet::Both,
        x_positive: STEPPER_AXES.0,
        y_positive: STEPPER_AXES.1,
        command_gap_ms: 20,
        align: AlignPolicy::Complete,
    },
    indicator: IndicatorPolicy {
        at_start: false,
        on_stop: true,
    },
    total_timeout_ms: Some(1990),
    bypass_filter: false,
};

/// One-shot servo aim.
pub const SERVO_AIM: AcquisitionConfig = AcquisitionConfig {
    name: "servo-aim",
    tracking: TrackingConfig {
        aim: PixelPoint::new(160, 100),
        deadzone: 3,
        law: TrackLaw::Tiered(StepTable::new(1, 3, 5)),
        drive: Drive::Servo {
            min_pulse: 500,
            max_pulse: 2500,
        },
        // Pulse width grows toward +Y but away from +X.
        x_positive: Direction::Ccw,
        y_positive: Direction::Cw,
        ..QUICK_AIM.tracking
    },
    indicator: IndicatorPolicy {
        at_start: false,
        on_stop: false,
    },
    ..QUICK_AIM
};

/// Home, sweep the pan axis until the target shows up, then center it.
pub const SWEEP_ACQUIRE: AcquisitionConfig = AcquisitionConfig {
    name: "sweep",
    homing: Some(HomingConfig {
        axis: Axis::Y,
        mode: HomeMode::Nearest,
        dwell_ms: 100,
        detect_ms: Some(100),
        other_axis_dwell_ms: None,
        initial_turn: None,
        skip_if_acquired: true,
    }),
    search: Some(SearchConfig {
        axis: Axis::X,
        dir: Direction::Cw,
        step_pulses: 200,
        max_travel_pulses: 1600,
        velocity: 30,
        acceleration: 10,
        settle_ms: 100,
        timeout_ms: Some(2500),
        resume_budget_ms: 1000,
    }),
    detection: DETECTION,
    tracking: TrackingConfig {
        aim: PixelPoint::new(160, 140),
        deadzone: 5,
        law: TrackLaw::Tiered(StepTable::new(10, 15, 15)),
        drive: Drive::Stepper {
            velocity: 20,
            acceleration: 10,
        },
        axes: AxisSet::Both,
        x_positive: STEPPER_AXES.0,
        y_positive: STEPPER_AXES.1,
        command_gap_ms: 20,
        align: AlignPolicy::Complete,
    },
    indicator: IndicatorPolicy {
        at_start: false,
        on_stop: false,
    },
    total_timeout_ms: Some(4000),
    bypass_filter: false,
};

/// Home pan, make a fixed turn, then center on X only with PID.
///
/// The default turn is 90° clockwise; the key handlers swap in their own.
pub const KEY_TURN: AcquisitionConfig = AcquisitionConfig {
    name: "key-turn",
    homing: Some(HomingConfig {
        axis: Axis::X,
        mode: HomeMode::Nearest,
        dwell_ms: 1000,
        detect_ms: None,
        other_axis_dwell_ms: None,
        initial_turn: Some(Turn {
            axis: Axis::X,
            dir: Direction::Cw,
            pulses: 2 * PULSES_PER_45_DEG,
            velocity: 40,
            acceleration: 20,
            settle_ms: 600,
        }),
        skip_if_acquired: false,
    }),
    search: None,
    detection: DETECTION,
    tracking: TrackingConfig {
        aim: PixelPoint::new(150, 130),
        deadzone: 5,
        law: TrackLaw::Pid(PidLaw {
            kind: PidKind::Positional,
            schedule: GainSchedule::flat(PidGains::new(1.2, 0.05, 0.1)),
            output_limit: 15.0,
            integral_limit: 20.0,
            min_step: 1,
            max_step: 20,
        }),
        drive: Drive::Stepper {
            velocity: 28,
            acceleration: 18,
        },
        axes: AxisSet::XOnly,
        x_positive: STEPPER_AXES.0,
        y_positive: STEPPER_AXES.1,
        command_gap_ms: 20,
        align: AlignPolicy::Complete,
    },
    indicator: IndicatorPolicy {
        at_start: false,
        on_stop: true,
    },
    total_timeout_ms: Some(5000),
    bypass_filter: true,
};
