// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command interface to the pan/tilt drive.
//!
//! The drive never reports completion; every wait after a command is time-based on the caller's
//! side. Commands are fire-and-forget, and implementations log their own transport failures.

/// Turret axis. X pans, Y tilts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Rotation direction as seen by the drive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Cw,
    Ccw,
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Cw => Direction::Ccw,
            Direction::Ccw => Direction::Cw,
        }
    }
}

/// Zero-return strategy passed through to the drive's own homing routine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HomeMode {
    /// Shortest path to the stored zero.
    #[default]
    Nearest,
    /// Stored zero, approached in the configured direction.
    Directional,
    /// Sensorless stall detection.
    Sensorless,
    /// External limit switch.
    LimitSwitch,
}

/// Sink for actuator commands.
pub trait Actuator {
    /// Relative move of `steps` pulses.
    fn move_steps(
        &mut self,
        axis: Axis,
        dir: Direction,
        velocity: u16,
        acceleration: u8,
        steps: u32,
    );

    /// Halt `axis` immediately.
    fn stop(&mut self, axis: Axis);

    /// Start the drive's zero-return routine on `axis`.
    fn home(&mut self, axis: Axis, mode: HomeMode);

    /// Servo pulse width in microseconds.
    fn set_pulse_width(&mut self, axis: Axis, pulse_us: u16);
}
