// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop stepper drives on a shared Emm_V5 serial bus.
//!
//! Only the handful of commands the turret needs are encoded. Every frame is
//! `addr | function | args… | 0x6B`; replies are not read back.

use core::fmt::Debug;

use log::warn;

use crate::motors::{Actuator, Axis, Direction, HomeMode};

/// Fixed trailer byte on every command.
pub const CHECK_BYTE: u8 = 0x6B;

const FN_ENABLE: u8 = 0xF3;
const FN_POSITION: u8 = 0xFD;
const FN_STOP: u8 = 0xFE;
const FN_ORIGIN_RETURN: u8 = 0x9A;

/// Byte transport to the drive bus (usually a USART).
pub trait CommandSink {
    type Error;

    fn send(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}

/// Two drives on one bus, one per axis.
pub struct EmmV5<S> {
    sink: S,
    x_addr: u8,
    y_addr: u8,
}

impl<S: CommandSink> EmmV5<S> {
    /// Default addressing: X = 1, Y = 2.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            x_addr: 1,
            y_addr: 2,
        }
    }

    pub fn with_addresses(mut self, x: u8, y: u8) -> Self {
        self.x_addr = x;
        self.y_addr = y;
        self
    }

    #[inline]
    pub fn address(&self, axis: Axis) -> u8 {
        match axis {
            Axis::X => self.x_addr,
            Axis::Y => self.y_addr,
        }
    }

    /// Energize (`true`) or release (`false`) the motor.
    pub fn enable(&mut self, axis: Axis, on: bool) -> Result<(), S::Error> {
        let frame = [self.address(axis), FN_ENABLE, 0xAB, on as u8, 0, CHECK_BYTE];
        self.sink.send(&frame)
    }

    /// Position move of `pulses` at `velocity` rpm and acceleration level `acceleration`.
    pub fn position(
        &mut self,
        axis: Axis,
        dir: Direction,
        velocity: u16,
        acceleration: u8,
        pulses: u32,
        absolute: bool,
    ) -> Result<(), S::Error> {
        let vel = velocity.to_be_bytes();
        let clk = pulses.to_be_bytes();
        let frame = [
            self.address(axis),
            FN_POSITION,
            direction_code(dir),
            vel[0],
            vel[1],
            acceleration,
            clk[0],
            clk[1],
            clk[2],
            clk[3],
            absolute as u8,
            0,
            CHECK_BYTE,
        ];
        self.sink.send(&frame)
    }

    pub fn stop_now(&mut self, axis: Axis) -> Result<(), S::Error> {
        let frame = [self.address(axis), FN_STOP, 0x98, 0, CHECK_BYTE];
        self.sink.send(&frame)
    }

    pub fn origin_return(&mut self, axis: Axis, mode: HomeMode) -> Result<(), S::Error> {
        let frame = [
            self.address(axis),
            FN_ORIGIN_RETURN,
            home_code(mode),
            0,
            CHECK_BYTE,
        ];
        self.sink.send(&frame)
    }

    pub fn free(self) -> S {
        self.sink
    }
}

#[inline]
fn direction_code(dir: Direction) -> u8 {
    match dir {
        Direction::Cw => 0,
        Direction::Ccw => 1,
    }
}

#[inline]
fn home_code(mode: HomeMode) -> u8 {
    match mode {
        HomeMode::Nearest => 0,
        HomeMode::Directional => 1,
        HomeMode::Sensorless => 2,
        HomeMode::LimitSwitch => 3,
    }
}

impl<S> Actuator for EmmV5<S>
where
    S: CommandSink,
    S::Error: Debug,
{
    fn move_steps(
        &mut self,
        axis: Axis,
        dir: Direction,
        velocity: u16,
        acceleration: u8,
        steps: u32,
    ) {
        if let Err(e) = self.position(axis, dir, velocity, acceleration, steps, false) {
            warn!("{:?} move failed: {:?}", axis, e);
        }
    }

    fn stop(&mut self, axis: Axis) {
        if let Err(e) = self.stop_now(axis) {
            warn!("{:?} stop failed: {:?}", axis, e);
        }
    }

    fn home(&mut self, axis: Axis, mode: HomeMode) {
        if let Err(e) = self.origin_return(axis, mode) {
            warn!("{:?} home failed: {:?}", axis, e);
        }
    }

    fn set_pulse_width(&mut self, axis: Axis, _pulse_us: u16) {
        warn!("{:?}: stepper drive ignores pulse-width commands", axis);
    }
}
