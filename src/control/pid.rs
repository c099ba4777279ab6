// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Generic PID controller for closed-loop control.
//!
//! Works in `no_std` and does not allocate memory. Two control laws are supported:
//!
//! - [`PidKind::Positional`]: `u = kp·e + ki·Σe + kd·(e − e₁)`
//! - [`PidKind::Incremental`]: `u += kp·(e − e₁) + ki·e + kd·(e − 2e₁ + e₂)`
//!
//! The integral accumulator and the output are clamped after every update. Gains, limits and the
//! target may be changed between updates, which is how gain scheduling is layered on top.

/// Control law used by [`Pid::compute`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PidKind {
    #[default]
    Positional,
    Incremental,
}

/// One set of proportional, integral and derivative gains.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PidGains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl PidGains {
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self { kp, ki, kd }
    }
}

/// PID controller with tunable gains and output clamping.
#[derive(Clone, Debug)]
pub struct Pid {
    gains: PidGains,
    kind: PidKind,

    target: f32,

    /// Error of the latest update
    error: f32,
    /// Error one update back
    prev_error: f32,
    /// Error two updates back (incremental form only)
    prev_prev_error: f32,

    /// Integrator state (positional form only)
    integral: f32,
    output: f32,

    /// Output clamp
    out_min: f32,
    out_max: f32,

    /// Integral anti-windup clamp
    int_min: f32,
    int_max: f32,

    enabled: bool,
}

impl Pid {
    /// Create a new positional PID controller.
    ///
    /// Output is clamped to ±1000 and the integrator to ±100 until configured otherwise.
    pub fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            gains: PidGains::new(kp, ki, kd),
            kind: PidKind::Positional,

            target: 0.0,

            error: 0.0,
            prev_error: 0.0,
            prev_prev_error: 0.0,

            integral: 0.0,
            output: 0.0,

            out_min: -1000.0,
            out_max: 1000.0,

            int_min: -100.0,
            int_max: 100.0,

            enabled: true,
        }
    }

    pub fn with_kind(mut self, kind: PidKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_gains(mut self, gains: PidGains) -> Self {
        self.gains = gains;
        self
    }

    /// Set output limits.
    pub fn with_output_limits(mut self, min: f32, max: f32) -> Self {
        self.set_output_limits(min, max);
        self
    }

    /// Set integral limits for anti-windup.
    pub fn with_integral_limits(mut self, min: f32, max: f32) -> Self {
        self.set_integral_limits(min, max);
        self
    }

    pub fn with_target(mut self, target: f32) -> Self {
        self.target = target;
        self
    }

    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_output_limits(&mut self, min: f32, max: f32) {
        self.out_min = min;
        self.out_max = max;
    }

    pub fn set_integral_limits(&mut self, min: f32, max: f32) {
        self.int_min = min;
        self.int_max = max;
    }

    pub fn kind(&self) -> PidKind {
        self.kind
    }

    /// Enable or disable the controller. Disabling zeroes the output and the integrator.
    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.output = 0.0;
            self.integral = 0.0;
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Last computed output.
    #[inline]
    pub fn output(&self) -> f32 {
        self.output
    }

    #[inline]
    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Reset integrator, error history and output. Gains, limits and target are kept.
    pub fn reset(&mut self) {
        self.error = 0.0;
        self.prev_error = 0.0;
        self.prev_prev_error = 0.0;
        self.integral = 0.0;
        self.output = 0.0;
    }

    /// Update the controller with the current process value and return the clamped output.
    ///
    /// A disabled controller returns 0 and leaves its state untouched.
    pub fn compute(&mut self, current: f32) -> f32 {
        if !self.enabled {
            return 0.0;
        }

        let PidGains { kp, ki, kd } = self.gains;
        self.error = self.target - current;

        match self.kind {
            PidKind::Positional => {
                self.integral = (self.integral + self.error).clamp(self.int_min, self.int_max);

                let p = kp * self.error;
                let i = ki * self.integral;
                let d = kd * (self.error - self.prev_error);
                self.output = (p + i + d).clamp(self.out_min, self.out_max);
            }
            PidKind::Incremental => {
                let p = kp * (self.error - self.prev_error);
                let i = ki * self.error;
                let d = kd * (self.error - 2.0 * self.prev_error + self.prev_prev_error);
                self.output = (self.output + p + i + d).clamp(self.out_min, self.out_max);
                self.prev_prev_error = self.prev_error;
            }
        }

        self.prev_error = self.error;
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_only() {
        let mut pid = Pid::new(1.0, 0.0, 0.0).with_target(10.0);
        assert_eq!(pid.compute(7.0), 3.0);
        assert_eq!(pid.compute(7.0), 3.0);
    }

    #[test]
    fn output_is_clamped() {
        let mut pid = Pid::new(1.0, 0.0, 0.0)
            .with_output_limits(-2.0, 2.0)
            .with_target(10.0);
        assert_eq!(pid.compute(7.0), 2.0);
        assert_eq!(pid.compute(20.0), -2.0);
    }

    #[test]
    fn integral_saturates_and_drives_output_to_clamp() {
        let mut pid = Pid::new(0.0, 1.0, 0.0)
            .with_integral_limits(-5.0, 5.0)
            .with_output_limits(-4.0, 4.0)
            .with_target(1.0);
        for _ in 0..20 {
            pid.compute(0.0);
        }
        assert_eq!(pid.integral(), 5.0);
        assert_eq!(pid.output(), 4.0);
    }

    #[test]
    fn without_integral_gain_output_stays_constant() {
        let mut pid = Pid::new(0.5, 0.0, 0.0).with_target(4.0);
        for _ in 0..50 {
            assert_eq!(pid.compute(0.0), 2.0);
        }
    }

    #[test]
    fn derivative_acts_on_error_change() {
        let mut pid = Pid::new(0.0, 0.0, 2.0).with_target(0.0);
        assert_eq!(pid.compute(-3.0), 6.0);
        assert_eq!(pid.compute(-3.0), 0.0);
        assert_eq!(pid.compute(-1.0), -4.0);
    }

    #[test]
    fn incremental_accumulates_deltas() {
        let mut pid = Pid::new(1.0, 0.5, 0.0)
            .with_kind(PidKind::Incremental)
            .with_target(10.0);
        // e = 10: Δ = 1·10 + 0.5·10 = 15
        assert_eq!(pid.compute(0.0), 15.0);
        // e = 10: Δ = 0 + 5 = 5
        assert_eq!(pid.compute(0.0), 20.0);
        // e = 4: Δ = -6 + 2 = -4
        assert_eq!(pid.compute(6.0), 16.0);
    }

    #[test]
    fn incremental_uses_two_step_history() {
        let mut pid = Pid::new(0.0, 0.0, 1.0)
            .with_kind(PidKind::Incremental)
            .with_target(0.0);
        // e: -1, -3, -2  =>  Δd: -1, (-3 + 2 + 0) = -1, (-2 + 6 - 1) = 3
        assert_eq!(pid.compute(1.0), -1.0);
        assert_eq!(pid.compute(3.0), -2.0);
        assert_eq!(pid.compute(2.0), 1.0);
    }

    #[test]
    fn disabled_controller_is_inert() {
        let mut pid = Pid::new(1.0, 1.0, 0.0).with_target(5.0);
        pid.compute(0.0);
        pid.enable(false);
        assert_eq!(pid.output(), 0.0);
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.compute(0.0), 0.0);
        assert_eq!(pid.integral(), 0.0);

        pid.enable(true);
        assert_eq!(pid.compute(0.0), 10.0);
    }

    #[test]
    fn reset_keeps_configuration() {
        let mut pid = Pid::new(2.0, 1.0, 0.0)
            .with_output_limits(-50.0, 50.0)
            .with_target(3.0);
        pid.compute(0.0);
        pid.reset();
        assert_eq!(pid.output(), 0.0);
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.gains(), PidGains::new(2.0, 1.0, 0.0));
        assert_eq!(pid.target(), 3.0);
        assert_eq!(pid.compute(0.0), 9.0);
    }
}
