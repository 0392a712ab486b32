use glam::DVec2;
use serde::Serialize;

use crate::api::config::ShotConfig;
use crate::core::geometry::{aim_direction, lerp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotState {
    Idle,
    Charging,
}

/// A released shot: the cue ball's new velocity and what produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub angle: f64,
    pub power: f64,
    pub velocity: DVec2,
}

impl Strike {
    fn new(angle: f64, power: f64) -> Self {
        Self {
            angle,
            power,
            velocity: aim_direction(angle) * power,
        }
    }
}

/// Aim smoothing and charge-to-power for the cue.
///
/// Every entry point takes `shootable`, the engine's `can_shoot()` at the
/// moment of the call, except [`ShotController::tick`], which only needs the
/// cue itself at rest on the table. Requests made while the cue can't be
/// played are dropped. A charge in progress freezes instead of cancelling.
#[derive(Debug, Clone)]
pub struct ShotController {
    config: ShotConfig,
    state: ShotState,
    charge_seconds: f64,
    aim: f64,
    target_aim: f64,
}

impl ShotController {
    pub fn new(config: ShotConfig) -> Self {
        Self {
            config,
            state: ShotState::Idle,
            charge_seconds: 0.0,
            aim: 0.0,
            target_aim: 0.0,
        }
    }

    pub fn state(&self) -> ShotState {
        self.state
    }

    pub fn is_charging(&self) -> bool {
        self.state == ShotState::Charging
    }

    /// Smoothed angle the cue is pointing at.
    pub fn aim(&self) -> f64 {
        self.aim
    }

    pub fn target_aim(&self) -> f64 {
        self.target_aim
    }

    pub fn power(&self) -> f64 {
        match self.state {
            ShotState::Idle => 0.0,
            ShotState::Charging => {
                (self.charge_seconds * self.config.charge_rate).min(self.config.max_power)
            }
        }
    }

    pub fn begin(&mut self, shootable: bool) {
        if shootable && self.state == ShotState::Idle {
            self.state = ShotState::Charging;
            self.charge_seconds = 0.0;
        }
    }

    pub fn release(&mut self, shootable: bool) -> Option<Strike> {
        if !shootable || self.state != ShotState::Charging {
            return None;
        }
        let strike = Strike::new(self.aim, self.power());
        self.state = ShotState::Idle;
        self.charge_seconds = 0.0;
        Some(strike)
    }

    pub fn cancel(&mut self) {
        self.state = ShotState::Idle;
        self.charge_seconds = 0.0;
    }

    pub fn adjust_aim(&mut self, delta: f64, shootable: bool) {
        if shootable && delta.is_finite() {
            self.target_aim += delta;
        }
    }

    /// One "aim left/right" step of the configured size. Only the sign of
    /// `direction` matters; zero does nothing.
    pub fn step_aim(&mut self, direction: f64, shootable: bool) {
        if direction == 0.0 {
            return;
        }
        self.adjust_aim(direction.signum() * self.config.aim_step, shootable);
    }

    /// Strike immediately at `angle`, bypassing the charge.
    pub fn strike(&mut self, angle: f64, power: f64, shootable: bool) -> Option<Strike> {
        if !shootable || !angle.is_finite() || power.is_nan() {
            return None;
        }
        self.aim = angle;
        self.target_aim = angle;
        self.state = ShotState::Idle;
        self.charge_seconds = 0.0;
        Some(Strike::new(angle, power.clamp(0.0, self.config.max_power)))
    }

    /// Advance aim smoothing and the charge clock by one tick.
    pub fn tick(&mut self, tick_seconds: f64, shootable: bool) {
        if !shootable {
            return;
        }
        self.aim = lerp(self.aim, self.target_aim, self.config.aim_lerp);
        if self.state == ShotState::Charging {
            self.charge_seconds += tick_seconds;
        }
    }
}

impl Default for ShotController {
    fn default() -> Self {
        Self::new(ShotConfig::default())
    }
}
