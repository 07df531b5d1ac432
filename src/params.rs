/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * tunable constants of the flock: neighbourhood radii, steering weights,
 * speed limits, banking and camera smoothing. Several of these can be
 * changed live through the UI, so the struct also provides snapshot-based
 * change detection and validation.
 */

use thiserror::Error;

/// How a tick orders the reads and writes of agent state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Agents update one after another in insertion order; later agents see
    /// the already-updated state of earlier ones.
    #[default]
    Sequential,
    /// Every member's neighbourhood is gathered first, then all agents move.
    Simultaneous,
}

#[derive(Debug, Error, PartialEq)]
pub enum ParamsError {
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("separation radius {separation} exceeds perception radius {perception}")]
    SeparationBeyondPerception { separation: f32, perception: f32 },
    #[error("minimum speed {min} must be positive and no greater than maximum speed {max}")]
    SpeedRange { min: f32, max: f32 },
    #[error("bank gain {0} is outside 0..=60")]
    BankGain(f32),
}

// Parameters for the simulation, partly adjustable via UI
#[derive(Clone, Debug)]
pub struct SimulationParams {
    pub initial_boids: usize,
    pub perception_radius: f32,
    pub separation_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub goal_weight: f32,
    // Rate (per second) at which velocity blends toward the steering target
    pub steer_rate: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    // Degrees of roll per degree of yaw change in one tick
    pub bank_gain: f32,
    pub turn_bank_rate: f32,
    pub level_bank_rate: f32,
    pub camera_smoothing: f32,
    pub update_mode: UpdateMode,

    // Internal state for tracking changes
    previous_values: Option<ParamSnapshot>,
}

// A snapshot of the UI-editable values used for change detection
#[derive(Clone, Debug, PartialEq)]
struct ParamSnapshot {
    perception_radius: f32,
    separation_radius: f32,
    separation_weight: f32,
    alignment_weight: f32,
    cohesion_weight: f32,
    goal_weight: f32,
    max_speed: f32,
    bank_gain: f32,
    update_mode: UpdateMode,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_boids: 30,
            perception_radius: 20.0,
            separation_radius: 8.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 0.8,
            goal_weight: 1.2,
            steer_rate: 5.0,
            min_speed: 2.0,
            max_speed: 20.0,
            bank_gain: 10.0,
            turn_bank_rate: 10.0,
            level_bank_rate: 3.0,
            camera_smoothing: 3.0,
            update_mode: UpdateMode::Sequential,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            perception_radius: self.perception_radius,
            separation_radius: self.separation_radius,
            separation_weight: self.separation_weight,
            alignment_weight: self.alignment_weight,
            cohesion_weight: self.cohesion_weight,
            goal_weight: self.goal_weight,
            max_speed: self.max_speed,
            bank_gain: self.bank_gain,
            update_mode: self.update_mode,
        }
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    // Check if any UI-editable parameter changed since the last snapshot
    pub fn detect_changes(&self) -> bool {
        match &self.previous_values {
            Some(prev) => *prev != self.snapshot(),
            None => false,
        }
    }

    /// Check every value the simulation relies on.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let non_negative = [
            ("perception radius", self.perception_radius),
            ("separation radius", self.separation_radius),
            ("separation weight", self.separation_weight),
            ("alignment weight", self.alignment_weight),
            ("cohesion weight", self.cohesion_weight),
            ("goal weight", self.goal_weight),
            ("steer rate", self.steer_rate),
            ("turn bank rate", self.turn_bank_rate),
            ("level bank rate", self.level_bank_rate),
            ("camera smoothing", self.camera_smoothing),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ParamsError::Negative { name, value });
            }
        }

        if self.separation_radius > self.perception_radius {
            return Err(ParamsError::SeparationBeyondPerception {
                separation: self.separation_radius,
                perception: self.perception_radius,
            });
        }

        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed && self.max_speed.is_finite()) {
            return Err(ParamsError::SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        if !(0.0..=60.0).contains(&self.bank_gain) {
            return Err(ParamsError::BankGain(self.bank_gain));
        }

        Ok(())
    }

    // Get parameter ranges for UI sliders
    pub fn get_weight_range() -> std::ops::RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn get_radius_range() -> std::ops::RangeInclusive<f32> {
        1.0..=60.0
    }

    pub fn get_max_speed_range() -> std::ops::RangeInclusive<f32> {
        2.0..=60.0
    }

    pub fn get_bank_gain_range() -> std::ops::RangeInclusive<f32> {
        0.0..=20.0
    }
}
