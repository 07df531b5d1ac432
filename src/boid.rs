/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * A member boid steers by four rules each tick:
 * 1. Separation: Avoid crowding neighbors, harder the closer they are
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 * 4. Goal seeking: Steer towards the leader
 *
 * The leader ignores the rules and flies along the heading and speed set by
 * the input layer. Both roles then derive banking from their turn rate and
 * advance the wing-flap animation.
 */

use nannou::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::input::{ControlKey, KeySnapshot};
use crate::math::{self, VectorExt};
use crate::params::SimulationParams;

pub const MAX_ROLL: f32 = 60.0;
pub const PITCH_LIMIT: f32 = 89.0;
// Per-tick leader control steps
pub const TURN_STEP: f32 = 3.0;
pub const ACCEL_STEP: f32 = 0.2;

// Neighbours closer than this are treated as coincident and ignored
const COINCIDENT_DISTANCE: f32 = 0.001;
// Velocities slower than this (squared) get kicked back up to min speed
const STALL_SPEED_SQ: f32 = 0.1;
// Yaw change (degrees per tick) below which the bird counts as flying level
const LEVEL_TURN: f32 = 0.1;
const WING_AMPLITUDE: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Steered by the flocking rules.
    Member,
    /// Steered externally; the goal every member seeks.
    Leader,
}

#[derive(Clone, Debug)]
pub struct Boid {
    pub position: Vec3,
    pub velocity: Vec3,
    pub yaw: f32,
    pub prev_yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub anim_phase: f32,
    pub flap_speed: f32,
    pub color: Rgb<u8>,
    pub role: Role,
}

impl Boid {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            prev_yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            speed: 0.0,
            max_speed: 20.0,
            anim_phase: 0.0,
            flap_speed: 20.0,
            color: rgb(0, 255, 0),
            role: Role::Member,
        }
    }

    /// A member with a random pose inside the spawn volume above the tower.
    pub fn random<R: Rng>(rng: &mut R, max_speed: f32) -> Self {
        let position = vec3(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(5.0..15.0),
            rng.gen_range(-10.0..10.0),
        );
        let yaw = rng.gen_range(0.0..360.0);

        Self {
            yaw,
            prev_yaw: yaw,
            pitch: rng.gen_range(-20.0..20.0),
            max_speed,
            // Desynchronised wing beats, some birds flap faster than others
            anim_phase: rng.gen_range(0.0..TAU),
            flap_speed: rng.gen_range(15.0..25.0),
            ..Self::new(position)
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_leader(&self) -> bool {
        self.role == Role::Leader
    }

    /// Unit vector along the current yaw / pitch.
    pub fn forward(&self) -> Vec3 {
        math::forward_from(self.yaw, self.pitch)
    }

    /// Vertical wing-tip offset for the current animation phase.
    pub fn wing_offset(&self) -> f32 {
        self.anim_phase.sin() * WING_AMPLITUDE
    }

    /// Advance one tick. Members steer from `neighborhood`; the leader
    /// ignores it.
    pub fn update(&mut self, dt: f32, neighborhood: &Neighborhood, params: &SimulationParams) {
        match self.role {
            Role::Member => self.steer(dt, neighborhood, params),
            Role::Leader => self.fly_directed(dt),
        }
        self.animate(dt, params);
    }

    fn steer(&mut self, dt: f32, neighborhood: &Neighborhood, params: &SimulationParams) {
        let steering = neighborhood.steering(params);

        // No usable direction this tick, keep the current velocity
        if !steering.is_degenerate() {
            let desired = steering.normalize() * self.max_speed;
            self.velocity = math::lerp(
                self.velocity,
                desired,
                math::smoothing_factor(params.steer_rate, dt),
            );
        }

        let stalled = self.velocity.length_squared() < STALL_SPEED_SQ;
        if stalled {
            self.velocity = math::direction_or(self.velocity, Vec3::Z) * params.min_speed;
        }

        self.position += self.velocity * dt;

        if let Some((yaw, pitch)) = math::heading_from(self.velocity) {
            self.yaw = yaw;
            self.pitch = pitch;
        }

        self.speed = if stalled {
            params.min_speed
        } else {
            self.velocity.length()
        };
        self.limit_speed();
    }

    fn fly_directed(&mut self, dt: f32) {
        self.speed = self.speed.clamp(0.0, self.max_speed);
        self.velocity = self.forward().safe_normalize() * self.speed;
        self.position += self.velocity * dt;
    }

    // Rounding in the velocity blend can leave the speed a hair over the cap
    fn limit_speed(&mut self) {
        if self.speed > self.max_speed {
            if self.speed > 0.0 {
                self.velocity *= self.max_speed / self.speed;
            }
            self.speed = self.max_speed;
        }
    }

    fn animate(&mut self, dt: f32, params: &SimulationParams) {
        let yaw_diff = math::wrap_yaw_delta(self.yaw, self.prev_yaw);

        // Turning right (negative yaw change) banks right (positive roll)
        let target_roll = (yaw_diff * -params.bank_gain).clamp(-MAX_ROLL, MAX_ROLL);

        // Recover to level flight more slowly than rolling into a turn
        let bank_rate = if yaw_diff.abs() < LEVEL_TURN {
            params.level_bank_rate
        } else {
            params.turn_bank_rate
        };
        self.roll += (target_roll - self.roll) * math::smoothing_factor(bank_rate, dt);
        self.roll = self.roll.clamp(-MAX_ROLL, MAX_ROLL);

        let flap_factor = if self.max_speed > 0.0 {
            1.0 + self.speed / self.max_speed
        } else {
            1.0
        };
        self.anim_phase = math::wrap_phase(self.anim_phase + self.flap_speed * flap_factor * dt);

        self.prev_yaw = self.yaw;
    }

    /// Apply one tick of keyboard control to the heading and speed.
    pub fn apply_controls(&mut self, keys: &KeySnapshot) {
        if keys.is_down(ControlKey::YawLeft) {
            self.yaw += TURN_STEP;
        }
        if keys.is_down(ControlKey::YawRight) {
            self.yaw -= TURN_STEP;
        }
        self.yaw = math::wrap_degrees(self.yaw);

        if keys.is_down(ControlKey::PitchUp) {
            self.pitch = (self.pitch + TURN_STEP).min(PITCH_LIMIT);
        }
        if keys.is_down(ControlKey::PitchDown) {
            self.pitch = (self.pitch - TURN_STEP).max(-PITCH_LIMIT);
        }

        if keys.is_down(ControlKey::Accelerate) {
            self.speed = (self.speed + ACCEL_STEP).min(self.max_speed);
        }
        if keys.is_down(ControlKey::Decelerate) {
            self.speed = (self.speed - ACCEL_STEP).max(0.0);
        }
        if keys.is_down(ControlKey::Stop) {
            self.speed = 0.0;
        }
    }
}

/// Steering inputs a member gathers from the rest of the flock.
///
/// Each field is already a direction (or zero); `steering` only weights
/// and sums them.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Neighborhood {
    pub separation: Vec3,
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub goal: Vec3,
    pub neighbors: usize,
}

impl Neighborhood {
    pub fn gather<'a, I>(me: &Boid, others: I, goal: Option<Vec3>, params: &SimulationParams) -> Self
    where
        I: IntoIterator<Item = &'a Boid>,
    {
        let mut separation = Vec3::ZERO;
        let mut velocity_sum = Vec3::ZERO;
        let mut position_sum = Vec3::ZERO;
        let mut neighbors = 0;

        for other in others {
            let distance = me.position.distance(other.position);
            if distance <= COINCIDENT_DISTANCE || distance > params.perception_radius {
                continue;
            }

            if distance < params.separation_radius {
                // Closer neighbours push harder
                let diff = me.position - other.position;
                let away = if diff.is_degenerate() { diff } else { diff.normalize() };
                separation += away / distance;
            }

            velocity_sum += other.velocity;
            position_sum += other.position;
            neighbors += 1;
        }

        let cohesion = if neighbors > 0 {
            let centroid = position_sum / neighbors as f32;
            (centroid - me.position).safe_normalize()
        } else {
            Vec3::ZERO
        };

        let goal = goal
            .map(|target| (target - me.position).safe_normalize())
            .unwrap_or(Vec3::ZERO);

        Self {
            separation,
            alignment: velocity_sum.safe_normalize(),
            cohesion,
            goal,
            neighbors,
        }
    }

    /// Weighted sum of the four steering directions.
    pub fn steering(&self, params: &SimulationParams) -> Vec3 {
        self.separation * params.separation_weight
            + self.alignment * params.alignment_weight
            + self.cohesion * params.cohesion_weight
            + self.goal * params.goal_weight
    }
}
