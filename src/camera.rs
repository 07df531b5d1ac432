/*
 * Camera Module
 *
 * This module defines the chase camera that follows the flock. Each tick it
 * derives a target eye / look-at pair from the flock centroid and average
 * heading according to the current mode, then eases the current eye and
 * look-at toward that target.
 */

use nannou::prelude::*;

use crate::boid::Boid;
use crate::math::{self, VectorExt};

pub const ZOOM_MIN: f32 = -25.0;
pub const ZOOM_MAX: f32 = 150.0;
pub const ZOOM_STEP: f32 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CameraMode {
    /// Looking down on the flock from above.
    Tower,
    /// Chasing from behind and slightly above.
    #[default]
    Behind,
    /// Flying alongside.
    Side,
}

impl CameraMode {
    pub fn next(self) -> Self {
        match self {
            CameraMode::Tower => CameraMode::Behind,
            CameraMode::Behind => CameraMode::Side,
            CameraMode::Side => CameraMode::Tower,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Tower => "tower",
            CameraMode::Behind => "behind",
            CameraMode::Side => "side",
        }
    }
}

/// Where the flock is and which way it is heading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlockSummary {
    pub centroid: Vec3,
    pub heading: Vec3,
    pub count: usize,
}

impl Default for FlockSummary {
    fn default() -> Self {
        Self {
            centroid: Vec3::ZERO,
            heading: Vec3::Z,
            count: 0,
        }
    }
}

impl FlockSummary {
    pub fn from_boids<'a, I>(boids: I) -> Self
    where
        I: IntoIterator<Item = &'a Boid>,
    {
        let mut position_sum = Vec3::ZERO;
        // Seeded with +Z so a motionless flock still has a heading
        let mut velocity_sum = Vec3::Z;
        let mut count = 0;

        for boid in boids {
            position_sum += boid.position;
            velocity_sum += boid.velocity;
            count += 1;
        }

        if count == 0 {
            return Self::default();
        }

        let mut centroid = position_sum / count as f32;
        if !centroid.is_finite() {
            log::warn!("flock centroid is not finite ({centroid:?}), recentring camera on origin");
            centroid = Vec3::ZERO;
        }

        Self {
            centroid,
            heading: velocity_sum.safe_normalize_or(Vec3::Z),
            count,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FlockCamera {
    pub mode: CameraMode,
    pub eye: Vec3,
    pub at: Vec3,
    pub zoom_dist: f32,
}

impl Default for FlockCamera {
    fn default() -> Self {
        Self::new(CameraMode::default())
    }
}

impl FlockCamera {
    pub fn new(mode: CameraMode) -> Self {
        Self {
            mode,
            // Start away from the origin so the first frames are not inside the flock
            eye: vec3(0.0, 50.0, 50.0),
            at: Vec3::ZERO,
            zoom_dist: 0.0,
        }
    }

    /// Eye and look-at the camera is easing toward.
    pub fn target(&self, summary: &FlockSummary) -> (Vec3, Vec3) {
        let center = summary.centroid;
        let heading = summary.heading;
        let zoom = self.zoom_dist;

        let eye = match self.mode {
            CameraMode::Tower => center + vec3(0.0, 60.0 + zoom, -1.0),
            CameraMode::Behind => center - heading * (35.0 + zoom) + vec3(0.0, 12.0 + zoom * 0.2, 0.0),
            CameraMode::Side => {
                let side = heading.cross(Vec3::Y).safe_normalize_or(Vec3::X);
                center + side * (40.0 + zoom) + vec3(0.0, 2.0, 0.0)
            }
        };

        (eye, center)
    }

    // Ease toward the target at `smoothing` per second
    pub fn update(&mut self, dt: f32, summary: &FlockSummary, smoothing: f32) {
        let (target_eye, target_at) = self.target(summary);
        let factor = math::smoothing_factor(smoothing, dt);

        self.eye = math::lerp(self.eye, target_eye, factor);
        self.at = math::lerp(self.at, target_at, factor);
    }

    pub fn cycle_mode(&mut self) -> CameraMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn adjust_zoom(&mut self, delta: f32) {
        self.zoom_dist = (self.zoom_dist + delta).clamp(ZOOM_MIN, ZOOM_MAX);
    }
}
