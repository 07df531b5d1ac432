/*
 * Flock Module
 *
 * This module owns the simulated world: every boid (in a generational arena
 * with stable handles), the one leader the flock follows, the obstacle
 * spheres, the scene flags and the chase camera. It runs the per-tick
 * update order and applies the add / remove policy.
 *
 * Update order matters. In the default sequential mode boids are updated
 * one at a time in insertion order, so a boid late in the order reads the
 * positions its predecessors already moved to this tick. The simultaneous
 * mode gathers every neighbourhood before anything moves.
 */

use nannou::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotmap::{new_key_type, SlotMap};

use crate::boid::{Boid, Neighborhood, Role};
use crate::camera::{FlockCamera, FlockSummary, ZOOM_STEP};
use crate::input::{ControlKey, KeySnapshot};
use crate::params::{ParamsError, SimulationParams, UpdateMode};

new_key_type! {
    /// Stable handle to a boid in a flock.
    pub struct BoidId;
}

/// Static sphere in the scene. Drawn, not yet collided with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    pub center: Vec3,
    pub radius: f32,
}

pub fn default_obstacles() -> Vec<Obstacle> {
    vec![
        Obstacle { center: vec3(30.0, 10.0, 30.0), radius: 8.0 },
        Obstacle { center: vec3(-30.0, 15.0, -40.0), radius: 12.0 },
        Obstacle { center: vec3(-40.0, 8.0, 40.0), radius: 10.0 },
    ]
}

pub struct Flock {
    boids: SlotMap<BoidId, Boid>,
    // Insertion order, which is also update and draw order
    order: Vec<BoidId>,
    goal: Option<BoidId>,
    obstacles: Vec<Obstacle>,
    camera: FlockCamera,
    params: SimulationParams,
    paused: bool,
    fog_enabled: bool,
    rng: StdRng,
    ticks: u64,
}

impl Flock {
    pub fn new(params: SimulationParams) -> Self {
        Self::with_rng(params, StdRng::from_entropy())
    }

    /// Flock whose random spawns repeat for the same seed.
    pub fn with_seed(params: SimulationParams, seed: u64) -> Self {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }

    fn with_rng(params: SimulationParams, rng: StdRng) -> Self {
        Self {
            boids: SlotMap::with_key(),
            order: Vec::new(),
            goal: None,
            obstacles: Vec::new(),
            camera: FlockCamera::default(),
            params,
            paused: false,
            fog_enabled: false,
            rng,
            ticks: 0,
        }
    }

    /// Spawn the starting scene: the configured number of members, then the
    /// leader, and the default obstacles.
    pub fn populate(&mut self) {
        for _ in 0..self.params.initial_boids {
            self.spawn_boid();
        }
        self.spawn_goal();
        self.obstacles = default_obstacles();

        log::info!(
            "spawned {} boids (leader included) and {} obstacles",
            self.len(),
            self.obstacles.len()
        );
    }

    /// Append a random member.
    pub fn spawn_boid(&mut self) -> BoidId {
        let boid = Boid::random(&mut self.rng, self.params.max_speed);
        self.add_boid(boid)
    }

    /// Append a random leader and make it the goal.
    pub fn spawn_goal(&mut self) -> BoidId {
        let boid = Boid::random(&mut self.rng, self.params.max_speed);
        let id = self.add_boid(boid);
        self.set_goal(id);
        id
    }

    /// Append a boid; it becomes the most recent one.
    pub fn add_boid(&mut self, boid: Boid) -> BoidId {
        let id = self.boids.insert(boid);
        self.order.push(id);
        log::debug!("added boid {:?}, flock size {}", id, self.order.len());
        id
    }

    /// Make `id` the leader. The previous leader, if any, rejoins the flock
    /// as a member. Returns false when `id` is not in the flock.
    pub fn set_goal(&mut self, id: BoidId) -> bool {
        if !self.boids.contains_key(id) {
            return false;
        }

        if let Some(old) = self.goal.take().and_then(|old| self.boids.get_mut(old)) {
            old.role = Role::Member;
            old.color = rgb(0, 255, 0);
        }
        if let Some(goal) = self.boids.get_mut(id) {
            goal.role = Role::Leader;
            goal.color = rgb(0, 0, 255);
        }
        self.goal = Some(id);
        true
    }

    /// Remove the most recently added boid that is not the goal.
    ///
    /// The goal is never removed; a flock holding only the goal (or nothing)
    /// is left as it is.
    pub fn remove_boid(&mut self) -> Option<Boid> {
        let goal = self.goal;
        let position = self.order.iter().rposition(|&id| Some(id) != goal)?;
        let id = self.order.remove(position);
        let removed = self.boids.remove(id);
        log::debug!("removed boid {:?}, flock size {}", id, self.order.len());
        removed
    }

    /// Advance the simulation by one tick of `dt` seconds.
    ///
    /// While paused only the camera moves.
    pub fn update(&mut self, dt: f32) {
        if !self.paused {
            match self.params.update_mode {
                UpdateMode::Sequential => self.update_sequential(dt),
                UpdateMode::Simultaneous => self.update_simultaneous(dt),
            }
            self.ticks += 1;
        }
        self.update_camera(dt);
    }

    fn update_sequential(&mut self, dt: f32) {
        for &id in &self.order {
            let neighborhood = self.neighborhood_of(id);
            if let Some(boid) = self.boids.get_mut(id) {
                boid.update(dt, &neighborhood, &self.params);
            }
        }
    }

    fn update_simultaneous(&mut self, dt: f32) {
        let gathered: Vec<(BoidId, Neighborhood)> = self
            .order
            .iter()
            .map(|&id| (id, self.neighborhood_of(id)))
            .collect();

        for (id, neighborhood) in gathered {
            if let Some(boid) = self.boids.get_mut(id) {
                boid.update(dt, &neighborhood, &self.params);
            }
        }
    }

    /// Steering inputs for `id` against the flock's current state.
    pub fn neighborhood_of(&self, id: BoidId) -> Neighborhood {
        let Some(me) = self.boids.get(id) else {
            return Neighborhood::default();
        };
        if me.is_leader() {
            return Neighborhood::default();
        }

        let goal = self.goal_boid().map(|goal| goal.position);
        let others = self
            .order
            .iter()
            .filter(|&&other| other != id)
            .filter_map(|&other| self.boids.get(other));

        Neighborhood::gather(me, others, goal, &self.params)
    }

    pub fn update_camera(&mut self, dt: f32) {
        let summary = self.summary();
        self.camera.update(dt, &summary, self.params.camera_smoothing);
    }

    /// Centroid and average heading of the whole flock.
    pub fn summary(&self) -> FlockSummary {
        FlockSummary::from_boids(self.boids())
    }

    /// Apply one tick of keyboard input to the flock and its leader.
    pub fn handle_input(&mut self, keys: &KeySnapshot) {
        if keys.just_pressed(ControlKey::AddBoid) {
            self.spawn_boid();
        }
        if keys.just_pressed(ControlKey::RemoveBoid) {
            self.remove_boid();
        }
        if keys.just_pressed(ControlKey::CycleCamera) {
            let mode = self.camera.cycle_mode();
            log::info!("camera mode: {}", mode.label());
        }
        if keys.just_pressed(ControlKey::ToggleFog) {
            self.fog_enabled = !self.fog_enabled;
            log::info!("fog {}", if self.fog_enabled { "on" } else { "off" });
        }
        if keys.just_pressed(ControlKey::TogglePause) {
            self.paused = !self.paused;
            log::info!("simulation {}", if self.paused { "paused" } else { "resumed" });
        }

        if keys.is_down(ControlKey::ZoomOut) {
            self.camera.adjust_zoom(ZOOM_STEP);
        }
        if keys.is_down(ControlKey::ZoomIn) {
            self.camera.adjust_zoom(-ZOOM_STEP);
        }

        if !self.paused {
            if let Some(goal) = self.goal_boid_mut() {
                goal.apply_controls(keys);
            }
        }
    }

    /// Replace the parameters, pushing the new speed cap to every boid.
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), ParamsError> {
        params.validate()?;
        for boid in self.boids.values_mut() {
            boid.max_speed = params.max_speed;
            boid.speed = boid.speed.min(params.max_speed);
        }
        self.params = params;
        Ok(())
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: BoidId) -> Option<&Boid> {
        self.boids.get(id)
    }

    pub fn get_mut(&mut self, id: BoidId) -> Option<&mut Boid> {
        self.boids.get_mut(id)
    }

    /// Handles in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = BoidId> + '_ {
        self.order.iter().copied()
    }

    /// Boids in insertion order.
    pub fn boids(&self) -> impl Iterator<Item = &Boid> + '_ {
        self.order.iter().filter_map(move |&id| self.boids.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoidId, &Boid)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.boids.get(id).map(|boid| (id, boid)))
    }

    pub fn goal(&self) -> Option<BoidId> {
        self.goal
    }

    pub fn goal_boid(&self) -> Option<&Boid> {
        self.goal.and_then(|id| self.boids.get(id))
    }

    pub fn goal_boid_mut(&mut self) -> Option<&mut Boid> {
        self.goal.and_then(|id| self.boids.get_mut(id))
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    pub fn camera(&self) -> &FlockCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FlockCamera {
        &mut self.camera
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn fog_enabled(&self) -> bool {
        self.fog_enabled
    }

    pub fn set_fog_enabled(&mut self, enabled: bool) {
        self.fog_enabled = enabled;
    }

    /// Simulation ticks run so far (paused ticks excluded).
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
