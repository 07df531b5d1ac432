/*
 * 3D Boid Flock Library
 *
 * This library contains the flock simulation: boids steering by separation,
 * alignment, cohesion and goal seeking, a leader steered from the keyboard,
 * and a chase camera that follows the flock. The windowed front end lives in
 * the app, renderer and ui modules.
 */

pub use app::Model;
pub use boid::{Boid, Neighborhood, Role};
pub use camera::{CameraMode, FlockCamera, FlockSummary};
pub use debug::DebugInfo;
pub use flock::{BoidId, Flock, Obstacle};
pub use input::{ControlKey, KeySet, KeySnapshot, Keyboard};
pub use params::{ParamsError, SimulationParams, UpdateMode};

// Export modules
pub mod app;
pub mod boid;
pub mod camera;
pub mod config;
pub mod culling;
pub mod debug;
pub mod flock;
pub mod input;
pub mod logging;
pub mod math;
pub mod params;
pub mod renderer;
pub mod ui;

// Constants
pub const FIXED_DT: f32 = 0.016;
pub const BOID_RADIUS: f32 = 1.25;
