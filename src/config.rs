/*
 * Configuration Module
 *
 * Command line options for starting the simulation. The options override a
 * subset of SimulationParams; everything else keeps its default. The
 * resulting parameters are validated before any flock is built.
 */

use clap::Parser;

use crate::camera::CameraMode;
use crate::flock::Flock;
use crate::params::{ParamsError, SimulationParams, UpdateMode};

#[derive(Clone, Debug, Parser)]
#[command(name = "boids3d", about = "3D boid flock following a steerable leader")]
pub struct Cli {
    /// Number of flock members spawned at start, not counting the leader
    #[arg(long, default_value_t = 30)]
    pub boids: usize,

    /// Seed for spawn positions; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Speed cap shared by every boid
    #[arg(long, default_value_t = 20.0)]
    pub max_speed: f32,

    /// Degrees of roll per degree of yaw change in a tick
    #[arg(long, default_value_t = 10.0)]
    pub bank_gain: f32,

    /// Initial camera mode
    #[arg(long, value_enum, default_value_t = CameraMode::Behind)]
    pub camera: CameraMode,

    /// Start paused
    #[arg(long)]
    pub paused: bool,

    /// Start with fog enabled
    #[arg(long)]
    pub fog: bool,

    /// Gather every neighbourhood before moving any boid
    #[arg(long)]
    pub simultaneous: bool,

    /// Print debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Simulation parameters with the command line overrides applied.
    pub fn params(&self) -> Result<SimulationParams, ParamsError> {
        let mut params = SimulationParams::default();
        params.initial_boids = self.boids;
        params.max_speed = self.max_speed;
        params.bank_gain = self.bank_gain;
        if self.simultaneous {
            params.update_mode = UpdateMode::Simultaneous;
        }
        params.validate()?;
        Ok(params)
    }

    /// The populated starting flock.
    pub fn build_flock(&self) -> Result<Flock, ParamsError> {
        let params = self.params()?;
        let mut flock = match self.seed {
            Some(seed) => Flock::with_seed(params, seed),
            None => Flock::new(params),
        };
        flock.populate();
        flock.camera_mut().mode = self.camera;
        flock.set_paused(self.paused);
        flock.set_fog_enabled(self.fog);
        Ok(flock)
    }
}
