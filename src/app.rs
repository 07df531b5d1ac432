/*
 * Application Module
 *
 * This module defines the main application model for the flock simulation
 * and wires it into nannou: window creation, the per-frame update and the
 * fixed timestep loop that drives the flock.
 *
 * The simulation always advances in steps of FIXED_DT. Frame time is
 * accumulated and consumed in whole steps, each step reading one keyboard
 * snapshot. Backlog beyond MAX_TICKS_PER_FRAME steps is dropped so a stalled
 * frame does not make the flock jump.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::debug::DebugInfo;
use crate::flock::Flock;
use crate::input::{self, Keyboard};
use crate::params::SimulationParams;
use crate::renderer;
use crate::ui;
use crate::FIXED_DT;

pub const MAX_TICKS_PER_FRAME: usize = 5;

// Flock built by the entry point, picked up by `model`
static STARTING_FLOCK: Mutex<Option<Flock>> = Mutex::new(None);

// Main model for the application
pub struct Model {
    pub flock: Flock,
    pub keyboard: Keyboard,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    // Fixed timestep physics variables
    pub physics_accumulator: Duration,
    pub physics_step_size: Duration,
    pub last_update_time: Instant,
}

// Open the window and run the simulation on `flock` until it closes
pub fn run(flock: Flock) {
    match STARTING_FLOCK.lock() {
        Ok(mut slot) => *slot = Some(flock),
        Err(_) => log::warn!("starting flock slot is poisoned, falling back to defaults"),
    }
    nannou::app(model).update(update).run();
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Boids 3D")
        .size(1280, 800)
        .view(renderer::view)
        .key_pressed(input::key_pressed)
        .key_released(input::key_released)
        .raw_event(input::raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let flock = STARTING_FLOCK
        .lock()
        .ok()
        .and_then(|mut slot| slot.take())
        .unwrap_or_else(default_flock);
    log::debug!("model ready with {} boids", flock.len());

    Model {
        flock,
        keyboard: Keyboard::default(),
        egui,
        debug_info: DebugInfo::default(),
        physics_accumulator: Duration::ZERO,
        physics_step_size: Duration::from_secs_f32(FIXED_DT),
        last_update_time: Instant::now(),
    }
}

fn default_flock() -> Flock {
    let mut flock = Flock::new(SimulationParams::default());
    flock.populate();
    flock
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    let mut params = model.flock.params().clone();
    let response = ui::update_ui(&mut model.egui, &mut params, &model.flock, &model.debug_info);

    if response.params_changed {
        match model.flock.set_params(params) {
            Ok(()) => log::debug!("parameters updated from the UI"),
            // The sliders snap back to the flock's values next frame
            Err(err) => log::warn!("rejected parameter change: {err}"),
        }
    }
    if response.add_boid {
        model.flock.spawn_boid();
    }
    if response.remove_boid {
        model.flock.remove_boid();
    }

    let current_time = Instant::now();
    let frame_time = current_time.duration_since(model.last_update_time);
    model.last_update_time = current_time;
    model.physics_accumulator += frame_time;

    model.debug_info.ticks_per_frame = run_fixed_steps(model);
}

// Consume the accumulator in whole simulation steps
pub fn run_fixed_steps(model: &mut Model) -> usize {
    let mut ticks = 0;

    while model.physics_accumulator >= model.physics_step_size {
        if ticks == MAX_TICKS_PER_FRAME {
            log::trace!("dropping {:?} of simulation backlog", model.physics_accumulator);
            model.physics_accumulator = Duration::ZERO;
            break;
        }

        let keys = model.keyboard.snapshot();
        model.flock.handle_input(&keys);
        model.keyboard.end_tick();
        model.flock.update(FIXED_DT);

        model.physics_accumulator -= model.physics_step_size;
        ticks += 1;
    }

    ticks
}
