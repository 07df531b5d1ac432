/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for adjusting simulation parameters,
 * adding and removing boids, and shows flock, camera and performance status.
 * Parameter change detection is handled by the SimulationParams struct.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::flock::Flock;
use crate::params::{SimulationParams, UpdateMode};

// What the user asked for this frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiResponse {
    pub params_changed: bool,
    pub add_boid: bool,
    pub remove_boid: bool,
}

const KEY_HELP: [(&str, &str); 8] = [
    ("A / D", "turn leader"),
    ("I / K", "pitch leader"),
    ("W / S / Space", "faster / slower / stop"),
    ("+ / -", "add / remove boid"),
    ("C", "cycle camera"),
    ("Q / E", "zoom out / in"),
    ("F", "toggle fog"),
    ("P", "pause"),
];

// Update the UI, editing `params` in place
pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    flock: &Flock,
    debug_info: &DebugInfo,
) -> UiResponse {
    let mut response = UiResponse::default();

    // Take a snapshot of current parameter values for change detection
    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.label(format!("Boids: {}", flock.len()));
                ui.horizontal(|ui| {
                    if ui.button("Add Boid").clicked() {
                        response.add_boid = true;
                    }
                    if ui.button("Remove Boid").clicked() {
                        response.remove_boid = true;
                    }
                });

                ui.add(egui::Slider::new(&mut params.max_speed, SimulationParams::get_max_speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut params.bank_gain, SimulationParams::get_bank_gain_range()).text("Bank Gain"));
            });

            ui.collapsing("Flocking Behavior", |ui| {
                ui.add(egui::Slider::new(&mut params.separation_weight, SimulationParams::get_weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut params.alignment_weight, SimulationParams::get_weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut params.cohesion_weight, SimulationParams::get_weight_range()).text("Cohesion Weight"));
                ui.add(egui::Slider::new(&mut params.goal_weight, SimulationParams::get_weight_range()).text("Goal Weight"));
                ui.add(egui::Slider::new(&mut params.separation_radius, SimulationParams::get_radius_range()).text("Separation Radius"));
                ui.add(egui::Slider::new(&mut params.perception_radius, SimulationParams::get_radius_range()).text("Perception Radius"));

                let mut simultaneous = params.update_mode == UpdateMode::Simultaneous;
                if ui.checkbox(&mut simultaneous, "Gather before moving").changed() {
                    params.update_mode = if simultaneous {
                        UpdateMode::Simultaneous
                    } else {
                        UpdateMode::Sequential
                    };
                }
            });

            ui.collapsing("Camera", |ui| {
                let camera = flock.camera();
                ui.label(format!("Mode: {}", camera.mode.label()));
                ui.label(format!("Zoom: {:.1}", camera.zoom_dist));
                ui.label(format!("Fog: {}", if flock.fog_enabled() { "on" } else { "off" }));
            });

            ui.collapsing("Keys", |ui| {
                for (keys, action) in KEY_HELP {
                    ui.label(format!("{keys}: {action}"));
                }
            });

            ui.collapsing("Performance", |ui| {
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Ticks this frame: {}", debug_info.ticks_per_frame));
                ui.label(format!("Visible Boids: {}", debug_info.visible_boids.get()));
                ui.label(format!("Culled: {:.0}%", debug_info.culling_efficiency.get()));
            });

            if flock.is_paused() {
                ui.label("Paused");
            }
        });

    response.params_changed = params.detect_changes();
    response
}
