/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * displayed in the UI.
 *
 * Includes metrics for:
 * - FPS and frame time
 * - Simulation ticks run in the last frame
 * - Number of visible boids and culling efficiency
 */

use std::cell::Cell;
use std::time::Duration;

// Debug information to display
#[derive(Debug, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub ticks_per_frame: usize,
    // Written by the renderer, which only sees the model by shared reference
    pub visible_boids: Cell<usize>,
    pub culling_efficiency: Cell<f32>,
}

impl DebugInfo {
    pub fn record_visibility(&self, visible: usize, total: usize) {
        self.visible_boids.set(visible);
        let efficiency = if total > 0 {
            (1.0 - visible as f32 / total as f32) * 100.0
        } else {
            0.0
        };
        self.culling_efficiency.set(efficiency);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_is_the_culled_share() {
        let info = DebugInfo::default();
        info.record_visibility(25, 100);
        assert_eq!(info.visible_boids.get(), 25);
        assert_eq!(info.culling_efficiency.get(), 75.0);

        info.record_visibility(0, 0);
        assert_eq!(info.culling_efficiency.get(), 0.0);
    }
}
