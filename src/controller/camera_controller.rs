use std::f32::consts::{FRAC_PI_4, TAU};

use crate::model::camera::{MAX_DISTANCE, MIN_DISTANCE};
use crate::model::Camera;

/// Handles camera orientation and zoom
pub struct CameraController {
    /// Yaw change per rotate step
    pub rotate_step: f32,
    /// Distance change per zoom step
    pub zoom_step: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            rotate_step: FRAC_PI_4,
            zoom_step: 1.0,
        }
    }

    /// Turn by `steps` increments, keeping yaw in [0, 2π)
    pub fn rotate(&self, camera: &mut Camera, steps: i32) {
        camera.yaw = (camera.yaw + steps as f32 * self.rotate_step).rem_euclid(TAU);
    }

    /// Positive steps zoom in
    pub fn zoom(&self, camera: &mut Camera, steps: i32) {
        camera.distance = (camera.distance - steps as f32 * self.zoom_step).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
