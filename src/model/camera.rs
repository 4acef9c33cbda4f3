use glam::{Vec2, Vec3};

use crate::utils::WorldCoord;

pub const DEFAULT_DISTANCE: f32 = 10.0;
pub const MIN_DISTANCE: f32 = 4.0;
pub const MAX_DISTANCE: f32 = 20.0;

/// Share of the pixel scale used for depth (rotated z) on screen
pub const DEPTH_FORESHORTENING: f32 = 0.5;

/// Isometric camera. The projection is parallel: `distance` only changes the
/// overall pixel scale, never the relative size of near and far blocks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub yaw: f32,
    /// Vertical viewing angle, kept for a future tilt control
    pub pitch: f32,
    pub distance: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 30f32.to_radians(),
            distance: DEFAULT_DISTANCE,
        }
    }

    /// Unit facing direction on the ground plane as (x, z).
    /// At yaw 0 this is +z, the direction drawn "up" the screen.
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.yaw.sin(), self.yaw.cos())
    }

    /// The cell `steps` blocks ahead of `from` along the facing direction,
    /// rounded to the nearest cell, at the same height
    pub fn cell_ahead(&self, from: &WorldCoord, steps: i32) -> WorldCoord {
        let ahead = self.forward() * steps as f32;
        from.offset(ahead.x.round() as i32, 0, ahead.y.round() as i32)
    }

    /// Rotate a ground-plane offset by the camera yaw, returning (rotated x, rotated z)
    pub fn rotate(&self, rel_x: f32, rel_z: f32) -> (f32, f32) {
        let (sin, cos) = self.yaw.sin_cos();
        (rel_x * cos - rel_z * sin, rel_x * sin + rel_z * cos)
    }

    /// Project a position relative to the avatar onto the screen
    pub fn project(&self, rel: Vec3, origin: Vec2, scale: f32) -> Vec2 {
        let (rotated_x, rotated_z) = self.rotate(rel.x, rel.z);
        Vec2::new(
            origin.x + rotated_x * scale,
            origin.y - rel.y * scale - rotated_z * scale * DEPTH_FORESHORTENING,
        )
    }

    /// Pixel scale for the current zoom distance
    pub fn pixel_scale(&self, base_scale: f32) -> f32 {
        base_scale * DEFAULT_DISTANCE / self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPS: f32 = 1e-4;

    #[test]
    fn test_block_north_of_avatar() {
        let camera = Camera::new();
        let origin = Vec2::new(400.0, 300.0);
        let player = WorldCoord(0, 1, 0);
        let block = WorldCoord(0, 0, 1);

        let screen = camera.project(block.relative_to(&player), origin, 25.0);
        // one block down lowers by a full scale, one block north raises by half
        let expected_dy = -(0.0 - 1.0) * 25.0 - 1.0 * 25.0 * 0.5;
        assert!((screen.x - origin.x).abs() < EPS);
        assert!((screen.y - origin.y - expected_dy).abs() < EPS, "got {screen:?}");
        assert!((expected_dy - 12.5).abs() < EPS);
    }

    #[test]
    fn test_projection_ignores_distance() {
        let mut camera = Camera::new();
        let rel = Vec3::new(2.0, 0.0, 3.0);
        let near = camera.project(rel, Vec2::ZERO, 25.0);
        camera.distance = MAX_DISTANCE;
        let far = camera.project(rel, Vec2::ZERO, 25.0);
        assert_eq!(near, far);
    }

    #[test]
    fn test_yaw_rotates_ground_plane() {
        let mut camera = Camera::new();
        camera.yaw = FRAC_PI_2;
        // +x now points "up" the screen like +z did at yaw 0
        let screen = camera.project(Vec3::new(1.0, 0.0, 0.0), Vec2::ZERO, 10.0);
        assert!(screen.x.abs() < EPS);
        assert!((screen.y + 5.0).abs() < EPS);
    }

    #[test]
    fn test_cell_ahead_follows_yaw() {
        let mut camera = Camera::new();
        let from = WorldCoord(2, 1, -3);

        assert_eq!(camera.cell_ahead(&from, 1), WorldCoord(2, 1, -2));
        assert_eq!(camera.cell_ahead(&from, 2), WorldCoord(2, 1, -1));

        camera.yaw = FRAC_PI_2;
        assert_eq!(camera.cell_ahead(&from, 1), WorldCoord(3, 1, -3));

        camera.yaw = PI;
        assert_eq!(camera.cell_ahead(&from, 2), WorldCoord(2, 1, -5));
    }

    #[test]
    fn test_pixel_scale_clamps_zoom() {
        let mut camera = Camera::new();
        assert_eq!(camera.pixel_scale(25.0), 25.0);
        camera.distance = 1.0;
        assert!((camera.pixel_scale(25.0) - 25.0 * DEFAULT_DISTANCE / MIN_DISTANCE).abs() < EPS);
    }
}
