/// Camera - passive view/projection container.
///
/// The camera computes nothing on its own beyond the convenience setters.
/// Game code drives it; the pipeline reads it to sort translucent objects
/// and hands it to behaviour renderers.

use glam::{Mat4, Vec3};

/// Pixel rectangle (viewport, scissor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Width / height, 1.0 for a degenerate rect
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Active camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    pub fn new(position: Vec3, view: Mat4, projection: Mat4) -> Self {
        Self { position, view, projection }
    }

    /// Camera at `eye` looking at `target` (right-handed, Y up)
    pub fn look_at(eye: Vec3, target: Vec3, projection: Mat4) -> Self {
        Self {
            position: eye,
            view: Mat4::look_at_rh(eye, target, Vec3::Y),
            projection,
        }
    }

    // ===== GETTERS =====

    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    /// projection * view
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Distance from the camera to a world-space point
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.position.distance(point)
    }

    // ===== SETTERS =====

    pub fn set_view(&mut self, position: Vec3, view: Mat4) {
        self.position = position;
        self.view = view;
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0),
        )
    }
}
