//! Camera providing view/projection state and world position to materials.
//!
//! The camera is passed to materials each frame through
//! [`FrameContext`](crate::material::FrameContext); materials only read it.
//!
//! ```
//! use lumora_render::Camera;
//! use glam::Vec3;
//!
//! let mut camera = Camera::perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
//! camera.look_at(Vec3::new(0.0, 2.0, -5.0), Vec3::ZERO, Vec3::Y);
//! let view_projection = camera.view_projection_matrix();
//! assert!(!view_projection.is_nan());
//! ```

use glam::{Mat4, Vec3};

/// Projection mode for a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fov_y_radians: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    },
}

/// A camera with view and projection matrices.
///
/// Matrices are computed on demand so the camera can be shared immutably by
/// every material drawn in a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    /// Up vector (typically Vec3::Y)
    up: Vec3,
    projection: ProjectionMode,
}

impl Camera {
    /// Create an orthographic camera centered on the view direction.
    pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Self {
        let half_width = width / 2.0;
        let half_height = height / 2.0;

        Self {
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: ProjectionMode::Orthographic {
                left: -half_width,
                right: half_width,
                bottom: -half_height,
                top: half_height,
                near,
                far,
            },
        }
    }

    /// Create a perspective camera.
    ///
    /// # Arguments
    ///
    /// * `fov_y_degrees` - Vertical field of view in degrees
    /// * `aspect_ratio` - Aspect ratio (width / height)
    /// * `near` - Near clip plane
    /// * `far` - Far clip plane
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: ProjectionMode::Perspective {
                fov_y_radians: fov_y_degrees.to_radians(),
                aspect_ratio,
                near,
                far,
            },
        }
    }

    /// Set the camera to look at a target from a position.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.position = eye;
        self.target = target;
        self.up = up;
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Get the forward direction (normalized vector from position to target).
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn set_projection(&mut self, projection: ProjectionMode) {
        self.projection = projection;
    }

    pub fn projection(&self) -> ProjectionMode {
        self.projection
    }

    /// Update the aspect ratio (only affects perspective cameras).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if let ProjectionMode::Perspective {
            aspect_ratio: current,
            ..
        } = &mut self.projection
        {
            *current = aspect_ratio;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            ProjectionMode::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic_lh(left, right, bottom, top, near, far),
            ProjectionMode::Perspective {
                fov_y_radians,
                aspect_ratio,
                near,
                far,
            } => Mat4::perspective_lh(fov_y_radians, aspect_ratio, near, far),
        }
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(45.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perspective_camera() {
        let mut camera = Camera::perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
        camera.look_at(Vec3::new(0.0, 5.0, -10.0), Vec3::ZERO, Vec3::Y);

        let view_proj = camera.view_projection_matrix();
        assert!(!view_proj.is_nan());
        assert_eq!(camera.position(), Vec3::new(0.0, 5.0, -10.0));
    }

    #[test]
    fn test_orthographic_camera() {
        let camera = Camera::orthographic(800.0, 600.0, 0.1, 100.0);
        assert!(!camera.view_projection_matrix().is_nan());
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::new(3.0, 4.0, -8.0), Vec3::new(1.0, 0.0, 2.0), Vec3::Y);

        let clip = camera.view_projection_matrix() * camera.target().extend(1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = Camera::perspective(60.0, 1.0, 0.1, 100.0);
        camera.set_aspect_ratio(2.0);

        match camera.projection() {
            ProjectionMode::Perspective { aspect_ratio, .. } => assert_eq!(aspect_ratio, 2.0),
            _ => panic!("expected perspective projection"),
        }

        let mut ortho = Camera::orthographic(10.0, 10.0, 0.1, 10.0);
        let before = ortho.projection();
        ortho.set_aspect_ratio(2.0);
        assert_eq!(ortho.projection(), before);
    }
}
