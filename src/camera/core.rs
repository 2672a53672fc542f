use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

/// A world point projected into viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Position in pixels, origin at the top-left corner.
    pub position: Vec2,
    /// Normalized depth after the perspective divide.
    pub depth: f32,
    /// False when the point lies behind the eye or past the far plane.
    pub in_front: bool,
}

impl Camera {
    /// Camera resting on +Z at the configured distance, aimed at the origin.
    #[must_use]
    pub fn from_options(options: &CameraOptions, aspect: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, options.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// World-to-view transform.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix alone.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Update the aspect ratio for a new viewport size. Zero sizes are
    /// ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Project `point` through `view_proj` into a `width × height` viewport.
    ///
    /// Depth above 1 (or a non-positive clip `w`) marks a point behind the
    /// camera or beyond the far plane.
    #[must_use]
    pub fn project_with(
        view_proj: &Mat4,
        point: Vec3,
        width: f32,
        height: f32,
    ) -> ScreenPoint {
        let clip = *view_proj * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= f32::EPSILON {
            return ScreenPoint {
                position: Vec2::ZERO,
                depth: f32::INFINITY,
                in_front: false,
            };
        }
        let ndc = clip.truncate() / clip.w;
        ScreenPoint {
            position: Vec2::new(
                (ndc.x * 0.5 + 0.5) * width,
                (ndc.y * -0.5 + 0.5) * height,
            ),
            depth: ndc.z,
            in_front: ndc.z <= 1.0,
        }
    }

    /// Project a single point with this camera's current matrices.
    #[must_use]
    pub fn project(&self, point: Vec3, width: f32, height: f32) -> ScreenPoint {
        Self::project_with(&self.build_matrix(), point, width, height)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::from_options(&CameraOptions::default(), 1.0)
    }

    #[test]
    fn origin_projects_to_viewport_center() {
        let p = camera().project(Vec3::ZERO, 800.0, 600.0);
        assert!(p.in_front);
        assert!((p.position - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn points_above_origin_land_above_center() {
        let p = camera().project(Vec3::new(0.0, 4.0, 0.0), 800.0, 600.0);
        assert!(p.in_front);
        assert!(p.position.y < 300.0);
    }

    #[test]
    fn points_behind_eye_are_not_in_front() {
        let p = camera().project(Vec3::new(0.0, 0.0, 20.0), 800.0, 600.0);
        assert!(!p.in_front);
    }

    #[test]
    fn resize_ignores_zero_dimensions() {
        let mut cam = camera();
        cam.resize(1600, 800);
        assert_eq!(cam.aspect, 2.0);
        cam.resize(0, 800);
        assert_eq!(cam.aspect, 2.0);
    }
}
