use glam::{Vec2, Vec3};

use super::core::Camera;
use crate::options::MotionOptions;

/// Pointer-driven camera drift.
///
/// Holds the last pointer offset; every frame the eye moves a fixed
/// fraction of the way toward `(offset.x * drift_x, offset.y * drift_y)`
/// (a single-pole low-pass filter) and re-aims at the origin. The eye's
/// depth is never touched.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDrift {
    pointer: Vec2,
    amplitude: Vec2,
    smoothing: f32,
}

impl CameraDrift {
    /// Drift at rest with amplitude and smoothing from `options`.
    #[must_use]
    pub fn new(options: &MotionOptions) -> Self {
        Self {
            pointer: Vec2::ZERO,
            amplitude: Vec2::new(options.drift_x, options.drift_y),
            smoothing: options.smoothing.clamp(0.0, 1.0),
        }
    }

    /// Record a pointer offset; components are clamped to [-1, 1].
    pub fn set_pointer(&mut self, offset: Vec2) {
        self.pointer = offset.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Last recorded pointer offset.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Eye x/y the filter is converging on.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        self.pointer * self.amplitude
    }

    /// Advance the filter one frame and re-aim `camera` at the origin.
    pub fn step(&self, camera: &mut Camera) {
        let target = self.target();
        camera.eye.x += (target.x - camera.eye.x) * self.smoothing;
        camera.eye.y += (target.y - camera.eye.y) * self.smoothing;
        camera.target = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CameraOptions;

    #[test]
    fn one_step_covers_smoothing_fraction() {
        let mut drift = CameraDrift::new(&MotionOptions::default());
        let mut cam = Camera::from_options(&CameraOptions::default(), 1.0);
        drift.set_pointer(Vec2::new(1.0, 1.0));
        drift.step(&mut cam);
        assert!((cam.eye.x - 0.25).abs() < 1e-6);
        assert!((cam.eye.y - 0.1).abs() < 1e-6);
        assert_eq!(cam.eye.z, 10.0);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn eye_converges_on_target() {
        let mut drift = CameraDrift::new(&MotionOptions::default());
        let mut cam = Camera::from_options(&CameraOptions::default(), 1.0);
        drift.set_pointer(Vec2::new(-0.5, 0.5));
        for _ in 0..500 {
            drift.step(&mut cam);
        }
        assert!((cam.eye.x + 2.5).abs() < 1e-3);
        assert!((cam.eye.y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn pointer_is_clamped() {
        let mut drift = CameraDrift::new(&MotionOptions::default());
        drift.set_pointer(Vec2::new(3.0, -7.0));
        assert_eq!(drift.pointer(), Vec2::new(1.0, -1.0));
    }
}
