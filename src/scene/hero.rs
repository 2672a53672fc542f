//! The home view's rotating particle field.
//!
//! Unlike flow scenes the field has no elements, labels or backdrop: a fixed
//! cloud of particles turns about the origin, steered by the pointer. Turning
//! can be paused (the background animation toggle); the field keeps being
//! drawn in its last pose.

use std::f32::consts::TAU;

use glam::{Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::Camera;
use crate::options::{CameraOptions, HeroOptions, Options};
use crate::util::color::Color;

/// One particle in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position before the field's rotation.
    pub position: Vec3,
    /// Linear RGB.
    pub color: [f32; 3],
}

/// Scatter `options.particle_count` particles over a rippled disc in the
/// XZ plane. Colors run from teal to blue.
#[must_use]
pub fn scatter_particles<R: Rng + ?Sized>(
    options: &HeroOptions,
    rng: &mut R,
) -> Vec<Particle> {
    (0..options.particle_count)
        .map(|_| {
            let r = rng.random::<f32>() * options.radius;
            let theta = rng.random::<f32>() * TAU;
            let y = (rng.random::<f32>() - 0.5) * options.thickness
                + (r * 0.5).sin() * options.ripple;
            Particle {
                position: Vec3::new(r * theta.cos(), y, r * theta.sin()),
                color: [0.0, 0.5 + rng.random::<f32>() * 0.5, 1.0],
            }
        })
        .collect()
}

/// Particle field state: the cloud, its rotation and its own camera.
#[derive(Debug, Clone)]
pub struct HeroField {
    particles: Vec<Particle>,
    /// Pitch (x) and yaw (y) in radians.
    rotation: Vec2,
    pointer: Vec2,
    camera: Camera,
    surface: (u32, u32),
    background: Color,
    options: HeroOptions,
    paused: bool,
}

impl HeroField {
    /// Field sized `surface`, scattered from `seed`.
    #[must_use]
    pub fn new(options: &Options, surface: (u32, u32), seed: u64) -> Self {
        let hero = options.hero.clone();
        let particles =
            scatter_particles(&hero, &mut StdRng::seed_from_u64(seed));
        let camera_options = CameraOptions {
            distance: hero.camera_distance,
            ..options.camera.clone()
        };
        let mut camera = Camera::from_options(&camera_options, 1.0);
        camera.resize(surface.0, surface.1);
        log::debug!("hero field created ({} particles)", particles.len());
        Self {
            particles,
            rotation: Vec2::ZERO,
            pointer: Vec2::ZERO,
            camera,
            surface,
            background: options.theme.fog_color,
            options: hero,
            paused: false,
        }
    }

    /// Particles in model space.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Current pitch (x) and yaw (y).
    #[must_use]
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    /// Model transform: pitch applied after yaw.
    #[must_use]
    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
    }

    /// Fixed camera looking down -Z.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Clear color behind the particles.
    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Sprite edge length in world units.
    #[must_use]
    pub fn particle_size(&self) -> f32 {
        self.options.particle_size
    }

    /// Sprite opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.options.opacity
    }

    /// Render surface size in physical pixels.
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    /// Record a normalized pointer offset in [-1, 1] (clamped).
    pub fn pointer_move(&mut self, offset: Vec2) {
        self.pointer = offset.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Adopt a new viewport size. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface = (width, height);
        self.camera.resize(width, height);
    }

    /// Turn the field one frame. Returns whether it moved.
    pub fn advance_frame(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.rotation.y += self.options.spin + self.pointer.x * self.options.steer;
        self.rotation.x += self.pointer.y * self.options.steer;
        true
    }

    /// Whether turning is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause or resume turning.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
