use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Hero", inline)]
#[serde(default)]
/// The particle field shown on the home view.
pub struct HeroOptions {
    /// Number of particles.
    #[schemars(title = "Particles", range(min = 0, max = 20000))]
    pub particle_count: u32,
    /// Outer radius of the disc the particles are scattered over.
    #[schemars(title = "Radius", range(min = 1.0, max = 60.0), extend("step" = 0.5))]
    pub radius: f32,
    /// Height of the uniform vertical jitter band.
    #[schemars(title = "Thickness", range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub thickness: f32,
    /// Amplitude of the radial sine ripple.
    #[schemars(title = "Ripple", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub ripple: f32,
    /// Eye distance from the origin along +Z.
    #[schemars(title = "Camera Distance", range(min = 5.0, max = 80.0), extend("step" = 1.0))]
    pub camera_distance: f32,
    /// Edge length of one particle sprite in world units.
    #[schemars(title = "Particle Size", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub particle_size: f32,
    /// Sprite opacity before additive blending.
    #[schemars(title = "Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub opacity: f32,
    /// Yaw added every frame regardless of the pointer.
    #[schemars(title = "Spin", range(min = 0.0, max = 0.02), extend("step" = 0.0005))]
    pub spin: f32,
    /// Rotation per frame at full pointer deflection.
    #[schemars(title = "Steer", range(min = 0.0, max = 0.02), extend("step" = 0.0005))]
    pub steer: f32,
}

impl Default for HeroOptions {
    fn default() -> Self {
        Self {
            particle_count: 3000,
            radius: 25.0,
            thickness: 5.0,
            ripple: 2.0,
            camera_distance: 25.0,
            particle_size: 0.15,
            opacity: 0.8,
            spin: 0.001,
            steer: 0.002,
        }
    }
}
