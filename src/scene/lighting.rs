use glam::Vec3;

use crate::options::ThemeOptions;
use crate::util::color::Color;

/// Lights and fog of one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLighting {
    /// White ambient intensity.
    pub ambient: f32,
    /// Point light color (the scene theme).
    pub light_color: Color,
    /// Point light intensity.
    pub light_intensity: f32,
    /// Point light falloff distance.
    pub light_range: f32,
    /// Point light world position.
    pub light_position: Vec3,
    /// Fog and clear color.
    pub fog_color: Color,
    /// Exponential-squared fog density.
    pub fog_density: f32,
}

impl SceneLighting {
    /// Lighting for a scene themed with `theme_color`.
    #[must_use]
    pub fn new(theme_color: Color, theme: &ThemeOptions) -> Self {
        Self {
            ambient: theme.ambient,
            light_color: theme_color,
            light_intensity: theme.light_intensity,
            light_range: theme.light_range,
            light_position: Vec3::from_array(theme.light_position),
            fog_color: theme.fog_color,
            fog_density: theme.fog_density,
        }
    }
}
