use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::Color;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Theme", inline)]
#[serde(default)]
/// Per-viewport accent colors, fog and lighting.
pub struct ThemeOptions {
    /// Accent of the key-generation viewport.
    pub keygen: Color,
    /// Accent of the encryption viewport.
    pub encrypt: Color,
    /// Accent of the decryption viewport.
    pub decrypt: Color,
    /// Clear color and exponential fog color.
    pub fog_color: Color,
    /// Exponential-squared fog density.
    #[schemars(title = "Fog Density", range(min = 0.0, max = 0.2), extend("step" = 0.005))]
    pub fog_density: f32,
    /// White ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub ambient: f32,
    /// Accent-colored point light intensity.
    #[schemars(title = "Point Light", range(min = 0.0, max = 5.0), extend("step" = 0.05))]
    pub light_intensity: f32,
    /// Distance at which the point light falls off to zero.
    #[schemars(skip)]
    pub light_range: f32,
    /// Point light position in world space.
    #[schemars(skip)]
    pub light_position: [f32; 3],
    /// Opacity of the curve backdrop.
    #[schemars(title = "Curve Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub curve_opacity: f32,
    /// Color of the grid's center lines.
    #[schemars(skip)]
    pub grid_center: Color,
    /// Color of the remaining grid lines.
    #[schemars(skip)]
    pub grid_line: Color,
}

impl Default for ThemeOptions {
    fn default() -> Self {
        Self {
            keygen: Color::from_hex(0x00ff88),
            encrypt: Color::from_hex(0xff00ff),
            decrypt: Color::from_hex(0xffaa00),
            fog_color: Color::from_hex(0x0a0f1e),
            fog_density: 0.02,
            ambient: 0.6,
            light_intensity: 2.0,
            light_range: 50.0,
            light_position: [5.0, 5.0, 10.0],
            curve_opacity: 0.6,
            grid_center: Color::from_hex(0x333333),
            grid_line: Color::from_hex(0x111111),
        }
    }
}
