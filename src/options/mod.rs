//! Centralized scene, choreography and service options with TOML preset
//! support.
//!
//! Every tweakable constant of the visualization (camera projection, pointer
//! drift, pulsation, dwell times, trace pacing, theme colors, the home
//! particle field, the service endpoint and key bindings) lives here.
//! Options serialize to/from TOML so a host can ship presets next to the
//! binary.

mod camera;
mod hero;
mod keybindings;
mod motion;
mod service;
mod theme;
mod timing;

use std::path::Path;

pub use camera::CameraOptions;
pub use hero::HeroOptions;
pub use keybindings::KeybindingOptions;
pub use motion::MotionOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use service::ServiceOptions;
pub use theme::ThemeOptions;
pub use timing::TimingOptions;

use crate::error::VizError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[timing]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and resting pose.
    pub camera: CameraOptions,
    /// Pointer drift and element pulsation.
    pub motion: MotionOptions,
    /// Dwell times and trace pacing used by the flow scripts.
    pub timing: TimingOptions,
    /// Per-viewport colors, fog and lighting.
    pub theme: ThemeOptions,
    /// Home-view particle field.
    pub hero: HeroOptions,
    /// Crypto service endpoint and call dispatch.
    #[schemars(skip)]
    pub service: ServiceOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the host-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Io`] if the file cannot be read and
    /// [`VizError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, VizError> {
        let content = std::fs::read_to_string(path).map_err(VizError::Io)?;
        toml::from_str(&content)
            .map_err(|e| VizError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`VizError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), VizError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VizError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VizError::Io)?;
        }
        std::fs::write(path, content).map_err(VizError::Io)
    }
}
