use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Motion", inline)]
#[serde(default)]
/// Pointer-driven camera drift and point pulsation.
pub struct MotionOptions {
    /// Horizontal eye offset at full pointer deflection.
    #[schemars(title = "Drift X", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub drift_x: f32,
    /// Vertical eye offset at full pointer deflection.
    #[schemars(title = "Drift Y", range(min = 0.0, max = 10.0), extend("step" = 0.1))]
    pub drift_y: f32,
    /// Fraction of the remaining distance covered each frame.
    #[schemars(title = "Smoothing", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub smoothing: f32,
    /// Phase advance per frame for pulsating points.
    #[schemars(title = "Pulse Speed", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub pulse_step: f32,
    /// Amplitude of the scale oscillation.
    #[schemars(title = "Pulse Amplitude", range(min = 0.0, max = 0.5), extend("step" = 0.01))]
    pub pulse_amplitude: f32,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            drift_x: 5.0,
            drift_y: 2.0,
            smoothing: 0.05,
            pulse_step: 0.05,
            pulse_amplitude: 0.1,
        }
    }
}
