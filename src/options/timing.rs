use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Timing", inline)]
#[serde(default)]
/// Dwell times and trace pacing for the flow scripts, in milliseconds.
pub struct TimingOptions {
    /// Dwell after each encryption/decryption step.
    #[schemars(title = "Step Dwell", range(min = 0, max = 10000))]
    pub step_dwell_ms: u64,
    /// Dwell after each key-generation caption and before each service call.
    #[schemars(title = "Short Dwell", range(min = 0, max = 10000))]
    pub short_dwell_ms: u64,
    /// Dwell on each scalar-multiplication hop marker.
    #[schemars(title = "Hop Dwell", range(min = 0, max = 2000))]
    pub hop_dwell_ms: u64,
    /// Number of hops drawn for the scalar multiplication.
    #[schemars(title = "Hops", range(min = 1, max = 32))]
    pub hop_count: u32,
    /// Opacity steps of a traced path.
    #[schemars(skip)]
    pub trace_steps: u32,
    /// Suspension between two trace steps.
    #[schemars(skip)]
    pub trace_interval_ms: u64,
}

impl TimingOptions {
    /// Dwell after each encryption/decryption step.
    #[must_use]
    pub fn step_dwell(&self) -> Duration {
        Duration::from_millis(self.step_dwell_ms)
    }

    /// Dwell after key-generation captions and before service calls.
    #[must_use]
    pub fn short_dwell(&self) -> Duration {
        Duration::from_millis(self.short_dwell_ms)
    }

    /// Dwell on each hop marker.
    #[must_use]
    pub fn hop_dwell(&self) -> Duration {
        Duration::from_millis(self.hop_dwell_ms)
    }

    /// Suspension between two trace steps.
    #[must_use]
    pub fn trace_interval(&self) -> Duration {
        Duration::from_millis(self.trace_interval_ms)
    }
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            step_dwell_ms: 2000,
            short_dwell_ms: 1500,
            hop_dwell_ms: 300,
            hop_count: 8,
            trace_steps: 20,
            trace_interval_ms: 20,
        }
    }
}
