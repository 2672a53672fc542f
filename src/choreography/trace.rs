use std::time::Duration;

use glam::Vec3;
use web_time::Instant;

use crate::options::TimingOptions;
use crate::scene::{ElementId, Scene};
use crate::util::color::Color;

/// How a traced path fades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracePacing {
    /// Opacity steps from 0 to 1.
    pub steps: u32,
    /// Suspension before each step.
    pub interval: Duration,
}

impl TracePacing {
    /// Pacing from the timing options.
    #[must_use]
    pub fn from_options(timing: &TimingOptions) -> Self {
        Self {
            steps: timing.trace_steps,
            interval: timing.trace_interval(),
        }
    }

    /// Time from start to full opacity.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.interval * self.steps
    }
}

impl Default for TracePacing {
    fn default() -> Self {
        Self::from_options(&TimingOptions::default())
    }
}

/// A transition fading in over fixed steps.
///
/// The ramp waits one interval, raises opacity by `1 / steps`, and repeats
/// until opacity reaches 1. Late frames apply every step that came due, so
/// the ramp ends on time even at low frame rates.
#[derive(Debug, Clone)]
pub struct TraceRamp {
    element: ElementId,
    pacing: TracePacing,
    done_steps: u32,
    next_at: Instant,
}

impl TraceRamp {
    /// Add a transparent transition to `scene` and start ramping it.
    pub fn begin(
        scene: &mut Scene,
        start: Vec3,
        end: Vec3,
        color: Color,
        pacing: TracePacing,
        now: Instant,
    ) -> Self {
        let element = scene.add_transition(start, end, color);
        if pacing.steps == 0 {
            let _ = scene.set_transition_opacity(element, 1.0);
        }
        log::debug!("trace {} started ({} steps)", element.raw(), pacing.steps);
        Self {
            element,
            pacing,
            done_steps: 0,
            next_at: now + pacing.interval,
        }
    }

    /// The transition being ramped.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Whether every step has been applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.done_steps >= self.pacing.steps
    }

    /// When the next step comes due, or `None` once complete.
    #[must_use]
    pub fn next_wake(&self) -> Option<Instant> {
        (!self.is_complete()).then_some(self.next_at)
    }

    /// Apply every step due by `now`. Returns `true` once complete.
    ///
    /// A ramp whose transition has been removed from the scene completes
    /// immediately.
    pub fn advance(&mut self, now: Instant, scene: &mut Scene) -> bool {
        while !self.is_complete() && now >= self.next_at {
            self.done_steps += 1;
            let opacity = self.done_steps as f32 / self.pacing.steps as f32;
            if !scene.set_transition_opacity(self.element, opacity) {
                self.done_steps = self.pacing.steps;
                break;
            }
            self.next_at += self.pacing.interval;
        }
        self.is_complete()
    }
}
