use std::time::Duration;

use glam::{Vec2, Vec3};

use super::trace::TracePacing;
use crate::service::ServiceRequest;
use crate::util::color::Color;

/// Symbolic reference to an element a script creates.
///
/// Element handles only exist once the director runs the creating cue, so
/// scripts name elements by slot and the director binds slots to handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot(pub(crate) usize);

/// One path of a trace cue.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    /// Slot bound to the created transition.
    pub slot: Slot,
    /// Path start.
    pub from: Vec3,
    /// Path end.
    pub to: Vec3,
    /// Path color.
    pub color: Color,
}

/// One entry of a script.
#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    /// Release every dynamic element of the stage.
    Clear,
    /// Add a point at `(at.x, at.y, 0)`.
    Point {
        /// Slot bound to the new point.
        slot: Slot,
        /// Position in the XY plane.
        at: Vec2,
        /// Point color.
        color: Color,
        /// Base scale.
        scale: f32,
    },
    /// Add a text label.
    Label {
        /// Slot bound to the new label.
        slot: Slot,
        /// Displayed text.
        text: String,
        /// 3D anchor.
        anchor: Vec3,
        /// Text color.
        color: Color,
    },
    /// Remove the element bound to a slot, if any.
    Remove(Slot),
    /// Wait.
    Dwell(Duration),
    /// Trace one or more paths and wait until all are opaque.
    Trace(Vec<PathSpec>),
    /// Make the run's service call and wait for the reply.
    ///
    /// On failure the run reports `failure` and stops.
    Call {
        /// Request to send.
        request: ServiceRequest,
        /// Notice shown if the call fails.
        failure: String,
    },
    /// Write the service reply to the host's result fields.
    Present,
}

impl Cue {
    /// Nominal time the cue holds the run, excluding service latency.
    #[must_use]
    pub fn duration(&self, pacing: TracePacing) -> Duration {
        match self {
            Self::Dwell(d) => *d,
            Self::Trace(paths) if !paths.is_empty() => pacing.total(),
            _ => Duration::ZERO,
        }
    }
}

/// A complete flow, ready for the director.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    cues: Vec<Cue>,
    slots: usize,
}

impl Script {
    /// The cues in execution order.
    #[must_use]
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Number of slots the script binds.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots
    }

    /// Sum of every cue's nominal duration.
    #[must_use]
    pub fn nominal_duration(&self, pacing: TracePacing) -> Duration {
        self.cues.iter().map(|c| c.duration(pacing)).sum()
    }

    pub(crate) fn into_parts(self) -> (Vec<Cue>, usize) {
        (self.cues, self.slots)
    }
}

/// Builds a [`Script`] cue by cue.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    cues: Vec<Cue>,
    slots: usize,
}

impl ScriptBuilder {
    /// Empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self) -> Slot {
        let slot = Slot(self.slots);
        self.slots += 1;
        slot
    }

    /// Clear the stage.
    pub fn clear(&mut self) {
        self.cues.push(Cue::Clear);
    }

    /// Add a point.
    pub fn point(&mut self, at: Vec2, color: Color, scale: f32) -> Slot {
        let slot = self.slot();
        self.cues.push(Cue::Point {
            slot,
            at,
            color,
            scale,
        });
        slot
    }

    /// Add a label that stays until the next clear.
    pub fn label(
        &mut self,
        text: impl Into<String>,
        anchor: Vec3,
        color: Color,
    ) -> Slot {
        let slot = self.slot();
        self.cues.push(Cue::Label {
            slot,
            text: text.into(),
            anchor,
            color,
        });
        slot
    }

    /// Remove a previously created element.
    pub fn remove(&mut self, slot: Slot) {
        self.cues.push(Cue::Remove(slot));
    }

    /// Wait for `duration`.
    pub fn dwell(&mut self, duration: Duration) {
        self.cues.push(Cue::Dwell(duration));
    }

    /// Trace one path and wait for it.
    pub fn trace(&mut self, from: Vec3, to: Vec3, color: Color) -> Slot {
        let slot = self.slot();
        self.cues.push(Cue::Trace(vec![PathSpec {
            slot,
            from,
            to,
            color,
        }]));
        slot
    }

    /// Trace several paths concurrently and wait for all of them.
    pub fn trace_jointly(&mut self, paths: &[(Vec3, Vec3, Color)]) -> Vec<Slot> {
        let specs: Vec<PathSpec> = paths
            .iter()
            .map(|&(from, to, color)| PathSpec {
                slot: self.slot(),
                from,
                to,
                color,
            })
            .collect();
        let slots = specs.iter().map(|p| p.slot).collect();
        self.cues.push(Cue::Trace(specs));
        slots
    }

    /// Make the service call; on failure show `failure` and stop.
    pub fn call(&mut self, request: ServiceRequest, failure: impl Into<String>) {
        self.cues.push(Cue::Call {
            request,
            failure: failure.into(),
        });
    }

    /// Write the service reply to the result fields.
    pub fn present(&mut self) {
        self.cues.push(Cue::Present);
    }

    /// Finish the script.
    #[must_use]
    pub fn build(self) -> Script {
        Script {
            cues: self.cues,
            slots: self.slots,
        }
    }
}
