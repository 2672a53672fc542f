//! Visual elements of a scene's dynamic group.
//!
//! Every element is one [`Visual`] variant. The frame loop calls
//! [`Visual::update`] on each of them with the same [`FrameContext`];
//! the variant decides what a frame means for it.

use glam::{Mat4, Vec3};

use super::label::Label;
use crate::camera::Camera;
use crate::util::color::Color;

/// Sphere radius of a point element at scale 1.
pub const POINT_RADIUS: f32 = 0.3;
/// Tube radius of a transition element.
pub const TRANSITION_RADIUS: f32 = 0.05;

/// Handle to an element of a scene's dynamic group.
///
/// Handles are never reused within a scene, so a stale handle simply
/// stops resolving once its element is removed or cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) u32);

impl ElementId {
    /// Raw numeric value (for logging).
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Per-frame inputs shared by every element update.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Camera view-projection for this frame.
    pub view_proj: Mat4,
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Phase advance for pulsating points.
    pub pulse_step: f32,
    /// Scale oscillation amplitude.
    pub pulse_amplitude: f32,
}

/// A pulsating sphere marking a curve point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointElement {
    /// World position (z is always 0 for points added through the scene).
    pub position: Vec3,
    /// Surface and emissive color.
    pub color: Color,
    /// Scale the pulsation oscillates around.
    pub base_scale: f32,
    /// Pulsation phase in radians.
    pub phase: f32,
    /// Scale applied when rendering this frame.
    pub render_scale: f32,
}

impl PointElement {
    /// Point with the given initial phase; render scale starts on the
    /// oscillation curve.
    #[must_use]
    pub fn new(
        position: Vec3,
        color: Color,
        base_scale: f32,
        phase: f32,
        amplitude: f32,
    ) -> Self {
        Self {
            position,
            color,
            base_scale,
            phase,
            render_scale: base_scale + phase.sin() * amplitude,
        }
    }

    /// Radius of the rendered sphere.
    #[must_use]
    pub fn radius(&self) -> f32 {
        POINT_RADIUS * self.base_scale * self.render_scale
    }
}

/// A straight tube connecting two points of a flow.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionElement {
    /// Segment start.
    pub start: Vec3,
    /// Segment end.
    pub end: Vec3,
    /// Tube color.
    pub color: Color,
    /// Current opacity in [0, 1].
    pub opacity: f32,
}

/// One element of the dynamic group.
#[derive(Debug, Clone, PartialEq)]
pub enum Visual {
    /// Pulsating point.
    Point(PointElement),
    /// Path tube with animated opacity.
    Transition(TransitionElement),
    /// Text anchored at a world position.
    Label(Label),
}

impl Visual {
    /// Apply one frame to this element.
    ///
    /// Points advance their pulsation, labels re-project their anchor,
    /// transitions are driven by choreography and stay as they are.
    pub fn update(&mut self, frame: &FrameContext) {
        match self {
            Self::Point(point) => {
                point.phase += frame.pulse_step;
                point.render_scale =
                    point.base_scale + point.phase.sin() * frame.pulse_amplitude;
            }
            Self::Transition(_) => {}
            Self::Label(label) => {
                let screen = Camera::project_with(
                    &frame.view_proj,
                    label.anchor,
                    frame.width,
                    frame.height,
                );
                label.place(screen);
            }
        }
    }

    /// The point, if this is one.
    #[must_use]
    pub fn as_point(&self) -> Option<&PointElement> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    /// The transition, if this is one.
    #[must_use]
    pub fn as_transition(&self) -> Option<&TransitionElement> {
        match self {
            Self::Transition(t) => Some(t),
            _ => None,
        }
    }

    /// The label, if this is one.
    #[must_use]
    pub fn as_label(&self) -> Option<&Label> {
        match self {
            Self::Label(l) => Some(l),
            _ => None,
        }
    }
}
