//! Text anchors projected into screen space.

use glam::{Vec2, Vec3};

use crate::camera::ScreenPoint;
use crate::util::color::Color;

/// Where and how visibly a label should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Pixel position of the anchor, origin at the top-left corner.
    pub position: Vec2,
    /// 1 when the anchor is in front of the camera, 0 otherwise.
    pub opacity: f32,
}

/// A text anchor bound to a world position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Displayed text.
    pub text: String,
    /// World-space anchor.
    pub anchor: Vec3,
    /// Text and border color.
    pub color: Color,
    /// Projection result of the latest frame.
    pub placement: LabelPlacement,
}

impl Label {
    /// Unplaced label; the scene projects it before handing it out.
    #[must_use]
    pub fn new(text: impl Into<String>, anchor: Vec3, color: Color) -> Self {
        Self {
            text: text.into(),
            anchor,
            color,
            placement: LabelPlacement {
                position: Vec2::ZERO,
                opacity: 0.0,
            },
        }
    }

    /// Store a projection. Anchors behind the camera are hidden, not
    /// dropped.
    pub fn place(&mut self, screen: ScreenPoint) {
        self.placement = LabelPlacement {
            position: screen.position,
            opacity: if screen.in_front { 1.0 } else { 0.0 },
        };
    }

    /// Whether the label is currently drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.placement.opacity > 0.0
    }
}

/// A label as the host needs it to draw an overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOverlay {
    /// Displayed text.
    pub text: String,
    /// CSS-style color string.
    pub color: String,
    /// Pixel position, origin at the top-left corner.
    pub position: Vec2,
    /// 0 (hidden) or 1 (shown).
    pub opacity: f32,
}

impl From<&Label> for LabelOverlay {
    fn from(label: &Label) -> Self {
        Self {
            text: label.text.clone(),
            color: label.color.to_css(),
            position: label.placement.position,
            opacity: label.placement.opacity,
        }
    }
}
