use glam::Vec2;

/// Platform-agnostic input events forwarded by the host to a scene.
///
/// # Example
///
/// ```
/// # use ecviz::input::InputEvent;
/// let event = InputEvent::CursorMoved { x: 100.0, y: 200.0 };
/// assert!(matches!(event, InputEvent::CursorMoved { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute position inside the viewport.
    CursorMoved {
        /// Horizontal position in physical pixels from the left edge.
        x: f32,
        /// Vertical position in physical pixels from the top edge.
        y: f32,
    },
    /// The viewport's drawable area changed size.
    Resized {
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
}

/// Convert a pixel position inside a `width × height` viewport into a
/// normalized offset: x grows rightwards, y grows upwards, both in [-1, 1].
///
/// Positions outside the viewport are clamped; a zero-sized viewport maps
/// everything to the center.
#[must_use]
pub fn pointer_offset(x: f32, y: f32, width: u32, height: u32) -> Vec2 {
    if width == 0 || height == 0 {
        return Vec2::ZERO;
    }
    let nx = (x / width as f32) * 2.0 - 1.0;
    let ny = -((y / height as f32) * 2.0 - 1.0);
    Vec2::new(nx, ny).clamp(Vec2::NEG_ONE, Vec2::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_unit_square() {
        assert_eq!(pointer_offset(0.0, 0.0, 800, 600), Vec2::new(-1.0, 1.0));
        assert_eq!(
            pointer_offset(800.0, 600.0, 800, 600),
            Vec2::new(1.0, -1.0)
        );
        assert_eq!(pointer_offset(400.0, 300.0, 800, 600), Vec2::ZERO);
    }

    #[test]
    fn outside_positions_are_clamped() {
        let o = pointer_offset(-50.0, 900.0, 800, 600);
        assert_eq!(o, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn zero_sized_viewport_is_centered() {
        assert_eq!(pointer_offset(10.0, 10.0, 0, 600), Vec2::ZERO);
    }
}
