//! Small shared helpers: colors, frame timing and text abbreviation.

/// Hex RGB colors and their float conversions.
pub mod color;
/// Frame timing with FPS tracking and frame limiting.
pub mod frame_timing;
/// Truncation of long result strings for display.
pub mod text;
