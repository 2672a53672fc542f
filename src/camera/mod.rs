//! Camera system for the curve viewports.
//!
//! A perspective camera that always looks at the origin, nudged around by
//! pointer-driven drift, plus the projection used to place label overlays.

/// Core camera struct, projection helpers and GPU uniform.
pub mod core;
/// Pointer-driven camera drift.
pub mod drift;

pub use self::core::{Camera, CameraUniform, ScreenPoint};
pub use drift::CameraDrift;
