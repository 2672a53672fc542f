//! Input handling: platform-agnostic events and bindable key actions.

/// Platform-agnostic input events.
pub mod event;
/// Bindable engine actions.
pub mod keyboard;

pub use event::{pointer_offset, InputEvent};
pub use keyboard::KeyAction;
