//! GPU resource management.
//!
//! Provides wgpu device/surface initialization and growable buffers for
//! the per-frame scene meshes.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
