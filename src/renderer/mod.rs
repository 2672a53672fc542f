//! Rendering of scenes through wgpu.
//!
//! Scene elements are turned into plain triangle meshes on the CPU each
//! frame ([`mesh`]); the backdrop is a line list built once per scene.
//! [`SceneRenderer`] uploads both and draws them with fog and a single
//! point light, then draws the scene's label overlays as text at their
//! projected positions ([`labels`]). The home field is a sprite mesh
//! drawn with additive blending.

pub mod labels;
pub mod mesh;
pub(crate) mod pipeline;
pub mod scene_renderer;

pub use scene_renderer::SceneRenderer;
