//! Pointer, resize and key input for [`CurveVizEngine`].

use glam::Vec2;

use super::CurveVizEngine;
use crate::flows::FlowKind;
use crate::host::HostView;
use crate::input::{pointer_offset, InputEvent, KeyAction};

impl<H: HostView> CurveVizEngine<H> {
    /// Process a platform-agnostic input event for the active view.
    ///
    /// Cursor positions become the active scene's pointer offset; the home
    /// field follows the pointer whichever view is shown. A resize applies
    /// to every container and the home view, since the standalone viewer
    /// shows them all in one surface.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::CursorMoved { x, y } => {
                if let Some(hero) = &mut self.hero {
                    let (w, h) = hero.surface_size();
                    hero.pointer_move(pointer_offset(x, y, w, h));
                }
                let Some(flow) = self.active_view else {
                    return;
                };
                let Some((w, h)) =
                    self.scene(flow).map(crate::scene::Scene::surface_size)
                else {
                    return;
                };
                self.pointer_move(flow, pointer_offset(x, y, w, h));
            }
            InputEvent::Resized { width, height } => {
                for flow in FlowKind::ALL {
                    self.resize_viewport(flow, width, height);
                }
                if width > 0 && height > 0 {
                    self.home_surface = (width, height);
                }
                if let Some(hero) = &mut self.hero {
                    hero.resize(width, height);
                }
            }
        }
    }

    /// Record a normalized pointer offset on `flow`'s scene.
    pub fn pointer_move(&mut self, flow: FlowKind, offset: Vec2) {
        if let Some(scene) = self.viewports.scene_mut(&flow.container()) {
            scene.pointer_move(offset);
        }
    }

    /// Resize one container and its scene. Zero sizes are ignored by the
    /// scene.
    pub fn resize_viewport(&mut self, flow: FlowKind, width: u32, height: u32) {
        self.viewports.resize(&flow.container(), width, height);
    }

    /// Action bound to a key string such as `"KeyG"`.
    #[must_use]
    pub fn key_action(&self, key: &str) -> Option<KeyAction> {
        self.options.keybindings.lookup(key)
    }
}
