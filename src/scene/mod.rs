//! Scenes: one bound 3D viewport each, with a static curve backdrop and a
//! dynamic group of elements that flows create and clear.
//!
//! A [`Scene`] is plain CPU state. The frame loop ([`Scene::advance_frame`])
//! moves the camera, pulses points and re-projects labels; drawing is done
//! by [`crate::renderer::SceneRenderer`] from whatever the scene holds.
//! The home view is not a [`Scene`] but a [`HeroField`] of particles.

pub mod backdrop;
pub mod element;
pub mod hero;
pub mod label;
mod lighting;
pub mod viewports;

pub use backdrop::Backdrop;
pub use element::{ElementId, FrameContext, PointElement, TransitionElement, Visual};
pub use hero::{HeroField, Particle};
use glam::{Vec2, Vec3};
pub use label::{Label, LabelOverlay, LabelPlacement};
pub use lighting::SceneLighting;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
pub use viewports::{ContainerId, CreateOutcome, Viewports};

use crate::camera::{Camera, CameraDrift};
use crate::options::{MotionOptions, Options};
use crate::util::color::Color;

/// Upper bound (exclusive) of the random initial pulsation phase.
const PHASE_SPREAD: f32 = 100.0;

/// One bound viewport: camera, lighting, backdrop and dynamic elements.
pub struct Scene {
    container: ContainerId,
    theme: Color,
    camera: Camera,
    drift: CameraDrift,
    motion: MotionOptions,
    lighting: SceneLighting,
    /// Render surface size in physical pixels.
    surface: (u32, u32),
    backdrop: Backdrop,
    /// Dynamic group in insertion order.
    elements: Vec<(ElementId, Visual)>,
    next_element_id: u32,
    rng: StdRng,
    clears: u32,
    frames: u64,
}

impl Scene {
    /// Scene for `container` sized `surface`, themed with `theme`.
    ///
    /// `seed` drives the random pulsation phases of its points.
    #[must_use]
    pub fn new(
        container: ContainerId,
        theme: Color,
        surface: (u32, u32),
        options: &Options,
        seed: u64,
    ) -> Self {
        let aspect = aspect_of(surface).unwrap_or(1.0);
        log::debug!(
            "scene '{container}' created ({}x{}, theme {})",
            surface.0,
            surface.1,
            theme.to_css()
        );
        Self {
            container,
            theme,
            camera: Camera::from_options(&options.camera, aspect),
            drift: CameraDrift::new(&options.motion),
            motion: options.motion.clone(),
            lighting: SceneLighting::new(theme, &options.theme),
            surface,
            backdrop: Backdrop::new(theme, &options.theme),
            elements: Vec::new(),
            next_element_id: 0,
            rng: StdRng::seed_from_u64(seed),
            clears: 0,
            frames: 0,
        }
    }

    // -- Viewport --

    /// Container this scene is bound to.
    #[must_use]
    pub fn container(&self) -> &ContainerId {
        &self.container
    }

    /// Theme accent color.
    #[must_use]
    pub fn theme(&self) -> Color {
        self.theme
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Lights and fog.
    #[must_use]
    pub fn lighting(&self) -> &SceneLighting {
        &self.lighting
    }

    /// Static backdrop geometry.
    #[must_use]
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Render surface size in physical pixels.
    #[must_use]
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    /// Adopt a new viewport size: camera aspect and surface follow.
    /// Zero-sized dimensions are ignored; repeating a size changes nothing.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface = (width, height);
        self.camera.resize(width, height);
        self.reproject_labels();
    }

    /// Record a normalized pointer offset in [-1, 1] (clamped).
    pub fn pointer_move(&mut self, offset: Vec2) {
        self.drift.set_pointer(offset);
    }

    /// Last recorded pointer offset.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.drift.pointer()
    }

    // -- Frame loop --

    /// Run one frame: drift the camera, pulse points, re-project labels.
    pub fn advance_frame(&mut self) {
        self.drift.step(&mut self.camera);
        let frame = self.frame_context();
        for (_, visual) in &mut self.elements {
            visual.update(&frame);
        }
        self.frames += 1;
    }

    /// Frames advanced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    fn frame_context(&self) -> FrameContext {
        FrameContext {
            view_proj: self.camera.build_matrix(),
            width: self.surface.0 as f32,
            height: self.surface.1 as f32,
            pulse_step: self.motion.pulse_step,
            pulse_amplitude: self.motion.pulse_amplitude,
        }
    }

    fn reproject_labels(&mut self) {
        let frame = FrameContext {
            pulse_step: 0.0,
            ..self.frame_context()
        };
        for (_, visual) in &mut self.elements {
            if matches!(visual, Visual::Label(_)) {
                visual.update(&frame);
            }
        }
    }

    // -- Dynamic group --

    fn insert(&mut self, visual: Visual) -> ElementId {
        let id = ElementId(self.next_element_id);
        self.next_element_id += 1;
        self.elements.push((id, visual));
        id
    }

    /// Add a pulsating point at `(x, y, 0)` with a random phase.
    pub fn add_point(
        &mut self,
        x: f32,
        y: f32,
        color: Color,
        scale: f32,
    ) -> ElementId {
        let phase = self.rng.random_range(0.0..PHASE_SPREAD);
        self.insert(Visual::Point(PointElement::new(
            Vec3::new(x, y, 0.0),
            color,
            scale,
            phase,
            self.motion.pulse_amplitude,
        )))
    }

    /// Add a text label anchored at `anchor`, projected immediately.
    pub fn add_label(
        &mut self,
        text: impl Into<String>,
        anchor: Vec3,
        color: Color,
    ) -> ElementId {
        let mut label = Label::new(text, anchor, color);
        let (w, h) = self.surface;
        label.place(self.camera.project(anchor, w as f32, h as f32));
        self.insert(Visual::Label(label))
    }

    /// Add a fully transparent path between two points.
    pub fn add_transition(
        &mut self,
        start: Vec3,
        end: Vec3,
        color: Color,
    ) -> ElementId {
        self.insert(Visual::Transition(TransitionElement {
            start,
            end,
            color,
            opacity: 0.0,
        }))
    }

    /// Set a transition's opacity (clamped to [0, 1]). Returns `false` if
    /// `id` is not a transition still in the scene.
    pub fn set_transition_opacity(&mut self, id: ElementId, opacity: f32) -> bool {
        match self.element_mut(id) {
            Some(Visual::Transition(t)) => {
                t.opacity = opacity.clamp(0.0, 1.0);
                true
            }
            _ => false,
        }
    }

    /// Detach one element. Returns it, or `None` if it was already gone.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Visual> {
        let idx = self.elements.iter().position(|(eid, _)| *eid == id)?;
        Some(self.elements.remove(idx).1)
    }

    /// Release every dynamic element and label. Safe on an empty stage.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.clears += 1;
    }

    /// Times [`clear`](Self::clear) has run.
    #[must_use]
    pub fn clear_count(&self) -> u32 {
        self.clears
    }

    // -- Queries --

    /// Look up an element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Visual> {
        self.elements
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, v)| v)
    }

    fn element_mut(&mut self, id: ElementId) -> Option<&mut Visual> {
        self.elements
            .iter_mut()
            .find(|(eid, _)| *eid == id)
            .map(|(_, v)| v)
    }

    /// All dynamic elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Visual)> {
        self.elements.iter().map(|(id, v)| (*id, v))
    }

    /// Points in insertion order.
    pub fn points(&self) -> impl Iterator<Item = (ElementId, &PointElement)> {
        self.elements
            .iter()
            .filter_map(|(id, v)| v.as_point().map(|p| (*id, p)))
    }

    /// Transitions in insertion order.
    pub fn transitions(
        &self,
    ) -> impl Iterator<Item = (ElementId, &TransitionElement)> {
        self.elements
            .iter()
            .filter_map(|(id, v)| v.as_transition().map(|t| (*id, t)))
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = (ElementId, &Label)> {
        self.elements
            .iter()
            .filter_map(|(id, v)| v.as_label().map(|l| (*id, l)))
    }

    /// Overlays for the host to draw this frame.
    #[must_use]
    pub fn label_overlays(&self) -> Vec<LabelOverlay> {
        self.labels().map(|(_, l)| LabelOverlay::from(l)).collect()
    }

    /// Number of dynamic elements (labels included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the dynamic group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn aspect_of((width, height): (u32, u32)) -> Option<f32> {
    (width > 0 && height > 0).then(|| width as f32 / height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(
            ContainerId::new("keygen"),
            Color::from_hex(0x00ff88),
            (800, 600),
            &Options::default(),
            7,
        )
    }

    #[test]
    fn clear_empties_every_query() {
        let mut s = scene();
        let _ = s.add_point(1.0, 2.0, Color::WHITE, 1.0);
        let _ = s.add_label("G", Vec3::new(-2.0, -2.2, 0.0), Color::WHITE);
        let _ = s.add_transition(Vec3::ZERO, Vec3::X, Color::WHITE);
        assert_eq!(s.len(), 3);

        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.elements().count(), 0);
        assert_eq!(s.points().count(), 0);
        assert_eq!(s.labels().count(), 0);
        assert_eq!(s.transitions().count(), 0);
        assert!(s.label_overlays().is_empty());
    }

    #[test]
    fn clear_on_empty_stage_is_harmless() {
        let mut s = scene();
        s.clear();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.clear_count(), 2);
    }

    #[test]
    fn points_sit_on_the_plane() {
        let mut s = scene();
        let id = s.add_point(-2.0, -1.5, Color::WHITE, 1.0);
        let p = s.element(id).and_then(Visual::as_point).unwrap();
        assert_eq!(p.position, Vec3::new(-2.0, -1.5, 0.0));
        assert_eq!(p.base_scale, 1.0);
    }

    #[test]
    fn concurrent_points_get_distinct_phases() {
        let mut s = scene();
        let a = s.add_point(0.0, 0.0, Color::WHITE, 1.0);
        let b = s.add_point(0.0, 0.0, Color::WHITE, 1.0);
        let pa = s.element(a).and_then(Visual::as_point).unwrap().phase;
        let pb = s.element(b).and_then(Visual::as_point).unwrap().phase;
        assert_ne!(pa, pb);
        assert!((0.0..PHASE_SPREAD).contains(&pa));
    }

    #[test]
    fn remove_element_detaches_only_that_element() {
        let mut s = scene();
        let a = s.add_point(0.0, 0.0, Color::WHITE, 1.0);
        let b = s.add_point(1.0, 0.0, Color::WHITE, 1.0);
        assert!(s.remove_element(a).is_some());
        assert!(s.element(a).is_none());
        assert!(s.element(b).is_some());
        assert!(s.remove_element(a).is_none());
    }

    #[test]
    fn handles_are_not_reused_after_clear() {
        let mut s = scene();
        let a = s.add_point(0.0, 0.0, Color::WHITE, 1.0);
        s.clear();
        let b = s.add_point(0.0, 0.0, Color::WHITE, 1.0);
        assert_ne!(a, b);
        assert!(s.element(a).is_none());
    }

    #[test]
    fn frame_moves_camera_toward_pointer() {
        let mut s = scene();
        s.pointer_move(Vec2::new(1.0, 0.0));
        s.advance_frame();
        assert!(s.camera().eye.x > 0.0);
        assert_eq!(s.camera().target, Vec3::ZERO);
        assert_eq!(s.frame_count(), 1);
    }

    #[test]
    fn labels_follow_the_camera() {
        let mut s = scene();
        let id = s.add_label("S", Vec3::new(1.0, -1.0, 0.0), Color::WHITE);
        let before = s.element(id).and_then(Visual::as_label).unwrap().placement;
        assert_eq!(before.opacity, 1.0);

        s.pointer_move(Vec2::new(-1.0, 1.0));
        for _ in 0..10 {
            s.advance_frame();
        }
        let after = s.element(id).and_then(Visual::as_label).unwrap().placement;
        assert_ne!(before.position, after.position);
    }

    #[test]
    fn labels_behind_camera_are_hidden_not_removed() {
        let mut s = scene();
        let _ = s.add_label("behind", Vec3::new(0.0, 0.0, 50.0), Color::WHITE);
        s.advance_frame();
        let overlays = s.label_overlays();
        assert_eq!(overlays.len(), 1);
        assert_eq!(overlays[0].opacity, 0.0);
    }

    #[test]
    fn resize_is_idempotent_and_ignores_zero() {
        let mut s = scene();
        s.resize(1200, 600);
        let cam = s.camera().clone();
        s.resize(1200, 600);
        assert_eq!(s.camera(), &cam);
        assert_eq!(s.surface_size(), (1200, 600));
        s.resize(0, 0);
        assert_eq!(s.surface_size(), (1200, 600));
        assert_eq!(s.camera().aspect, 2.0);
    }

    #[test]
    fn transition_opacity_is_clamped() {
        let mut s = scene();
        let t = s.add_transition(Vec3::ZERO, Vec3::Y, Color::WHITE);
        assert!(s.set_transition_opacity(t, 1.7));
        assert_eq!(s.element(t).and_then(Visual::as_transition).unwrap().opacity, 1.0);
        let p = s.add_point(0.0, 0.0, Color::WHITE, 1.0);
        assert!(!s.set_transition_opacity(p, 0.5));
    }
}
