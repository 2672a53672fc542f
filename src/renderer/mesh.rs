//! CPU mesh generation for scene elements and the backdrop.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::scene::element::TRANSITION_RADIUS;
use crate::scene::{Backdrop, HeroField, Scene, Visual};

/// Latitude and longitude segments of a point sphere.
pub const SPHERE_SEGMENTS: u32 = 32;
/// Radial segments of a transition tube.
pub const TUBE_SEGMENTS: u32 = 8;

/// Vertex shared by every scene pipeline.
///
/// A zero normal marks unlit geometry (backdrop lines).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// World position.
    pub position: [f32; 3],
    /// Unit normal, or zero for unlit geometry.
    pub normal: [f32; 3],
    /// Linear RGBA.
    pub color: [f32; 4],
}

impl Vertex {
    /// Lit vertex.
    #[must_use]
    pub fn new(position: Vec3, normal: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            color,
        }
    }

    /// Unlit vertex.
    #[must_use]
    pub fn unlit(position: Vec3, color: [f32; 4]) -> Self {
        Self::new(position, Vec3::ZERO, color)
    }

    /// Buffer layout: position, normal, color at locations 0, 1, 2.
    #[must_use]
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                },
            ],
        }
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all geometry, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Whether the mesh has no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append a UV sphere.
    pub fn push_sphere(&mut self, center: Vec3, radius: f32, color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        let n = SPHERE_SEGMENTS;
        for lat in 0..=n {
            let theta = lat as f32 / n as f32 * PI;
            let (sin_t, cos_t) = theta.sin_cos();
            for lon in 0..=n {
                let phi = lon as f32 / n as f32 * TAU;
                let (sin_p, cos_p) = phi.sin_cos();
                let normal = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
                self.vertices
                    .push(Vertex::new(center + normal * radius, normal, color));
            }
        }
        let row = n + 1;
        for lat in 0..n {
            for lon in 0..n {
                let a = base + lat * row + lon;
                let b = a + row;
                self.indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
            }
        }
    }

    /// Append an unlit square facing +Z, centred on `center`.
    pub fn push_sprite(&mut self, center: Vec3, size: f32, color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        let h = size / 2.0;
        for corner in [
            Vec3::new(-h, -h, 0.0),
            Vec3::new(h, -h, 0.0),
            Vec3::new(h, h, 0.0),
            Vec3::new(-h, h, 0.0),
        ] {
            self.vertices.push(Vertex::unlit(center + corner, color));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Append an open tube from `start` to `end`. Degenerate tubes are
    /// skipped.
    pub fn push_tube(
        &mut self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        color: [f32; 4],
    ) {
        let Some(axis) = (end - start).try_normalize() else {
            return;
        };
        let (u, v) = axis.any_orthonormal_pair();
        let base = self.vertices.len() as u32;
        let n = TUBE_SEGMENTS;
        for i in 0..=n {
            let angle = i as f32 / n as f32 * TAU;
            let (s, c) = angle.sin_cos();
            let normal = u * c + v * s;
            self.vertices
                .push(Vertex::new(start + normal * radius, normal, color));
            self.vertices
                .push(Vertex::new(end + normal * radius, normal, color));
        }
        for i in 0..n {
            let a = base + i * 2;
            self.indices
                .extend_from_slice(&[a, a + 1, a + 2, a + 1, a + 3, a + 2]);
        }
    }
}

/// Build the dynamic-group mesh of `scene` into `mesh`.
///
/// Points are spheres at their current pulsation scale; transitions are
/// tubes with their current opacity. Fully transparent tubes are left out.
pub fn build_element_mesh(scene: &Scene, mesh: &mut Mesh) {
    mesh.clear();
    for (_, visual) in scene.elements() {
        match visual {
            Visual::Point(p) => {
                mesh.push_sphere(p.position, p.radius(), p.color.to_rgba(1.0));
            }
            Visual::Transition(t) if t.opacity > 0.0 => {
                mesh.push_tube(
                    t.start,
                    t.end,
                    TRANSITION_RADIUS,
                    t.color.to_rgba(t.opacity),
                );
            }
            Visual::Transition(_) | Visual::Label(_) => {}
        }
    }
}

/// Build the home field into `mesh`: one sprite per particle, rotated
/// into world space on the CPU so sprites keep facing the fixed camera.
pub fn build_hero_mesh(hero: &HeroField, mesh: &mut Mesh) {
    mesh.clear();
    let model = hero.model();
    let (size, opacity) = (hero.particle_size(), hero.opacity());
    for particle in hero.particles() {
        let [r, g, b] = particle.color;
        mesh.push_sprite(
            model.transform_point3(particle.position),
            size,
            [r, g, b, opacity],
        );
    }
}

/// Line-list vertices for the curve branches and reference grid.
#[must_use]
pub fn build_backdrop_lines(backdrop: &Backdrop) -> Vec<Vertex> {
    let curve = backdrop.curve_color.to_rgba(backdrop.curve_opacity);
    let mut lines = Vec::new();
    for grid in &backdrop.grid {
        let color = grid.color.to_rgba(1.0);
        lines.push(Vertex::unlit(grid.start, color));
        lines.push(Vertex::unlit(grid.end, color));
    }
    for branch in [&backdrop.upper, &backdrop.lower] {
        for pair in branch.windows(2) {
            lines.push(Vertex::unlit(pair[0], curve));
            lines.push(Vertex::unlit(pair[1], curve));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::options::{Options, ThemeOptions};
    use crate::scene::ContainerId;
    use crate::util::color::Color;

    #[test]
    fn sphere_counts() {
        let mut mesh = Mesh::new();
        mesh.push_sphere(Vec3::ZERO, 0.3, [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 33 * 33);
        assert_eq!(mesh.indices.len(), 32 * 32 * 6);
        assert!(mesh
            .vertices
            .iter()
            .all(|v| (Vec3::from(v.position).length() - 0.3).abs() < 1e-5));
    }

    #[test]
    fn tube_counts_and_radius() {
        let mut mesh = Mesh::new();
        let start = Vec3::new(-2.0, -1.5, 0.0);
        let end = Vec3::new(-3.0, 1.0, 0.0);
        mesh.push_tube(start, end, 0.05, [1.0; 4]);
        assert_eq!(mesh.vertices.len(), 18);
        assert_eq!(mesh.indices.len(), 48);
        let axis = (end - start).normalize();
        for v in &mesh.vertices {
            let p = Vec3::from(v.position) - start;
            let off_axis = p - axis * p.dot(axis);
            assert!((off_axis.length() - 0.05).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_tube_is_skipped() {
        let mut mesh = Mesh::new();
        mesh.push_tube(Vec3::ONE, Vec3::ONE, 0.05, [1.0; 4]);
        assert!(mesh.is_empty());
    }

    #[test]
    fn transparent_transitions_are_not_meshed() {
        let mut scene = Scene::new(
            ContainerId::new("encrypt"),
            Color(0xff00ff),
            (640, 480),
            &Options::default(),
            3,
        );
        let _ = scene.add_point(0.0, 0.0, Color::WHITE, 1.0);
        let hidden = scene.add_transition(Vec3::ZERO, Vec3::X, Color::WHITE);
        let shown = scene.add_transition(Vec3::ZERO, Vec3::Y, Color::WHITE);
        let _ = scene.set_transition_opacity(shown, 0.5);
        let _ = scene.add_label("M", Vec2::ZERO.extend(0.0), Color::WHITE);

        let mut mesh = Mesh::new();
        build_element_mesh(&scene, &mut mesh);
        assert_eq!(mesh.vertices.len(), 33 * 33 + 18);
        assert!(mesh.vertices.iter().any(|v| v.color[3] == 0.5));

        let _ = scene.set_transition_opacity(hidden, 1.0);
        build_element_mesh(&scene, &mut mesh);
        assert_eq!(mesh.vertices.len(), 33 * 33 + 36);
    }

    #[test]
    fn hero_sprites_follow_the_field_rotation() {
        let mut options = Options::default();
        options.hero.particle_count = 50;
        let mut hero = HeroField::new(&options, (800, 600), 5);
        let mut mesh = Mesh::new();
        build_hero_mesh(&hero, &mut mesh);
        assert_eq!(mesh.vertices.len(), 200);
        assert_eq!(mesh.indices.len(), 300);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
        assert!(mesh.vertices.iter().all(|v| v.color[3] == 0.8));

        let first = hero.particles()[0].position;
        let centre = |m: &Mesh| {
            m.vertices[..4]
                .iter()
                .map(|v| Vec3::from(v.position))
                .sum::<Vec3>()
                / 4.0
        };
        assert!((centre(&mesh) - first).length() < 1e-4);

        for _ in 0..100 {
            let _ = hero.advance_frame();
        }
        build_hero_mesh(&hero, &mut mesh);
        let turned = hero.model().transform_point3(first);
        assert!((centre(&mesh) - turned).length() < 1e-4);
        let side = Vec3::from(mesh.vertices[1].position)
            - Vec3::from(mesh.vertices[0].position);
        assert!((side - Vec3::new(0.15, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn backdrop_lines_cover_grid_and_curve() {
        let backdrop = Backdrop::new(Color(0x00ff88), &ThemeOptions::default());
        let lines = build_backdrop_lines(&backdrop);
        let curve_segments = 2 * (backdrop.upper.len() - 1);
        assert_eq!(lines.len(), 2 * (backdrop.grid.len() + curve_segments));
        assert!(lines.iter().all(|v| v.normal == [0.0; 3]));
    }
}
