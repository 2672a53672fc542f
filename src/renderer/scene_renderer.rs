//! Draws one [`Scene`] or the home [`HeroField`] into the window surface.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::labels::LabelRenderer;
use super::mesh::{
    build_backdrop_lines, build_element_mesh, build_hero_mesh, Mesh, Vertex,
};
use super::pipeline::{create_scene_pipeline, PipelineSpec, ADDITIVE_BLENDING};
use crate::camera::CameraUniform;
use crate::gpu::dynamic_buffer::DynamicBuffer;
use crate::gpu::render_context::RenderContext;
use crate::scene::{ContainerId, HeroField, LabelOverlay, Scene};
use crate::util::color::Color;

/// Camera, light and fog of one frame, as the shader sees them.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct SceneUniform {
    /// View-projection and eye.
    pub camera: CameraUniform,
    /// Point light position (w unused).
    pub light_position: [f32; 4],
    /// Point light color and intensity in w.
    pub light_color: [f32; 4],
    /// Fog color and density in w.
    pub fog: [f32; 4],
    /// Ambient intensity, light range, unused, unused.
    pub params: [f32; 4],
}

impl SceneUniform {
    /// Uniform for the current state of `scene`.
    #[must_use]
    pub fn from_scene(scene: &Scene) -> Self {
        let mut camera = CameraUniform::new();
        camera.update_view_proj(scene.camera());
        let lighting = scene.lighting();
        let [lr, lg, lb] = lighting.light_color.to_rgb();
        let [fr, fg, fb] = lighting.fog_color.to_rgb();
        Self {
            camera,
            light_position: lighting.light_position.extend(1.0).to_array(),
            light_color: [lr, lg, lb, lighting.light_intensity],
            fog: [fr, fg, fb, lighting.fog_density],
            params: [lighting.ambient, lighting.light_range, 0.0, 0.0],
        }
    }

    /// Uniform for the home field: its camera, no light, no fog.
    #[must_use]
    pub fn from_hero(hero: &HeroField) -> Self {
        let mut camera = CameraUniform::new();
        camera.update_view_proj(hero.camera());
        Self {
            camera,
            light_position: [0.0; 4],
            light_color: [0.0; 4],
            fog: hero.background().to_rgba(0.0),
            params: [1.0, 1.0, 0.0, 0.0],
        }
    }
}

/// GPU renderer for scenes and the home field.
///
/// Holds one set of buffers; rendering a different scene than last time
/// rebuilds the backdrop lines. Labels are drawn last, in the same pass,
/// at their projected pixel positions.
pub struct SceneRenderer {
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertices: DynamicBuffer,
    indices: DynamicBuffer,
    lines: DynamicBuffer,
    index_count: u32,
    line_vertex_count: u32,
    backdrop_of: Option<ContainerId>,
    depth_view: wgpu::TextureView,
    mesh: Mesh,
    labels: LabelRenderer,
}

/// What the next pass draws besides the triangle mesh.
#[derive(Clone, Copy)]
enum PassContent {
    /// Backdrop lines, lit elements, labels.
    Scene,
    /// Additive sprites only.
    Hero,
}

impl SceneRenderer {
    /// Pipelines and buffers for `context`'s surface format.
    pub fn new(context: &RenderContext) -> Self {
        let device = &context.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene shader"),
            source: wgpu::ShaderSource::Wgsl(
                include_str!("../../assets/shaders/scene.wgsl").into(),
            ),
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("scene uniform layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });
        let uniform_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("scene uniform"),
                contents: bytemuck::bytes_of(&SceneUniform::zeroed()),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("scene pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });
        let pipeline = |spec: PipelineSpec<'_>| {
            create_scene_pipeline(device, &shader, &layout, context.format(), &spec)
        };
        let triangle_pipeline = pipeline(PipelineSpec {
            label: "scene triangles",
            topology: wgpu::PrimitiveTopology::TriangleList,
            depth_write: true,
            blend: wgpu::BlendState::ALPHA_BLENDING,
        });
        let line_pipeline = pipeline(PipelineSpec {
            label: "scene lines",
            topology: wgpu::PrimitiveTopology::LineList,
            depth_write: false,
            blend: wgpu::BlendState::ALPHA_BLENDING,
        });
        let sprite_pipeline = pipeline(PipelineSpec {
            label: "hero sprites",
            topology: wgpu::PrimitiveTopology::TriangleList,
            depth_write: false,
            blend: ADDITIVE_BLENDING,
        });

        let (width, height) = context.size();
        Self {
            triangle_pipeline,
            line_pipeline,
            sprite_pipeline,
            uniform_buffer,
            bind_group,
            vertices: DynamicBuffer::new(
                device,
                "scene vertices",
                size_of::<Vertex>() * 4096,
                wgpu::BufferUsages::VERTEX,
            ),
            indices: DynamicBuffer::new(
                device,
                "scene indices",
                size_of::<u32>() * 16384,
                wgpu::BufferUsages::INDEX,
            ),
            lines: DynamicBuffer::new(
                device,
                "backdrop lines",
                size_of::<Vertex>() * 512,
                wgpu::BufferUsages::VERTEX,
            ),
            index_count: 0,
            line_vertex_count: 0,
            backdrop_of: None,
            depth_view: create_depth_view(device, width, height),
            mesh: Mesh::new(),
            labels: LabelRenderer::new(context),
        }
    }

    /// Recreate the depth buffer after the surface was resized.
    pub fn resize(&mut self, context: &RenderContext) {
        let (width, height) = context.size();
        self.depth_view = create_depth_view(&context.device, width, height);
    }

    fn upload_mesh(&mut self, context: &RenderContext) {
        if !self.mesh.is_empty() {
            let (device, queue) = (&context.device, &context.queue);
            let _ = self.vertices.write(device, queue, &self.mesh.vertices);
            let _ = self.indices.write(device, queue, &self.mesh.indices);
        }
        self.index_count = self.mesh.indices.len() as u32;
    }

    fn write_uniform(&self, context: &RenderContext, uniform: &SceneUniform) {
        context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Upload the uniforms, meshes and label text of `scene`.
    pub fn prepare(
        &mut self,
        context: &RenderContext,
        scene: &Scene,
        overlays: &[LabelOverlay],
    ) {
        self.write_uniform(context, &SceneUniform::from_scene(scene));

        if self.backdrop_of.as_ref() != Some(scene.container()) {
            let lines = build_backdrop_lines(scene.backdrop());
            let _ = self.lines.write(&context.device, &context.queue, &lines);
            self.line_vertex_count = lines.len() as u32;
            self.backdrop_of = Some(scene.container().clone());
        }

        build_element_mesh(scene, &mut self.mesh);
        self.upload_mesh(context);

        if let Err(e) = self.labels.prepare(context, overlays) {
            log::warn!("labels of {} not drawn: {e}", scene.container());
        }
    }

    /// Prepare `scene` with its label `overlays` and present it.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if no frame could be acquired.
    pub fn render(
        &mut self,
        context: &RenderContext,
        scene: &Scene,
        overlays: &[LabelOverlay],
    ) -> Result<(), wgpu::SurfaceError> {
        self.prepare(context, scene, overlays);
        let frame = context.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.draw(context, &view, scene.lighting().fog_color, PassContent::Scene);
        frame.present();
        self.labels.trim();
        Ok(())
    }

    /// Build the home field's sprites and present them.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if no frame could be acquired.
    pub fn render_hero(
        &mut self,
        context: &RenderContext,
        hero: &HeroField,
    ) -> Result<(), wgpu::SurfaceError> {
        self.write_uniform(context, &SceneUniform::from_hero(hero));
        build_hero_mesh(hero, &mut self.mesh);
        self.upload_mesh(context);
        let frame = context.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.draw(context, &view, hero.background(), PassContent::Hero);
        frame.present();
        Ok(())
    }

    /// Draw what was prepared into `view`, cleared to `background`.
    fn draw(
        &self,
        context: &RenderContext,
        view: &wgpu::TextureView,
        background: Color,
        content: PassContent,
    ) {
        let [r, g, b] = background.to_rgb();
        let mut encoder = context.encoder("scene encoder");
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("scene pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: f64::from(r),
                                    g: f64::from(g),
                                    b: f64::from(b),
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                        },
                    )],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth_view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            pass.set_bind_group(0, &self.bind_group, &[]);

            if matches!(content, PassContent::Scene) && self.line_vertex_count > 0
            {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_vertex_buffer(0, self.lines.buffer().slice(..));
                pass.draw(0..self.line_vertex_count, 0..1);
            }
            if self.index_count > 0 {
                pass.set_pipeline(match content {
                    PassContent::Scene => &self.triangle_pipeline,
                    PassContent::Hero => &self.sprite_pipeline,
                });
                pass.set_vertex_buffer(0, self.vertices.buffer().slice(..));
                pass.set_index_buffer(
                    self.indices.buffer().slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
            if matches!(content, PassContent::Scene) && !self.labels.is_empty() {
                if let Err(e) = self.labels.render(&mut pass) {
                    log::warn!("label draw failed: {e}");
                }
            }
        }
        context.submit(encoder);
    }
}

fn create_depth_view(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("scene depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn uniform_is_tightly_packed() {
        assert_eq!(size_of::<CameraUniform>(), 80);
        assert_eq!(size_of::<SceneUniform>(), 144);
    }

    #[test]
    fn uniform_carries_scene_light_and_fog() {
        let scene = Scene::new(
            ContainerId::new("keygen"),
            Color(0x00ff88),
            (800, 600),
            &Options::default(),
            9,
        );
        let u = SceneUniform::from_scene(&scene);
        assert_eq!(u.light_position, [5.0, 5.0, 10.0, 1.0]);
        assert_eq!(u.light_color[3], 2.0);
        assert!((u.fog[3] - 0.02).abs() < 1e-6);
        assert_eq!(u.params[..2], [0.6, 50.0]);
        assert_eq!(u.camera.position, [0.0, 0.0, 10.0]);
    }

    #[test]
    fn hero_uniform_turns_fog_off() {
        let hero = HeroField::new(&Options::default(), (800, 600), 4);
        let u = SceneUniform::from_hero(&hero);
        assert_eq!(u.fog[3], 0.0);
        assert_eq!(u.fog[..3], hero.background().to_rgb());
        assert_eq!(u.camera.position, [0.0, 0.0, 25.0]);
    }
}
