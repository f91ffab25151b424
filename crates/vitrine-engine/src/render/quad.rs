use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget, TextureId, TextureStore};
use crate::scene::{DrawCmd, DrawList};

use super::common::{
    premul_alpha_blend, primitive_state, runs, ubo_min_binding_size, uniform_entry, CameraUniform,
    QuadVertex, QUAD_INDICES, QUAD_VERTICES,
};

/// World-space quad renderer.
///
/// Quads are camera-facing rectangles centered on `QuadCmd::center`. Each quad
/// samples its texture (or the store's white texture when it has none) and
/// multiplies by its premultiplied color. Consecutive quads sharing a texture
/// are drawn with one instanced call.
#[derive(Default)]
pub struct QuadRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    camera_bgl: Option<wgpu::BindGroupLayout>,
    camera_bind_group: Option<wgpu::BindGroup>,
    camera_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,

    warned_missing_texture: bool,
}

impl QuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the quads of `draw_list` back to front into `target`.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        textures: &mut TextureStore,
        view_proj: Mat4,
    ) {
        let Some(white) = textures.white(ctx) else { return };

        let mut instances: Vec<QuadInstance> = Vec::new();
        let mut keys: Vec<TextureId> = Vec::new();

        for item in draw_list.iter_in_paint_order() {
            let DrawCmd::Quad(cmd) = &item.cmd else { continue };
            if cmd.size.x <= 0.0 || cmd.size.y <= 0.0 || cmd.color.a <= 0.0 {
                continue;
            }
            let tex = match cmd.texture {
                Some(id) if textures.bind_group(id).is_some() => id,
                Some(_) => {
                    if !self.warned_missing_texture {
                        log::warn!("QuadRenderer: unknown texture; drawing solid quad instead");
                        self.warned_missing_texture = true;
                    }
                    white
                }
                None => white,
            };
            instances.push(QuadInstance {
                center: cmd.center.to_array(),
                size: cmd.size.to_array(),
                color: cmd.color.to_array(),
                _pad: 0.0,
            });
            keys.push(tex);
        }

        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx, textures);
        self.ensure_static_buffers(ctx);
        self.ensure_bindings(ctx);
        self.write_camera_uniform(ctx, view_proj);
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(camera_bg) = self.camera_bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        let mut rpass = target.load_pass("vitrine quad pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera_bg, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (start, end, tex) in runs(&keys) {
            let Some(bg) = textures.bind_group(tex) else { continue };
            rpass.set_bind_group(1, bg, &[]);
            rpass.draw_indexed(0..6, 0, start..end);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, textures: &mut TextureStore) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(texture_bgl) = textures.layout(ctx.device) else { return };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vitrine quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let camera_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vitrine quad camera bgl"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX,
                ubo_min_binding_size::<CameraUniform>(),
            )],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vitrine quad pipeline layout"),
            bind_group_layouts: &[&camera_bgl, texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vitrine quad pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), QuadInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: primitive_state(false),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.camera_bgl = Some(camera_bgl);

        self.camera_bind_group = None;
        self.camera_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera_bind_group.is_some() && self.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.camera_bgl.as_ref() else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vitrine quad camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vitrine quad camera bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.camera_ubo = Some(ubo);
        self.camera_bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vitrine quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vitrine quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_camera_uniform(&mut self, ctx: &RenderCtx<'_>, view_proj: Mat4) {
        let Some(ubo) = self.camera_ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&CameraUniform::new(view_proj)));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("vitrine quad instance vbo"),
            size: (new_cap * std::mem::size_of::<QuadInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadInstance {
    center: [f32; 3],
    size: [f32; 2],
    color: [f32; 4],
    _pad: f32,
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        1 => Float32x3, // center
        2 => Float32x2, // size
        3 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
