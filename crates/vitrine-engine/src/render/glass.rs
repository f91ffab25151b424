use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::mesh::{MeshData, MeshVertex};
use crate::paint::Color;
use crate::render::{OffscreenTarget, RenderCtx, RenderTarget};

use super::common::{
    linear_clamp_sampler, premul_alpha_blend, primitive_state, sampler_entry, texture_entry,
    ubo_min_binding_size, uniform_entry,
};

/// Optical parameters of the transmissive glass surface.
///
/// `attenuation_distance` of `f32::INFINITY` disables absorption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlassMaterial {
    pub ior: f32,
    pub thickness: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub chromatic_aberration: f32,
    pub anisotropy: f32,
    pub color: Color,
    pub attenuation_color: Color,
    pub attenuation_distance: f32,
}

impl Default for GlassMaterial {
    fn default() -> Self {
        Self {
            ior: 1.15,
            thickness: 5.0,
            roughness: 0.0,
            transmission: 1.0,
            chromatic_aberration: 0.1,
            anisotropy: 0.01,
            color: Color::WHITE,
            attenuation_color: Color::WHITE,
            attenuation_distance: f32::INFINITY,
        }
    }
}

/// One glass mesh to draw this frame.
///
/// `key` identifies the geometry for GPU buffer caching; the same key must
/// always refer to the same `data`.
#[derive(Debug, Clone, Copy)]
pub struct GlassMesh<'a> {
    pub key: &'a str,
    pub data: &'a MeshData,
    pub transform: Mat4,
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

/// Composites the offscreen content buffer onto the surface.
///
/// `blit` draws the buffer over the whole viewport; `draw` then renders a
/// convex mesh that samples the same buffer through a refraction offset
/// proportional to `thickness * (1 - 1/ior)`. Back faces are culled, so
/// convex meshes need no depth buffer.
#[derive(Default)]
pub struct GlassRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    blit_pipeline: Option<wgpu::RenderPipeline>,
    glass_pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    bind_group: Option<wgpu::BindGroup>,
    bind_group_generation: Option<u64>,
    ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    meshes: HashMap<String, GpuMesh>,
}

impl GlassRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the offscreen buffer as a full-viewport backdrop.
    pub fn blit(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, offscreen: &OffscreenTarget) {
        if !self.prepare(ctx, offscreen) {
            return;
        }
        let Some(pipeline) = self.blit_pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };

        let mut rpass = target.load_pass("vitrine blit pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    /// Draws `mesh` refracting the offscreen buffer.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        offscreen: &OffscreenTarget,
        mesh: GlassMesh<'_>,
        material: &GlassMaterial,
        view_proj: Mat4,
    ) {
        if mesh.data.indices.is_empty() || !self.prepare(ctx, offscreen) {
            return;
        }
        self.ensure_mesh(ctx, mesh.key, mesh.data);

        let (w, h) = offscreen.size();
        let uniform = GlassUniform::new(view_proj, mesh.transform, material, (w as f32, h as f32));
        let Some(ubo) = self.ubo.as_ref() else { return };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));

        let Some(pipeline) = self.glass_pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(gpu_mesh) = self.meshes.get(mesh.key) else { return };

        let mut rpass = target.load_pass("vitrine glass pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu_mesh.vbo.slice(..));
        rpass.set_index_buffer(gpu_mesh.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
    }

    /// Ensures pipelines and a bind group for the current offscreen view.
    fn prepare(&mut self, ctx: &RenderCtx<'_>, offscreen: &OffscreenTarget) -> bool {
        self.ensure_pipelines(ctx);
        self.ensure_bindings(ctx, offscreen);
        self.bind_group.is_some()
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.glass_pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("vitrine glass shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/glass.wgsl").into()),
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("vitrine glass bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ubo_min_binding_size::<GlassUniform>(),
                ),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("vitrine glass pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let target = [Some(wgpu::ColorTargetState {
            format: ctx.surface_format,
            blend: Some(premul_alpha_blend()),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let blit = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vitrine blit pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_blit"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_blit"),
                compilation_options: Default::default(),
                targets: &target,
            }),
            primitive: primitive_state(false),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let glass = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("vitrine glass pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_glass"),
                compilation_options: Default::default(),
                buffers: &[MeshVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_glass"),
                compilation_options: Default::default(),
                targets: &target,
            }),
            primitive: primitive_state(true),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.blit_pipeline = Some(blit);
        self.glass_pipeline = Some(glass);
        self.bind_group_layout = Some(bgl);
        self.bind_group = None;
        self.bind_group_generation = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>, offscreen: &OffscreenTarget) {
        if self.bind_group.is_some() && self.bind_group_generation == Some(offscreen.generation()) {
            return;
        }
        if self.sampler.is_none() {
            self.sampler = Some(linear_clamp_sampler(ctx.device, "vitrine glass sampler"));
        }
        if self.ubo.is_none() {
            self.ubo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("vitrine glass ubo"),
                size: std::mem::size_of::<GlassUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }

        let Some(bgl) = self.bind_group_layout.as_ref() else { return };
        let Some(view) = offscreen.view() else { return };
        let Some(sampler) = self.sampler.as_ref() else { return };
        let Some(ubo) = self.ubo.as_ref() else { return };

        self.bind_group = Some(ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("vitrine glass bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
        self.bind_group_generation = Some(offscreen.generation());
    }

    fn ensure_mesh(&mut self, ctx: &RenderCtx<'_>, key: &str, data: &MeshData) {
        if self.meshes.contains_key(key) {
            return;
        }
        let vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vitrine glass mesh vbo"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        // Index buffers must be a multiple of 4 bytes.
        let mut indices = data.indices.clone();
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("vitrine glass mesh ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "GlassRenderer: uploaded mesh {key} ({} vertices, {} indices)",
            data.vertices.len(),
            data.indices.len()
        );
        self.meshes.insert(
            key.to_string(),
            GpuMesh { vbo, ibo, index_count: data.indices.len() as u32 },
        );
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Attenuation distance substituted for "no absorption".
const NO_ATTENUATION: f32 = 1.0e9;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlassUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],       // rgb, transmission
    attenuation: [f32; 4], // rgb, distance
    optics: [f32; 4],      // ior, thickness, roughness, chromatic aberration
    extra: [f32; 4],       // anisotropy, target width, target height, unused
}

impl GlassUniform {
    fn new(view_proj: Mat4, model: Mat4, m: &GlassMaterial, target: (f32, f32)) -> Self {
        let color = m.color.straight_rgb();
        let atten = m.attenuation_color.straight_rgb();
        let distance = if m.attenuation_distance.is_finite() && m.attenuation_distance > 0.0 {
            m.attenuation_distance
        } else {
            NO_ATTENUATION
        };
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], m.transmission.clamp(0.0, 1.0)],
            attenuation: [atten[0], atten[1], atten[2], distance],
            optics: [
                m.ior.max(1.0),
                m.thickness.max(0.0),
                m.roughness.clamp(0.0, 1.0),
                m.chromatic_aberration,
            ],
            extra: [m.anisotropy, target.0.max(1.0), target.1.max(1.0), 0.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_attenuation_maps_to_large_distance() {
        let u = GlassUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, &GlassMaterial::default(), (800.0, 600.0));
        assert_eq!(u.attenuation[3], NO_ATTENUATION);
        assert_eq!(u.extra[1], 800.0);
    }

    #[test]
    fn ior_below_one_is_clamped() {
        let m = GlassMaterial { ior: 0.5, ..Default::default() };
        let u = GlassUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, &m, (1.0, 1.0));
        assert_eq!(u.optics[0], 1.0);
    }

    #[test]
    fn uniform_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<GlassUniform>() % 16, 0);
    }
}
