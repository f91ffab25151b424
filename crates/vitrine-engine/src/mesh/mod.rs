//! Glass mesh geometry.
//!
//! Models are collections of named nodes, mirroring how exported scene files
//! name their sub-geometries. The three built-in models are procedural and
//! authored Y-up in model units; the scene rotates them a quarter turn about X
//! so the flat face of the lens and bar points at the camera.

mod primitives;

use std::f32::consts::FRAC_PI_2;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // normal
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

/// Axis-aligned bounds in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl MeshData {
    /// `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = Vec3::from(self.vertices.first()?.position);
        let (min, max) = self.vertices.iter().fold((first, first), |(lo, hi), v| {
            let p = Vec3::from(v.position);
            (lo.min(p), hi.max(p))
        });
        Some(Bounds { min, max })
    }
}

/// A loaded model: named sub-geometries.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    nodes: Vec<(String, MeshData)>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), nodes: Vec::new() }
    }

    pub fn with_node(mut self, key: impl Into<String>, mesh: MeshData) -> Self {
        self.nodes.push((key.into(), mesh));
        self
    }

    pub fn node(&self, key: &str) -> Option<&MeshData> {
        self.nodes.iter().find(|(k, _)| k == key).map(|(_, m)| m)
    }

    /// Built-in procedural models: `lens`, `bar`, `cube`.
    pub fn builtin(name: &str) -> Option<Model> {
        let model = match name {
            "lens" => Model::new(name).with_node("Cylinder", primitives::cylinder(5.0, 1.0, 64)),
            "bar" => Model::new(name).with_node("Cube", primitives::cuboid(Vec3::new(14.0, 1.0, 1.6))),
            "cube" => Model::new(name).with_node("Cube", primitives::cuboid(Vec3::splat(4.0))),
            _ => return None,
        };
        Some(model)
    }
}

/// Model matrix for a glass node: uniform scale, quarter turn about X, translation.
pub fn glass_transform(position: Vec3, scale: f32) -> Mat4 {
    Mat4::from_scale_rotation_translation(
        Vec3::splat(scale.max(1e-4)),
        Quat::from_rotation_x(FRAC_PI_2),
        position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_models_expose_expected_nodes() {
        assert!(Model::builtin("lens").unwrap().node("Cylinder").is_some());
        assert!(Model::builtin("bar").unwrap().node("Cube").is_some());
        assert!(Model::builtin("cube").unwrap().node("Cube").is_some());
        assert!(Model::builtin("lens").unwrap().node("Cube").is_none());
        assert!(Model::builtin("teapot").is_none());
    }

    #[test]
    fn bounds_width_matches_authored_size() {
        let bar = Model::builtin("bar").unwrap();
        let b = bar.node("Cube").unwrap().bounds().unwrap();
        assert!((b.size().x - 14.0).abs() < 1e-4);

        let lens = Model::builtin("lens").unwrap();
        let b = lens.node("Cylinder").unwrap().bounds().unwrap();
        assert!((b.size().x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(MeshData::default().bounds().is_none());
    }
}
