use std::f32::consts::TAU;

use glam::Vec3;

use super::{MeshData, MeshVertex};

fn vertex(p: Vec3, n: Vec3) -> MeshVertex {
    MeshVertex { position: p.to_array(), normal: n.to_array() }
}

/// Closed cylinder around the Y axis with smooth sides and flat caps.
pub(super) fn cylinder(radius: f32, height: f32, segments: u16) -> MeshData {
    let segments = segments.max(8);
    let half = height * 0.5;
    let mut vertices = Vec::with_capacity(segments as usize * 4 + 2);
    let mut indices = Vec::with_capacity(segments as usize * 12);

    // Side: two rings sharing outward normals.
    for i in 0..segments {
        let a = i as f32 / segments as f32 * TAU;
        let n = Vec3::new(a.cos(), 0.0, a.sin());
        vertices.push(vertex(n * radius + Vec3::Y * half, n));
        vertices.push(vertex(n * radius - Vec3::Y * half, n));
    }
    for i in 0..segments {
        let j = (i + 1) % segments;
        let (t0, b0, t1, b1) = (i * 2, i * 2 + 1, j * 2, j * 2 + 1);
        indices.extend_from_slice(&[t0, t1, b0, b0, t1, b1]);
    }

    // Caps: a center vertex plus a ring each.
    for (y, n) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let center = vertices.len() as u16;
        vertices.push(vertex(Vec3::new(0.0, y, 0.0), n));
        let ring = vertices.len() as u16;
        for i in 0..segments {
            let a = i as f32 / segments as f32 * TAU;
            vertices.push(vertex(Vec3::new(a.cos() * radius, y, a.sin() * radius), n));
        }
        for i in 0..segments {
            let j = (i + 1) % segments;
            if y > 0.0 {
                indices.extend_from_slice(&[center, ring + j, ring + i]);
            } else {
                indices.extend_from_slice(&[center, ring + i, ring + j]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Axis-aligned box centered on the origin with per-face normals.
pub(super) fn cuboid(size: Vec3) -> MeshData {
    let h = size * 0.5;
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (n, u, v) in faces {
        let base = vertices.len() as u16;
        let c = n * h;
        let (du, dv) = (u * h, v * h);
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            vertices.push(vertex(c + du * su + dv * sv, n));
        }
        // `u × v` points along `n` for every face above, so this winding is CCW
        // seen from outside.
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_faces_wind_outward() {
        let mesh = cuboid(Vec3::new(2.0, 3.0, 4.0));
        for tri in mesh.indices.chunks(3) {
            let p = |i: u16| Vec3::from(mesh.vertices[i as usize].position);
            let n = Vec3::from(mesh.vertices[tri[0] as usize].normal);
            let face = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(face.dot(n) > 0.0);
        }
    }

    #[test]
    fn cylinder_indices_are_in_range() {
        let mesh = cylinder(1.0, 0.5, 16);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert_eq!(mesh.indices.len() % 3, 0);
    }
}
