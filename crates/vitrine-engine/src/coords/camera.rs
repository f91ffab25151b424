use glam::{Mat4, Vec2, Vec3, Vec4};

use super::Viewport;

/// Axis-aligned perspective camera on +Z looking down -Z.
///
/// The portfolio never rotates its camera, which keeps viewport extents,
/// picking rays and projections closed-form.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 20.0),
            fov_y_deg: 15.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    #[inline]
    fn half_tan(&self) -> f32 {
        (self.fov_y_deg.to_radians() * 0.5).tan()
    }

    /// Viewport extent in world units at depth `z`.
    ///
    /// Depths at or behind the camera collapse to an empty viewport.
    pub fn viewport_at(&self, z: f32, aspect: f32) -> Viewport {
        let distance = (self.position.z - z).max(0.0);
        let height = 2.0 * distance * self.half_tan();
        Viewport::new(height * aspect, height)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position - Vec3::Z, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect.max(1e-4), self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Picking ray through a normalized pointer position (−1..1, +Y up).
    pub fn ray(&self, ndc: Vec2, aspect: f32) -> Ray {
        let t = self.half_tan();
        let dir = Vec3::new(ndc.x * t * aspect, ndc.y * t, -1.0).normalize();
        Ray { origin: self.position, dir }
    }

    /// Projects a world point to logical pixels. `None` when behind the camera.
    pub fn project(&self, world: Vec3, screen: Vec2) -> Option<Vec2> {
        let aspect = if screen.y > 0.0 { screen.x / screen.y } else { 1.0 };
        let clip = self.view_proj(aspect) * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * screen.x,
            (1.0 - ndc.y) * 0.5 * screen.y,
        ))
    }

    /// Logical pixels covered by one world unit at depth `z`.
    pub fn pixels_per_unit(&self, z: f32, screen_height_px: f32) -> f32 {
        let vp = self.viewport_at(z, 1.0);
        if vp.height > 0.0 { screen_height_px / vp.height } else { 0.0 }
    }
}

/// Half-line used for pointer picking.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Intersection with the plane `z = depth`, if it lies in front of the origin.
    pub fn at_depth(&self, depth: f32) -> Option<Vec3> {
        if self.dir.z.abs() < 1e-6 {
            return None;
        }
        let t = (depth - self.origin.z) / self.dir.z;
        (t > 0.0).then(|| self.origin + self.dir * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── viewport ──────────────────────────────────────────────────────────

    #[test]
    fn viewport_shrinks_toward_camera() {
        let cam = Camera::default();
        let far = cam.viewport_at(0.0, 16.0 / 9.0);
        let near = cam.viewport_at(15.0, 16.0 / 9.0);
        assert!(near.height < far.height);
        assert!(approx(far.height, 2.0 * 20.0 * (7.5f32).to_radians().tan()));
        assert!(approx(far.aspect(), 16.0 / 9.0));
    }

    #[test]
    fn viewport_behind_camera_is_empty() {
        let cam = Camera::default();
        assert!(!cam.viewport_at(25.0, 1.0).is_valid());
    }

    // ── rays ──────────────────────────────────────────────────────────────

    #[test]
    fn pointer_edge_ray_hits_viewport_edge() {
        let cam = Camera::default();
        let aspect = 1.5;
        let vp = cam.viewport_at(0.0, aspect);
        let hit = cam.ray(Vec2::new(1.0, -1.0), aspect).at_depth(0.0).unwrap();
        assert!(approx(hit.x, vp.width / 2.0));
        assert!(approx(hit.y, -vp.height / 2.0));
    }

    #[test]
    fn ray_misses_plane_behind_origin() {
        let cam = Camera::default();
        assert!(cam.ray(Vec2::ZERO, 1.0).at_depth(30.0).is_none());
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera::default();
        let p = cam.project(Vec3::ZERO, Vec2::new(800.0, 600.0)).unwrap();
        assert!(approx(p.x, 400.0));
        assert!(approx(p.y, 300.0));
    }

    #[test]
    fn pixels_per_unit_matches_viewport() {
        let cam = Camera::default();
        let ppu = cam.pixels_per_unit(0.0, 600.0);
        assert!(approx(ppu * cam.viewport_at(0.0, 1.0).height, 600.0));
    }
}
