//! Floating images with single selection.
//!
//! Image positions are local to the scroll group; world positions add the
//! group's vertical offset. A selected image is pinned to the screen center
//! in front of a dimming backdrop.

use glam::{Vec2, Vec3};
use serde::Deserialize;
use vitrine_engine::coords::{Ray, Viewport};
use vitrine_engine::paint::Color;
use vitrine_engine::render::TextureId;
use vitrine_engine::scene::{DrawList, QuadCmd};

use crate::damp::{Damped, DampingTimes};
use crate::frame::FrameInput;

/// Depth a selected image moves to.
pub const SELECTED_DEPTH: f32 = 11.0;
/// Depth of the dimming backdrop behind a selected image.
pub const BACKDROP_DEPTH: f32 = 10.9;
pub const BACKDROP_ALPHA: f32 = 0.6;
/// Share of the viewport a selected image may fill on either axis.
pub const SELECTED_FILL: f32 = 0.8;
/// Default image width as a share of the viewport width.
pub const DEFAULT_WIDTH_FRACTION: f32 = 0.4;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageSpec {
    /// Local path of the image file.
    pub url: String,
    /// Position inside the scroll group.
    pub position: [f32; 3],
    #[serde(default, alias = "desiredWidth")]
    pub desired_width: Option<f32>,
    #[serde(default, alias = "desiredHeight")]
    pub desired_height: Option<f32>,
}

impl ImageSpec {
    pub fn new(url: impl Into<String>, position: [f32; 3]) -> Self {
        Self { url: url.into(), position, desired_width: None, desired_height: None }
    }

    pub fn with_width(mut self, w: f32) -> Self {
        self.desired_width = Some(w);
        self
    }

    pub fn with_height(mut self, h: f32) -> Self {
        self.desired_height = Some(h);
        self
    }
}

/// Uniformly shrinks `scale` until neither axis exceeds `max`.
pub fn fit_within(scale: Vec2, max: Vec2) -> Vec2 {
    if scale.x <= 0.0 || scale.y <= 0.0 {
        return Vec2::ZERO;
    }
    let factor = (max.x / scale.x).min(max.y / scale.y).min(1.0).max(0.0);
    scale * factor
}

/// Rest size of an image: from the desired width, else the desired height,
/// else a share of the viewport width; then fitted inside the viewport.
pub fn base_scale(aspect: f32, desired_w: Option<f32>, desired_h: Option<f32>, viewport: Viewport) -> Vec2 {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    let scale = match (desired_w, desired_h) {
        (Some(w), _) => Vec2::new(w, w / aspect),
        (None, Some(h)) => Vec2::new(h * aspect, h),
        (None, None) => {
            let w = viewport.width * DEFAULT_WIDTH_FRACTION;
            Vec2::new(w, w / aspect)
        }
    };
    fit_within(scale, Vec2::new(viewport.width, viewport.height))
}

/// Zero or one selected image.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Selection(Option<usize>);

impl Selection {
    #[inline]
    pub fn get(self) -> Option<usize> {
        self.0
    }

    #[inline]
    pub fn is_selected(self, index: usize) -> bool {
        self.0 == Some(index)
    }

    /// Selects `index`, or deselects it when it already is.
    pub fn toggle(&mut self, index: usize) {
        self.0 = if self.0 == Some(index) { None } else { Some(index) };
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Per-image idle float parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IdleMotion {
    pub freq_x: f32,
    pub freq_y: f32,
    pub amplitude: f32,
    pub phase: f32,
}

/// Phase between neighbouring images, so they never float in lockstep.
const PHASE_STEP: f32 = 1.3;

impl IdleMotion {
    /// Deterministic spread of frequencies (0.3–0.5 rad/s) and amplitudes
    /// (0.1–0.2) over image indices.
    pub fn for_index(i: usize) -> Self {
        let k = (i % 5) as f32 / 4.0;
        let k2 = ((i + 2) % 5) as f32 / 4.0;
        Self {
            freq_x: 0.3 + 0.2 * k,
            freq_y: 0.3 + 0.2 * k2,
            amplitude: 0.1 + 0.1 * k,
            phase: i as f32 * PHASE_STEP,
        }
    }

    pub fn offset(&self, t: f32) -> Vec3 {
        Vec3::new(
            (t * self.freq_x + self.phase).sin() * self.amplitude,
            (t * self.freq_y + self.phase).cos() * self.amplitude,
            0.0,
        )
    }
}

#[derive(Debug, Clone)]
struct GalleryImage {
    spec: ImageSpec,
    aspect: f32,
    texture: Option<TextureId>,
    motion: IdleMotion,
    position: Damped<Vec3>,
    scale: Damped<Vec2>,
    primed: bool,
}

impl GalleryImage {
    fn base_position(&self) -> Vec3 {
        Vec3::from(self.spec.position)
    }
}

#[derive(Debug, Clone)]
pub struct Gallery {
    images: Vec<GalleryImage>,
    selection: Selection,
    damping: DampingTimes,
}

impl Gallery {
    /// `aspects[i]` is width over height of image `i`; missing entries are square.
    pub fn new(specs: Vec<ImageSpec>, aspects: &[f32], damping: DampingTimes) -> Self {
        let images = specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| GalleryImage {
                position: Damped::new(Vec3::from(spec.position)),
                spec,
                aspect: aspects.get(i).copied().unwrap_or(1.0),
                texture: None,
                motion: IdleMotion::for_index(i),
                scale: Damped::new(Vec2::ZERO),
                primed: false,
            })
            .collect();
        Self { images, selection: Selection::default(), damping }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[inline]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn spec(&self, index: usize) -> Option<&ImageSpec> {
        self.images.get(index).map(|img| &img.spec)
    }

    pub fn set_texture(&mut self, index: usize, texture: TextureId) {
        if let Some(img) = self.images.get_mut(index) {
            img.texture = Some(texture);
        }
    }

    /// Image click toggles it; a background click (`None`) clears.
    pub fn click(&mut self, hit: Option<usize>) -> Selection {
        match hit {
            Some(i) if i < self.images.len() => self.selection.toggle(i),
            _ => self.selection.clear(),
        }
        log::debug!("selection: {:?}", self.selection.get());
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Rest size of image `index` for this tick.
    pub fn base_scale_of(&self, index: usize, input: &FrameInput) -> Option<Vec2> {
        let img = self.images.get(index)?;
        Some(base_scale(img.aspect, img.spec.desired_width, img.spec.desired_height, input.viewport))
    }

    /// Local-space target position and scale of image `index`.
    fn targets(&self, index: usize, input: &FrameInput) -> Option<(Vec3, Vec2)> {
        let img = self.images.get(index)?;
        let base = self.base_scale_of(index, input)?;
        if self.selection.is_selected(index) {
            let group_offset = input.scroll.group_offset(input.viewport.height);
            let v = input.viewport_at(SELECTED_DEPTH).scaled(SELECTED_FILL);
            let max = Vec2::new(v.width, v.height);
            Some((Vec3::new(0.0, -group_offset, SELECTED_DEPTH), fit_within(base, max)))
        } else {
            Some((img.base_position() + img.motion.offset(input.elapsed), base))
        }
    }

    pub fn update(&mut self, input: &FrameInput) {
        for i in 0..self.images.len() {
            let Some((target_pos, target_scale)) = self.targets(i, input) else { continue };
            let selected = self.selection.is_selected(i);
            let img = &mut self.images[i];

            if !img.primed {
                img.position.snap(target_pos);
                img.scale.snap(target_scale);
                img.primed = true;
                continue;
            }

            let move_time = self.damping.selected_image;
            let scale_time = if selected { self.damping.selected_image } else { self.damping.idle_image_scale };
            img.position.update(target_pos, move_time, input.dt);
            img.scale.update(target_scale, scale_time, input.dt);
        }
    }

    /// World-space center and size of image `index`.
    pub fn world_rect(&self, index: usize, input: &FrameInput) -> Option<(Vec3, Vec2)> {
        let img = self.images.get(index)?;
        let group_offset = input.scroll.group_offset(input.viewport.height);
        Some((img.position.value() + Vec3::Y * group_offset, img.scale.value()))
    }

    /// Image under `ray`; the one nearest the camera wins. While an image is
    /// selected the backdrop hides the others, so only it can be hit.
    pub fn pick(&self, ray: &Ray, input: &FrameInput) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for i in 0..self.images.len() {
            if self.selection.get().is_some_and(|s| s != i) {
                continue;
            }
            let Some((center, size)) = self.world_rect(i, input) else { continue };
            let Some(p) = ray.at_depth(center.z) else { continue };
            let inside = (p.x - center.x).abs() <= size.x * 0.5 && (p.y - center.y).abs() <= size.y * 0.5;
            if inside && best.is_none_or(|(_, z)| center.z >= z) {
                best = Some((i, center.z));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Records the images, and the backdrop while something is selected.
    pub fn emit(&self, input: &FrameInput, list: &mut DrawList) {
        for i in 0..self.images.len() {
            let Some((center, size)) = self.world_rect(i, input) else { continue };
            list.push_quad(QuadCmd {
                center,
                size,
                texture: self.images[i].texture,
                color: Color::WHITE,
            });
        }

        if self.selection.get().is_some() {
            let v = input.viewport_at(BACKDROP_DEPTH);
            list.push_quad(QuadCmd {
                center: Vec3::new(0.0, 0.0, BACKDROP_DEPTH),
                size: Vec2::new(v.width, v.height),
                texture: None,
                color: Color::from_straight(0.0, 0.0, 0.0, BACKDROP_ALPHA),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use vitrine_engine::coords::Camera;
    use vitrine_engine::scene::DrawCmd;

    use super::*;
    use crate::scroll::ScrollState;

    fn input_at(offset: f32, elapsed: f32) -> FrameInput {
        FrameInput::new(
            1.0 / 60.0,
            elapsed,
            Vec2::ZERO,
            ScrollState::new(offset, 3.0),
            Camera::default(),
            Vec2::new(1280.0, 720.0),
        )
    }

    fn gallery() -> Gallery {
        Gallery::new(
            vec![
                ImageSpec::new("a.png", [-2.0, 0.0, 0.0]).with_width(3.0),
                ImageSpec::new("b.png", [2.0, 0.0, 3.0]).with_height(2.0),
                ImageSpec::new("c.png", [0.0, -3.0, 6.0]),
            ],
            &[16.0 / 9.0, 1.0, 9.0 / 16.0],
            DampingTimes::default(),
        )
    }

    // ── sizing ────────────────────────────────────────────────────────────

    #[test]
    fn base_scale_prefers_width_then_height() {
        let vp = Viewport::new(100.0, 100.0);
        assert_eq!(base_scale(2.0, Some(4.0), Some(1.0), vp), Vec2::new(4.0, 2.0));
        assert_eq!(base_scale(2.0, None, Some(3.0), vp), Vec2::new(6.0, 3.0));
        assert_eq!(base_scale(1.0, None, None, vp), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn base_scale_fits_viewport() {
        let vp = Viewport::new(4.0, 2.0);
        let s = base_scale(1.0, Some(10.0), None, vp);
        assert!(s.x <= 4.0 && s.y <= 2.0);
        assert_eq!(s, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn fit_within_preserves_aspect() {
        let s = fit_within(Vec2::new(16.0, 9.0), Vec2::new(8.0, 8.0));
        assert!((s.x / s.y - 16.0 / 9.0).abs() < 1e-5);
        assert_eq!(fit_within(Vec2::new(1.0, 1.0), Vec2::new(5.0, 5.0)), Vec2::ONE);
    }

    // ── selection ─────────────────────────────────────────────────────────

    #[test]
    fn toggle_and_background_clear() {
        let mut g = gallery();
        assert_eq!(g.click(Some(1)).get(), Some(1));
        assert_eq!(g.click(Some(2)).get(), Some(2));
        assert_eq!(g.click(Some(2)).get(), None);
        g.click(Some(0));
        assert_eq!(g.click(None).get(), None);
        assert_eq!(g.click(Some(99)).get(), None);
    }

    #[test]
    fn selected_image_moves_to_pinned_center() {
        let mut g = gallery();
        let input = input_at(0.5, 0.0);
        g.update(&input);
        g.click(Some(1));
        for _ in 0..120 {
            g.update(&input);
        }
        let (center, size) = g.world_rect(1, &input).unwrap();
        assert!(center.x.abs() < 1e-3 && center.y.abs() < 1e-3);
        assert!((center.z - SELECTED_DEPTH).abs() < 1e-3);
        let v = input.viewport_at(SELECTED_DEPTH);
        assert!(size.x <= v.width * SELECTED_FILL + 1e-3);
        assert!(size.y <= v.height * SELECTED_FILL + 1e-3);
    }

    // ── idle ──────────────────────────────────────────────────────────────

    #[test]
    fn idle_motion_stays_in_range() {
        for i in 0..12 {
            let m = IdleMotion::for_index(i);
            assert!((0.3..=0.5).contains(&m.freq_x) && (0.3..=0.5).contains(&m.freq_y));
            assert!((0.1..=0.2).contains(&m.amplitude));
            assert!(m.offset(3.7).length() <= m.amplitude * std::f32::consts::SQRT_2 + 1e-5);
        }
        assert_ne!(IdleMotion::for_index(0).phase, IdleMotion::for_index(1).phase);
    }

    // ── picking and drawing ───────────────────────────────────────────────

    #[test]
    fn pick_prefers_nearest_image() {
        let mut g = Gallery::new(
            vec![
                ImageSpec::new("far.png", [0.0, 0.0, 0.0]).with_width(2.0),
                ImageSpec::new("near.png", [0.0, 0.0, 5.0]).with_width(2.0),
            ],
            &[1.0, 1.0],
            DampingTimes::default(),
        );
        let input = input_at(0.0, 0.0);
        g.update(&input);
        let ray = Camera::default().ray(Vec2::ZERO, input.aspect);
        assert_eq!(g.pick(&ray, &input), Some(1));
        let away = Camera::default().ray(Vec2::new(1.0, 1.0), input.aspect);
        assert_eq!(g.pick(&away, &input), None);
    }

    #[test]
    fn backdrop_blocks_picking_other_images() {
        let mut g = Gallery::new(
            vec![
                ImageSpec::new("left.png", [-2.0, 0.0, 0.0]).with_width(2.0),
                ImageSpec::new("right.png", [2.0, 0.0, 0.0]).with_width(2.0),
            ],
            &[1.0, 1.0],
            DampingTimes::default(),
        );
        let input = input_at(0.0, 0.0);
        g.update(&input);

        let at = |x: f32| {
            let v = input.viewport_at(0.0);
            Camera::default().ray(Vec2::new(x / (v.width * 0.5), 0.0), input.aspect)
        };
        assert_eq!(g.pick(&at(2.0), &input), Some(1));

        g.click(Some(0));
        assert_eq!(g.pick(&at(2.0), &input), None);
        assert_eq!(g.click(g.pick(&at(2.0), &input)).get(), None);
    }

    // ── config parsing ────────────────────────────────────────────────────

    #[test]
    fn image_spec_accepts_camel_case_sizes() {
        let spec: ImageSpec =
            serde_json::from_str(r#"{ "url": "a.png", "position": [0, 1, 2], "desiredWidth": 2.5 }"#).unwrap();
        assert_eq!(spec.desired_width, Some(2.5));
        assert_eq!(spec.desired_height, None);

        let spec: ImageSpec =
            serde_json::from_str(r#"{ "url": "b.png", "position": [0, 0, 0], "desiredHeight": 1.5 }"#).unwrap();
        assert_eq!(spec.desired_height, Some(1.5));

        let typo = serde_json::from_str::<ImageSpec>(r#"{ "url": "c.png", "position": [0, 0, 0], "desiredWidht": 2 }"#);
        assert!(typo.is_err());
    }

    #[test]
    fn backdrop_only_when_selected() {
        let mut g = gallery();
        let input = input_at(0.0, 0.0);
        g.update(&input);

        let mut list = DrawList::new();
        g.emit(&input, &mut list);
        assert_eq!(list.items().len(), 3);

        g.click(Some(0));
        list.clear();
        g.emit(&input, &mut list);
        let backdrop = list
            .items()
            .iter()
            .filter_map(|it| match &it.cmd {
                DrawCmd::Quad(q) if q.texture.is_none() && q.center.z == BACKDROP_DEPTH => Some(q),
                _ => None,
            })
            .count();
        assert_eq!(backdrop, 1);
    }
}
