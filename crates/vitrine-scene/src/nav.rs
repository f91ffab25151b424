//! Navigation labels laid out along the docked bar.

use glam::{Vec2, Vec3};
use serde::Deserialize;
use vitrine_engine::coords::Ray;

use crate::frame::FrameInput;
use crate::glass::{BOTTOM_MARGIN, GLASS_DEPTH};
use crate::measure::MeasureText;

/// Labels float this far in front of the glass.
pub const LABEL_DEPTH_OFFSET: f32 = 0.1;

/// Extra hit margin around a label, as a fraction of its font size.
const HIT_PADDING: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavItem {
    pub label: String,
    #[serde(default)]
    pub link: String,
}

impl NavItem {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self { label: label.into(), link: link.into() }
    }
}

/// Where a clicked label leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
    /// In-page anchor, without the leading `#`.
    Fragment(String),
    External(String),
}

impl NavTarget {
    /// Empty links go nowhere; `#…` is in-page; anything else is external.
    pub fn from_link(link: &str) -> Option<Self> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }
        Some(match link.strip_prefix('#') {
            Some(fragment) => NavTarget::Fragment(fragment.to_string()),
            None => NavTarget::External(link.to_string()),
        })
    }
}

/// Performs navigation on behalf of the scene.
pub trait Navigator {
    fn navigate(&mut self, target: &NavTarget);
}

/// Horizontal centers for `n` labels `spacing` apart, centered on zero.
pub fn label_offsets(n: usize, spacing: f32) -> Vec<f32> {
    let mid = (n as f32 - 1.0) * 0.5;
    (0..n).map(|i| (i as f32 - mid) * spacing).collect()
}

/// One positioned label.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLabel {
    pub index: usize,
    pub text: String,
    /// World-space center.
    pub position: Vec3,
    pub font_size: f32,
    /// Measured world extents.
    pub extent: Vec2,
}

impl NavLabel {
    fn contains(&self, point: Vec3) -> bool {
        let half = self.extent * 0.5 + Vec2::splat(self.font_size * HIT_PADDING);
        (point.x - self.position.x).abs() <= half.x && (point.y - self.position.y).abs() <= half.y
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavBar {
    items: Vec<NavItem>,
}

impl NavBar {
    pub fn new(items: Vec<NavItem>) -> Self {
        Self { items }
    }

    #[inline]
    pub fn items(&self) -> &[NavItem] {
        &self.items
    }

    /// Labels for this tick, sized and spaced for the current breakpoint and
    /// resting on the bottom margin in front of the glass.
    pub fn layout(&self, input: &FrameInput, measure: &dyn MeasureText) -> Vec<NavLabel> {
        let v = input.viewport_at(GLASS_DEPTH);
        let y = -v.height * 0.5 + BOTTOM_MARGIN;
        let z = GLASS_DEPTH + LABEL_DEPTH_OFFSET;
        let font_size = input.breakpoint.nav_font_size();

        label_offsets(self.items.len(), input.breakpoint.nav_spacing())
            .into_iter()
            .zip(&self.items)
            .enumerate()
            .map(|(index, (x, item))| NavLabel {
                index,
                text: item.label.clone(),
                position: Vec3::new(x, y, z),
                font_size,
                extent: measure.measure(&item.label, font_size),
            })
            .collect()
    }

    /// Index of the label under `ray`, if any.
    pub fn hit(&self, input: &FrameInput, measure: &dyn MeasureText, ray: &Ray) -> Option<usize> {
        let point = ray.at_depth(GLASS_DEPTH + LABEL_DEPTH_OFFSET)?;
        self.layout(input, measure)
            .into_iter()
            .find(|label| label.contains(point))
            .map(|label| label.index)
    }
}

#[cfg(test)]
mod tests {
    use vitrine_engine::coords::Camera;

    use super::*;
    use crate::measure::MonospaceMeasure;
    use crate::scroll::ScrollState;

    fn input(width: f32) -> FrameInput {
        FrameInput::new(
            0.016,
            0.0,
            Vec2::ZERO,
            ScrollState::default(),
            Camera::default(),
            Vec2::new(width, 720.0),
        )
    }

    fn bar() -> NavBar {
        NavBar::new(vec![
            NavItem::new("Home", "#"),
            NavItem::new("About", "#about"),
            NavItem::new("Contact", "mailto:hi@example.com"),
        ])
    }

    // ── links ─────────────────────────────────────────────────────────────

    #[test]
    fn links_classify() {
        assert_eq!(NavTarget::from_link(""), None);
        assert_eq!(NavTarget::from_link("   "), None);
        assert_eq!(NavTarget::from_link("#"), Some(NavTarget::Fragment(String::new())));
        assert_eq!(NavTarget::from_link("#about"), Some(NavTarget::Fragment("about".into())));
        assert_eq!(
            NavTarget::from_link("https://example.com"),
            Some(NavTarget::External("https://example.com".into()))
        );
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn offsets_are_symmetric() {
        assert_eq!(label_offsets(1, 0.3), vec![0.0]);
        let o = label_offsets(3, 0.3);
        assert!((o[0] + 0.3).abs() < 1e-6 && o[1] == 0.0 && (o[2] - 0.3).abs() < 1e-6);
        assert!(label_offsets(0, 0.3).is_empty());
    }

    #[test]
    fn layout_uses_breakpoint_tables() {
        let m = MonospaceMeasure::default();
        let desktop = bar().layout(&input(1280.0), &m);
        let mobile = bar().layout(&input(400.0), &m);
        assert!((desktop[2].position.x - 0.3).abs() < 1e-6);
        assert!((mobile[2].position.x - 0.2).abs() < 1e-6);
        assert_eq!(mobile[0].font_size, 0.035);
        assert!(desktop.iter().all(|l| l.position.z == GLASS_DEPTH + LABEL_DEPTH_OFFSET));
    }

    #[test]
    fn labels_rest_on_bottom_margin() {
        let i = input(1280.0);
        let v = i.viewport_at(GLASS_DEPTH);
        let labels = bar().layout(&i, &MonospaceMeasure::default());
        assert!(labels.iter().all(|l| (l.position.y - (-v.height * 0.5 + BOTTOM_MARGIN)).abs() < 1e-6));
    }

    // ── picking ───────────────────────────────────────────────────────────

    #[test]
    fn ray_through_label_hits_it() {
        let i = input(1280.0);
        let m = MonospaceMeasure::default();
        let labels = bar().layout(&i, &m);
        let target = labels[1].position;
        let cam = Camera::default();
        let ray = Ray { origin: cam.position, dir: (target - cam.position).normalize() };
        assert_eq!(bar().hit(&i, &m, &ray), Some(1));

        let miss = Ray { origin: cam.position, dir: Vec3::new(0.0, 0.0, -1.0) };
        assert_eq!(bar().hit(&i, &m, &miss), None);
    }
}
