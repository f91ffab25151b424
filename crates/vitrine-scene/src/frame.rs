//! Per-tick input snapshot and the portfolio driver that ties the controllers
//! together.

use std::collections::BTreeMap;

use glam::Vec2;
use vitrine_engine::coords::{Camera, Ray, Viewport};
use vitrine_engine::input::Key;
use vitrine_engine::paint::Color;
use vitrine_engine::scene::{DrawList, TextCmd};
use vitrine_engine::text::FontId;

use crate::breakpoint::Breakpoint;
use crate::config::PortfolioConfig;
use crate::gallery::Gallery;
use crate::glass::{GlassController, GlassDraw, GlassMode};
use crate::measure::MeasureText;
use crate::nav::{NavBar, NavTarget, Navigator};
use crate::scroll::{ScrollState, ScrollTracker};
use crate::title::{Title, TitleState};

/// Everything a controller may read during one tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Seconds since start.
    pub elapsed: f32,
    /// Pointer in normalized device coordinates (−1..1, +Y up).
    pub pointer: Vec2,
    pub scroll: ScrollState,
    pub camera: Camera,
    /// Window width over height.
    pub aspect: f32,
    /// Logical pixels.
    pub window_width: f32,
    pub window_height: f32,
    /// Visible extent at `z = 0`.
    pub viewport: Viewport,
    pub breakpoint: Breakpoint,
}

impl FrameInput {
    /// `window_px` is the logical window size. A zero height falls back to a
    /// square aspect.
    pub fn new(dt: f32, elapsed: f32, pointer: Vec2, scroll: ScrollState, camera: Camera, window_px: Vec2) -> Self {
        let aspect = if window_px.y > 0.0 { window_px.x / window_px.y } else { 1.0 };
        Self {
            dt,
            elapsed,
            pointer,
            scroll,
            camera,
            aspect,
            window_width: window_px.x,
            window_height: window_px.y,
            viewport: camera.viewport_at(0.0, aspect),
            breakpoint: Breakpoint::from_width(window_px.x),
        }
    }

    #[inline]
    pub fn viewport_at(&self, z: f32) -> Viewport {
        self.camera.viewport_at(z, self.aspect)
    }

    /// Picking ray through the pointer.
    #[inline]
    pub fn ray(&self) -> Ray {
        self.camera.ray(self.pointer, self.aspect)
    }
}

/// What one tick produced.
#[derive(Debug)]
pub struct FrameOutput {
    /// Drawn into the offscreen buffer the glass samples.
    pub content: DrawList,
    /// Drawn on the surface after the glass.
    pub overlay: DrawList,
    pub glass: GlassDraw,
}

/// Scroll fraction used for an anchor that is not in the sections map.
const UNKNOWN_SECTION: f32 = 0.0;

pub struct Portfolio {
    config: PortfolioConfig,
    glass: GlassController,
    nav: NavBar,
    gallery: Gallery,
    title: Title,
    scroll: ScrollTracker,
    sections: BTreeMap<String, f32>,
    font: Option<FontId>,
}

impl Portfolio {
    /// `geometry_width` is the model-space width of the glass sub-geometry for
    /// the configured mode; `image_aspects[i]` is width over height of image `i`.
    pub fn new(config: PortfolioConfig, geometry_width: Option<f32>, image_aspects: &[f32]) -> Self {
        let glass = GlassController::new(config.mode, config.active_overrides(), geometry_width)
            .with_smooth_time(config.damping.glass);
        let nav = NavBar::new(config.nav_items.clone());
        let gallery = Gallery::new(config.images.clone(), image_aspects, config.damping);
        let title = Title::new(config.title.clone());
        let scroll = ScrollTracker::new(config.pages, config.damping.scroll);
        let sections = config.sections.clone();

        log::info!(
            "portfolio: mode={} images={} nav_items={} pages={}",
            config.mode,
            gallery.len(),
            nav.items().len(),
            scroll.pages()
        );

        Self { config, glass, nav, gallery, title, scroll, sections, font: None }
    }

    /// Font for the title and labels. Without one, text is skipped.
    pub fn set_font(&mut self, font: FontId) {
        self.font = Some(font);
    }

    #[inline]
    pub fn config(&self) -> &PortfolioConfig {
        &self.config
    }

    #[inline]
    pub fn mode(&self) -> GlassMode {
        self.glass.mode()
    }

    #[inline]
    pub fn glass(&self) -> &GlassController {
        &self.glass
    }

    #[inline]
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    #[inline]
    pub fn gallery_mut(&mut self) -> &mut Gallery {
        &mut self.gallery
    }

    #[inline]
    pub fn nav(&self) -> &NavBar {
        &self.nav
    }

    #[inline]
    pub fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    fn nav_active(&self) -> bool {
        self.glass.mode() == GlassMode::Bar
    }

    /// Advances the page scroll; call before building the tick's [`FrameInput`].
    pub fn tick_scroll(&mut self, dt: f32) -> ScrollState {
        self.scroll.tick(dt)
    }

    /// Logical window height; sets how far line and page keys scroll.
    pub fn set_viewport_height(&mut self, px: f32) {
        self.scroll.set_viewport_height(px);
    }

    /// Title placement for this tick; hidden while an image is selected.
    pub fn title_state(&self, input: &FrameInput) -> TitleState {
        self.title.state(input, self.gallery.selection().get().is_some())
    }

    pub fn tick(&mut self, input: &FrameInput, measure: &dyn MeasureText) -> FrameOutput {
        self.glass.update(input);
        self.gallery.update(input);

        let mut content = DrawList::new();
        self.emit_content(input, &mut content);

        let mut overlay = DrawList::new();
        if let (true, Some(font)) = (self.nav_active(), self.font) {
            for label in self.nav.layout(input, measure) {
                overlay.push_text(TextCmd {
                    text: label.text,
                    font,
                    size: label.font_size,
                    color: Color::WHITE,
                    anchor: label.position,
                });
            }
        }

        FrameOutput { content, overlay, glass: self.glass.draw() }
    }

    /// Records the offscreen content (images, backdrop, title) without
    /// advancing any animation. Lets a caller re-record after textures land.
    pub fn emit_content(&self, input: &FrameInput, list: &mut DrawList) {
        self.gallery.emit(input, list);
        if let Some(font) = self.font {
            self.title.emit(&self.title_state(input), font, list);
        }
    }

    /// True when a click at the pointer would hit a label or an image.
    pub fn hovering(&self, input: &FrameInput, measure: &dyn MeasureText) -> bool {
        let ray = input.ray();
        (self.nav_active() && self.nav.hit(input, measure, &ray).is_some())
            || self.gallery.pick(&ray, input).is_some()
    }

    /// Routes a primary click. Returns the navigation target when a label with
    /// a link was hit; the caller hands it to [`Portfolio::follow`].
    pub fn on_click(&mut self, input: &FrameInput, measure: &dyn MeasureText) -> Option<NavTarget> {
        let ray = input.ray();

        if self.nav_active() {
            if let Some(i) = self.nav.hit(input, measure, &ray) {
                let item = &self.nav.items()[i];
                log::debug!("nav label {:?} -> {:?}", item.label, item.link);
                return NavTarget::from_link(&item.link);
            }
        }

        let hit = self.gallery.pick(&ray, input);
        self.gallery.click(hit);
        None
    }

    /// Escape clears the selection; scroll keys move the page.
    pub fn on_key(&mut self, key: Key) {
        if key == Key::Escape {
            self.gallery.clear_selection();
            return;
        }
        self.scroll.apply_key(key);
    }

    pub fn on_wheel(&mut self, delta_px: f32, viewport_px_height: f32) {
        self.scroll.apply_wheel(delta_px, viewport_px_height);
    }

    /// Moves the scroll target to the named anchor. Unknown anchors go to
    /// the top.
    pub fn scroll_to_fragment(&mut self, fragment: &str) {
        let fraction = self.sections.get(fragment).copied().unwrap_or_else(|| {
            log::warn!("unknown section #{fragment}; scrolling to top");
            UNKNOWN_SECTION
        });
        self.scroll.scroll_to_fraction(fraction);
    }

    /// Performs `target`: fragments scroll in place before the navigator sees them.
    pub fn follow(&mut self, target: &NavTarget, navigator: &mut dyn Navigator) {
        if let NavTarget::Fragment(fragment) = target {
            self.scroll_to_fragment(fragment);
        }
        navigator.navigate(target);
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use vitrine_engine::input::LINE_HEIGHT_PX;
    use vitrine_engine::scene::DrawCmd;

    use super::*;
    use crate::glass::GLASS_DEPTH;
    use crate::measure::MonospaceMeasure;
    use crate::nav::{LABEL_DEPTH_OFFSET, NavItem};

    const WINDOW: Vec2 = Vec2::new(1280.0, 720.0);

    fn input(pointer: Vec2, scroll: ScrollState) -> FrameInput {
        FrameInput::new(1.0 / 60.0, 0.0, pointer, scroll, Camera::default(), WINDOW)
    }

    /// Pointer NDC that lands on world point `p` at its depth.
    fn pointer_at(p: Vec3) -> Vec2 {
        let probe = input(Vec2::ZERO, ScrollState::default());
        let v = probe.viewport_at(p.z);
        Vec2::new(p.x / (v.width * 0.5), p.y / (v.height * 0.5))
    }

    #[derive(Default)]
    struct Recorder(Vec<NavTarget>);

    impl Navigator for Recorder {
        fn navigate(&mut self, target: &NavTarget) {
            self.0.push(target.clone());
        }
    }

    // ── input snapshot ────────────────────────────────────────────────────

    #[test]
    fn snapshot_derives_viewport_and_breakpoint() {
        let i = input(Vec2::ZERO, ScrollState::default());
        assert!((i.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(i.breakpoint, Breakpoint::Desktop);
        assert_eq!(i.viewport, i.viewport_at(0.0));
        assert!(i.viewport_at(GLASS_DEPTH).height < i.viewport.height);

        let flat = FrameInput::new(0.0, 0.0, Vec2::ZERO, ScrollState::default(), Camera::default(), Vec2::new(500.0, 0.0));
        assert_eq!(flat.aspect, 1.0);
        assert_eq!(flat.breakpoint, Breakpoint::Mobile);
    }

    // ── tick ──────────────────────────────────────────────────────────────

    #[test]
    fn tick_emits_images_into_content_and_glass_description() {
        let mut p = Portfolio::new(PortfolioConfig::default(), Some(10.0), &[1.5; 5]);
        let out = p.tick(&input(Vec2::ZERO, ScrollState::default()), &MonospaceMeasure::default());
        let quads = out.content.items().iter().filter(|it| matches!(it.cmd, DrawCmd::Quad(_))).count();
        assert_eq!(quads, 5);
        assert!(out.overlay.is_empty());
        assert_eq!(out.glass.model, "lens");
        assert_eq!(out.glass.node, "Cylinder");
    }

    #[test]
    fn selection_adds_backdrop() {
        let mut p = Portfolio::new(PortfolioConfig::default(), Some(10.0), &[1.0; 5]);
        let i = input(Vec2::ZERO, ScrollState::default());
        p.tick(&i, &MonospaceMeasure::default());
        p.gallery_mut().click(Some(0));
        let out = p.tick(&i, &MonospaceMeasure::default());
        assert_eq!(out.content.items().len(), 6);
    }

    #[test]
    fn selection_hides_title_at_top_of_page() {
        let mut p = Portfolio::new(PortfolioConfig::default(), Some(10.0), &[1.0; 5]);
        let m = MonospaceMeasure::default();
        let top = input(Vec2::ZERO, ScrollState::new(0.0, 3.0));
        p.tick(&top, &m);
        assert!(p.title_state(&top).visible);

        p.gallery_mut().click(Some(0));
        p.tick(&top, &m);
        let title = p.title_state(&top);
        assert!(!title.visible);
        assert_eq!(title.opacity, 0.0);

        p.on_key(Key::Escape);
        assert!(p.title_state(&top).visible);
    }

    #[test]
    fn emit_content_matches_tick() {
        let mut p = Portfolio::new(PortfolioConfig::default(), Some(10.0), &[1.0; 5]);
        let i = input(Vec2::ZERO, ScrollState::default());
        p.gallery_mut().click(Some(3));
        let out = p.tick(&i, &MonospaceMeasure::default());

        let mut again = DrawList::new();
        p.emit_content(&i, &mut again);
        assert_eq!(again.items(), out.content.items());
    }

    // ── clicks ────────────────────────────────────────────────────────────

    #[test]
    fn clicking_image_toggles_and_background_clears() {
        let mut p = Portfolio::new(PortfolioConfig::default(), Some(10.0), &[1.0; 5]);
        let m = MonospaceMeasure::default();
        let rest = input(Vec2::ZERO, ScrollState::default());
        p.tick(&rest, &m);

        let (center, _) = p.gallery().world_rect(1, &rest).unwrap();
        let on_image = input(pointer_at(center), ScrollState::default());
        assert_eq!(p.on_click(&on_image, &m), None);
        assert_eq!(p.gallery().selection().get(), Some(1));

        let corner = input(Vec2::new(0.99, 0.99), ScrollState::default());
        assert!(p.hovering(&on_image, &m));
        assert!(!p.hovering(&corner, &m));
        p.gallery_mut().clear_selection();
        p.gallery_mut().click(Some(1));
        p.on_click(&corner, &m);
        assert_eq!(p.gallery().selection().get(), None);
    }

    #[test]
    fn bar_mode_labels_navigate() {
        let config = PortfolioConfig {
            mode: GlassMode::Bar,
            nav_items: vec![NavItem::new("About", "#about"), NavItem::new("Blank", "")],
            ..PortfolioConfig::default()
        };
        let mut p = Portfolio::new(config, Some(14.0), &[]);
        let m = MonospaceMeasure::default();
        let rest = input(Vec2::ZERO, ScrollState::default());

        let labels = p.nav().layout(&rest, &m);
        let about = input(pointer_at(labels[0].position), ScrollState::default());
        assert_eq!(p.on_click(&about, &m), Some(NavTarget::Fragment("about".into())));

        let blank = input(pointer_at(labels[1].position), ScrollState::default());
        assert_eq!(p.on_click(&blank, &m), None);
        assert!(labels[0].position.z == GLASS_DEPTH + LABEL_DEPTH_OFFSET);
    }

    #[test]
    fn lens_mode_ignores_labels() {
        let mut p = Portfolio::new(PortfolioConfig::default(), Some(10.0), &[1.0; 5]);
        let m = MonospaceMeasure::default();
        let rest = input(Vec2::ZERO, ScrollState::default());
        let labels = p.nav().layout(&rest, &m);
        let on_label = input(pointer_at(labels[0].position), ScrollState::default());
        assert_eq!(p.on_click(&on_label, &m), None);
    }

    // ── keys, wheel, navigation ───────────────────────────────────────────

    #[test]
    fn escape_clears_and_keys_scroll() {
        let mut p = Portfolio::new(PortfolioConfig::default(), None, &[]);
        p.gallery_mut().click(Some(2));
        p.on_key(Key::Escape);
        assert_eq!(p.gallery().selection().get(), None);

        p.on_key(Key::End);
        assert_eq!(p.scroll().target(), 1.0);
        p.on_wheel(-1.0e6, 720.0);
        assert_eq!(p.scroll().target(), 0.0);
    }

    #[test]
    fn line_keys_follow_resized_window_without_wheel() {
        let mut p = Portfolio::new(PortfolioConfig::default(), None, &[]);
        p.set_viewport_height(1080.0);
        p.on_key(Key::ArrowDown);
        let expected = LINE_HEIGHT_PX / ((p.scroll().pages() - 1.0) * 1080.0);
        assert!((p.scroll().target() - expected).abs() < 1e-6);

        p.on_key(Key::Home);
        p.set_viewport_height(0.0);
        p.on_key(Key::ArrowDown);
        assert!((p.scroll().target() - expected).abs() < 1e-6);
    }

    #[test]
    fn fragments_scroll_then_reach_navigator() {
        let mut p = Portfolio::new(PortfolioConfig::default(), None, &[]);
        let mut nav = Recorder::default();

        p.follow(&NavTarget::Fragment("contact".into()), &mut nav);
        assert_eq!(p.scroll().target(), 1.0);
        p.follow(&NavTarget::Fragment("missing".into()), &mut nav);
        assert_eq!(p.scroll().target(), 0.0);

        p.on_key(Key::End);
        p.follow(&NavTarget::External("https://example.com".into()), &mut nav);
        assert_eq!(p.scroll().target(), 1.0);
        assert_eq!(nav.0.len(), 3);
    }
}
