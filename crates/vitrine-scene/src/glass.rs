//! The refracting glass mesh: mode profiles, material and per-tick transform.

use std::collections::BTreeMap;
use std::fmt;

use glam::{Mat4, Vec3};
use serde::Deserialize;
use vitrine_engine::mesh::glass_transform;
use vitrine_engine::paint::Color;
use vitrine_engine::render::GlassMaterial;

use crate::damp::Damped;
use crate::frame::FrameInput;

/// Depth the glass sits at.
pub const GLASS_DEPTH: f32 = 15.0;
/// Gap between the docked bar and the bottom of the viewport, in world units.
pub const BOTTOM_MARGIN: f32 = 0.2;
/// Largest automatic scale.
pub const MAX_AUTO_SCALE: f32 = 0.15;
/// Share of the viewport width the mesh may cover when scaled automatically.
pub const WIDTH_FILL: f32 = 0.9;

// ── mode ──────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Deserialize)]
#[serde(from = "String")]
pub enum GlassMode {
    #[default]
    Lens,
    Bar,
    Cube,
}

impl GlassMode {
    /// Case-insensitive; anything unrecognized falls back to `Lens`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "lens" => GlassMode::Lens,
            "bar" => GlassMode::Bar,
            "cube" => GlassMode::Cube,
            other => {
                log::warn!("unknown glass mode {other:?}; using lens");
                GlassMode::Lens
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GlassMode::Lens => "lens",
            GlassMode::Bar => "bar",
            GlassMode::Cube => "cube",
        }
    }

    pub fn profile(self) -> ModeProfile {
        match self {
            GlassMode::Lens => ModeProfile {
                model: "lens",
                node: "Cylinder",
                follow_pointer: true,
                lock_to_bottom: false,
                material: Material::default(),
            },
            GlassMode::Bar => ModeProfile {
                model: "bar",
                node: "Cube",
                follow_pointer: false,
                lock_to_bottom: true,
                material: Material::bar(),
            },
            GlassMode::Cube => ModeProfile {
                model: "cube",
                node: "Cube",
                follow_pointer: true,
                lock_to_bottom: false,
                material: Material::default(),
            },
        }
    }
}

impl From<String> for GlassMode {
    fn from(s: String) -> Self {
        GlassMode::parse(&s)
    }
}

impl fmt::Display for GlassMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a mode renders and how it moves.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeProfile {
    /// Model key in the mesh library.
    pub model: &'static str,
    /// Sub-geometry inside the model.
    pub node: &'static str,
    pub follow_pointer: bool,
    pub lock_to_bottom: bool,
    pub material: Material,
}

// ── material ──────────────────────────────────────────────────────────────

/// A free-form material parameter from configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawParam")]
pub enum MaterialParam {
    Number(f32),
    Bool(bool),
    Color(Color),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawParam {
    Number(f32),
    Bool(bool),
    Text(String),
}

impl From<RawParam> for MaterialParam {
    fn from(raw: RawParam) -> Self {
        match raw {
            RawParam::Number(n) => MaterialParam::Number(n),
            RawParam::Bool(b) => MaterialParam::Bool(b),
            RawParam::Text(s) if s.starts_with('#') => match Color::from_hex(&s) {
                Some(c) => MaterialParam::Color(c),
                None => MaterialParam::Text(s),
            },
            RawParam::Text(s) => MaterialParam::Text(s),
        }
    }
}

impl MaterialParam {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            MaterialParam::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            MaterialParam::Color(c) => Some(*c),
            MaterialParam::Text(s) => Color::from_hex(s),
            _ => None,
        }
    }
}

/// Transmissive material of the glass.
///
/// `color` and `attenuation_color` of `None` mean no tint.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub ior: f32,
    pub thickness: f32,
    pub anisotropy: f32,
    pub chromatic_aberration: f32,
    pub transmission: f32,
    pub roughness: f32,
    pub color: Option<Color>,
    pub attenuation_color: Option<Color>,
    pub attenuation_distance: f32,
    /// Parameters the renderer does not interpret, carried verbatim.
    pub extra: BTreeMap<String, MaterialParam>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ior: 1.15,
            thickness: 5.0,
            anisotropy: 0.01,
            chromatic_aberration: 0.1,
            transmission: 1.0,
            roughness: 0.0,
            color: None,
            attenuation_color: None,
            attenuation_distance: f32::INFINITY,
            extra: BTreeMap::new(),
        }
    }
}

impl Material {
    /// Bar material: white tint with short attenuation.
    pub fn bar() -> Self {
        Self {
            color: Some(Color::WHITE),
            attenuation_color: Some(Color::WHITE),
            attenuation_distance: 0.25,
            ..Self::default()
        }
    }

    /// Applies overrides. Recognized extras update the material; the rest are
    /// kept in `extra`.
    pub fn apply(&mut self, overrides: &GlassOverrides) {
        if let Some(v) = overrides.ior {
            self.ior = v;
        }
        if let Some(v) = overrides.thickness {
            self.thickness = v;
        }
        if let Some(v) = overrides.anisotropy {
            self.anisotropy = v;
        }
        if let Some(v) = overrides.chromatic_aberration {
            self.chromatic_aberration = v;
        }

        for (key, param) in &overrides.extra {
            let applied = match normalize_key(key).as_str() {
                "transmission" => param.as_number().map(|v| self.transmission = v),
                "roughness" => param.as_number().map(|v| self.roughness = v),
                "attenuationdistance" => param.as_number().map(|v| self.attenuation_distance = v),
                "color" => param.as_color().map(|c| self.color = Some(c)),
                "attenuationcolor" => param.as_color().map(|c| self.attenuation_color = Some(c)),
                _ => {
                    self.extra.insert(key.clone(), param.clone());
                    Some(())
                }
            };
            if applied.is_none() {
                log::warn!("material parameter {key:?} has unexpected value {param:?}; ignored");
            }
        }
    }

    /// Renderer-side parameters.
    pub fn to_gpu(&self) -> GlassMaterial {
        GlassMaterial {
            ior: self.ior,
            thickness: self.thickness,
            roughness: self.roughness,
            transmission: self.transmission,
            chromatic_aberration: self.chromatic_aberration,
            anisotropy: self.anisotropy,
            color: self.color.unwrap_or(Color::WHITE),
            attenuation_color: self.attenuation_color.unwrap_or(Color::WHITE),
            attenuation_distance: self.attenuation_distance,
        }
    }
}

/// `attenuation_color`, `attenuationColor` and `attenuation-color` are one key.
fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Per-mode overrides from configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GlassOverrides {
    /// Fixed uniform scale; disables automatic sizing.
    pub scale: Option<f32>,
    pub ior: Option<f32>,
    pub thickness: Option<f32>,
    pub anisotropy: Option<f32>,
    #[serde(alias = "chromaticAberration")]
    pub chromatic_aberration: Option<f32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, MaterialParam>,
}

// ── controller ────────────────────────────────────────────────────────────

/// Glass placement for one tick.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlassTransform {
    pub position: Vec3,
    pub scale: f32,
}

impl GlassTransform {
    pub fn matrix(&self) -> Mat4 {
        glass_transform(self.position, self.scale)
    }
}

/// Everything the composite pass needs to draw the glass.
#[derive(Debug, Clone, PartialEq)]
pub struct GlassDraw {
    pub model: &'static str,
    pub node: &'static str,
    pub transform: GlassTransform,
    pub material: GlassMaterial,
}

/// Drives the single glass mesh of a portfolio.
#[derive(Debug, Clone)]
pub struct GlassController {
    mode: GlassMode,
    profile: ModeProfile,
    scale_override: Option<f32>,
    geometry_width: Option<f32>,
    smooth_time: f32,

    position: Damped<Vec3>,
    scale: Damped<f32>,
}

impl GlassController {
    /// `geometry_width` is the model-space width of the mode's sub-geometry;
    /// `None` when it could not be found, in which case scale falls back to 1.
    pub fn new(mode: GlassMode, overrides: &GlassOverrides, geometry_width: Option<f32>) -> Self {
        let mut profile = mode.profile();
        profile.material.apply(overrides);

        let geometry_width = geometry_width.filter(|w| *w > 0.0);
        if geometry_width.is_none() && overrides.scale.is_none() {
            log::warn!(
                "glass geometry {}/{} missing; using unit scale",
                profile.model,
                profile.node
            );
        }

        let initial_scale = overrides.scale.unwrap_or(if geometry_width.is_some() { MAX_AUTO_SCALE } else { 1.0 });
        Self {
            mode,
            profile,
            scale_override: overrides.scale,
            geometry_width,
            smooth_time: crate::damp::DampingTimes::default().glass,
            position: Damped::new(Vec3::new(0.0, 0.0, GLASS_DEPTH)),
            scale: Damped::new(initial_scale),
        }
    }

    pub fn with_smooth_time(mut self, seconds: f32) -> Self {
        self.smooth_time = seconds;
        self
    }

    #[inline]
    pub fn mode(&self) -> GlassMode {
        self.mode
    }

    #[inline]
    pub fn profile(&self) -> &ModeProfile {
        &self.profile
    }

    #[inline]
    pub fn material(&self) -> &Material {
        &self.profile.material
    }

    /// Where the mesh is heading this tick.
    pub fn target_position(&self, input: &FrameInput) -> Vec3 {
        let v = input.viewport_at(GLASS_DEPTH);
        if self.profile.follow_pointer {
            Vec3::new(input.pointer.x * v.width * 0.5, input.pointer.y * v.height * 0.5, GLASS_DEPTH)
        } else if self.profile.lock_to_bottom {
            Vec3::new(0.0, -v.height * 0.5 + BOTTOM_MARGIN, GLASS_DEPTH)
        } else {
            Vec3::new(0.0, 0.0, GLASS_DEPTH)
        }
    }

    /// Explicit scale, else the largest scale fitting `WIDTH_FILL` of the
    /// viewport capped at `MAX_AUTO_SCALE`, else 1.
    pub fn target_scale(&self, input: &FrameInput) -> f32 {
        if let Some(s) = self.scale_override {
            return s;
        }
        let Some(geo_w) = self.geometry_width else { return 1.0 };
        let v = input.viewport_at(GLASS_DEPTH);
        (WIDTH_FILL * v.width / geo_w).min(MAX_AUTO_SCALE)
    }

    pub fn update(&mut self, input: &FrameInput) -> GlassTransform {
        let position = self.position.update(self.target_position(input), self.smooth_time, input.dt);
        let scale = self.scale.update(self.target_scale(input), self.smooth_time, input.dt);
        GlassTransform { position, scale }
    }

    pub fn transform(&self) -> GlassTransform {
        GlassTransform { position: self.position.value(), scale: self.scale.value() }
    }

    pub fn draw(&self) -> GlassDraw {
        GlassDraw {
            model: self.profile.model,
            node: self.profile.node,
            transform: self.transform(),
            material: self.profile.material.to_gpu(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use vitrine_engine::coords::Camera;

    use super::*;
    use crate::scroll::ScrollState;

    fn input(pointer: Vec2, width: f32) -> FrameInput {
        FrameInput::new(
            1.0 / 60.0,
            0.0,
            pointer,
            ScrollState::default(),
            Camera::default(),
            Vec2::new(width, 720.0),
        )
    }

    // ── mode ──────────────────────────────────────────────────────────────

    #[test]
    fn unknown_mode_falls_back_to_lens() {
        assert_eq!(GlassMode::parse("BAR"), GlassMode::Bar);
        assert_eq!(GlassMode::parse(" cube "), GlassMode::Cube);
        assert_eq!(GlassMode::parse("prism"), GlassMode::Lens);
        assert_eq!(GlassMode::parse(""), GlassMode::Lens);
    }

    #[test]
    fn profiles_select_geometry() {
        assert_eq!(GlassMode::Lens.profile().node, "Cylinder");
        assert_eq!(GlassMode::Bar.profile().model, "bar");
        assert!(GlassMode::Bar.profile().lock_to_bottom);
        assert!(!GlassMode::Bar.profile().follow_pointer);
        assert!(GlassMode::Cube.profile().follow_pointer);
    }

    // ── material ──────────────────────────────────────────────────────────

    #[test]
    fn bar_material_is_tinted() {
        let m = Material::bar();
        assert_eq!(m.color, Some(Color::WHITE));
        assert_eq!(m.attenuation_distance, 0.25);
        assert_eq!(Material::default().color, None);
        assert!(Material::default().attenuation_distance.is_infinite());
    }

    #[test]
    fn overrides_update_known_and_keep_unknown() {
        let overrides: GlassOverrides = serde_json::from_str(
            r##"{ "ior": 1.4, "chromaticAberration": 0.3, "roughness": 0.5,
                 "attenuationColor": "#ff0000", "iridescence": 1, "label": "x" }"##,
        )
        .unwrap();
        let mut m = Material::default();
        m.apply(&overrides);
        assert_eq!(m.ior, 1.4);
        assert_eq!(m.chromatic_aberration, 0.3);
        assert_eq!(m.roughness, 0.5);
        assert_eq!(m.attenuation_color, Color::from_hex("#ff0000"));
        assert_eq!(m.extra.get("iridescence"), Some(&MaterialParam::Number(1.0)));
        assert_eq!(m.extra.get("label"), Some(&MaterialParam::Text("x".into())));
        assert!(!m.extra.contains_key("roughness"));
    }

    // ── placement ─────────────────────────────────────────────────────────

    #[test]
    fn lens_follows_pointer_at_glass_depth() {
        let g = GlassController::new(GlassMode::Lens, &GlassOverrides::default(), Some(10.0));
        let i = input(Vec2::new(1.0, -1.0), 1280.0);
        let v = i.viewport_at(GLASS_DEPTH);
        let t = g.target_position(&i);
        assert!((t.x - v.width * 0.5).abs() < 1e-5);
        assert!((t.y + v.height * 0.5).abs() < 1e-5);
        assert_eq!(t.z, GLASS_DEPTH);
    }

    #[test]
    fn bar_docks_at_bottom_and_ignores_pointer() {
        let g = GlassController::new(GlassMode::Bar, &GlassOverrides::default(), Some(14.0));
        let a = g.target_position(&input(Vec2::new(0.8, 0.8), 1280.0));
        let b = g.target_position(&input(Vec2::new(-0.8, -0.3), 1280.0));
        assert_eq!(a, b);
        let v = input(Vec2::ZERO, 1280.0).viewport_at(GLASS_DEPTH);
        assert!((a.y - (-v.height * 0.5 + BOTTOM_MARGIN)).abs() < 1e-5);
        assert_eq!(a.x, 0.0);
    }

    #[test]
    fn scale_is_capped_and_fits_width() {
        let g = GlassController::new(GlassMode::Bar, &GlassOverrides::default(), Some(14.0));
        let i = input(Vec2::ZERO, 320.0);
        let v = i.viewport_at(GLASS_DEPTH);
        let s = g.target_scale(&i);
        assert!(s <= MAX_AUTO_SCALE);
        assert!(s * 14.0 <= WIDTH_FILL * v.width + 1e-5);

        let wide = g.target_scale(&input(Vec2::ZERO, 10_000.0));
        assert_eq!(wide, MAX_AUTO_SCALE);
    }

    #[test]
    fn explicit_scale_wins_and_missing_geometry_is_unit() {
        let o = GlassOverrides { scale: Some(0.5), ..Default::default() };
        let g = GlassController::new(GlassMode::Lens, &o, Some(10.0));
        assert_eq!(g.target_scale(&input(Vec2::ZERO, 1280.0)), 0.5);

        let g = GlassController::new(GlassMode::Cube, &GlassOverrides::default(), None);
        assert_eq!(g.target_scale(&input(Vec2::ZERO, 1280.0)), 1.0);
    }

    #[test]
    fn update_damps_toward_target() {
        let mut g = GlassController::new(GlassMode::Lens, &GlassOverrides::default(), Some(10.0));
        let i = input(Vec2::new(1.0, 0.0), 1280.0);
        let target = g.target_position(&i);
        let first = g.update(&i);
        assert!(first.position.x > 0.0 && first.position.x < target.x);
        for _ in 0..240 {
            g.update(&i);
        }
        assert!((g.transform().position - target).length() < 1e-3);
    }
}
