//! Portfolio construction settings, loadable from JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::damp::DampingTimes;
use crate::gallery::ImageSpec;
use crate::glass::{GlassMode, GlassOverrides};
use crate::nav::NavItem;

/// Height of one viewport at `z = 0` with the default camera; the demo
/// images below the fold sit one page down.
const SECOND_PAGE_Y: f32 = 5.27;

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "invalid portfolio config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid portfolio config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Overrides for each glass mode; only the active mode's entry applies.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModeOverrides {
    pub lens: GlassOverrides,
    pub bar: GlassOverrides,
    pub cube: GlassOverrides,
}

impl ModeOverrides {
    pub fn for_mode(&self, mode: GlassMode) -> &GlassOverrides {
        match mode {
            GlassMode::Lens => &self.lens,
            GlassMode::Bar => &self.bar,
            GlassMode::Cube => &self.cube,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub mode: GlassMode,
    #[serde(alias = "navItems")]
    pub nav_items: Vec<NavItem>,
    pub overrides: ModeOverrides,
    pub images: Vec<ImageSpec>,
    /// Page height in viewports.
    pub pages: f32,
    pub title: String,
    pub damping: DampingTimes,
    /// Scroll fraction for each in-page anchor, keyed without `#`.
    pub sections: BTreeMap<String, f32>,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        let sections = [("", 0.0), ("home", 0.0), ("about", 0.5), ("contact", 1.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self {
            mode: GlassMode::Lens,
            nav_items: vec![
                NavItem::new("Home", "#"),
                NavItem::new("About", "#about"),
                NavItem::new("Contact", "#contact"),
            ],
            overrides: ModeOverrides::default(),
            images: vec![
                ImageSpec::new("assets/images/1.jpg", [-2.0, 0.0, 0.0]).with_width(3.0),
                ImageSpec::new("assets/images/2.jpg", [2.0, 0.0, 3.0]).with_width(3.0),
                ImageSpec::new("assets/images/3.jpg", [-2.05, -SECOND_PAGE_Y, 6.0]).with_height(3.0),
                ImageSpec::new("assets/images/4.jpg", [-0.6, -SECOND_PAGE_Y, 9.0]).with_height(2.0),
                ImageSpec::new("assets/images/5.jpg", [0.75, -SECOND_PAGE_Y, 10.5]).with_width(1.5),
            ],
            pages: 3.0,
            title: "Vitrine".to_string(),
            damping: DampingTimes::default(),
            sections,
        }
    }
}

impl PortfolioConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: PortfolioConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects unusable values; logs a warning for questionable ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pages >= 1.0) {
            return Err(ConfigError::Invalid(format!("pages must be at least 1, got {}", self.pages)));
        }
        for (i, img) in self.images.iter().enumerate() {
            if img.position.iter().any(|c| !c.is_finite()) {
                return Err(ConfigError::Invalid(format!("image {i} ({}) has a non-finite position", img.url)));
            }
            match (img.desired_width, img.desired_height) {
                (Some(_), Some(_)) => {
                    log::warn!("image {i} ({}): both width and height set; width wins", img.url)
                }
                (None, None) => {
                    log::warn!("image {i} ({}): no size set; using a share of the viewport", img.url)
                }
                _ => {}
            }
            for dim in [img.desired_width, img.desired_height].into_iter().flatten() {
                if !(dim > 0.0) {
                    return Err(ConfigError::Invalid(format!("image {i} ({}) has a non-positive size", img.url)));
                }
            }
        }
        for (name, fraction) in &self.sections {
            if !(0.0..=1.0).contains(fraction) {
                log::warn!("section {name:?} at {fraction} is outside 0..=1 and will be clamped");
            }
        }
        Ok(())
    }

    /// Overrides for the configured mode.
    pub fn active_overrides(&self) -> &GlassOverrides {
        self.overrides.for_mode(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glass::MaterialParam;

    #[test]
    fn defaults_reproduce_demo_page() {
        let c = PortfolioConfig::default();
        assert_eq!(c.mode, GlassMode::Lens);
        assert_eq!(c.nav_items.len(), 3);
        assert_eq!(c.images.len(), 5);
        assert_eq!(c.pages, 3.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn empty_document_is_default() {
        let c = PortfolioConfig::from_json_str("{}").unwrap();
        assert_eq!(c, PortfolioConfig::default());
    }

    #[test]
    fn parses_mode_overrides_and_images() {
        let c = PortfolioConfig::from_json_str(
            r##"{
                "mode": "bar",
                "navItems": [{ "label": "Work", "link": "https://example.com" }],
                "overrides": { "bar": { "scale": 0.1, "ior": 1.3, "color": "#ffffff", "sheen": 0.2 } },
                "images": [{ "url": "x.png", "position": [1, 2, 3], "desired_width": 2 }],
                "pages": 4
            }"##,
        )
        .unwrap();
        assert_eq!(c.mode, GlassMode::Bar);
        assert_eq!(c.nav_items[0].label, "Work");
        let o = c.active_overrides();
        assert_eq!(o.scale, Some(0.1));
        assert_eq!(o.ior, Some(1.3));
        assert_eq!(o.extra.get("sheen"), Some(&MaterialParam::Number(0.2)));
        assert!(matches!(o.extra.get("color"), Some(MaterialParam::Color(_))));
        assert_eq!(c.images[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(c.pages, 4.0);
    }

    #[test]
    fn unknown_mode_string_falls_back() {
        let c = PortfolioConfig::from_json_str(r#"{ "mode": "prism" }"#).unwrap();
        assert_eq!(c.mode, GlassMode::Lens);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(PortfolioConfig::from_json_str(r#"{ "pages": 0.5 }"#), Err(ConfigError::Invalid(_))));
        assert!(matches!(PortfolioConfig::from_json_str("{ nope"), Err(ConfigError::Parse(_))));
        let bad_size = r#"{ "images": [{ "url": "a", "position": [0,0,0], "desired_height": -1 }] }"#;
        assert!(PortfolioConfig::from_json_str(bad_size).is_err());
    }
}
