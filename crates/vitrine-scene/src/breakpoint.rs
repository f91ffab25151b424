//! Responsive breakpoints keyed on logical window width.

/// Widths up to and including this are mobile.
pub const MOBILE_MAX_WIDTH: f32 = 639.0;
/// Widths up to and including this (and above mobile) are tablet.
pub const TABLET_MAX_WIDTH: f32 = 1023.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    /// Classifies a logical pixel width. NaN counts as desktop.
    pub fn from_width(px: f32) -> Self {
        if px <= MOBILE_MAX_WIDTH {
            Breakpoint::Mobile
        } else if px <= TABLET_MAX_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }

    /// Horizontal distance between nav label centers, in world units.
    pub fn nav_spacing(self) -> f32 {
        match self {
            Breakpoint::Mobile => 0.2,
            Breakpoint::Tablet => 0.24,
            Breakpoint::Desktop => 0.3,
        }
    }

    pub fn nav_font_size(self) -> f32 {
        match self {
            Breakpoint::Mobile => 0.035,
            Breakpoint::Tablet | Breakpoint::Desktop => 0.045,
        }
    }

    pub fn title_font_size(self) -> f32 {
        match self {
            Breakpoint::Mobile => 0.2,
            Breakpoint::Tablet => 0.4,
            Breakpoint::Desktop => 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(Breakpoint::from_width(0.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(639.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(640.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1023.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1024.0), Breakpoint::Desktop);
    }

    #[test]
    fn fractional_widths_between_bands() {
        assert_eq!(Breakpoint::from_width(639.5), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1023.5), Breakpoint::Desktop);
    }

    #[test]
    fn tables_match_breakpoint() {
        assert_eq!(Breakpoint::Mobile.nav_spacing(), 0.2);
        assert_eq!(Breakpoint::Tablet.nav_font_size(), 0.045);
        assert_eq!(Breakpoint::Desktop.title_font_size(), 0.6);
    }
}
