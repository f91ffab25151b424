/// Linear premultiplied RGBA color.
///
/// Invariant: `rgb` components are already multiplied by `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a premultiplied color from straight alpha components.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a premultiplied linear color from straight sRGB bytes.
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
            a as f32 / 255.0,
        )
    }

    /// Parses `#rgb` or `#rrggbb` (leading `#` optional) as an opaque color.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let channel = |i: usize, len: usize| u8::from_str_radix(hex.get(i..i + len)?, 16).ok();
        match hex.len() {
            6 => Some(Self::from_srgb_u8(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?, 255)),
            3 => {
                let (r, g, b) = (channel(0, 1)?, channel(1, 1)?, channel(2, 1)?);
                Some(Self::from_srgb_u8(r * 17, g * 17, b * 17, 255))
            }
            _ => None,
        }
    }

    /// Multiplies every channel by `opacity`, keeping premultiplication intact.
    #[inline]
    pub fn faded(self, opacity: f32) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self::from_premul(self.r * o, self.g * o, self.b * o, self.a * o)
    }

    /// Returns `[r, g, b]` divided back out of alpha.
    #[inline]
    pub fn straight_rgb(self) -> [f32; 3] {
        if self.a <= 0.0 {
            [0.0; 3]
        } else {
            let inv = 1.0 / self.a;
            [self.r * inv, self.g * inv, self.b * inv]
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_long_and_short_forms_agree() {
        assert_eq!(Color::from_hex("#ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("#5227ff").map(|c| c.a), Some(1.0));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#gggggg").is_none());
    }

    #[test]
    fn srgb_midtone_is_linearized() {
        let c = Color::from_srgb_u8(128, 128, 128, 255);
        assert!((c.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn faded_stays_premultiplied() {
        let c = Color::from_straight(1.0, 0.5, 0.0, 1.0).faded(0.5);
        assert!(c.r <= c.a && c.g <= c.a);
        assert!((c.a - 0.5).abs() < 1e-6);
    }
}
