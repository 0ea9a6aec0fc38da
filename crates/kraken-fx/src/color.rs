//! Straight-alpha colour type shared by every drawing surface.

/// RGBA colour, components in the 0.0-1.0 range
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels and a 0-1 alpha, like CSS `rgba()`
    pub fn from_u8(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// HSL to RGB, like CSS `hsla()`.
    ///
    /// `hue` is in degrees (wrapped), `saturation` and `lightness` in 0-1.
    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let hue = hue.rem_euclid(360.0);
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r1, g1, b1) = if hue < 60.0 {
            (c, x, 0.0)
        } else if hue < 120.0 {
            (x, c, 0.0)
        } else if hue < 180.0 {
            (0.0, c, x)
        } else if hue < 240.0 {
            (0.0, x, c)
        } else if hue < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        Self {
            r: r1 + m,
            g: g1 + m,
            b: b1 + m,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Componentwise blend; `t` = 0 gives `self`, 1 gives `other`
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_hsla_primaries() {
        let red = Rgba::hsla(0.0, 1.0, 0.5, 1.0);
        assert!(close(red.r, 1.0) && close(red.g, 0.0) && close(red.b, 0.0));

        let cyan = Rgba::hsla(180.0, 1.0, 0.5, 1.0);
        assert!(close(cyan.r, 0.0) && close(cyan.g, 1.0) && close(cyan.b, 1.0));

        // Hue wraps
        let wrapped = Rgba::hsla(540.0, 1.0, 0.5, 1.0);
        assert_eq!(wrapped, cyan);
    }

    #[test]
    fn test_alpha_is_clamped() {
        assert_eq!(Rgba::from_u8(0, 0, 0, 2.0).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-0.5).a, 0.0);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgba::new(0.0, 0.2, 1.0, 0.0);
        let b = Rgba::new(1.0, 0.2, 0.0, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgba::new(0.5, 0.2, 0.5, 0.5));
        assert_eq!(a.lerp(b, 3.0), b);
    }

    #[test]
    fn test_lightness_extremes() {
        let white = Rgba::hsla(200.0, 0.8, 1.0, 1.0);
        assert!(close(white.r, 1.0) && close(white.g, 1.0) && close(white.b, 1.0));
        let black = Rgba::hsla(200.0, 0.8, 0.0, 1.0);
        assert!(close(black.r, 0.0) && close(black.g, 0.0) && close(black.b, 0.0));
    }
}
