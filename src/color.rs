//! Display color math shared by both pickers.

/// An exact RGB display value.
///
/// Only ever produced for rendering; device state never stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
}

impl Rgb {
    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Cool-white end of the warmth axis.
    pub const COOL_WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Warm-yellow end of the warmth axis.
    pub const WARM_YELLOW: Rgb = Rgb::new(255, 241, 118);

    /// Create a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as a CSS-style hex string, e.g. `#ff0000`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Convert hue/saturation/lightness (each in `[0, 1]`) to RGB.
///
/// Every channel is rounded to the nearest integer on its own.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    if s == 0.0 {
        let v = to_channel(l);
        return Rgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::new(
        to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_channel(p, q, h)),
        to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Linear interpolation between two colors, rounded per channel.
///
/// `t = 0` yields `from` and `t = 1` yields `to` exactly.
pub fn lerp_color(from: Rgb, to: Rgb, t: f64) -> Rgb {
    Rgb::new(
        lerp_channel(from.r, to.r, t),
        lerp_channel(from.g, to.g, t),
        lerp_channel(from.b, to.b, t),
    )
}

fn lerp_channel(from: u8, to: u8, t: f64) -> u8 {
    let from = f64::from(from);
    let to = f64::from(to);
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(0.5, 1.0, 1.0), Rgb::COOL_WHITE);
        assert_eq!(hsl_to_rgb(0.5, 1.0, 0.0), Rgb::BLACK);
    }

    #[test]
    fn test_hsl_achromatic() {
        for hue in [0.0, 0.2, 0.5, 0.9, 1.0] {
            for lightness in [0.0, 0.1, 0.37, 0.5, 0.8, 1.0] {
                let c = hsl_to_rgb(hue, 0.0, lightness);
                assert_eq!(c.r, c.g);
                assert_eq!(c.g, c.b);
                assert_eq!(c.r, (lightness * 255.0).round() as u8);
            }
        }
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = Rgb::new(12, 200, 99);
        let b = Rgb::new(250, 3, 118);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(Rgb::COOL_WHITE, Rgb::WARM_YELLOW, 1.0), Rgb::WARM_YELLOW);
    }

    #[test]
    fn test_lerp_monotonic() {
        let a = Rgb::new(0, 255, 40);
        let b = Rgb::new(255, 0, 40);
        let mut prev = a;
        for step in 1..=100 {
            let c = lerp_color(a, b, f64::from(step) / 100.0);
            assert!(c.r >= prev.r);
            assert!(c.g <= prev.g);
            assert_eq!(c.b, 40);
            prev = c;
        }
    }

    #[test]
    fn test_hex() {
        assert_eq!(Rgb::WARM_YELLOW.to_hex(), "#fff176");
    }
}
