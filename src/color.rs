use crossterm::style::Color;

/// Colour in hue/saturation/brightness space.
///
/// Hue is in degrees, saturation and brightness in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsb {
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
}

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Hsb {
    pub const fn new(hue: f32, saturation: f32, brightness: f32) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }

    /// Component-wise interpolation. Hue is interpolated on its raw value,
    /// without taking the short way around the colour wheel.
    pub fn lerp(self, other: Hsb, t: f32) -> Hsb {
        let t = t.clamp(0.0, 1.0);
        Hsb {
            hue: self.hue + (other.hue - self.hue) * t,
            saturation: self.saturation + (other.saturation - self.saturation) * t,
            brightness: self.brightness + (other.brightness - self.brightness) * t,
        }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let s = (self.saturation / 100.0).clamp(0.0, 1.0);
        let v = (self.brightness / 100.0).clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Rgb {
            r: channel(r + m),
            g: channel(g + m),
            b: channel(b + m),
        }
    }
}

fn channel(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// Scene palette
pub mod palette {
    use super::Hsb;

    pub const SKY_TOP: Hsb = Hsb::new(210.0, 80.0, 95.0);
    pub const SKY_BOTTOM: Hsb = Hsb::new(180.0, 40.0, 100.0);
    pub const GROUND: Hsb = Hsb::new(30.0, 70.0, 40.0);
}

#[cfg(test)]
mod tests {
    use super::{Hsb, Rgb};

    #[test]
    fn primaries() {
        assert_eq!(Hsb::new(0.0, 100.0, 100.0).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsb::new(120.0, 100.0, 100.0).to_rgb(), Rgb::new(0, 255, 0));
        assert_eq!(Hsb::new(240.0, 100.0, 100.0).to_rgb(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn hue_wraps_when_converting() {
        assert_eq!(
            Hsb::new(360.0, 100.0, 100.0).to_rgb(),
            Hsb::new(0.0, 100.0, 100.0).to_rgb()
        );
        assert_eq!(
            Hsb::new(-120.0, 100.0, 100.0).to_rgb(),
            Hsb::new(240.0, 100.0, 100.0).to_rgb()
        );
    }

    #[test]
    fn zero_saturation_is_grey() {
        let c = Hsb::new(200.0, 0.0, 50.0).to_rgb();
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
        assert_eq!(c.r, 128);
    }

    #[test]
    fn lerp_is_component_wise() {
        let a = Hsb::new(30.0, 70.0, 40.0);
        let b = Hsb::new(130.0, 80.0, 70.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert!((mid.hue - 80.0).abs() < 1e-4);
        assert!((mid.saturation - 75.0).abs() < 1e-4);
        assert!((mid.brightness - 55.0).abs() < 1e-4);
    }

    #[test]
    fn lerp_clamps_factor() {
        let a = Hsb::new(0.0, 0.0, 0.0);
        let b = Hsb::new(100.0, 100.0, 100.0);
        assert_eq!(a.lerp(b, 2.0), b);
        assert_eq!(a.lerp(b, -1.0), a);
    }
}
