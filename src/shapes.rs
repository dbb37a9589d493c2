//! Render description handed from the tree grower to the rasterizer.

use crate::color::Hsb;

/// Point in world units. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// End point of a segment of `length` leaving this point at `angle`
    /// (radians, counter-clockwise from +x, screen y pointing down).
    pub fn project(self, angle: f32, length: f32) -> Point {
        Point {
            x: self.x + angle.cos() * length,
            y: self.y - angle.sin() * length,
        }
    }
}

/// A stroked line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    pub thickness: f32,
    pub color: Hsb,
}

/// A filled circle (leaf or fruit).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub center: Point,
    pub diameter: f32,
    pub color: Hsb,
}

/// Everything needed to paint one tree, in paint order: trunk, branches,
/// leaves, fruit.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSprite {
    pub trunk: Segment,
    pub branches: Vec<Segment>,
    pub leaves: Vec<Blob>,
    pub fruits: Vec<Blob>,
}

impl TreeSprite {
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        std::iter::once(&self.trunk).chain(self.branches.iter())
    }

    pub fn blobs(&self) -> impl Iterator<Item = &Blob> {
        self.leaves.iter().chain(self.fruits.iter())
    }
}

/// Linear remap of `value` from `[in_lo, in_hi]` to `[out_lo, out_hi]`,
/// clamped to the output range. A degenerate input range maps to `out_hi`.
pub fn remap(value: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    let span = in_hi - in_lo;
    if span.abs() < f32::EPSILON {
        return out_hi;
    }
    let t = ((value - in_lo) / span).clamp(0.0, 1.0);
    out_lo + (out_hi - out_lo) * t
}

#[cfg(test)]
mod tests {
    use super::{remap, Point};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn project_straight_up_decreases_y() {
        let tip = Point::new(10.0, 100.0).project(FRAC_PI_2, 40.0);
        assert!((tip.x - 10.0).abs() < 1e-4);
        assert!((tip.y - 60.0).abs() < 1e-4);
    }

    #[test]
    fn remap_clamps_and_handles_degenerate_range() {
        assert_eq!(remap(75.0, 0.0, 150.0, 1.0, 15.0), 8.0);
        assert_eq!(remap(300.0, 0.0, 150.0, 1.0, 15.0), 15.0);
        assert_eq!(remap(1.0, 1.0, 4.0, 10.0, 1.0), 10.0);
        assert_eq!(remap(4.0, 1.0, 4.0, 10.0, 1.0), 1.0);
        assert_eq!(remap(1.0, 1.0, 1.0, 10.0, 1.0), 1.0);
    }
}
