//! Pixel rasterizer for tree sprites.
//!
//! Shapes are painted into an RGB buffer twice as tall as the terminal and
//! then blitted with upper-half-block glyphs, two pixels per cell.

use crate::color::{palette, Hsb, Rgb};
use crate::shapes::{Blob, Point, Segment, TreeSprite};
use crate::terminal::Terminal;

const HALF_BLOCK: char = '▀';
/// Smallest pixel radius that still yields a connected stroke.
const MIN_RADIUS: f32 = std::f32::consts::FRAC_1_SQRT_2;
/// Height of the ground strip in world units.
pub const GROUND_HEIGHT: f32 = 20.0;

/// Maps world units onto canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f32,
    world_height: f32,
}

impl Viewport {
    /// `world_height` world units span the full canvas height.
    pub fn new(canvas_height: usize, world_height: f32) -> Self {
        let world_height = world_height.max(1.0);
        Self {
            scale: canvas_height.max(1) as f32 / world_height,
            world_height,
        }
    }

    /// Viewport for a terminal of `rows` rows.
    pub fn for_terminal(rows: u16, world_height: f32) -> Self {
        Self::new(rows as usize * 2, world_height)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// World y where trees are rooted.
    pub fn ground(&self) -> f32 {
        self.world_height
    }

    pub fn to_canvas(&self, p: Point) -> (f32, f32) {
        (p.x * self.scale, p.y * self.scale)
    }

    /// World x at the centre of terminal column `col`.
    pub fn column_to_world(&self, col: u16) -> f32 {
        (col as f32 + 0.5) / self.scale
    }

    pub fn world_width(&self, columns: u16) -> f32 {
        columns as f32 / self.scale
    }
}

pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::default(); width * height],
        }
    }

    /// Canvas covering a terminal, two pixels per cell vertically.
    pub fn for_terminal(columns: u16, rows: u16) -> Self {
        Self::new(columns as usize, rows as usize * 2)
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }

    /// Vertical gradient from `top` to `bottom`.
    pub fn fill_gradient(&mut self, top: Hsb, bottom: Hsb) {
        let span = self.height.saturating_sub(1).max(1) as f32;
        for y in 0..self.height {
            let color = top.lerp(bottom, y as f32 / span).to_rgb();
            let row = y * self.width;
            self.pixels[row..row + self.width].fill(color);
        }
    }

    /// Fill rows from world y `top` down to the bottom edge.
    pub fn fill_below(&mut self, view: &Viewport, top: f32, color: Hsb) {
        let start = (top * view.scale()).floor().max(0.0) as usize;
        let rgb = color.to_rgb();
        for y in start.min(self.height)..self.height {
            let row = y * self.width;
            self.pixels[row..row + self.width].fill(rgb);
        }
    }

    /// Stroke a segment as a capsule of the segment's thickness.
    pub fn draw_segment(&mut self, view: &Viewport, segment: &Segment) {
        let (x0, y0) = view.to_canvas(segment.from);
        let (x1, y1) = view.to_canvas(segment.to);
        let radius = (segment.thickness * view.scale() / 2.0).max(MIN_RADIUS);
        let color = segment.color.to_rgb();

        let (dx, dy) = (x1 - x0, y1 - y0);
        let len_sq = dx * dx + dy * dy;

        let min_x = (x0.min(x1) - radius).floor() as i32;
        let max_x = (x0.max(x1) + radius).ceil() as i32;
        let min_y = (y0.min(y1) - radius).floor() as i32;
        let max_y = (y0.max(y1) + radius).ceil() as i32;

        for py in self.clip_y(min_y, max_y) {
            for px in self.clip_x(min_x, max_x) {
                let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    (((cx - x0) * dx + (cy - y0) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let (nx, ny) = (x0 + dx * t - cx, y0 + dy * t - cy);
                if nx * nx + ny * ny <= radius * radius {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Fill a circular blob.
    pub fn fill_blob(&mut self, view: &Viewport, blob: &Blob) {
        let (x, y) = view.to_canvas(blob.center);
        let radius = (blob.diameter * view.scale() / 2.0).max(MIN_RADIUS);
        let color = blob.color.to_rgb();

        let min_x = (x - radius).floor() as i32;
        let max_x = (x + radius).ceil() as i32;
        let min_y = (y - radius).floor() as i32;
        let max_y = (y + radius).ceil() as i32;

        for py in self.clip_y(min_y, max_y) {
            for px in self.clip_x(min_x, max_x) {
                let (dx, dy) = (px as f32 + 0.5 - x, py as f32 + 0.5 - y);
                if dx * dx + dy * dy <= radius * radius {
                    self.put(px, py, color);
                }
            }
        }
    }

    fn clip_x(&self, lo: i32, hi: i32) -> std::ops::Range<i32> {
        lo.max(0)..hi.min(self.width as i32)
    }

    fn clip_y(&self, lo: i32, hi: i32) -> std::ops::Range<i32> {
        lo.max(0)..hi.min(self.height as i32)
    }

    /// Sky, ground, then every sprite in order.
    pub fn paint(&mut self, view: &Viewport, sprites: &[TreeSprite]) {
        self.fill_gradient(palette::SKY_TOP, palette::SKY_BOTTOM);
        self.fill_below(view, view.ground() - GROUND_HEIGHT, palette::GROUND);

        for sprite in sprites {
            for segment in sprite.segments() {
                self.draw_segment(view, segment);
            }
            for blob in sprite.blobs() {
                self.fill_blob(view, blob);
            }
        }
    }

    /// Copy into the terminal back buffer, one half-block per pixel pair.
    pub fn blit(&self, term: &mut Terminal) {
        for cy in 0..self.height / 2 {
            for cx in 0..self.width {
                let top = self.pixels[cy * 2 * self.width + cx];
                let bottom = self.pixels[(cy * 2 + 1) * self.width + cx];
                term.set(
                    cx as i32,
                    cy as i32,
                    HALF_BLOCK,
                    Some(top.into()),
                    Some(bottom.into()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Canvas, Viewport, GROUND_HEIGHT};
    use crate::color::{palette, Hsb, Rgb};
    use crate::shapes::{Blob, Point, Segment};
    use crate::terminal::Terminal;
    use crossterm::style::Color;

    const RED: Hsb = Hsb::new(0.0, 100.0, 100.0);

    #[test]
    fn viewport_maps_world_to_pixels() {
        let view = Viewport::for_terminal(32, 256.0);
        assert_eq!(view.scale(), 0.25);
        assert_eq!(view.to_canvas(Point::new(100.0, 240.0)), (25.0, 60.0));
        assert_eq!(view.ground(), 256.0);
        assert_eq!(view.column_to_world(9), 38.0);
        assert_eq!(view.world_width(80), 320.0);
    }

    #[test]
    fn gradient_spans_sky_colors() {
        let mut canvas = Canvas::new(4, 10);
        canvas.fill_gradient(palette::SKY_TOP, palette::SKY_BOTTOM);
        assert_eq!(canvas.pixel(0, 0), Some(palette::SKY_TOP.to_rgb()));
        assert_eq!(canvas.pixel(3, 9), Some(palette::SKY_BOTTOM.to_rgb()));
    }

    #[test]
    fn ground_fills_bottom_rows() {
        let view = Viewport::new(40, 80.0);
        let mut canvas = Canvas::new(5, 40);
        canvas.fill_below(&view, view.ground() - GROUND_HEIGHT, palette::GROUND);
        let ground = palette::GROUND.to_rgb();
        assert_eq!(canvas.pixel(2, 30), Some(ground));
        assert_eq!(canvas.pixel(4, 39), Some(ground));
        assert_eq!(canvas.pixel(2, 29), Some(Rgb::default()));
    }

    #[test]
    fn segment_covers_its_path() {
        let view = Viewport::new(20, 20.0);
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_segment(
            &view,
            &Segment {
                from: Point::new(2.5, 10.5),
                to: Point::new(17.5, 10.5),
                thickness: 1.0,
                color: RED,
            },
        );
        let red = RED.to_rgb();
        for x in 2..=17 {
            assert_eq!(canvas.pixel(x, 10), Some(red));
        }
        assert_eq!(canvas.pixel(10, 5), Some(Rgb::default()));
        assert_eq!(canvas.pixel(0, 10), Some(Rgb::default()));
    }

    #[test]
    fn shapes_outside_are_clipped() {
        let view = Viewport::new(10, 10.0);
        let mut canvas = Canvas::new(10, 10);
        canvas.fill_blob(
            &view,
            &Blob {
                center: Point::new(-50.0, -50.0),
                diameter: 15.0,
                color: RED,
            },
        );
        canvas.draw_segment(
            &view,
            &Segment {
                from: Point::new(-5.0, 5.0),
                to: Point::new(50.0, 5.0),
                thickness: 2.0,
                color: RED,
            },
        );
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::default()));
        assert_eq!(canvas.pixel(9, 5), Some(RED.to_rgb()));
    }

    #[test]
    fn blob_is_round() {
        let view = Viewport::new(20, 20.0);
        let mut canvas = Canvas::new(20, 20);
        canvas.fill_blob(
            &view,
            &Blob {
                center: Point::new(10.0, 10.0),
                diameter: 8.0,
                color: RED,
            },
        );
        let red = RED.to_rgb();
        assert_eq!(canvas.pixel(10, 10), Some(red));
        assert_eq!(canvas.pixel(13, 10), Some(red));
        assert_eq!(canvas.pixel(13, 13), Some(Rgb::default()));
    }

    #[test]
    fn blit_pairs_rows_into_half_blocks() {
        let mut canvas = Canvas::new(2, 4);
        canvas.fill_gradient(RED, Hsb::new(240.0, 100.0, 100.0));
        let mut term = Terminal::headless(2, 2);
        canvas.blit(&mut term);

        let cell = term.cell(1, 0).expect("in bounds");
        assert_eq!(cell.ch, '▀');
        assert_eq!(cell.fg, Some(Color::from(RED.to_rgb())));
        let bottom = term.cell(0, 1).expect("in bounds");
        assert_eq!(bottom.bg, Some(Color::Rgb { r: 0, g: 0, b: 255 }));
    }
}
