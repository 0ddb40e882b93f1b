use anyhow::{ensure, Result};
use glam::Vec2;
use space_shooter_rendering::{Color, MAX_FRAME_SIDE};

/// RGB8 pixel buffer stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Creates a canvas filled with a single color.
    ///
    /// Fails if either side exceeds [`MAX_FRAME_SIDE`].
    pub fn new(width: u32, height: u32, fill: Color) -> Result<Self> {
        ensure!(
            width <= MAX_FRAME_SIDE && height <= MAX_FRAME_SIDE,
            "canvas of {width}x{height} exceeds {MAX_FRAME_SIDE} pixels per side"
        );
        let count = width as usize * height as usize;
        let pixels = fill.to_array().repeat(count);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes, row by row from the top-left corner.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at the pixel, or `None` outside the canvas.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        let rgb = self.pixels.get(offset..offset + 3)?;
        Some(Color::from_rgb(rgb[0], rgb[1], rgb[2]))
    }

    /// Fills the axis-aligned square whose upper-left corner is `origin`.
    pub fn fill_square(&mut self, origin: Vec2, size: f32, color: Color) {
        self.fill_where(origin, origin + Vec2::splat(size), color, |_| true);
    }

    /// Fills every pixel whose center lies within `radius` of `center`.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let extent = Vec2::splat(radius);
        self.fill_where(center - extent, center + extent, color, |point| {
            point.distance_squared(center) <= radius * radius
        });
    }

    /// Fills every pixel whose center lies inside the triangle.
    pub fn fill_triangle(&mut self, corners: [Vec2; 3], color: Color) {
        let [a, b, c] = corners;
        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        self.fill_where(min, max, color, |point| {
            let ab = edge(a, b, point);
            let bc = edge(b, c, point);
            let ca = edge(c, a, point);
            (ab >= 0.0 && bc >= 0.0 && ca >= 0.0) || (ab <= 0.0 && bc <= 0.0 && ca <= 0.0)
        });
    }

    /// Visits pixels inside the clipped bounding box and paints those accepted by `inside`.
    fn fill_where<F>(&mut self, min: Vec2, max: Vec2, color: Color, inside: F)
    where
        F: Fn(Vec2) -> bool,
    {
        let (Some((x0, x1)), Some((y0, y1))) = (
            clip_span(min.x, max.x, self.width),
            clip_span(min.y, max.y, self.height),
        ) else {
            return;
        };

        let rgb = color.to_array();
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !inside(center) {
                    continue;
                }
                if let Some(offset) = self.offset(x, y) {
                    self.pixels[offset..offset + 3].copy_from_slice(&rgb);
                }
            }
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 3)
    }
}

fn edge(from: Vec2, to: Vec2, point: Vec2) -> f32 {
    (to - from).perp_dot(point - from)
}

/// Converts a continuous span into the pixel range `start..end` within `0..limit`.
fn clip_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    let start = min.floor().max(0.0);
    let end = max.ceil().min(limit as f32);
    if start >= end {
        return None;
    }
    Some((start as u32, end as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color::from_rgb(0, 0, 0);
    const WHITE: Color = Color::from_rgb(255, 255, 255);

    #[test]
    fn new_canvas_is_uniformly_filled() {
        let canvas = Canvas::new(4, 3, WHITE).expect("canvas");

        assert_eq!(canvas.as_bytes().len(), 4 * 3 * 3);
        assert!(canvas.as_bytes().iter().all(|byte| *byte == 255));
        assert_eq!(canvas.pixel(3, 2), Some(WHITE));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        assert!(Canvas::new(MAX_FRAME_SIDE + 1, 1, WHITE).is_err());
        assert!(Canvas::new(1, u32::MAX, WHITE).is_err());
        assert!(Canvas::new(MAX_FRAME_SIDE, 1, WHITE).is_ok());
    }

    #[test]
    fn square_covers_exactly_its_pixels() {
        let mut canvas = Canvas::new(10, 10, BLACK).expect("canvas");

        canvas.fill_square(Vec2::new(2.0, 3.0), 4.0, WHITE);

        assert_eq!(canvas.pixel(2, 3), Some(WHITE));
        assert_eq!(canvas.pixel(5, 6), Some(WHITE));
        assert_eq!(canvas.pixel(6, 6), Some(BLACK));
        assert_eq!(canvas.pixel(1, 3), Some(BLACK));
    }

    #[test]
    fn shapes_outside_the_canvas_are_clipped() {
        let mut canvas = Canvas::new(8, 8, BLACK).expect("canvas");

        canvas.fill_square(Vec2::new(-20.0, -20.0), 4.0, WHITE);
        canvas.fill_square(Vec2::new(6.0, 6.0), 10.0, WHITE);
        canvas.fill_circle(Vec2::new(100.0, 4.0), 3.0, WHITE);
        canvas.fill_triangle(
            [Vec2::new(-10.0, 0.0), Vec2::new(-10.0, 12.0), Vec2::new(2.0, 6.0)],
            WHITE,
        );

        assert_eq!(canvas.pixel(7, 7), Some(WHITE));
        assert_eq!(canvas.pixel(0, 6), Some(WHITE));
        assert_eq!(canvas.pixel(4, 4), Some(BLACK));
    }

    #[test]
    fn circle_is_round() {
        let mut canvas = Canvas::new(20, 20, BLACK).expect("canvas");

        canvas.fill_circle(Vec2::new(10.0, 10.0), 3.0, WHITE);

        assert_eq!(canvas.pixel(10, 10), Some(WHITE));
        assert_eq!(canvas.pixel(7, 10), Some(WHITE));
        assert_eq!(canvas.pixel(7, 7), Some(BLACK));
        assert_eq!(canvas.pixel(14, 10), Some(BLACK));
    }

    #[test]
    fn triangle_fill_ignores_winding() {
        let corners = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 12.0), Vec2::new(12.0, 6.0)];
        let mut clockwise = Canvas::new(16, 16, BLACK).expect("canvas");
        let mut counter = Canvas::new(16, 16, BLACK).expect("canvas");

        clockwise.fill_triangle(corners, WHITE);
        counter.fill_triangle([corners[0], corners[2], corners[1]], WHITE);

        assert_eq!(clockwise, counter);
        assert_eq!(clockwise.pixel(1, 6), Some(WHITE));
        assert_eq!(clockwise.pixel(10, 6), Some(WHITE));
        assert_eq!(clockwise.pixel(11, 1), Some(BLACK));
    }
}
