#![forbid(unsafe_code)]

//! Software rasterizer.
//!
//! [`PixelSurface`] executes draw commands into a row-major RGBA buffer.
//! Pixel `(x, y)` covers `[x, x+1) × [y, y+1)` and is considered inside a
//! shape when its center is. Everything is clipped to the buffer, and
//! degenerate sizes (zero width or height) are valid and draw nothing.
//!
//! This is a reference host: it favors predictable output over speed and
//! does no anti-aliasing.

use dfx_core::geometry::{Point, Rect, Viewport};

use crate::color::PackedRgba;
use crate::draw::{DrawCmd, Fill, LinearGradient};
use crate::font::{self, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::surface::Surface;

/// Row-major RGBA pixel buffer implementing [`Surface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<PackedRgba>,
}

impl PixelSurface {
    /// New surface filled with opaque black.
    pub fn new(viewport: Viewport) -> Self {
        let len = viewport.width as usize * viewport.height as usize;
        Self {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![PackedRgba::BLACK; len],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<PackedRgba> {
        if x < self.width && y < self.height {
            self.pixels
                .get(y as usize * self.width as usize + x as usize)
                .copied()
        } else {
            None
        }
    }

    /// Overwrite every pixel.
    pub fn fill(&mut self, color: PackedRgba) {
        self.pixels.fill(color);
    }

    /// Pixels that differ from `background`.
    pub fn count_not(&self, background: PackedRgba) -> usize {
        self.pixels.iter().filter(|p| **p != background).count()
    }

    #[inline]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline]
    fn blend(&mut self, x: i64, y: i64, color: PackedRgba) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.over(self.pixels[idx]);
        }
    }

    /// Column range `[lo, hi)` of pixel centers inside `[a, b)`, clipped.
    #[inline]
    fn span(a: f64, b: f64, max: u32) -> (i64, i64) {
        let lo = (a - 0.5).ceil().clamp(0.0, max as f64) as i64;
        let hi = (b - 0.5).ceil().clamp(0.0, max as f64) as i64;
        (lo, hi)
    }

    /// Like [`Self::span`] but for the closed interval `[a, b]`.
    #[inline]
    fn span_closed(a: f64, b: f64, max: u32) -> (i64, i64) {
        let lo = (a - 0.5).ceil().clamp(0.0, max as f64) as i64;
        let hi = ((b - 0.5).floor() + 1.0).clamp(0.0, max as f64) as i64;
        (lo, hi)
    }

    fn clear_rect(&mut self, rect: Rect, color: PackedRgba) {
        let (x0, x1) = Self::span(rect.x, rect.right(), self.width);
        let (y0, y1) = Self::span(rect.y, rect.bottom(), self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(idx) = self.index(x, y) {
                    self.pixels[idx] = color;
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, fill: &Fill) {
        let (x0, x1) = Self::span(rect.x, rect.right(), self.width);
        let (y0, y1) = Self::span(rect.y, rect.bottom(), self.height);
        match fill {
            Fill::Solid(color) => {
                for y in y0..y1 {
                    for x in x0..x1 {
                        self.blend(x, y, *color);
                    }
                }
            }
            Fill::Linear(gradient) => self.fill_gradient(x0, x1, y0, y1, gradient),
        }
    }

    fn fill_gradient(&mut self, x0: i64, x1: i64, y0: i64, y1: i64, g: &LinearGradient) {
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let color = g.color_at(g.t_at(center));
                self.blend(x, y, color);
            }
        }
    }

    fn fill_ellipse(&mut self, center: Point, rx: f64, ry: f64, color: PackedRgba) {
        if !(rx >= 0.5 && ry >= 0.5) {
            if rx > 0.0 && ry > 0.0 {
                self.blend(center.x.floor() as i64, center.y.floor() as i64, color);
            }
            return;
        }
        let (x0, x1) = Self::span_closed(center.x - rx, center.x + rx, self.width);
        let (y0, y1) = Self::span_closed(center.y - ry, center.y + ry, self.height);
        for y in y0..y1 {
            let dy = (y as f64 + 0.5 - center.y) / ry;
            for x in x0..x1 {
                let dx = (x as f64 + 0.5 - center.x) / rx;
                if dx * dx + dy * dy <= 1.0 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn fill_square(&mut self, at: Point, size: f64, color: PackedRgba) {
        let side = size.max(1.0);
        let half = side / 2.0;
        let (x0, x1) = Self::span(at.x - half, at.x + half, self.width);
        let (y0, y1) = Self::span(at.y - half, at.y + half, self.height);
        if x0 == x1 || y0 == y1 {
            // Sub-pixel dot straddling a pixel boundary: light the one under it.
            self.blend(at.x.floor() as i64, at.y.floor() as i64, color);
            return;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color);
            }
        }
    }

    /// Bresenham over the clipped segment.
    fn line(&mut self, from: Point, to: Point, color: PackedRgba, width: f64) {
        let margin = width.max(1.0);
        let bounds = Rect::new(
            -margin,
            -margin,
            self.width as f64 + 2.0 * margin,
            self.height as f64 + 2.0 * margin,
        );
        let Some((a, b)) = clip_segment(from, to, bounds) else {
            return;
        };
        let (x0, y0) = (a.x.floor() as i64, a.y.floor() as i64);
        let (x1, y1) = (b.x.floor() as i64, b.y.floor() as i64);
        let thick = width > 1.5;

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: i64 = if x0 < x1 { 1 } else { -1 };
        let sy: i64 = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut cx = x0;
        let mut cy = y0;

        loop {
            if thick {
                let c = Point::new(cx as f64 + 0.5, cy as f64 + 0.5);
                self.fill_ellipse(c, width / 2.0, width / 2.0, color);
            } else {
                self.blend(cx, cy, color);
            }

            if cx == x1 && cy == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                if cx == x1 {
                    break;
                }
                err += dy;
                cx += sx;
            }
            if e2 <= dx {
                if cy == y1 {
                    break;
                }
                err += dx;
                cy += sy;
            }
        }
    }

    fn glyph(&mut self, at: Point, ch: char, size: f64, color: PackedRgba) {
        let Some(glyph) = font::glyph(ch) else {
            return;
        };
        let dot = (size / GLYPH_HEIGHT as f64).max(1.0);
        for row in 0..GLYPH_HEIGHT {
            for col in 0..GLYPH_WIDTH {
                if font::dot(glyph, col, row) {
                    let rect = Rect::new(
                        at.x + col as f64 * dot,
                        at.y + row as f64 * dot,
                        dot,
                        dot,
                    );
                    self.fill_rect(rect, &Fill::Solid(color));
                }
            }
        }
    }
}

impl Surface for PixelSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.width = viewport.width;
        self.height = viewport.height;
        let len = viewport.width as usize * viewport.height as usize;
        self.pixels.clear();
        self.pixels.resize(len, PackedRgba::BLACK);
    }

    fn execute(&mut self, cmd: &DrawCmd) {
        if !cmd.is_finite() || self.pixels.is_empty() {
            return;
        }
        match cmd {
            DrawCmd::Clear { rect, color } => self.clear_rect(*rect, *color),
            DrawCmd::FillRect { rect, fill } => self.fill_rect(*rect, fill),
            DrawCmd::Line {
                from,
                to,
                color,
                width,
            } => self.line(*from, *to, *color, *width),
            DrawCmd::Circle {
                center,
                radius,
                color,
            } => self.fill_ellipse(*center, *radius, *radius, *color),
            DrawCmd::Ellipse {
                center,
                radius_x,
                radius_y,
                color,
            } => self.fill_ellipse(*center, *radius_x, *radius_y, *color),
            DrawCmd::Point { at, size, color } => self.fill_square(*at, *size, *color),
            DrawCmd::Glyph {
                at,
                ch,
                size,
                color,
            } => self.glyph(*at, *ch, *size, *color),
        }
    }
}

/// Liang–Barsky clip of segment `a → b` against `bounds`.
fn clip_segment(a: Point, b: Point, bounds: Rect) -> Option<(Point, Point)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let checks = [
        (-dx, a.x - bounds.x),
        (dx, bounds.right() - a.x),
        (-dy, a.y - bounds.y),
        (dy, bounds.bottom() - a.y),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((
        Point::new(a.x + t0 * dx, a.y + t0 * dy),
        Point::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}
