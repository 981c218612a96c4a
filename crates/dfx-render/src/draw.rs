#![forbid(unsafe_code)]

//! Draw primitives.
//!
//! Effects never touch pixels. A render step records [`DrawCmd`]s into a
//! [`DrawList`]; the host surface executes them in order (painter's
//! algorithm, later commands on top).
//!
//! Exact pixel semantics (anti-aliasing, blending) belong to the host.
//! Commands only carry their logical meaning.

use dfx_core::geometry::{Point, Rect};
use smallvec::SmallVec;

use crate::color::PackedRgba;

/// One stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Relative position in `[0, 1]`.
    pub offset: f64,
    pub color: PackedRgba,
}

impl ColorStop {
    #[inline]
    pub const fn new(offset: f64, color: PackedRgba) -> Self {
        Self { offset, color }
    }
}

/// Linear gradient between two points with ordered color stops.
///
/// Stops are kept sorted by offset; inserting out of order is fine.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub from: Point,
    pub to: Point,
    stops: SmallVec<[ColorStop; 4]>,
}

impl LinearGradient {
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            stops: SmallVec::new(),
        }
    }

    /// Top-to-bottom gradient spanning `rect`.
    pub fn vertical(rect: Rect) -> Self {
        Self::new(
            Point::new(rect.x, rect.y),
            Point::new(rect.x, rect.bottom()),
        )
    }

    /// Builder: add a stop. `offset` is clamped to `[0, 1]`.
    #[must_use]
    pub fn stop(mut self, offset: f64, color: PackedRgba) -> Self {
        self.add_stop(offset, color);
        self
    }

    /// Insert a stop after any existing stops with the same offset.
    pub fn add_stop(&mut self, offset: f64, color: PackedRgba) {
        let offset = if offset.is_nan() { 0.0 } else { offset.clamp(0.0, 1.0) };
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, ColorStop::new(offset, color));
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at parameter `t` along the gradient axis.
    ///
    /// Before the first stop the first color holds; after the last stop the
    /// last color holds. No stops yields transparent.
    pub fn color_at(&self, t: f64) -> PackedRgba {
        let Some(first) = self.stops.first() else {
            return PackedRgba::TRANSPARENT;
        };
        let t = if t.is_nan() { 0.0 } else { t };
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.offset) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }

    /// Project a point onto the gradient axis, giving its `t`.
    ///
    /// A degenerate axis (`from == to`) maps everything to `0`.
    pub fn t_at(&self, p: Point) -> f64 {
        let dx = self.to.x - self.from.x;
        let dy = self.to.y - self.from.y;
        let len2 = dx * dx + dy * dy;
        if !(len2 > 0.0) {
            return 0.0;
        }
        ((p.x - self.from.x) * dx + (p.y - self.from.y) * dy) / len2
    }

    fn is_finite(&self) -> bool {
        self.from.is_finite()
            && self.to.is_finite()
            && self.stops.iter().all(|s| s.offset.is_finite())
    }
}

/// Rectangle fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(PackedRgba),
    Linear(LinearGradient),
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Replace every pixel in `rect` with `color` (no blending).
    Clear { rect: Rect, color: PackedRgba },
    /// Blend a filled rectangle.
    FillRect { rect: Rect, fill: Fill },
    /// Stroke a line segment.
    Line {
        from: Point,
        to: Point,
        color: PackedRgba,
        width: f64,
    },
    /// Filled circle.
    Circle {
        center: Point,
        radius: f64,
        color: PackedRgba,
    },
    /// Filled axis-aligned ellipse.
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
        color: PackedRgba,
    },
    /// Square dot of side `size`, centered on `at`.
    Point {
        at: Point,
        size: f64,
        color: PackedRgba,
    },
    /// Character glyph; `at` is the top-left corner, `size` the cell height.
    Glyph {
        at: Point,
        ch: char,
        size: f64,
        color: PackedRgba,
    },
}

impl DrawCmd {
    /// All geometry is finite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Clear { rect, .. } => rect.is_finite(),
            Self::FillRect { rect, fill } => {
                rect.is_finite()
                    && match fill {
                        Fill::Solid(_) => true,
                        Fill::Linear(g) => g.is_finite(),
                    }
            }
            Self::Line {
                from, to, width, ..
            } => from.is_finite() && to.is_finite() && width.is_finite(),
            Self::Circle { center, radius, .. } => center.is_finite() && radius.is_finite(),
            Self::Ellipse {
                center,
                radius_x,
                radius_y,
                ..
            } => center.is_finite() && radius_x.is_finite() && radius_y.is_finite(),
            Self::Point { at, size, .. } | Self::Glyph { at, size, .. } => {
                at.is_finite() && size.is_finite()
            }
        }
    }

    /// Short tag for logging and stats.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Clear { .. } => "clear",
            Self::FillRect { .. } => "fill_rect",
            Self::Line { .. } => "line",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Point { .. } => "point",
            Self::Glyph { .. } => "glyph",
        }
    }
}

/// Ordered list of draw commands for one frame.
///
/// Commands with non-finite geometry are dropped on push and counted, so a
/// degenerate value skips one primitive instead of reaching the host.
/// The backing storage is grow-only; [`DrawList::clear`] keeps capacity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    cmds: Vec<DrawCmd>,
    rejected: usize,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cmds: Vec::with_capacity(capacity),
            rejected: 0,
        }
    }

    /// Append a command. Returns `false` if it was dropped as non-finite.
    pub fn push(&mut self, cmd: DrawCmd) -> bool {
        if cmd.is_finite() {
            self.cmds.push(cmd);
            true
        } else {
            self.rejected += 1;
            false
        }
    }

    /// Drop all commands, keeping capacity.
    pub fn clear(&mut self) {
        self.cmds.clear();
        self.rejected = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Commands dropped since the last [`clear`](Self::clear).
    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, DrawCmd> {
        self.cmds.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[DrawCmd] {
        &self.cmds
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.cmds.capacity()
    }

    /// Number of commands of the given [`DrawCmd::kind`].
    pub fn count_kind(&self, kind: &str) -> usize {
        self.cmds.iter().filter(|c| c.kind() == kind).count()
    }

    // -- convenience pushers ------------------------------------------------

    pub fn clear_rect(&mut self, rect: Rect, color: PackedRgba) -> bool {
        self.push(DrawCmd::Clear { rect, color })
    }

    pub fn fill_rect(&mut self, rect: Rect, color: PackedRgba) -> bool {
        self.push(DrawCmd::FillRect {
            rect,
            fill: Fill::Solid(color),
        })
    }

    pub fn fill_rect_gradient(&mut self, rect: Rect, gradient: LinearGradient) -> bool {
        self.push(DrawCmd::FillRect {
            rect,
            fill: Fill::Linear(gradient),
        })
    }

    pub fn line(&mut self, from: Point, to: Point, color: PackedRgba, width: f64) -> bool {
        self.push(DrawCmd::Line {
            from,
            to,
            color,
            width,
        })
    }

    pub fn circle(&mut self, center: Point, radius: f64, color: PackedRgba) -> bool {
        self.push(DrawCmd::Circle {
            center,
            radius,
            color,
        })
    }

    pub fn ellipse(
        &mut self,
        center: Point,
        radius_x: f64,
        radius_y: f64,
        color: PackedRgba,
    ) -> bool {
        self.push(DrawCmd::Ellipse {
            center,
            radius_x,
            radius_y,
            color,
        })
    }

    pub fn point(&mut self, at: Point, size: f64, color: PackedRgba) -> bool {
        self.push(DrawCmd::Point { at, size, color })
    }

    pub fn glyph(&mut self, at: Point, ch: char, size: f64, color: PackedRgba) -> bool {
        self.push(DrawCmd::Glyph {
            at,
            ch,
            size,
            color,
        })
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCmd;
    type IntoIter = std::slice::Iter<'a, DrawCmd>;

    fn into_iter(self) -> Self::IntoIter {
        self.cmds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_are_kept_sorted() {
        let g = LinearGradient::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0))
            .stop(1.0, PackedRgba::WHITE)
            .stop(0.0, PackedRgba::BLACK)
            .stop(0.5, PackedRgba::RED);
        let offsets: Vec<f64> = g.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn stop_offsets_are_clamped() {
        let g = LinearGradient::new(Point::default(), Point::new(1.0, 0.0))
            .stop(-3.0, PackedRgba::BLACK)
            .stop(9.0, PackedRgba::WHITE);
        assert_eq!(g.stops()[0].offset, 0.0);
        assert_eq!(g.stops()[1].offset, 1.0);
    }

    #[test]
    fn color_at_interpolates_and_clamps() {
        let g = LinearGradient::new(Point::default(), Point::new(0.0, 1.0))
            .stop(0.0, PackedRgba::BLACK)
            .stop(1.0, PackedRgba::WHITE);
        assert_eq!(g.color_at(-1.0), PackedRgba::BLACK);
        assert_eq!(g.color_at(2.0), PackedRgba::WHITE);
        assert_eq!(g.color_at(0.5).r(), 128);
    }

    #[test]
    fn empty_gradient_is_transparent() {
        let g = LinearGradient::new(Point::default(), Point::new(0.0, 1.0));
        assert_eq!(g.color_at(0.3), PackedRgba::TRANSPARENT);
    }

    #[test]
    fn t_at_projects_onto_axis() {
        let g = LinearGradient::vertical(Rect::new(0.0, 10.0, 4.0, 20.0));
        assert_eq!(g.t_at(Point::new(3.0, 10.0)), 0.0);
        assert_eq!(g.t_at(Point::new(1.0, 20.0)), 0.5);
        assert_eq!(g.t_at(Point::new(0.0, 30.0)), 1.0);
        let flat = LinearGradient::new(Point::new(1.0, 1.0), Point::new(1.0, 1.0));
        assert_eq!(flat.t_at(Point::new(5.0, 5.0)), 0.0);
    }

    #[test]
    fn push_rejects_non_finite() {
        let mut list = DrawList::new();
        assert!(list.point(Point::new(1.0, 1.0), 1.0, PackedRgba::WHITE));
        assert!(!list.point(Point::new(f64::NAN, 1.0), 1.0, PackedRgba::WHITE));
        assert!(!list.line(
            Point::new(0.0, 0.0),
            Point::new(f64::INFINITY, 0.0),
            PackedRgba::WHITE,
            1.0
        ));
        assert_eq!(list.len(), 1);
        assert_eq!(list.rejected(), 2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut list = DrawList::with_capacity(64);
        for i in 0..50 {
            list.point(Point::new(i as f64, 0.0), 1.0, PackedRgba::WHITE);
        }
        let cap = list.capacity();
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), cap);
        assert_eq!(list.rejected(), 0);
    }

    #[test]
    fn count_kind_filters() {
        let mut list = DrawList::new();
        list.circle(Point::new(0.0, 0.0), 2.0, PackedRgba::RED);
        list.circle(Point::new(1.0, 0.0), 2.0, PackedRgba::RED);
        list.glyph(Point::new(0.0, 0.0), 'A', 7.0, PackedRgba::WHITE);
        assert_eq!(list.count_kind("circle"), 2);
        assert_eq!(list.count_kind("glyph"), 1);
        assert_eq!(list.count_kind("line"), 0);
    }
}
