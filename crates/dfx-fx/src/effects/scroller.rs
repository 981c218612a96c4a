#![forbid(unsafe_code)]

//! Sine scroller.
//!
//! A message scrolls right to left while every character rides a sine
//! wave whose phase depends on the character's screen x and on time. The
//! message is tiled along the line, and once a full copy has left the
//! screen the offset jumps forward by one message length, so the loop has
//! no visible seam.
//!
//! Characters the bitmap font does not cover are shown as blanks.

use dfx_core::geometry::{Point, Viewport};
use dfx_core::wrap::wrap_degrees;
use dfx_core::{debug, trace};
use dfx_render::color::PackedRgba;
use dfx_render::draw::DrawList;
use dfx_render::font;

use crate::effect::{Effect, FxContext};
use crate::error::{Result, check};

const NAME: &str = "scroller";

/// Parameters controlling the sine scroller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollerParams {
    pub message: String,
    /// Pixels scrolled per frame.
    pub speed: f64,
    /// Glyph cell height in pixels.
    pub glyph_size: f64,
    /// Horizontal distance between character origins.
    pub spacing: f64,
    /// Wave phase per pixel of x.
    pub frequency: f64,
    /// Wave phase per second.
    pub wave_speed: f64,
    /// Wave amplitude as a fraction of the height.
    pub amplitude: f64,
    /// Wave center line as a fraction of the height.
    pub center_y: f64,
    /// Hue degrees per second.
    pub hue_speed: f64,
    /// Hue degrees between neighboring characters.
    pub hue_step: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for ScrollerParams {
    fn default() -> Self {
        Self {
            message: "GREETINGS TO ALL DEMOSCENERS... THIS SCROLLER RIDES A SINE WAVE ".to_string(),
            speed: 2.0,
            glyph_size: 28.0,
            spacing: 24.0,
            frequency: 0.02,
            wave_speed: 3.0,
            amplitude: 0.25,
            center_y: 0.5,
            hue_speed: 60.0,
            hue_step: 12.0,
            saturation: 1.0,
            lightness: 0.6,
        }
    }
}

impl ScrollerParams {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check::non_negative(NAME, "speed", self.speed)?;
        check::positive(NAME, "glyph_size", self.glyph_size)?;
        check::positive(NAME, "spacing", self.spacing)?;
        check::finite(NAME, "frequency", self.frequency)?;
        check::finite(NAME, "wave_speed", self.wave_speed)?;
        check::unit(NAME, "amplitude", self.amplitude)?;
        check::unit(NAME, "center_y", self.center_y)?;
        check::finite(NAME, "hue_speed", self.hue_speed)?;
        check::finite(NAME, "hue_step", self.hue_step)?;
        check::unit(NAME, "saturation", self.saturation)?;
        check::unit(NAME, "lightness", self.lightness)?;
        Ok(())
    }
}

/// A character placed for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollChar {
    /// Position in the message.
    pub index: usize,
    /// Normalized character; `' '` for anything outside the font.
    pub ch: char,
    /// Left edge.
    pub x: f64,
    /// Vertical center on the wave.
    pub y: f64,
    /// Degrees, `[0, 360)`.
    pub hue: f64,
}

/// Advance the scroll offset by one frame.
///
/// Once the whole message is off the left edge the offset moves forward
/// by whole multiples of `message_width`, landing in `(-message_width, 0]`
/// even when `speed` exceeds the message width.
#[inline]
pub fn advance_offset(offset: f64, speed: f64, message_width: f64) -> f64 {
    let next = offset - speed;
    if message_width > 0.0 && next + message_width <= 0.0 {
        -(-next).rem_euclid(message_width)
    } else {
        next
    }
}

/// Scrolling sine-wave text.
#[derive(Debug, Clone)]
pub struct ScrollerFx {
    params: ScrollerParams,
    chars: Vec<char>,
    offset: f64,
    viewport: Viewport,
    started: bool,
}

impl ScrollerFx {
    pub fn new() -> Self {
        Self::from_valid(ScrollerParams::default())
    }

    pub fn try_new(params: ScrollerParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_valid(params))
    }

    fn from_valid(params: ScrollerParams) -> Self {
        let chars = params.message.chars().map(font::normalize).collect();
        Self {
            params,
            chars,
            offset: 0.0,
            viewport: Viewport::default(),
            started: false,
        }
    }

    #[inline]
    pub fn params(&self) -> &ScrollerParams {
        &self.params
    }

    /// Normalized message characters.
    #[inline]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// X of the first message copy's first character.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn set_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.offset = offset;
            self.started = true;
        }
    }

    /// Width of one message copy.
    #[inline]
    pub fn message_width(&self) -> f64 {
        self.chars.len() as f64 * self.params.spacing
    }

    /// Characters that intersect `[-spacing, width]` of the last viewport
    /// seen by `resize` or `update`, at time `t`.
    pub fn visible_chars(&self, t: f64) -> impl Iterator<Item = ScrollChar> + '_ {
        self.visible_chars_in(self.viewport, t)
    }

    /// Characters that intersect `[-spacing, width]` of `viewport` at time `t`.
    pub fn visible_chars_in(
        &self,
        viewport: Viewport,
        t: f64,
    ) -> impl Iterator<Item = ScrollChar> + '_ {
        let p = &self.params;
        let len = self.chars.len();
        let (w, h) = (viewport.w(), viewport.h());
        let first = if self.offset < -p.spacing {
            ((-p.spacing - self.offset) / p.spacing).floor() as usize
        } else {
            0
        };
        let end = if len == 0 { first } else { usize::MAX };
        (first..end)
            .map(move |j| (j, self.offset + j as f64 * p.spacing))
            .take_while(move |&(_, x)| x <= w)
            .filter(move |&(_, x)| x >= -p.spacing)
            .map(move |(j, x)| {
                let index = j % len;
                let wave = (x * p.frequency + t * p.wave_speed).sin();
                ScrollChar {
                    index,
                    ch: self.chars[index],
                    x,
                    y: p.center_y * h + wave * p.amplitude * h,
                    hue: wrap_degrees(t * p.hue_speed + index as f64 * p.hue_step),
                }
            })
    }
}

impl Default for ScrollerFx {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ScrollerFx {
    fn name(&self) -> &'static str {
        NAME
    }

    fn resize(&mut self, viewport: Viewport) {
        debug!(
            effect = NAME,
            width = viewport.width,
            height = viewport.height,
            "resize"
        );
        if !self.started {
            // Enter from the right edge.
            self.offset = viewport.w();
            self.started = true;
        }
        self.viewport = viewport;
    }

    fn update(&mut self, ctx: &FxContext) {
        if ctx.viewport != self.viewport || !self.started {
            self.resize(ctx.viewport);
        }
        if self.chars.is_empty() {
            return;
        }
        let width = self.message_width();
        let next = advance_offset(self.offset, self.params.speed, width);
        if next > self.offset {
            trace!(effect = NAME, offset = next, "message wrapped");
        }
        self.offset = next;
    }

    fn render(&self, ctx: &FxContext, out: &mut DrawList) {
        if ctx.is_empty() {
            return;
        }
        let p = &self.params;
        let half = p.glyph_size / 2.0;
        for c in self.visible_chars_in(ctx.viewport, ctx.time_seconds) {
            if c.ch == ' ' {
                continue;
            }
            let color = PackedRgba::hsl(c.hue, p.saturation, p.lightness);
            out.glyph(Point::new(c.x, c.y - half), c.ch, p.glyph_size, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(w: u32, h: u32, frame: u64) -> FxContext {
        FxContext::at_frame(Viewport::new(w, h), frame, 60.0)
    }

    fn fx(message: &str) -> ScrollerFx {
        ScrollerFx::try_new(ScrollerParams::with_message(message)).unwrap()
    }

    #[test]
    fn enters_from_right_edge() {
        let mut s = fx("HI");
        s.resize(Viewport::new(320, 200));
        assert_eq!(s.offset(), 320.0);
        s.update(&ctx(320, 200, 0));
        assert_eq!(s.offset(), 318.0);
    }

    #[test]
    fn wraps_after_message_leaves() {
        // Two characters at spacing 24: one copy is 48 pixels wide.
        assert_eq!(advance_offset(-45.0, 2.0, 48.0), -47.0);
        assert_eq!(advance_offset(-46.0, 2.0, 48.0), 0.0);
        assert_eq!(advance_offset(-47.0, 2.0, 48.0), -1.0);
    }

    #[test]
    fn wrap_handles_speed_above_message_width() {
        // One character at spacing 24, moving 30 pixels per frame.
        assert_eq!(advance_offset(-10.0, 30.0, 24.0), -16.0);
        assert_eq!(advance_offset(0.0, 100.0, 24.0), -4.0);

        let mut s = ScrollerFx::try_new(ScrollerParams {
            speed: 30.0,
            ..ScrollerParams::with_message("A")
        })
        .unwrap();
        for f in 0..10_000 {
            s.update(&ctx(320, 200, f));
            assert!(
                s.offset() > -s.message_width() && s.offset() <= 320.0,
                "frame {f}: offset {}",
                s.offset()
            );
        }
    }

    #[test]
    fn render_uses_context_viewport() {
        let mut s = fx("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        s.resize(Viewport::new(100, 100));
        s.set_offset(0.0);
        // Render at a wider viewport before any update sees it.
        let wide = ctx(400, 100, 0);
        let mut out = DrawList::new();
        s.render(&wide, &mut out);
        let expected = s
            .visible_chars_in(wide.viewport, wide.time_seconds)
            .filter(|c| c.ch != ' ')
            .count();
        assert_eq!(out.count_kind("glyph"), expected);
        assert!(expected > s.visible_chars(0.0).count());
    }

    #[test]
    fn offset_stays_bounded_over_long_runs() {
        let mut s = fx("ABC");
        for f in 0..10_000 {
            s.update(&ctx(100, 50, f));
            assert!(s.offset() > -s.message_width() && s.offset() <= 100.0);
        }
    }

    #[test]
    fn message_is_tiled_across_viewport() {
        let mut s = fx("AB");
        s.resize(Viewport::new(200, 100));
        s.set_offset(-10.0);
        let xs: Vec<f64> = s.visible_chars(0.0).map(|c| c.x).collect();
        assert_eq!(xs.first(), Some(&-10.0));
        assert!(xs.last().is_some_and(|x| *x <= 200.0 && *x + 24.0 > 200.0));
        let idx: Vec<usize> = s.visible_chars(0.0).map(|c| c.index).take(4).collect();
        assert_eq!(idx, vec![0, 1, 0, 1]);
    }

    #[test]
    fn offscreen_chars_are_skipped() {
        let mut s = fx("ABCDEFGHIJ");
        s.resize(Viewport::new(100, 100));
        s.set_offset(-200.0);
        for c in s.visible_chars(1.0) {
            assert!(c.x >= -24.0 && c.x <= 100.0, "{c:?}");
        }
        // First visible copy starts mid-message.
        assert_eq!(s.visible_chars(1.0).next().map(|c| c.index), Some(8));
    }

    #[test]
    fn wave_and_hue_follow_formula() {
        let mut s = fx("XY");
        s.resize(Viewport::new(400, 200));
        s.set_offset(10.0);
        let t = 0.75;
        let c = s.visible_chars(t).nth(1).unwrap();
        let p = s.params();
        let x = 10.0 + 24.0;
        let y = 100.0 + (x * p.frequency + t * p.wave_speed).sin() * p.amplitude * 200.0;
        assert_eq!(c.x, x);
        assert!((c.y - y).abs() < 1e-12);
        assert!((c.hue - wrap_degrees(t * 60.0 + 12.0)).abs() < 1e-12);
    }

    #[test]
    fn unsupported_chars_render_blank() {
        let s = fx("A~b{");
        assert_eq!(s.chars(), &['A', ' ', 'B', ' ']);
        let mut s = s;
        let c = ctx(400, 100, 0);
        s.update(&c);
        s.set_offset(0.0);
        let mut out = DrawList::new();
        s.render(&c, &mut out);
        assert_eq!(out.count_kind("glyph"), s.visible_chars(0.0).filter(|c| c.ch != ' ').count());
    }

    #[test]
    fn empty_message_renders_nothing() {
        let mut s = fx("");
        let c = ctx(320, 200, 3);
        s.update(&c);
        let mut out = DrawList::new();
        s.render(&c, &mut out);
        assert!(out.is_empty());
        assert_eq!(s.visible_chars(0.0).count(), 0);
    }

    #[test]
    fn zero_viewport_renders_nothing() {
        let mut s = ScrollerFx::new();
        let c = ctx(0, 0, 1);
        s.update(&c);
        let mut out = DrawList::new();
        s.render(&c, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn rejects_zero_spacing() {
        assert!(ScrollerFx::try_new(ScrollerParams {
            spacing: 0.0,
            ..ScrollerParams::default()
        })
        .is_err());
    }
}
