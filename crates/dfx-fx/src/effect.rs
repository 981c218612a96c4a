#![forbid(unsafe_code)]

//! The update/render contract shared by every effect.
//!
//! Each frame the host advances its clock, calls [`Effect::update`] once,
//! then [`Effect::render`] once against the resulting state. Update always
//! completes before render reads anything; render never mutates.
//!
//! Effects are tiny-area safe: a zero viewport must not panic and simply
//! draws nothing.

use dfx_core::clock::FrameTick;
use dfx_core::geometry::Viewport;
use dfx_render::color::PackedRgba;
use dfx_render::draw::DrawList;

/// Per-frame inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxContext {
    pub viewport: Viewport,
    /// Frames since the clock started (0 on the first tick).
    pub frame: u64,
    /// Elapsed time in seconds. Drives time-based motion.
    pub time_seconds: f64,
    /// Seconds since the previous tick (0 on the first tick).
    pub dt_seconds: f64,
}

impl FxContext {
    #[inline]
    pub fn new(viewport: Viewport, frame: u64, time_seconds: f64, dt_seconds: f64) -> Self {
        Self {
            viewport,
            frame,
            time_seconds,
            dt_seconds,
        }
    }

    /// Context for a clock tick.
    #[inline]
    pub fn from_tick(viewport: Viewport, tick: &FrameTick) -> Self {
        Self::new(viewport, tick.frame, tick.time_seconds(), tick.dt_seconds())
    }

    /// Context for frame `frame` of a fixed-rate timeline.
    #[inline]
    pub fn at_frame(viewport: Viewport, frame: u64, fps: f64) -> Self {
        Self::from_tick(viewport, &FrameTick::at_frame(frame, fps))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.viewport.w()
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.viewport.h()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.viewport.is_empty()
    }
}

/// A self-contained animated effect.
///
/// Motion comes in two flavors and each effect keeps its own:
/// time-driven values are recomputed from `ctx.time_seconds` every frame,
/// integration-driven values are stepped once per `update` call.
pub trait Effect {
    /// Short identifier, used in logs.
    fn name(&self) -> &'static str;

    /// Viewport changed. Called by [`Effect::update`] implementations
    /// whenever `ctx.viewport` differs from the last one seen, so hosts
    /// may also call it eagerly.
    fn resize(&mut self, _viewport: Viewport) {}

    /// Advance state by one frame.
    fn update(&mut self, ctx: &FxContext);

    /// Record this frame's primitives. Must not assume `out` is empty.
    fn render(&self, ctx: &FxContext, out: &mut DrawList);

    /// Color the host clears to before executing the render output.
    fn background(&self) -> PackedRgba {
        PackedRgba::BLACK
    }
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn resize(&mut self, viewport: Viewport) {
        (**self).resize(viewport);
    }

    fn update(&mut self, ctx: &FxContext) {
        (**self).update(ctx);
    }

    fn render(&self, ctx: &FxContext, out: &mut DrawList) {
        (**self).render(ctx, out);
    }

    fn background(&self) -> PackedRgba {
        (**self).background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_frame_uses_fixed_step() {
        let ctx = FxContext::at_frame(Viewport::new(10, 10), 30, 60.0);
        assert_eq!(ctx.frame, 30);
        assert!((ctx.time_seconds - 0.5).abs() < 1e-9);
        assert!((ctx.dt_seconds - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn first_frame_has_zero_dt() {
        let ctx = FxContext::at_frame(Viewport::new(10, 10), 0, 60.0);
        assert_eq!(ctx.dt_seconds, 0.0);
        assert_eq!(ctx.time_seconds, 0.0);
    }

    #[test]
    fn empty_viewport() {
        assert!(FxContext::at_frame(Viewport::new(0, 5), 1, 60.0).is_empty());
    }
}
