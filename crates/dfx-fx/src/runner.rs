#![forbid(unsafe_code)]

//! Frame driver.
//!
//! [`FxRunner`] owns one effect, a [`FrameClock`] and a reusable
//! [`DrawList`]. Each [`FxRunner::frame_tick`] advances the clock, updates
//! the effect, records its primitives behind a full-viewport clear and hands
//! them to the host surface.

use dfx_core::clock::{FrameClock, FrameTick, SystemTimeSource, TimeSource};
use dfx_core::geometry::Viewport;
use dfx_core::{debug, trace_span};
use dfx_render::draw::DrawList;
use dfx_render::surface::Surface;

use crate::effect::{Effect, FxContext};

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub tick: FrameTick,
    /// Commands sent to the surface, including the clear.
    pub commands: usize,
    /// Commands dropped for non-finite geometry.
    pub rejected: usize,
}

/// Drives one effect against a host surface.
#[derive(Debug)]
pub struct FxRunner<E: Effect, T: TimeSource = SystemTimeSource> {
    effect: E,
    clock: FrameClock<T>,
    viewport: Viewport,
    list: DrawList,
}

impl<E: Effect> FxRunner<E, SystemTimeSource> {
    /// Runner on the wall clock.
    pub fn new(effect: E, viewport: Viewport) -> Self {
        Self::with_clock(effect, FrameClock::system(), viewport)
    }
}

impl<E: Effect, T: TimeSource> FxRunner<E, T> {
    pub fn with_clock(mut effect: E, clock: FrameClock<T>, viewport: Viewport) -> Self {
        effect.resize(viewport);
        Self {
            effect,
            clock,
            viewport,
            list: DrawList::new(),
        }
    }

    #[inline]
    pub fn effect(&self) -> &E {
        &self.effect
    }

    #[inline]
    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    #[inline]
    pub fn clock(&self) -> &FrameClock<T> {
        &self.clock
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The list recorded by the last frame.
    #[inline]
    pub fn last_frame(&self) -> &DrawList {
        &self.list
    }

    /// Host resize notification. Takes effect on the next frame.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            debug!(
                effect = self.effect.name(),
                width = viewport.width,
                height = viewport.height,
                "viewport changed"
            );
            self.viewport = viewport;
            self.effect.resize(viewport);
        }
    }

    /// Advance the clock and run one frame.
    pub fn frame_tick(&mut self, surface: &mut dyn Surface) -> FrameStats {
        let tick = self.clock.tick();
        self.step(tick, surface)
    }

    /// Run one frame for an explicit tick, bypassing the clock.
    ///
    /// Scripted hosts and tests use this to replay a fixed timeline.
    pub fn step(&mut self, tick: FrameTick, surface: &mut dyn Surface) -> FrameStats {
        let span = trace_span!("fx_frame", effect = self.effect.name(), frame = tick.frame);
        let _guard = span.enter();

        if surface.viewport() != self.viewport {
            surface.resize(self.viewport);
        }

        let ctx = FxContext::from_tick(self.viewport, &tick);
        self.effect.update(&ctx);

        self.list.clear();
        self.list
            .clear_rect(self.viewport.bounds(), self.effect.background());
        self.effect.render(&ctx, &mut self.list);

        surface.present(&self.list);

        FrameStats {
            tick,
            commands: self.list.len(),
            rejected: self.list.rejected(),
        }
    }

    /// Consume the runner, returning the effect.
    pub fn into_effect(self) -> E {
        self.effect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{CopperFx, StarfieldFx};
    use dfx_core::clock::ManualTimeSource;
    use dfx_render::color::PackedRgba;
    use dfx_render::draw::DrawCmd;
    use dfx_render::pixel::PixelSurface;
    use dfx_render::surface::RecordingSurface;
    use std::time::Duration;

    fn manual_runner<E: Effect>(
        effect: E,
        vp: Viewport,
    ) -> (FxRunner<E, ManualTimeSource>, ManualTimeSource) {
        let source = ManualTimeSource::new();
        let clock = FrameClock::new(source.clone());
        (FxRunner::with_clock(effect, clock, vp), source)
    }

    #[test]
    fn every_frame_starts_with_full_clear() {
        let vp = Viewport::new(64, 48);
        let (mut runner, source) = manual_runner(CopperFx::new(), vp);
        let mut surface = RecordingSurface::new(vp);
        for _ in 0..3 {
            source.advance(Duration::from_millis(16));
            runner.frame_tick(&mut surface);
        }
        assert_eq!(surface.frames().len(), 3);
        for frame in surface.frames() {
            match frame.as_slice().first() {
                Some(DrawCmd::Clear { rect, color }) => {
                    assert_eq!(*rect, vp.bounds());
                    assert_eq!(*color, PackedRgba::BLACK);
                }
                other => panic!("expected clear, got {other:?}"),
            }
        }
    }

    #[test]
    fn clock_drives_frame_index() {
        let vp = Viewport::new(32, 32);
        let (mut runner, source) = manual_runner(StarfieldFx::new(), vp);
        let mut surface = RecordingSurface::new(vp);
        let first = runner.frame_tick(&mut surface);
        source.advance(Duration::from_millis(20));
        let second = runner.frame_tick(&mut surface);
        assert_eq!(first.tick.frame, 0);
        assert_eq!(first.tick.dt, Duration::ZERO);
        assert_eq!(second.tick.frame, 1);
        assert_eq!(second.tick.dt, Duration::from_millis(20));
    }

    #[test]
    fn resize_reaches_surface_and_effect() {
        let (mut runner, _source) = manual_runner(StarfieldFx::new(), Viewport::new(100, 100));
        let mut surface = PixelSurface::new(Viewport::new(100, 100));
        runner.frame_tick(&mut surface);
        let before = runner.effect().stars().len();
        runner.resize(Viewport::new(400, 300));
        runner.frame_tick(&mut surface);
        assert_eq!(surface.viewport(), Viewport::new(400, 300));
        assert!(runner.effect().stars().len() > before);
    }

    #[test]
    fn draw_list_is_reused() {
        let vp = Viewport::new(120, 80);
        let (mut runner, source) = manual_runner(CopperFx::new(), vp);
        let mut surface = RecordingSurface::new(vp);
        runner.frame_tick(&mut surface);
        let cap = runner.last_frame().capacity();
        for _ in 0..20 {
            source.advance(Duration::from_millis(16));
            runner.frame_tick(&mut surface);
        }
        assert_eq!(runner.last_frame().capacity(), cap);
    }

    #[test]
    fn step_replays_fixed_ticks() {
        let vp = Viewport::new(80, 60);
        let mut a = FxRunner::new(CopperFx::new(), vp);
        let mut b = FxRunner::new(CopperFx::new(), vp);
        let mut sa = PixelSurface::new(vp);
        let mut sb = PixelSurface::new(vp);
        for f in 0..10 {
            a.step(FrameTick::at_frame(f, 60.0), &mut sa);
            b.step(FrameTick::at_frame(f, 60.0), &mut sb);
        }
        assert_eq!(sa, sb);
    }

    #[test]
    fn zero_viewport_frame_is_safe() {
        let vp = Viewport::new(0, 0);
        let (mut runner, _source) = manual_runner(CopperFx::new(), vp);
        let mut surface = PixelSurface::new(vp);
        let stats = runner.frame_tick(&mut surface);
        assert_eq!(stats.commands, 1);
    }
}
