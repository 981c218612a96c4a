#![forbid(unsafe_code)]

//! Copper bars.
//!
//! Horizontal gradient bars swing on sine paths. Position is recomputed
//! from elapsed time every frame, so bars never drift out of range however
//! uneven the frame rate is. Hue, on the other hand, is accumulated one
//! fixed step per frame.

use dfx_core::geometry::{Rect, Viewport};
use dfx_core::wrap::wrap_degrees;
use dfx_core::{debug, trace};
use dfx_render::color::PackedRgba;
use dfx_render::draw::{DrawList, LinearGradient};

use crate::effect::{Effect, FxContext};
use crate::error::{FxError, Result, check};

const NAME: &str = "copper";

/// Alpha at the bar's top, middle and bottom gradient stops.
pub const BAR_ALPHA: [f64; 3] = [0.2, 0.8, 0.2];

/// Parameters controlling the copper bars.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopperParams {
    pub bars: usize,
    /// Bar height in pixels. Clamped to the viewport height.
    pub bar_height: f64,
    /// Angular speed of bar 0, radians per second.
    pub speed: f64,
    /// Added to the speed of each further bar.
    pub speed_step: f64,
    /// Phase of bar `i` is `i * phase_step`.
    pub phase_step: f64,
    /// Swing as a fraction of `height - bar_height`. At 1 the bars sweep
    /// past both edges; at 0.5 they just touch them.
    pub amplitude: f64,
    /// Center line as a fraction of the height.
    pub base_y: f64,
    /// Hue of bar 0 in degrees; bar `i` starts at `hue + i * hue_spread`.
    pub hue: f64,
    pub hue_spread: f64,
    /// Degrees added to every bar's hue per frame.
    pub hue_increment: f64,
    pub saturation: f64,
    pub lightness: f64,
    /// Height of the center shine stripe in pixels.
    pub shine_height: f64,
    pub shine_lightness: f64,
    pub background: PackedRgba,
}

impl Default for CopperParams {
    fn default() -> Self {
        Self {
            bars: 7,
            bar_height: 36.0,
            speed: 1.2,
            speed_step: 0.17,
            phase_step: 0.55,
            amplitude: 1.0,
            base_y: 0.5,
            hue: 0.0,
            hue_spread: 360.0 / 7.0,
            hue_increment: 0.5,
            saturation: 1.0,
            lightness: 0.5,
            shine_height: 2.0,
            shine_lightness: 0.85,
            background: PackedRgba::BLACK,
        }
    }
}

impl CopperParams {
    /// Bars that never leave the viewport.
    pub fn contained() -> Self {
        Self {
            amplitude: 0.5,
            ..Self::default()
        }
    }

    /// Slow, wide, same-hue bars.
    pub fn mono(hue: f64) -> Self {
        Self {
            bars: 5,
            bar_height: 48.0,
            speed: 0.6,
            hue,
            hue_spread: 0.0,
            hue_increment: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bars == 0 {
            return Err(FxError::EmptyGeometry { effect: NAME });
        }
        check::non_negative(NAME, "bar_height", self.bar_height)?;
        check::finite(NAME, "speed", self.speed)?;
        check::finite(NAME, "speed_step", self.speed_step)?;
        check::finite(NAME, "phase_step", self.phase_step)?;
        check::unit(NAME, "amplitude", self.amplitude)?;
        check::unit(NAME, "base_y", self.base_y)?;
        check::finite(NAME, "hue", self.hue)?;
        check::finite(NAME, "hue_spread", self.hue_spread)?;
        check::finite(NAME, "hue_increment", self.hue_increment)?;
        check::unit(NAME, "saturation", self.saturation)?;
        check::unit(NAME, "lightness", self.lightness)?;
        check::non_negative(NAME, "shine_height", self.shine_height)?;
        check::unit(NAME, "shine_lightness", self.shine_lightness)?;
        Ok(())
    }
}

/// One bar. Position is not stored; see [`bar_center`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Center line as a fraction of the height.
    pub base_y: f64,
    /// Radians per second.
    pub speed: f64,
    /// Degrees, `[0, 360)`.
    pub hue: f64,
    pub phase: f64,
    /// Draw order; lower layers are drawn first.
    pub layer: usize,
}

/// Vertical center of `bar` at time `t`.
///
/// `sin(t * speed + phase) * (height - bar_height) * amplitude + base_y * height`
#[inline]
pub fn bar_center(bar: &Bar, t: f64, height: f64, bar_height: f64, amplitude: f64) -> f64 {
    (t * bar.speed + bar.phase).sin() * (height - bar_height) * amplitude + bar.base_y * height
}

/// Advance a hue by `increment` degrees, wrapped to `[0, 360)`.
#[inline]
pub fn advance_hue(hue: f64, increment: f64) -> f64 {
    wrap_degrees(hue + increment)
}

/// Three-stop vertical gradient for a bar occupying `rect`.
pub fn bar_gradient(rect: Rect, hue: f64, saturation: f64, lightness: f64) -> LinearGradient {
    let [top, mid, bottom] = BAR_ALPHA;
    LinearGradient::vertical(rect)
        .stop(0.0, PackedRgba::hsla(hue, saturation, lightness, top))
        .stop(0.5, PackedRgba::hsla(hue, saturation, lightness, mid))
        .stop(1.0, PackedRgba::hsla(hue, saturation, lightness, bottom))
}

/// Sine-swinging gradient bars with cycling hue.
#[derive(Debug, Clone)]
pub struct CopperFx {
    params: CopperParams,
    bars: Vec<Bar>,
    /// Bar indices sorted by layer, refreshed on update.
    order: Vec<usize>,
    viewport: Viewport,
}

impl CopperFx {
    pub fn new() -> Self {
        Self::from_valid(CopperParams::default())
    }

    pub fn try_new(params: CopperParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_valid(params))
    }

    fn from_valid(params: CopperParams) -> Self {
        let bars = (0..params.bars)
            .map(|i| Bar {
                base_y: params.base_y,
                speed: params.speed + params.speed_step * i as f64,
                hue: wrap_degrees(params.hue + params.hue_spread * i as f64),
                phase: params.phase_step * i as f64,
                layer: i,
            })
            .collect::<Vec<_>>();
        let order = (0..bars.len()).collect();
        Self {
            params,
            bars,
            order,
            viewport: Viewport::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &CopperParams {
        &self.params
    }

    #[inline]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    #[inline]
    pub fn bars_mut(&mut self) -> &mut [Bar] {
        &mut self.bars
    }

    /// Bar height for the current viewport.
    #[inline]
    fn bar_height(&self, height: f64) -> f64 {
        self.params.bar_height.min(height)
    }

    /// Centers of all bars at time `t`, in bar order.
    pub fn centers(&self, t: f64, height: f64) -> impl Iterator<Item = f64> + '_ {
        let bh = self.bar_height(height);
        let amp = self.params.amplitude;
        self.bars
            .iter()
            .map(move |b| bar_center(b, t, height, bh, amp))
    }
}

impl Default for CopperFx {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for CopperFx {
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
        self.viewport = viewport;
    }

    fn update(&mut self, ctx: &FxContext) {
        if ctx.viewport != self.viewport {
            self.resize(ctx.viewport);
        }
        let inc = self.params.hue_increment;
        for bar in &mut self.bars {
            let before = bar.hue;
            bar.hue = advance_hue(bar.hue, inc);
            if bar.hue < before && inc > 0.0 {
                trace!(effect = NAME, layer = bar.layer, "hue wrapped");
            }
        }
        let bars = &self.bars;
        self.order.sort_by_key(|&i| bars[i].layer);
    }

    fn render(&self, ctx: &FxContext, out: &mut DrawList) {
        if ctx.is_empty() {
            return;
        }
        let p = &self.params;
        let (w, h) = (ctx.width(), ctx.height());
        let bh = self.bar_height(h);
        let shine = p.shine_height.min(bh);
        let t = ctx.time_seconds;

        for bar in self.order.iter().filter_map(|&i| self.bars.get(i)) {
            let center = bar_center(bar, t, h, bh, p.amplitude);
            let rect = Rect::new(0.0, center - bh / 2.0, w, bh);
            out.fill_rect_gradient(rect, bar_gradient(rect, bar.hue, p.saturation, p.lightness));
            if shine > 0.0 {
                out.fill_rect(
                    Rect::new(0.0, center - shine / 2.0, w, shine),
                    PackedRgba::hsla(bar.hue, p.saturation, p.shine_lightness, 0.9),
                );
            }
        }
    }

    fn background(&self) -> PackedRgba {
        self.params.background
    }
}
