#![forbid(unsafe_code)]

//! Parallax starfield.
//!
//! Several layers of stars drift left to right, nearer layers faster. A
//! star that passes the right edge restarts at `x = 0` in the same update
//! with a fresh random height and brightness.
//!
//! Star counts follow the viewport area. Resizing adds or removes stars per
//! layer and leaves every surviving star exactly as it was.

use dfx_core::geometry::{Point, Viewport};
use dfx_core::rng::{Lcg64, RandomSource};
use dfx_core::{debug, trace};
use dfx_render::color::PackedRgba;
use dfx_render::draw::DrawList;

use crate::effect::{Effect, FxContext};
use crate::error::{FxError, Result, check};

const NAME: &str = "starfield";

/// Parameters controlling the starfield.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarfieldParams {
    pub layers: usize,
    /// Stars per pixel of viewport area, per layer.
    pub density: f64,
    /// Pixels per frame for layer 0; layer `i` moves `(i + 1)` times faster.
    pub base_speed: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Dot size of layer 0; each further layer adds `size_step`.
    pub size: f64,
    pub size_step: f64,
    /// Star tint.
    pub hue: f64,
    pub saturation: f64,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            layers: 3,
            density: 0.0004,
            base_speed: 0.5,
            min_brightness: 0.3,
            max_brightness: 1.0,
            size: 1.0,
            size_step: 0.5,
            hue: 220.0,
            saturation: 0.25,
        }
    }
}

impl StarfieldParams {
    /// Dense, fast field.
    pub fn warp() -> Self {
        Self {
            layers: 5,
            density: 0.001,
            base_speed: 1.5,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.layers == 0 {
            return Err(FxError::EmptyGeometry { effect: NAME });
        }
        check::non_negative(NAME, "density", self.density)?;
        check::non_negative(NAME, "base_speed", self.base_speed)?;
        check::unit(NAME, "min_brightness", self.min_brightness)?;
        check::unit(NAME, "max_brightness", self.max_brightness)?;
        if self.max_brightness < self.min_brightness {
            return Err(FxError::invalid(
                NAME,
                "max_brightness",
                "must be >= min_brightness",
            ));
        }
        check::positive(NAME, "size", self.size)?;
        check::non_negative(NAME, "size_step", self.size_step)?;
        check::finite(NAME, "hue", self.hue)?;
        check::unit(NAME, "saturation", self.saturation)?;
        Ok(())
    }

    /// Speed of `layer`, fixed at creation.
    #[inline]
    pub fn layer_speed(&self, layer: usize) -> f64 {
        self.base_speed * (layer + 1) as f64
    }
}

/// Stars a layer holds for a viewport of `area` pixels.
///
/// At least one per layer for any non-empty viewport.
#[inline]
pub fn layer_count(area: u64, density: f64) -> usize {
    if area == 0 {
        return 0;
    }
    ((area as f64 * density).round() as usize).max(1)
}

/// One star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    /// Pixels per frame; never changes after creation.
    pub speed: f64,
    pub brightness: f64,
    pub layer: usize,
}

/// Layered drifting stars.
#[derive(Debug, Clone)]
pub struct StarfieldFx<R: RandomSource = Lcg64> {
    params: StarfieldParams,
    rng: R,
    stars: Vec<Star>,
    viewport: Viewport,
    resets: u64,
}

impl StarfieldFx<Lcg64> {
    pub fn new() -> Self {
        Self::from_valid(StarfieldParams::default(), Lcg64::default())
    }

    pub fn try_new(params: StarfieldParams) -> Result<Self> {
        Self::with_rng(params, Lcg64::default())
    }
}

impl Default for StarfieldFx<Lcg64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> StarfieldFx<R> {
    /// Build with a caller-supplied random source.
    pub fn with_rng(params: StarfieldParams, rng: R) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_valid(params, rng))
    }

    fn from_valid(params: StarfieldParams, rng: R) -> Self {
        Self {
            params,
            rng,
            stars: Vec::new(),
            viewport: Viewport::default(),
            resets: 0,
        }
    }

    #[inline]
    pub fn params(&self) -> &StarfieldParams {
        &self.params
    }

    #[inline]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    #[inline]
    pub fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    /// Stars that wrapped past the right edge so far.
    #[inline]
    pub fn resets(&self) -> u64 {
        self.resets
    }

    #[inline]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn count_in_layer(&self, layer: usize) -> usize {
        self.stars.iter().filter(|s| s.layer == layer).count()
    }

    fn spawn(&mut self, layer: usize, viewport: Viewport) -> Star {
        let (w, h) = (viewport.w(), viewport.h());
        let p = &self.params;
        Star {
            x: self.rng.next_f64() * w,
            y: self.rng.next_f64() * h,
            speed: p.layer_speed(layer),
            brightness: self.rng.range(p.min_brightness, p.max_brightness),
            layer,
        }
    }
}

impl<R: RandomSource> Effect for StarfieldFx<R> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn resize(&mut self, viewport: Viewport) {
        let target = layer_count(viewport.area(), self.params.density);
        for layer in 0..self.params.layers {
            let current = self.count_in_layer(layer);
            if current < target {
                for _ in current..target {
                    let star = self.spawn(layer, viewport);
                    self.stars.push(star);
                }
            } else if current > target {
                let mut kept = 0;
                self.stars.retain(|s| {
                    if s.layer != layer {
                        return true;
                    }
                    kept += 1;
                    kept <= target
                });
            }
        }
        debug!(
            effect = NAME,
            width = viewport.width,
            height = viewport.height,
            stars = self.stars.len(),
            "resize"
        );
        self.viewport = viewport;
    }

    fn update(&mut self, ctx: &FxContext) {
        if ctx.viewport != self.viewport {
            self.resize(ctx.viewport);
        }
        let (w, h) = (ctx.width(), ctx.height());
        let (lo, hi) = (self.params.min_brightness, self.params.max_brightness);
        let mut wrapped = 0u64;
        for star in &mut self.stars {
            star.x += star.speed;
            if star.x > w {
                star.x = 0.0;
                star.y = self.rng.next_f64() * h;
                star.brightness = self.rng.range(lo, hi);
                wrapped += 1;
            }
        }
        if wrapped > 0 {
            trace!(effect = NAME, wrapped, "stars reset");
        }
        self.resets += wrapped;
    }

    fn render(&self, ctx: &FxContext, out: &mut DrawList) {
        if ctx.is_empty() {
            return;
        }
        let p = &self.params;
        for layer in 0..p.layers {
            let size = p.size + p.size_step * layer as f64;
            for star in self.stars.iter().filter(|s| s.layer == layer) {
                let color = PackedRgba::hsl(p.hue, p.saturation, star.brightness);
                out.point(Point::new(star.x, star.y), size, color);
            }
        }
    }
}
