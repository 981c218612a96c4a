#![forbid(unsafe_code)]

//! Boing ball.
//!
//! A checkered sphere bounces under gravity, drifts between the side walls
//! and spins in the direction it travels. Vertical motion is integrated
//! once per frame:
//!
//! ```text
//! vy += gravity; y += vy;
//! y > H - r  =>  y = H - r; vy = -vy * damping
//! y < r      =>  y = r;     vy = |vy| * damping
//! ```
//!
//! Side walls reflect `vx` without loss. The drop shadow is a pure function
//! of the ball and never carries state of its own.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use dfx_core::geometry::{Point, Rect, Viewport};
use dfx_core::wrap::wrap_degrees;
use dfx_core::{debug, trace};
use dfx_render::color::PackedRgba;
use dfx_render::draw::DrawList;

use crate::effect::{Effect, FxContext};
use crate::error::{FxError, Result, check};
use crate::math3d::Vec3;

const NAME: &str = "boing";

/// Smallest vertical shadow scale, reached with the ball at the ceiling.
pub const MIN_SHADOW_SCALE: f64 = 0.2;

/// Parameters controlling the boing ball.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoingParams {
    /// Ball radius in pixels. Clamped to half the viewport on resize.
    pub radius: f64,
    /// Added to `vy` every frame (pixels per frame²).
    pub gravity: f64,
    /// Velocity kept on each floor/ceiling bounce, strictly in `(0, 1)`.
    pub damping: f64,
    /// Horizontal speed in pixels per frame. Zero keeps the ball centered.
    pub drift: f64,
    /// Initial height as a fraction of the viewport, from the top.
    pub start_height: f64,
    /// Spin in degrees per frame. Sign follows the horizontal direction.
    pub spin_speed: f64,
    /// Axis tilt in degrees.
    pub tilt: f64,
    /// Checker tiles around the equator.
    pub segments_lon: u32,
    /// Checker tiles pole to pole.
    pub segments_lat: u32,
    /// Sample cells across the ball's diameter.
    pub resolution: u32,
    pub primary: PackedRgba,
    pub secondary: PackedRgba,
    /// Horizontal shadow offset as a fraction of the radius.
    pub shadow_offset: f64,
    /// Background grid spacing in pixels; zero disables the grid.
    pub grid_spacing: f64,
    pub grid_color: PackedRgba,
    pub background: PackedRgba,
}

impl Default for BoingParams {
    fn default() -> Self {
        Self {
            radius: 60.0,
            gravity: 0.2,
            damping: 0.95,
            drift: 1.5,
            start_height: 0.2,
            spin_speed: 2.5,
            tilt: 17.0,
            segments_lon: 16,
            segments_lat: 8,
            resolution: 32,
            primary: PackedRgba::RED,
            secondary: PackedRgba::WHITE,
            shadow_offset: 0.35,
            grid_spacing: 32.0,
            grid_color: PackedRgba::rgb(160, 0, 160),
            background: PackedRgba::rgb(170, 170, 170),
        }
    }
}

impl BoingParams {
    /// Vertical-only bounce with no drift, grid or tilt.
    pub fn plain() -> Self {
        Self {
            drift: 0.0,
            tilt: 0.0,
            grid_spacing: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check::non_negative(NAME, "radius", self.radius)?;
        check::non_negative(NAME, "gravity", self.gravity)?;
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(FxError::invalid(NAME, "damping", "must be in (0, 1)"));
        }
        check::finite(NAME, "drift", self.drift)?;
        check::unit(NAME, "start_height", self.start_height)?;
        check::finite(NAME, "spin_speed", self.spin_speed)?;
        check::finite(NAME, "tilt", self.tilt)?;
        if self.segments_lon == 0 || self.segments_lat == 0 || self.resolution == 0 {
            return Err(FxError::EmptyGeometry { effect: NAME });
        }
        check::finite(NAME, "shadow_offset", self.shadow_offset)?;
        check::non_negative(NAME, "grid_spacing", self.grid_spacing)?;
        Ok(())
    }
}

/// The ball's physical state. `vy > 0` moves down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Spin in degrees, `[0, 360)`.
    pub angle: f64,
    pub radius: f64,
}

/// Which boundary a step collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Floor,
    Ceiling,
}

/// Integrate one frame of vertical motion.
///
/// Returns the boundary hit, if any. Velocity only flips at the clamp.
pub fn step_vertical(ball: &mut Ball, gravity: f64, damping: f64, height: f64) -> Option<Contact> {
    ball.vy += gravity;
    ball.y += ball.vy;
    let floor = height - ball.radius;
    if ball.y > floor {
        ball.y = floor;
        ball.vy = -ball.vy * damping;
        return Some(Contact::Floor);
    }
    if ball.y < ball.radius {
        ball.y = ball.radius;
        ball.vy = ball.vy.abs() * damping;
        return Some(Contact::Ceiling);
    }
    None
}

/// Move horizontally and reflect off the side walls without loss.
pub fn step_horizontal(ball: &mut Ball, width: f64) {
    if width <= 2.0 * ball.radius {
        ball.x = width / 2.0;
        return;
    }
    ball.x += ball.vx;
    let right = width - ball.radius;
    if ball.x > right {
        ball.x = right;
        ball.vx = -ball.vx.abs();
    } else if ball.x < ball.radius {
        ball.x = ball.radius;
        ball.vx = ball.vx.abs();
    }
}

/// Drop shadow derived from the ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    /// Vertical scale in `[MIN_SHADOW_SCALE, 1]`; 1 with the ball on the floor.
    pub scale: f64,
}

impl Shadow {
    /// Shadow on the floor line for `ball` in a viewport of `height`.
    pub fn of(ball: &Ball, height: f64, offset: f64) -> Self {
        let travel = height - 2.0 * ball.radius;
        let scale = if travel > 0.0 {
            let t = (ball.y - ball.radius) / travel;
            t + (1.0 - t) * MIN_SHADOW_SCALE
        } else {
            1.0
        };
        let scale = if scale.is_nan() {
            MIN_SHADOW_SCALE
        } else {
            scale.clamp(MIN_SHADOW_SCALE, 1.0)
        };
        Self {
            center: Point::new(
                ball.x + offset * ball.radius,
                height - ball.radius * 0.2,
            ),
            radius_x: ball.radius * (0.6 + 0.4 * scale),
            radius_y: ball.radius * 0.2 * scale,
            scale,
        }
    }
}

/// Checker parity `(⌊u⌋ + ⌊v⌋) mod 2`.
#[inline]
pub fn checker_parity(u: f64, v: f64) -> u8 {
    let s = u.floor() as i64 + v.floor() as i64;
    s.rem_euclid(2) as u8
}

/// Light direction for sphere shading (toward the viewer, up-left).
const LIGHT: Vec3 = Vec3::new(-0.42, -0.52, 0.74);

/// Bouncing checkered ball with shadow and optional grid backdrop.
#[derive(Debug, Clone)]
pub struct BoingFx {
    params: BoingParams,
    ball: Ball,
    viewport: Viewport,
    initialized: bool,
    bounces: u64,
}

impl BoingFx {
    pub fn new() -> Self {
        Self::from_valid(BoingParams::default())
    }

    pub fn try_new(params: BoingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_valid(params))
    }

    fn from_valid(params: BoingParams) -> Self {
        Self {
            ball: Ball {
                vx: params.drift,
                radius: params.radius,
                ..Ball::default()
            },
            params,
            viewport: Viewport::default(),
            initialized: false,
            bounces: 0,
        }
    }

    #[inline]
    pub fn params(&self) -> &BoingParams {
        &self.params
    }

    #[inline]
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Direct access for scripted scenarios.
    #[inline]
    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    /// Floor and ceiling contacts so far.
    #[inline]
    pub fn bounces(&self) -> u64 {
        self.bounces
    }

    #[inline]
    pub fn shadow(&self) -> Shadow {
        Shadow::of(&self.ball, self.viewport.h(), self.params.shadow_offset)
    }

    fn render_grid(&self, ctx: &FxContext, out: &mut DrawList) {
        let spacing = self.params.grid_spacing;
        if !(spacing >= 1.0) {
            return;
        }
        let (w, h) = (ctx.width(), ctx.height());
        let color = self.params.grid_color;
        let mut x = 0.0;
        while x <= w {
            out.line(Point::new(x, 0.0), Point::new(x, h), color, 1.0);
            x += spacing;
        }
        let mut y = 0.0;
        while y <= h {
            out.line(Point::new(0.0, y), Point::new(w, y), color, 1.0);
            y += spacing;
        }
    }

    fn render_ball(&self, out: &mut DrawList) {
        let p = &self.params;
        let b = &self.ball;
        let r = b.radius;
        if !(r > 0.0) {
            return;
        }
        let n = p.resolution;
        let cell = 2.0 * r / n as f64;
        let (tilt_s, tilt_c) = p.tilt.to_radians().sin_cos();
        let spin = b.angle.to_radians();
        let lon_scale = p.segments_lon as f64 / TAU;
        let lat_scale = p.segments_lat as f64 / PI;
        let light_len = LIGHT.length();

        for row in 0..n {
            let sy = -r + (row as f64 + 0.5) * cell;
            for col in 0..n {
                let sx = -r + (col as f64 + 0.5) * cell;
                let nx = sx / r;
                let ny = sy / r;
                let d2 = nx * nx + ny * ny;
                if d2 > 1.0 {
                    continue;
                }
                let nz = (1.0 - d2).sqrt();
                // Undo the axis tilt to find surface coordinates.
                let tx = nx * tilt_c + ny * tilt_s;
                let ty = -nx * tilt_s + ny * tilt_c;
                let lat = ty.clamp(-1.0, 1.0).asin();
                let lon = tx.atan2(nz);
                let u = (lon + spin) * lon_scale;
                let v = (lat + FRAC_PI_2) * lat_scale;
                let base = if checker_parity(u, v) == 0 {
                    p.primary
                } else {
                    p.secondary
                };
                let lambert = Vec3::new(nx, ny, nz).dot(LIGHT) / light_len;
                let shade = 0.35 + 0.65 * lambert.max(0.0);
                out.fill_rect(
                    Rect::new(b.x + sx - cell / 2.0, b.y + sy - cell / 2.0, cell, cell),
                    base.dimmed(shade),
                );
            }
        }
    }
}

impl Default for BoingFx {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for BoingFx {
    fn name(&self) -> &'static str {
        NAME
    }

    fn resize(&mut self, viewport: Viewport) {
        let (w, h) = (viewport.w(), viewport.h());
        let r = self.params.radius.min(h / 2.0).min(w / 2.0).max(0.0);
        self.ball.radius = r;
        if !self.initialized {
            self.ball.x = w / 2.0;
            self.ball.y = h * self.params.start_height;
            self.ball.vy = 0.0;
            self.initialized = true;
        }
        let floor = (h - r).max(r);
        self.ball.y = self.ball.y.clamp(r, floor);
        let right = (w - r).max(r);
        self.ball.x = self.ball.x.clamp(r, right);
        debug!(
            effect = NAME,
            width = viewport.width,
            height = viewport.height,
            radius = r,
            "resize"
        );
        self.viewport = viewport;
    }

    fn update(&mut self, ctx: &FxContext) {
        if ctx.viewport != self.viewport || !self.initialized {
            self.resize(ctx.viewport);
        }
        let p = &self.params;
        step_horizontal(&mut self.ball, ctx.width());
        if let Some(contact) = step_vertical(&mut self.ball, p.gravity, p.damping, ctx.height())
        {
            self.bounces += 1;
            trace!(effect = NAME, ?contact, vy = self.ball.vy, "bounce");
        }
        let direction = if self.ball.vx < 0.0 { -1.0 } else { 1.0 };
        self.ball.angle = wrap_degrees(self.ball.angle + p.spin_speed * direction);
    }

    fn render(&self, ctx: &FxContext, out: &mut DrawList) {
        if ctx.is_empty() {
            return;
        }
        self.render_grid(ctx, out);

        let shadow = self.shadow();
        out.ellipse(
            shadow.center,
            shadow.radius_x,
            shadow.radius_y,
            PackedRgba::rgba(0, 0, 0, (90.0 * shadow.scale) as u8),
        );

        self.render_ball(out);
    }

    fn background(&self) -> PackedRgba {
        self.params.background
    }
}
