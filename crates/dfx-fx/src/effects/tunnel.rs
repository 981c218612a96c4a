#![forbid(unsafe_code)]

//! Dot tunnel.
//!
//! Rings of dots rush toward the viewer. Each ring has a normalized depth
//! `z` in `(0, 1]` that shrinks every frame; a ring crossing the near plane
//! re-enters at the far end, so the tunnel never runs out.
//!
//! Rings are drawn far to near so closer dots land on top.

use std::f64::consts::TAU;

use dfx_core::geometry::{Point, Viewport};
use dfx_core::wrap::{wrap_depth, wrap_radians};
use dfx_core::{debug, trace};
use dfx_render::color::PackedRgba;
use dfx_render::draw::DrawList;

use crate::effect::{Effect, FxContext};
use crate::error::{FxError, Result, check};

const NAME: &str = "tunnel";

/// Parameters controlling the dot tunnel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TunnelParams {
    pub rings: usize,
    pub points_per_ring: usize,
    /// Depth removed from every ring per frame.
    pub speed: f64,
    /// Radians added to every ring's angle per frame.
    pub rotation_speed: f64,
    /// Radius terms, as fractions of the viewport's shorter side.
    pub min_radius: f64,
    pub max_radius: f64,
    /// Shifts the perspective divisor `z + 1 + move_offset`. Must be > -1.
    pub move_offset: f64,
    /// Relative wobble amplitude.
    pub wobble: f64,
    /// Wobble phase speed, radians per second.
    pub wobble_speed: f64,
    /// Wobble phase change across the full depth range.
    pub wobble_depth: f64,
    /// Wobble lobes around a ring.
    pub wobble_lobes: f64,
    /// Dot size of the nearest ring in pixels; never below 1.
    pub max_point_size: f64,
    /// Center sway as a fraction of the viewport.
    pub sway: f64,
    /// Sway phase speed, radians per second.
    pub sway_speed: f64,
    /// Sway phase change across the full depth range.
    pub sway_depth: f64,
    pub hue: f64,
    /// Hue shift from near to far, degrees.
    pub hue_depth: f64,
    pub saturation: f64,
}

impl Default for TunnelParams {
    fn default() -> Self {
        Self {
            rings: 24,
            points_per_ring: 32,
            speed: 0.006,
            rotation_speed: 0.01,
            min_radius: 0.01,
            max_radius: 0.12,
            move_offset: -0.85,
            wobble: 0.08,
            wobble_speed: 2.0,
            wobble_depth: 6.0,
            wobble_lobes: 3.0,
            max_point_size: 4.0,
            sway: 0.08,
            sway_speed: 0.7,
            sway_depth: 2.0,
            hue: 200.0,
            hue_depth: 90.0,
            saturation: 0.8,
        }
    }
}

impl TunnelParams {
    /// Straight, rigid tunnel: no wobble, no sway.
    pub fn rigid() -> Self {
        Self {
            wobble: 0.0,
            sway: 0.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rings == 0 || self.points_per_ring == 0 {
            return Err(FxError::EmptyGeometry { effect: NAME });
        }
        check::non_negative(NAME, "speed", self.speed)?;
        check::finite(NAME, "rotation_speed", self.rotation_speed)?;
        check::non_negative(NAME, "min_radius", self.min_radius)?;
        check::non_negative(NAME, "max_radius", self.max_radius)?;
        if self.max_radius < self.min_radius {
            return Err(FxError::invalid(NAME, "max_radius", "must be >= min_radius"));
        }
        if !(self.move_offset > -1.0) || !self.move_offset.is_finite() {
            return Err(FxError::invalid(NAME, "move_offset", "must be finite and > -1"));
        }
        check::non_negative(NAME, "wobble", self.wobble)?;
        check::finite(NAME, "wobble_speed", self.wobble_speed)?;
        check::finite(NAME, "wobble_depth", self.wobble_depth)?;
        check::finite(NAME, "wobble_lobes", self.wobble_lobes)?;
        check::non_negative(NAME, "max_point_size", self.max_point_size)?;
        check::non_negative(NAME, "sway", self.sway)?;
        check::finite(NAME, "sway_speed", self.sway_speed)?;
        check::finite(NAME, "sway_depth", self.sway_depth)?;
        check::finite(NAME, "hue", self.hue)?;
        check::finite(NAME, "hue_depth", self.hue_depth)?;
        check::unit(NAME, "saturation", self.saturation)?;
        Ok(())
    }
}

/// One ring of the tunnel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    /// Normalized depth in `(0, 1]`; small is near.
    pub z: f64,
    /// Rotation in radians, `[0, 2π)`.
    pub angle: f64,
}

/// A dot produced while rendering. Not stored between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TunnelPoint {
    pub at: Point,
    pub size: f64,
    pub intensity: f64,
}

/// Move a depth toward the viewer by `speed`, wrapping past the near plane.
#[inline]
pub fn advance_depth(z: f64, speed: f64) -> f64 {
    wrap_depth(z - speed)
}

/// Perspective radius of a ring at depth `z`.
///
/// `min_r + (max_r - min_r) / (z + 1 + move_offset)`
#[inline]
pub fn ring_radius(z: f64, min_r: f64, max_r: f64, move_offset: f64) -> f64 {
    min_r + (max_r - min_r) / (z + 1.0 + move_offset)
}

/// Dot size and intensity at depth `z`. Both fall as `z` grows.
#[inline]
pub fn point_style(z: f64, max_size: f64) -> (f64, f64) {
    let intensity = (1.0 - z).clamp(0.0, 1.0);
    ((max_size * intensity).max(1.0), intensity)
}

/// Rings of dots flying toward the viewer.
#[derive(Debug, Clone)]
pub struct TunnelFx {
    params: TunnelParams,
    rings: Vec<Ring>,
    /// Ring indices sorted far to near, refreshed on update.
    order: Vec<usize>,
    viewport: Viewport,
}

impl TunnelFx {
    pub fn new() -> Self {
        Self::from_valid(TunnelParams::default())
    }

    pub fn try_new(params: TunnelParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_valid(params))
    }

    fn from_valid(params: TunnelParams) -> Self {
        let n = params.rings;
        let rings: Vec<Ring> = (0..n)
            .map(|i| Ring {
                z: (i + 1) as f64 / n as f64,
                angle: 0.0,
            })
            .collect();
        let mut fx = Self {
            params,
            order: (0..rings.len()).collect(),
            rings,
            viewport: Viewport::default(),
        };
        fx.sort_far_to_near();
        fx
    }

    #[inline]
    pub fn params(&self) -> &TunnelParams {
        &self.params
    }

    #[inline]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    #[inline]
    pub fn rings_mut(&mut self) -> &mut [Ring] {
        &mut self.rings
    }

    fn sort_far_to_near(&mut self) {
        let rings = &self.rings;
        self.order
            .sort_by(|&a, &b| rings[b].z.total_cmp(&rings[a].z));
    }

    /// Screen center for a ring at depth `z` and time `t`.
    fn center(&self, z: f64, t: f64, viewport: Viewport) -> Point {
        let p = &self.params;
        let c = viewport.center();
        let phase = t * p.sway_speed + z * p.sway_depth;
        Point::new(
            c.x + phase.sin() * p.sway * viewport.w(),
            c.y + (phase * 0.8).cos() * p.sway * viewport.h(),
        )
    }

    /// Dots of one ring, calling `emit` for each.
    pub fn ring_points(
        &self,
        ring: &Ring,
        t: f64,
        viewport: Viewport,
        mut emit: impl FnMut(TunnelPoint),
    ) {
        let p = &self.params;
        let side = viewport.min_side();
        let radius = ring_radius(
            ring.z,
            p.min_radius * side,
            p.max_radius * side,
            p.move_offset,
        );
        let (size, intensity) = point_style(ring.z, p.max_point_size);
        let center = self.center(ring.z, t, viewport);
        let step = TAU / p.points_per_ring as f64;
        for k in 0..p.points_per_ring {
            let a = ring.angle + k as f64 * step;
            let phase = t * p.wobble_speed + ring.z * p.wobble_depth + a * p.wobble_lobes;
            let wobble = 1.0 + p.wobble * phase.sin();
            let r = radius * wobble;
            emit(TunnelPoint {
                at: Point::new(center.x + a.cos() * r, center.y + a.sin() * r),
                size,
                intensity,
            });
        }
    }
}

impl Default for TunnelFx {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for TunnelFx {
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
        let p = &self.params;
        for ring in &mut self.rings {
            let before = ring.z;
            ring.z = advance_depth(ring.z, p.speed);
            if ring.z > before {
                trace!(effect = NAME, z = ring.z, "ring wrapped");
            }
            ring.angle = wrap_radians(ring.angle + p.rotation_speed);
        }
        self.sort_far_to_near();
    }

    fn render(&self, ctx: &FxContext, out: &mut DrawList) {
        if ctx.is_empty() {
            return;
        }
        let p = &self.params;
        for ring in self.order.iter().filter_map(|&i| self.rings.get(i)) {
            let hue = p.hue + ring.z * p.hue_depth;
            self.ring_points(ring, ctx.time_seconds, ctx.viewport, |pt| {
                let color = PackedRgba::hsl(hue, p.saturation, 0.08 + 0.62 * pt.intensity);
                out.point(pt.at, pt.size, color);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(w: u32, h: u32, frame: u64) -> FxContext {
        FxContext::at_frame(Viewport::new(w, h), frame, 60.0)
    }

    #[test]
    fn depth_wrap_scenario() {
        let z = advance_depth(0.05, 0.1);
        assert!((z - 0.95).abs() < 1e-12, "{z}");
    }

    #[test]
    fn rings_start_evenly_spaced() {
        let fx = TunnelFx::try_new(TunnelParams {
            rings: 4,
            ..TunnelParams::default()
        })
        .unwrap();
        let zs: Vec<f64> = fx.rings().iter().map(|r| r.z).collect();
        assert_eq!(zs, vec![0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn nearer_rings_are_larger() {
        let near = ring_radius(0.1, 5.0, 50.0, 0.0);
        let far = ring_radius(0.9, 5.0, 50.0, 0.0);
        assert!(near > far);
        assert_eq!(ring_radius(0.0, 5.0, 50.0, 0.0), 50.0);
    }

    #[test]
    fn style_falls_with_depth_and_floors_size() {
        let (s_near, i_near) = point_style(0.1, 4.0);
        let (s_far, i_far) = point_style(0.9, 4.0);
        assert!(s_near > s_far);
        assert!(i_near > i_far);
        assert_eq!(point_style(1.0, 4.0).0, 1.0);
        assert_eq!(point_style(0.5, 0.0).0, 1.0);
    }

    #[test]
    fn depths_and_angles_stay_bounded() {
        let mut fx = TunnelFx::try_new(TunnelParams {
            speed: 0.37,
            rotation_speed: 2.9,
            ..TunnelParams::default()
        })
        .unwrap();
        for f in 0..1_000 {
            fx.update(&ctx(200, 150, f));
            for r in fx.rings() {
                assert!(r.z > 0.0 && r.z <= 1.0);
                assert!((0.0..TAU).contains(&r.angle));
            }
        }
    }

    #[test]
    fn render_is_far_to_near() {
        let mut fx = TunnelFx::try_new(TunnelParams::rigid()).unwrap();
        let c = ctx(200, 200, 1);
        fx.update(&c);
        let mut out = DrawList::new();
        fx.render(&c, &mut out);
        let p = fx.params();
        assert_eq!(out.len(), p.rings * p.points_per_ring);
        // Point sizes never shrink along the command stream.
        let sizes: Vec<f64> = out
            .iter()
            .filter_map(|cmd| match cmd {
                dfx_render::draw::DrawCmd::Point { size, .. } => Some(*size),
                _ => None,
            })
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn rigid_ring_is_a_circle() {
        let fx = TunnelFx::try_new(TunnelParams::rigid()).unwrap();
        let vp = Viewport::new(100, 100);
        let ring = Ring { z: 0.5, angle: 0.3 };
        let expected = ring_radius(0.5, 1.0, 12.0, -0.85);
        let mut n = 0;
        fx.ring_points(&ring, 1.0, vp, |pt| {
            let d = ((pt.at.x - 50.0).powi(2) + (pt.at.y - 50.0).powi(2)).sqrt();
            assert!((d - expected).abs() < 1e-9);
            n += 1;
        });
        assert_eq!(n, 32);
    }

    #[test]
    fn wobble_perturbs_radius() {
        let fx = TunnelFx::try_new(TunnelParams {
            sway: 0.0,
            ..TunnelParams::default()
        })
        .unwrap();
        let vp = Viewport::new(100, 100);
        let ring = Ring { z: 0.5, angle: 0.0 };
        let mut radii = Vec::new();
        fx.ring_points(&ring, 0.0, vp, |pt| {
            radii.push((pt.at.x - 50.0).hypot(pt.at.y - 50.0));
        });
        let min = radii.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = radii.iter().cloned().fold(0.0, f64::max);
        assert!(max - min > 1e-6);
    }

    #[test]
    fn rejects_bad_offset() {
        assert!(TunnelFx::try_new(TunnelParams {
            move_offset: -1.0,
            ..TunnelParams::default()
        })
        .is_err());
        assert!(TunnelFx::try_new(TunnelParams {
            points_per_ring: 0,
            ..TunnelParams::default()
        })
        .is_err());
    }

    #[test]
    fn tiny_viewports_do_not_panic() {
        let mut fx = TunnelFx::new();
        for (w, h) in [(0, 0), (1, 1), (1, 300)] {
            let c = ctx(w, h, 2);
            fx.update(&c);
            let mut out = DrawList::new();
            fx.render(&c, &mut out);
        }
    }
}
