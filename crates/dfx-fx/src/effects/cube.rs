#![forbid(unsafe_code)]

//! Rotating wireframe cubes.
//!
//! Any number of nested cubes spin about all three axes. Each cube owns its
//! rotation, size multiplier and phase, so nested cubes never share angle
//! state. Vertices are rotated Z, then Y, then X, perspective-projected and
//! joined by the twelve cube edges.

use dfx_core::geometry::{Point, Viewport};
use dfx_core::{debug, trace};
use dfx_render::color::PackedRgba;
use dfx_render::draw::DrawList;

use crate::effect::{Effect, FxContext};
use crate::error::{FxError, Result, check};
use crate::math3d::{Rotation, Vec3, project};

const NAME: &str = "cube";

/// Corners of the unit cube, front face (`z = -1`) first.
pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
];

/// Front ring, back ring, then the four connectors.
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Half-diagonal of the unit cube: the largest `|z|` a rotated corner reaches.
const HALF_DIAGONAL: f64 = 1.732_050_807_568_877_2;

/// Parameters controlling the cube effect.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubeParams {
    /// Number of nested cubes.
    pub count: usize,
    /// Size of cube `i` is `size_step^i`.
    pub size_step: f64,
    /// Phase of cube `i` is `i * phase_step` radians.
    pub phase_step: f64,
    /// Angular speed per axis, radians per second.
    pub speed: Vec3,
    /// Perspective distance in object units.
    pub focal: f64,
    /// Screen size of one object unit, as a fraction of the viewport's
    /// shorter side.
    pub scale: f64,
    pub line_width: f64,
    /// Hue of the outer cube in degrees; inner cubes step by `hue_step`.
    pub hue: f64,
    pub hue_step: f64,
    pub saturation: f64,
    pub lightness: f64,
    /// Dim edges by depth (nearer is brighter).
    pub depth_shading: bool,
}

impl Default for CubeParams {
    fn default() -> Self {
        Self {
            count: 3,
            size_step: 0.62,
            phase_step: 0.45,
            speed: Vec3::new(0.7, 1.1, 0.4),
            focal: 4.0,
            scale: 0.22,
            line_width: 1.5,
            hue: 190.0,
            hue_step: 55.0,
            saturation: 0.9,
            lightness: 0.6,
            depth_shading: true,
        }
    }
}

impl CubeParams {
    /// Single cube, no shading.
    pub fn single() -> Self {
        Self {
            count: 1,
            depth_shading: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(FxError::EmptyGeometry { effect: NAME });
        }
        if !(self.size_step > 0.0 && self.size_step <= 1.0) {
            return Err(FxError::invalid(NAME, "size_step", "must be in (0, 1]"));
        }
        check::finite(NAME, "phase_step", self.phase_step)?;
        if !self.speed.is_finite() {
            return Err(FxError::invalid(NAME, "speed", "must be finite"));
        }
        check::positive(NAME, "focal", self.focal)?;
        check::positive(NAME, "scale", self.scale)?;
        check::positive(NAME, "line_width", self.line_width)?;
        check::finite(NAME, "hue", self.hue)?;
        check::finite(NAME, "hue_step", self.hue_step)?;
        check::unit(NAME, "saturation", self.saturation)?;
        check::unit(NAME, "lightness", self.lightness)?;
        Ok(())
    }
}

/// One wireframe cube.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    /// Size multiplier applied to the unit vertices.
    pub size: f64,
    /// Constant offset added to all three angles.
    pub phase: f64,
    pub color: PackedRgba,
    pub rotation: Rotation,
}

impl Cube {
    pub fn new(size: f64, phase: f64, color: PackedRgba) -> Self {
        Self {
            size,
            phase,
            color,
            rotation: Rotation::IDENTITY,
        }
    }

    /// Effective rotation: accumulated angles plus phase.
    #[inline]
    pub fn orientation(&self) -> Rotation {
        self.rotation.with_phase(self.phase)
    }

    /// Rotated object-space corners.
    pub fn rotated_vertices(&self) -> [Vec3; 8] {
        let r = self.orientation();
        CUBE_VERTICES.map(|v| r.apply(v.scale(self.size)))
    }
}

/// Project a cube's corners. `None` marks a corner at or behind the eye.
pub fn project_cube(
    cube: &Cube,
    focal: f64,
    global_scale: f64,
    center: Point,
) -> ([Option<Point>; 8], [f64; 8]) {
    let rotated = cube.rotated_vertices();
    let depths = rotated.map(|v| v.z);
    let points = rotated.map(|v| project(v, focal, global_scale, center));
    (points, depths)
}

/// Brightness factor in `[0.3, 1]` for an edge at depth `z`.
///
/// `extent` is the largest depth the cube can reach; `-extent` maps to 1.
#[inline]
pub fn depth_shade(z: f64, extent: f64) -> f64 {
    if !(extent > 0.0) || !z.is_finite() {
        return 1.0;
    }
    let t = (z / extent).clamp(-1.0, 1.0);
    1.0 - 0.35 * (t + 1.0)
}

/// Nested rotating wireframe cubes.
#[derive(Debug, Clone)]
pub struct CubeFx {
    params: CubeParams,
    cubes: Vec<Cube>,
    viewport: Viewport,
    center: Point,
    scale: f64,
}

impl CubeFx {
    pub fn new() -> Self {
        Self::from_valid(CubeParams::default())
    }

    pub fn try_new(params: CubeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::from_valid(params))
    }

    fn from_valid(params: CubeParams) -> Self {
        let cubes = (0..params.count)
            .map(|i| {
                let color = PackedRgba::hsl(
                    params.hue + params.hue_step * i as f64,
                    params.saturation,
                    params.lightness,
                );
                Cube::new(
                    params.size_step.powi(i as i32),
                    params.phase_step * i as f64,
                    color,
                )
            })
            .collect();
        Self {
            params,
            cubes,
            viewport: Viewport::default(),
            center: Point::default(),
            scale: 0.0,
        }
    }

    #[inline]
    pub fn params(&self) -> &CubeParams {
        &self.params
    }

    #[inline]
    pub fn cubes(&self) -> &[Cube] {
        &self.cubes
    }

    #[inline]
    pub fn cubes_mut(&mut self) -> &mut [Cube] {
        &mut self.cubes
    }

    /// Screen center of the projection.
    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// Pixels per object unit.
    #[inline]
    pub fn global_scale(&self) -> f64 {
        self.scale
    }
}

impl Default for CubeFx {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for CubeFx {
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
        self.center = viewport.center();
        self.scale = viewport.min_side() * self.params.scale;
    }

    fn update(&mut self, ctx: &FxContext) {
        if ctx.viewport != self.viewport {
            self.resize(ctx.viewport);
        }
        let dt = if ctx.dt_seconds.is_finite() {
            ctx.dt_seconds.max(0.0)
        } else {
            0.0
        };
        for cube in &mut self.cubes {
            cube.rotation.advance(self.params.speed, dt);
        }
    }

    fn render(&self, ctx: &FxContext, out: &mut DrawList) {
        if ctx.is_empty() {
            return;
        }
        let p = &self.params;
        for cube in &self.cubes {
            let (points, depths) = project_cube(cube, p.focal, self.scale, self.center);
            let culled = points.iter().filter(|pt| pt.is_none()).count();
            if culled > 0 {
                trace!(effect = NAME, culled, "vertices behind eye");
            }
            let extent = cube.size * HALF_DIAGONAL;
            for &(a, b) in &CUBE_EDGES {
                let (Some(from), Some(to)) = (points[a], points[b]) else {
                    continue;
                };
                let color = if p.depth_shading {
                    cube.color
                        .dimmed(depth_shade((depths[a] + depths[b]) * 0.5, extent))
                } else {
                    cube.color
                };
                out.line(from, to, color, p.line_width);
            }
        }
    }
}
