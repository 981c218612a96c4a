#![forbid(unsafe_code)]

//! Small 3D helpers: axis rotations and perspective projection.

use dfx_core::geometry::Point;
use dfx_core::wrap::wrap_radians;

/// A point or direction in object space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Rotate about the X axis (the `y`/`z` plane).
    #[inline]
    pub fn rotate_x(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }

    /// Rotate about the Y axis (the `z`/`x` plane).
    #[inline]
    pub fn rotate_y(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(self.z * s + self.x * c, self.y, self.z * c - self.x * s)
    }

    /// Rotate about the Z axis (the `x`/`y` plane).
    #[inline]
    pub fn rotate_z(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c, self.z)
    }

    /// Component-wise comparison within `eps`.
    #[inline]
    pub fn approx_eq(self, other: Self, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Three Euler angles in radians, each kept in `[0, 2π)`.
///
/// Applied Z first, then Y, then X. The order is part of the visual
/// result; rotations do not commute.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Angles are wrapped on construction.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: wrap_radians(x),
            y: wrap_radians(y),
            z: wrap_radians(z),
        }
    }

    /// Advance each angle by `speed * dt` and wrap.
    #[inline]
    pub fn advance(&mut self, speed: Vec3, dt: f64) {
        self.x = wrap_radians(self.x + speed.x * dt);
        self.y = wrap_radians(self.y + speed.y * dt);
        self.z = wrap_radians(self.z + speed.z * dt);
    }

    /// Same rotation with `phase` added to all three angles.
    #[inline]
    pub fn with_phase(self, phase: f64) -> Self {
        Self::new(self.x + phase, self.y + phase, self.z + phase)
    }

    #[inline]
    pub fn apply(&self, v: Vec3) -> Vec3 {
        v.rotate_z(self.z).rotate_y(self.y).rotate_x(self.x)
    }

    pub fn is_wrapped(&self) -> bool {
        let tau = std::f64::consts::TAU;
        [self.x, self.y, self.z]
            .iter()
            .all(|a| (0.0..tau).contains(a))
    }
}

/// Perspective-project `v` onto the screen.
///
/// `scale = focal / (focal + z)`; the result is
/// `v.xy * scale * global_scale + center`. Points at or behind the eye
/// (`focal + z <= 0`) and non-finite results yield `None`.
#[inline]
pub fn project(v: Vec3, focal: f64, global_scale: f64, center: Point) -> Option<Point> {
    let depth = focal + v.z;
    if !(depth > 0.0) {
        return None;
    }
    let s = focal / depth * global_scale;
    let p = Point::new(v.x * s + center.x, v.y * s + center.y);
    p.is_finite().then_some(p)
}
