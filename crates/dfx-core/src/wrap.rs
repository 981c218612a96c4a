#![forbid(unsafe_code)]

//! Bounded-range helpers for accumulated angles, hues, and depths.
//!
//! Every stored angle or phase is wrapped on each update so it never grows
//! without bound. Non-finite input collapses to the start of the range.

use std::f64::consts::TAU;

/// Wrap into `[0, period)`.
///
/// `rem_euclid` can round up to exactly `period` for tiny negative input;
/// that case folds back to zero.
#[inline]
pub fn wrap_period(value: f64, period: f64) -> f64 {
    if !value.is_finite() || !(period > 0.0) {
        return 0.0;
    }
    let w = value.rem_euclid(period);
    if w >= period { 0.0 } else { w }
}

/// Wrap radians into `[0, 2π)`.
#[inline]
pub fn wrap_radians(angle: f64) -> f64 {
    wrap_period(angle, TAU)
}

/// Wrap degrees into `[0, 360)`.
#[inline]
pub fn wrap_degrees(angle: f64) -> f64 {
    wrap_period(angle, 360.0)
}

/// Fold a normalized depth back into `(0, 1]`.
///
/// Values at or below the near plane re-enter at the far end by adding
/// whole units; values already in range pass through unchanged.
#[inline]
pub fn wrap_depth(z: f64) -> f64 {
    if !z.is_finite() {
        return 1.0;
    }
    if z > 0.0 {
        return z;
    }
    let wrapped = z + (-z).floor() + 1.0;
    // Rounding on large magnitudes can land exactly on zero or above one.
    if wrapped > 0.0 && wrapped <= 1.0 {
        wrapped
    } else {
        1.0
    }
}
