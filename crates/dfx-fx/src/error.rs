#![forbid(unsafe_code)]

//! Construction-time errors.
//!
//! Frames themselves never fail: degenerate values are skipped while
//! rendering. Errors only surface when an effect is built from parameters
//! that cannot produce a sensible animation.

use std::fmt;

/// Invalid effect configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum FxError {
    /// A parameter is out of its valid range.
    InvalidParam {
        effect: &'static str,
        name: &'static str,
        reason: &'static str,
    },
    /// The parameters describe nothing to draw (zero bars, empty rings, ...).
    EmptyGeometry { effect: &'static str },
}

impl FxError {
    #[inline]
    pub(crate) const fn invalid(
        effect: &'static str,
        name: &'static str,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParam {
            effect,
            name,
            reason,
        }
    }

    /// Name of the effect that rejected its parameters.
    pub const fn effect(&self) -> &'static str {
        match self {
            Self::InvalidParam { effect, .. } | Self::EmptyGeometry { effect } => *effect,
        }
    }
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParam {
                effect,
                name,
                reason,
            } => write!(f, "{effect}: invalid `{name}`: {reason}"),
            Self::EmptyGeometry { effect } => write!(f, "{effect}: nothing to draw"),
        }
    }
}

impl std::error::Error for FxError {}

/// Result type for effect construction.
pub type Result<T> = std::result::Result<T, FxError>;

/// Check helpers shared by the `validate` methods.
pub(crate) mod check {
    use super::FxError;

    pub(crate) fn finite(
        effect: &'static str,
        name: &'static str,
        v: f64,
    ) -> Result<(), FxError> {
        if v.is_finite() {
            Ok(())
        } else {
            Err(FxError::invalid(effect, name, "must be finite"))
        }
    }

    pub(crate) fn non_negative(
        effect: &'static str,
        name: &'static str,
        v: f64,
    ) -> Result<(), FxError> {
        if v.is_finite() && v >= 0.0 {
            Ok(())
        } else {
            Err(FxError::invalid(effect, name, "must be finite and >= 0"))
        }
    }

    pub(crate) fn positive(effect: &'static str, name: &'static str, v: f64) -> Result<(), FxError> {
        if v.is_finite() && v > 0.0 {
            Ok(())
        } else {
            Err(FxError::invalid(effect, name, "must be finite and > 0"))
        }
    }

    pub(crate) fn unit(effect: &'static str, name: &'static str, v: f64) -> Result<(), FxError> {
        if (0.0..=1.0).contains(&v) {
            Ok(())
        } else {
            Err(FxError::invalid(effect, name, "must be in [0, 1]"))
        }
    }
}
