#![forbid(unsafe_code)]

//! Demo effect cores public facade.
//!
//! Re-exports the common types from the internal crates and offers a
//! lightweight prelude. A typical host builds an effect, wraps it in an
//! [`FxRunner`] and calls [`FxRunner::frame_tick`] once per display
//! refresh with its own [`Surface`]:
//!
//! ```
//! use dfx::prelude::*;
//!
//! let vp = Viewport::new(320, 200);
//! let mut runner = FxRunner::new(CopperFx::new(), vp);
//! let mut surface = PixelSurface::new(vp);
//! runner.frame_tick(&mut surface);
//! assert_ne!(surface.count_not(PackedRgba::BLACK), 0);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use dfx_core::clock::{FrameClock, FrameTick, ManualTimeSource, SystemTimeSource, TimeSource};
pub use dfx_core::geometry::{Point, Rect, Viewport};
pub use dfx_core::rng::{Lcg64, RandomSource, ReplaySource};

// --- Render re-exports -----------------------------------------------------

pub use dfx_render::{
    DrawCmd, DrawList, Fill, LinearGradient, PackedRgba, PixelSurface, RecordingSurface, Surface,
};

// --- Effect re-exports -----------------------------------------------------

pub use dfx_fx::effects::{
    BoingFx, BoingParams, CopperFx, CopperParams, CubeFx, CubeParams, ScrollerFx,
    ScrollerParams, StarfieldFx, StarfieldParams, TunnelFx, TunnelParams,
};
pub use dfx_fx::{Effect, FrameStats, FxContext, FxError, FxRunner};

// --- Errors ---------------------------------------------------------------

/// Top-level error type.
#[derive(Debug)]
pub enum Error {
    /// An effect rejected its parameters.
    Fx(FxError),
    /// The JSON log subscriber could not be installed.
    #[cfg(feature = "tracing-json")]
    Logging(dfx_core::logging::SubscriberInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fx(err) => write!(f, "{err}"),
            #[cfg(feature = "tracing-json")]
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fx(err) => Some(err),
            #[cfg(feature = "tracing-json")]
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<FxError> for Error {
    fn from(err: FxError) -> Self {
        Self::Fx(err)
    }
}

#[cfg(feature = "tracing-json")]
impl From<dfx_core::logging::SubscriberInitError> for Error {
    fn from(err: dfx_core::logging::SubscriberInitError) -> Self {
        Self::Logging(err)
    }
}

/// Standard result type for dfx APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Install the JSON log subscriber (`RUST_LOG` filtered).
#[cfg(feature = "tracing-json")]
pub fn init_logging() -> Result<()> {
    dfx_core::logging::init_json_subscriber()?;
    Ok(())
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BoingFx, CopperFx, CubeFx, DrawList, Effect, Error, FrameTick, FxContext, FxRunner,
        PackedRgba, PixelSurface, Result, ScrollerFx, StarfieldFx, Surface, TunnelFx, Viewport,
    };

    pub use crate::{core, fx, render};
}

pub use dfx_core as core;
pub use dfx_fx as fx;
pub use dfx_render as render;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fx_errors_convert() {
        let err: Error = TunnelFx::try_new(TunnelParams {
            rings: 0,
            ..TunnelParams::default()
        })
        .map_err(Error::from)
        .unwrap_err();
        assert_eq!(err.to_string(), "tunnel: nothing to draw");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn question_mark_lifts_fx_errors() {
        fn build() -> Result<CubeFx> {
            Ok(CubeFx::try_new(CubeParams {
                focal: 0.0,
                ..CubeParams::default()
            })?)
        }
        assert!(matches!(build(), Err(Error::Fx(FxError::InvalidParam { name: "focal", .. }))));
    }
}
