#![forbid(unsafe_code)]

//! Demo effect cores.
//!
//! Six classic effects behind one [`Effect`] contract:
//!
//! - [`effects::cube`]: nested rotating wireframe cubes
//! - [`effects::boing`]: bouncing checkered ball
//! - [`effects::copper`]: sine-swinging gradient bars
//! - [`effects::tunnel`]: perspective dot tunnel
//! - [`effects::scroller`]: sine-wave text scroller
//! - [`effects::starfield`]: parallax starfield
//!
//! Effects are deterministic for the same inputs (the starfield given the
//! same random source), never allocate while rendering in steady state, and
//! tolerate zero-sized viewports.

pub mod effect;
pub mod effects;
pub mod error;
pub mod math3d;
pub mod runner;

pub use effect::{Effect, FxContext};
pub use error::{FxError, Result};
pub use runner::{FrameStats, FxRunner};
