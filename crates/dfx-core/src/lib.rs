#![forbid(unsafe_code)]

//! Core: frame clock, viewport geometry, randomness, and wrap helpers.

pub mod clock;
pub mod geometry;
pub mod logging;
pub mod rng;
pub mod wrap;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
