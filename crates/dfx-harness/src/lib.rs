#![forbid(unsafe_code)]

//! Deterministic regression harness for the demo effects.
//!
//! Runs effects through scripted frame sequences (fixed sizes and resize
//! transitions) at a fixed frame rate, rasterises every frame with
//! [`PixelSurface`](dfx_render::pixel::PixelSurface) and compares per-frame
//! checksums against checked-in golden files.
//!
//! # Updating Golden Files
//!
//! ```sh
//! BLESS=1 cargo test -p dfx-harness
//! ```
//!
//! Golden files are stored under `tests/golden/` relative to the crate's
//! `CARGO_MANIFEST_DIR`.

pub mod golden;

use dfx_core::rng::Lcg64;
use dfx_fx::Effect;
use dfx_fx::effects::{
    BoingFx, CopperFx, CubeFx, ScrollerFx, StarfieldFx, StarfieldParams, TunnelFx,
};

pub use golden::{
    FrameScript, GoldenLogger, GoldenOutcome, ScriptRun, ScriptStep, run_script,
    standard_scripts,
};

/// Every effect with default parameters, the starfield seeded with `seed`.
pub fn default_effects(seed: u64) -> Vec<Box<dyn Effect>> {
    let stars = StarfieldFx::with_rng(StarfieldParams::default(), Lcg64::new(seed))
        .map(|fx| Box::new(fx) as Box<dyn Effect>)
        .unwrap_or_else(|_| Box::new(StarfieldFx::new()));
    vec![
        Box::new(CubeFx::new()),
        Box::new(BoingFx::new()),
        Box::new(CopperFx::new()),
        Box::new(TunnelFx::new()),
        Box::new(ScrollerFx::new()),
        stars,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_effects_have_distinct_names() {
        let mut names: Vec<&str> = default_effects(0).iter().map(|fx| fx.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 6);
    }
}
