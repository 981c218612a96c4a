#![forbid(unsafe_code)]

pub mod boing;
pub mod copper;
pub mod cube;
pub mod scroller;
pub mod starfield;
pub mod tunnel;

pub use boing::{Ball, BoingFx, BoingParams, Contact, Shadow};
pub use copper::{Bar, CopperFx, CopperParams};
pub use cube::{Cube, CubeFx, CubeParams};
pub use scroller::{ScrollChar, ScrollerFx, ScrollerParams};
pub use starfield::{Star, StarfieldFx, StarfieldParams};
pub use tunnel::{Ring, TunnelFx, TunnelParams, TunnelPoint};
