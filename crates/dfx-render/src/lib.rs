#![forbid(unsafe_code)]

//! Render: colors, draw commands, the bitmap font, and host surfaces.
//!
//! Effects record [`draw::DrawCmd`]s into a [`draw::DrawList`]; a
//! [`surface::Surface`] owned by the host executes them.

pub mod color;
pub mod draw;
pub mod font;
pub mod pixel;
pub mod surface;

pub use color::PackedRgba;
pub use draw::{DrawCmd, DrawList, Fill, LinearGradient};
pub use pixel::PixelSurface;
pub use surface::{RecordingSurface, Surface};
