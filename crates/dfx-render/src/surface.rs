#![forbid(unsafe_code)]

//! Host surface boundary.
//!
//! A [`Surface`] owns the pixels and executes [`DrawCmd`]s. Browser
//! canvases, GPU backends and terminal renderers live outside this
//! repository and implement the trait; [`crate::pixel::PixelSurface`] is
//! the in-tree software implementation used for tests and golden runs.

use dfx_core::geometry::Viewport;

use crate::draw::{DrawCmd, DrawList};

/// Drawing target owned by the host.
pub trait Surface {
    /// Current size in pixels.
    fn viewport(&self) -> Viewport;

    /// Reallocate for a new size. Contents after a resize are unspecified.
    fn resize(&mut self, viewport: Viewport);

    /// Execute a single command.
    fn execute(&mut self, cmd: &DrawCmd);

    /// Execute every command in order.
    fn present(&mut self, list: &DrawList) {
        for cmd in list {
            self.execute(cmd);
        }
    }
}

/// Surface that only records what it was asked to draw.
///
/// Useful when a host wants to forward commands elsewhere (e.g. across an
/// FFI boundary) or when tests assert on the exact command stream.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    frames: Vec<DrawList>,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            frames: Vec::new(),
        }
    }

    /// Everything presented so far, one list per `present` call.
    pub fn frames(&self) -> &[DrawList] {
        &self.frames
    }

    /// Most recent frame, if any.
    pub fn last_frame(&self) -> Option<&DrawList> {
        self.frames.last()
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn execute(&mut self, cmd: &DrawCmd) {
        if self.frames.is_empty() {
            self.frames.push(DrawList::new());
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.push(cmd.clone());
        }
    }

    fn present(&mut self, list: &DrawList) {
        self.frames.push(list.clone());
    }
}
