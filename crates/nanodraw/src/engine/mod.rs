//! Immediate-mode draw engine.
//!
//! [`DrawEngine`] owns the draw state, the font registry, and a single
//! bounded vertex batch. Primitive calls turn into vertices tagged with a
//! [`BindingKey`](crate::batch::BindingKey); consecutive primitives sharing a
//! key accumulate into one submission.
//!
//! A frame looks like:
//! ```text
//! begin(w, h) -> set_color / draw_rect / draw_text ... -> end()
//! ```
//! Draws are only valid between `begin` and `end`; this is checked with
//! `debug_assert!`.

mod batcher;
mod command;
mod shapes;
mod state;
mod text;

pub use command::Command;
pub use state::{DrawState, FrameStats};

use crate::batch::{BatchBuffer, BindingKey};
use crate::config::DrawConfig;
use crate::coords::Viewport;
use crate::error::DrawError;
use crate::render::{ProgramSource, Rasterizer};
use crate::text::FontRegistry;

use batcher::Batcher;
use state::CommandCursor;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Phase {
    Idle,
    Framing,
}

/// Batched 2D renderer over a [`Rasterizer`] backend.
#[derive(Debug)]
pub struct DrawEngine<R: Rasterizer> {
    batcher: Batcher<R>,
    fonts: FontRegistry,
    state: DrawState,
    cursor: CommandCursor,
    phase: Phase,
}

impl<R: Rasterizer> DrawEngine<R> {
    /// Compiles the general program and allocates the vertex buffer.
    ///
    /// All GPU resources a frame needs (besides font atlases) are created
    /// here; nothing is allocated per frame.
    pub fn create(mut raster: R, config: DrawConfig) -> Result<Self, DrawError> {
        config.validate()?;

        let program = raster.compile_program(&ProgramSource::GENERAL)?;
        let bytes = config.vertex_bytes()?;
        let gpu = raster.create_vertex_buffer(bytes)?;
        let buffer = BatchBuffer::try_new(config.vertex_capacity, gpu)?;

        log::debug!(
            "{}: draw engine ready ({} vertices, {bytes} bytes)",
            config.label,
            config.vertex_capacity
        );

        Ok(Self {
            batcher: Batcher::new(raster, buffer, program),
            fonts: FontRegistry::new(),
            state: DrawState::default(),
            cursor: CommandCursor::default(),
            phase: Phase::Idle,
        })
    }

    /// Starts a frame for a `width` x `height` pixel target.
    ///
    /// Drops anything left pending and clears the frame statistics. The draw
    /// state carries over from the previous frame.
    pub fn begin(&mut self, width: f32, height: f32) {
        debug_assert!(self.phase == Phase::Idle, "begin called twice without end");
        let viewport = Viewport::new(width, height);
        if !viewport.is_valid() {
            log::warn!("begin: degenerate viewport {width}x{height}, clamping to 1px");
        }
        let projection = viewport.ortho_projection();
        self.batcher.begin(&projection);
        self.phase = Phase::Framing;
    }

    /// Flushes the remaining batch and ends the frame.
    pub fn end(&mut self) -> FrameStats {
        debug_assert!(self.phase == Phase::Framing, "end called without begin");
        let stats = self.batcher.end();
        self.phase = Phase::Idle;
        log::trace!("frame done: {stats:?}");
        stats
    }

    /// Submits the pending batch now instead of waiting for a key change.
    pub fn flush(&mut self) {
        self.batcher.flush();
    }

    /// Counters of the current (or last finished) frame.
    pub fn stats(&self) -> FrameStats {
        self.batcher.stats()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn fonts(&self) -> &FontRegistry {
        &self.fonts
    }

    /// `true` between [`begin`](Self::begin) and [`end`](Self::end).
    pub fn is_framing(&self) -> bool {
        self.phase == Phase::Framing
    }

    /// Key the pending vertices were recorded under, if any primitive was
    /// drawn since the frame began.
    pub fn pending_key(&self) -> Option<BindingKey> {
        self.batcher.pending_key()
    }

    /// Vertices waiting for the next flush.
    pub fn pending_vertices(&self) -> usize {
        self.batcher.pending_len()
    }

    pub fn vertex_capacity(&self) -> usize {
        self.batcher.capacity()
    }

    pub fn raster(&self) -> &R {
        &self.batcher.raster
    }

    pub fn raster_mut(&mut self) -> &mut R {
        &mut self.batcher.raster
    }

    pub fn into_raster(self) -> R {
        self.batcher.raster
    }

    #[inline]
    fn assert_framing(&self, op: &str) {
        debug_assert!(self.phase == Phase::Framing, "{op} called outside begin/end");
    }
}
