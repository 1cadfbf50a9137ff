//! Rasterization backends.
//!
//! The draw engine talks to the GPU only through [`Rasterizer`]: compile a
//! program once, allocate one vertex buffer once, create atlas textures on
//! font load, then per flush upload a byte range and issue one draw.
//! Backend choice is the engine's type parameter.
//!
//! Convention:
//! - vertex positions are pixels (top-left origin, +Y down)
//! - the per-frame projection converts them to NDC in the vertex stage

mod recording;
mod wgpu_backend;

pub use recording::{RecordingRasterizer, Submission};
pub use wgpu_backend::{WgpuConfig, WgpuRasterizer};

use crate::batch::{BindingKey, BufferId, ProgramId, TextureId};
use crate::coords::Projection;
use crate::error::DrawError;

/// Source text of a program. Both stages may live in one string.
#[derive(Debug, Clone, Copy)]
pub struct ProgramSource<'a> {
    pub label: &'a str,
    pub vertex: &'a str,
    pub fragment: &'a str,
}

impl ProgramSource<'static> {
    /// The single program used for both shapes and glyphs.
    pub const GENERAL: ProgramSource<'static> = ProgramSource {
        label: "nanodraw general",
        vertex: include_str!("shaders/general.wgsl"),
        fragment: include_str!("shaders/general.wgsl"),
    };
}

/// Capability set required by the batching core.
///
/// Creation calls happen at context or font setup and report failure through
/// `Result`. Per-frame calls cannot fail; a backend that loses its device
/// logs and drops the work.
pub trait Rasterizer {
    /// Compiles and links a program.
    fn compile_program(&mut self, source: &ProgramSource<'_>) -> Result<ProgramId, DrawError>;

    /// Allocates a GPU-visible vertex buffer of `byte_capacity` bytes.
    fn create_vertex_buffer(&mut self, byte_capacity: u64) -> Result<BufferId, DrawError>;

    /// Creates a single-channel (coverage) texture from tightly packed rows.
    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureId, DrawError>;

    /// Starts a frame: `projection` becomes the transform of `program`.
    fn begin_frame(&mut self, program: ProgramId, projection: &Projection);

    /// Writes `bytes` at the start of `buffer`.
    fn upload(&mut self, buffer: BufferId, bytes: &[u8]);

    /// Draws the first `vertex_count` vertices of `buffer` with `binding`.
    fn submit(&mut self, buffer: BufferId, binding: &BindingKey, vertex_count: u32);

    /// Ends a frame and leaves no program or vertex layout bound.
    fn end_frame(&mut self);
}
