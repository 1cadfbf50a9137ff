use crate::batch::{BindingKey, BufferId, ProgramId, TextureId, Vertex};
use crate::coords::Projection;
use crate::error::DrawError;

use super::{ProgramSource, Rasterizer};

/// One recorded draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub binding: BindingKey,
    pub vertices: Vec<Vertex>,
}

#[derive(Debug)]
struct RecordedTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Headless rasterizer that keeps everything in memory.
///
/// Uploads are decoded back into [`Vertex`] values so every submission can be
/// inspected. Useful for tests, tooling, and measuring batching behavior
/// without a GPU.
#[derive(Debug, Default)]
pub struct RecordingRasterizer {
    programs: Vec<String>,
    buffers: Vec<(u64, Vec<u8>)>,
    textures: Vec<RecordedTexture>,
    submissions: Vec<Submission>,
    projection: Option<Projection>,
    frames_begun: u64,
    frames_ended: u64,
    in_frame: bool,
    fail_programs: bool,
}

impl RecordingRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A rasterizer whose program builds always fail.
    pub fn failing_programs() -> Self {
        Self {
            fail_programs: true,
            ..Self::default()
        }
    }

    /// Every submission since creation or the last [`clear_submissions`](Self::clear_submissions).
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn clear_submissions(&mut self) {
        self.submissions.clear();
    }

    /// Projection set by the most recent frame.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Size and pixels of a texture created by this rasterizer.
    pub fn texture(&self, id: TextureId) -> Option<(u32, u32, &[u8])> {
        self.textures
            .get(id.0 as usize)
            .map(|t| (t.width, t.height, t.pixels.as_slice()))
    }

    /// `(begun, ended)` frame counts.
    pub fn frame_counts(&self) -> (u64, u64) {
        (self.frames_begun, self.frames_ended)
    }

    /// `true` between `begin_frame` and `end_frame`.
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }
}

impl Rasterizer for RecordingRasterizer {
    fn compile_program(&mut self, source: &ProgramSource<'_>) -> Result<ProgramId, DrawError> {
        if self.fail_programs || source.vertex.trim().is_empty() || source.fragment.trim().is_empty() {
            return Err(DrawError::ProgramBuild {
                label: source.label.to_owned(),
                message: "program rejected by recording backend".to_owned(),
            });
        }
        self.programs.push(source.label.to_owned());
        Ok(ProgramId(self.programs.len() as u32 - 1))
    }

    fn create_vertex_buffer(&mut self, byte_capacity: u64) -> Result<BufferId, DrawError> {
        self.buffers.push((byte_capacity, Vec::new()));
        Ok(BufferId(self.buffers.len() as u32 - 1))
    }

    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureId, DrawError> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || pixels.len() < expected {
            return Err(DrawError::Resource(format!(
                "texture {width}x{height} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        self.textures.push(RecordedTexture {
            width,
            height,
            pixels: pixels[..expected].to_vec(),
        });
        Ok(TextureId(self.textures.len() as u32 - 1))
    }

    fn begin_frame(&mut self, _program: ProgramId, projection: &Projection) {
        self.projection = Some(*projection);
        self.frames_begun += 1;
        self.in_frame = true;
    }

    fn upload(&mut self, buffer: BufferId, bytes: &[u8]) {
        let Some((capacity, data)) = self.buffers.get_mut(buffer.0 as usize) else {
            log::warn!("RecordingRasterizer: upload to unknown {buffer:?}");
            return;
        };
        assert!(
            bytes.len() as u64 <= *capacity,
            "upload of {} bytes exceeds buffer capacity {capacity}",
            bytes.len()
        );
        data.clear();
        data.extend_from_slice(bytes);
    }

    fn submit(&mut self, buffer: BufferId, binding: &BindingKey, vertex_count: u32) {
        let Some((_, data)) = self.buffers.get(buffer.0 as usize) else {
            log::warn!("RecordingRasterizer: submit from unknown {buffer:?}");
            return;
        };
        let vertices = data
            .chunks_exact(std::mem::size_of::<Vertex>())
            .take(vertex_count as usize)
            .map(bytemuck::pod_read_unaligned::<Vertex>)
            .collect();
        self.submissions.push(Submission {
            binding: *binding,
            vertices,
        });
    }

    fn end_frame(&mut self) {
        self.frames_ended += 1;
        self.in_frame = false;
    }
}
