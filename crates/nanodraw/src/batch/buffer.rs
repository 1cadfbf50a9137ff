use crate::error::DrawError;
use crate::render::Rasterizer;

use super::{BindingKey, BufferId, Vertex};

/// Fixed-capacity vertex accumulator for a single binding.
///
/// The CPU side is a `Vec` allocated once at full capacity; the GPU side is a
/// vertex buffer of the same size created by the rasterizer. A flush uploads
/// the pending range and issues exactly one draw.
///
/// The buffer does not know its own binding key. The caller (the draw engine)
/// tracks the key and guarantees every vertex between two flushes shares it.
#[derive(Debug)]
pub struct BatchBuffer {
    vertices: Vec<Vertex>,
    capacity: usize,
    gpu: BufferId,
}

impl BatchBuffer {
    /// Wraps an already created GPU buffer able to hold `capacity` vertices.
    pub fn new(capacity: usize, gpu: BufferId) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            capacity,
            gpu,
        }
    }

    /// Like [`new`](Self::new), but reports a failed CPU-side allocation
    /// instead of aborting.
    pub fn try_new(capacity: usize, gpu: BufferId) -> Result<Self, DrawError> {
        let mut vertices = Vec::new();
        vertices
            .try_reserve_exact(capacity)
            .map_err(|e| DrawError::Resource(format!("batch of {capacity} vertices: {e}")))?;
        Ok(Self {
            vertices,
            capacity,
            gpu,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots before the next append must be preceded by a flush.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.vertices.len()
    }

    /// Returns `true` if `count` more vertices fit without flushing.
    #[inline]
    pub fn fits(&self, count: usize) -> bool {
        count <= self.remaining()
    }

    /// Vertices appended since the last flush or reset, in draw order.
    #[inline]
    pub fn pending(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Copies `vertices` to the end of the batch.
    ///
    /// # Panics
    /// Panics if the batch would exceed its capacity. Callers check
    /// [`fits`](Self::fits) and flush first.
    pub fn append(&mut self, vertices: &[Vertex]) {
        assert!(
            self.fits(vertices.len()),
            "BatchBuffer::append: {} pending + {} new exceeds capacity {}",
            self.vertices.len(),
            vertices.len(),
            self.capacity
        );
        self.vertices.extend_from_slice(vertices);
    }

    /// Uploads and draws the pending vertices with `binding`, then empties the batch.
    ///
    /// Returns `false` without touching the rasterizer when nothing is pending.
    pub fn flush<R: Rasterizer + ?Sized>(&mut self, raster: &mut R, binding: &BindingKey) -> bool {
        if self.vertices.is_empty() {
            return false;
        }

        let count = self.vertices.len();
        raster.upload(self.gpu, bytemuck::cast_slice(&self.vertices));
        raster.submit(self.gpu, binding, count as u32);
        log::trace!("flushed {count} vertices with {binding:?}");

        self.vertices.clear();
        true
    }

    /// Drops pending vertices without drawing them.
    #[inline]
    pub fn reset(&mut self) {
        self.vertices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ProgramId;
    use crate::coords::Vec2;
    use crate::paint::Color;
    use crate::render::RecordingRasterizer;

    fn verts(n: usize) -> Vec<Vertex> {
        (0..n)
            .map(|i| Vertex::shape(Vec2::new(i as f32, 0.0), Color::WHITE))
            .collect()
    }

    fn setup(capacity: usize) -> (RecordingRasterizer, BatchBuffer) {
        let mut raster = RecordingRasterizer::new();
        let gpu = raster.create_vertex_buffer((capacity * 36) as u64).unwrap();
        (raster, BatchBuffer::new(capacity, gpu))
    }

    #[test]
    fn try_new_reports_unallocatable_capacity() {
        let err = BatchBuffer::try_new(usize::MAX, BufferId(0)).unwrap_err();
        assert!(matches!(err, DrawError::Resource(_)));
        let ok = BatchBuffer::try_new(24, BufferId(0)).unwrap();
        assert_eq!((ok.len(), ok.capacity()), (0, 24));
    }

    const KEY: BindingKey = BindingKey::shapes(ProgramId(1));

    #[test]
    fn flush_on_empty_is_a_noop() {
        let (mut raster, mut buf) = setup(12);
        assert!(!buf.flush(&mut raster, &KEY));
        assert!(!buf.flush(&mut raster, &KEY));
        assert!(raster.submissions().is_empty());
    }

    #[test]
    fn flush_submits_once_and_preserves_order() {
        let (mut raster, mut buf) = setup(12);
        let input = verts(9);
        buf.append(&input[..3]);
        buf.append(&input[3..]);
        assert_eq!(buf.len(), 9);

        assert!(buf.flush(&mut raster, &KEY));
        assert!(buf.is_empty());

        let subs = raster.submissions();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].binding, KEY);
        assert_eq!(subs[0].vertices, input);
    }

    #[test]
    fn reset_discards_without_submitting() {
        let (mut raster, mut buf) = setup(12);
        buf.append(&verts(6));
        buf.reset();
        assert!(buf.is_empty());
        assert!(!buf.flush(&mut raster, &KEY));
        assert!(raster.submissions().is_empty());
    }

    #[test]
    fn caller_flushes_before_overflow() {
        // pending C-3, a 6-vertex primitive arrives: one flush, then the whole
        // primitive lands in the fresh batch.
        let capacity = 30;
        let (mut raster, mut buf) = setup(capacity);
        buf.append(&verts(capacity - 3));

        let prim = verts(6);
        assert!(!buf.fits(prim.len()));
        assert!(buf.flush(&mut raster, &KEY));
        buf.append(&prim);

        assert_eq!(raster.submissions().len(), 1);
        assert_eq!(raster.submissions()[0].vertices.len(), capacity - 3);
        assert_eq!(buf.len(), 6);
        assert_eq!(buf.remaining(), capacity - 6);
    }

    #[test]
    fn fills_exactly_to_capacity() {
        let (_raster, mut buf) = setup(12);
        buf.append(&verts(12));
        assert_eq!(buf.remaining(), 0);
        assert!(buf.fits(0));
        assert!(!buf.fits(1));
    }

    #[test]
    #[should_panic(expected = "exceeds capacity")]
    fn append_past_capacity_panics() {
        let (_raster, mut buf) = setup(12);
        buf.append(&verts(10));
        buf.append(&verts(3));
    }
}
