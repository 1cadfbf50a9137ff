use crate::batch::{BatchBuffer, BindingKey, ProgramId, Vertex};
use crate::coords::Projection;
use crate::render::Rasterizer;

use super::state::FrameStats;

/// The flush protocol: one pending key, one bounded buffer, one backend.
///
/// Every primitive goes through [`push`](Self::push), which flushes first
/// when the key changes or the primitive would not fit. Primitives are never
/// split across submissions.
#[derive(Debug)]
pub(super) struct Batcher<R> {
    pub(super) raster: R,
    buffer: BatchBuffer,
    program: ProgramId,
    // `None` until the first primitive of a frame adopts a key.
    pending: Option<BindingKey>,
    stats: FrameStats,
}

impl<R: Rasterizer> Batcher<R> {
    pub(super) fn new(raster: R, buffer: BatchBuffer, program: ProgramId) -> Self {
        Self {
            raster,
            buffer,
            program,
            pending: None,
            stats: FrameStats::default(),
        }
    }

    #[inline]
    pub(super) fn program(&self) -> ProgramId {
        self.program
    }

    #[inline]
    pub(super) fn stats(&self) -> FrameStats {
        self.stats
    }

    #[inline]
    pub(super) fn pending_key(&self) -> Option<BindingKey> {
        self.pending
    }

    #[inline]
    pub(super) fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub(super) fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub(super) fn begin(&mut self, projection: &Projection) {
        self.buffer.reset();
        self.pending = None;
        self.stats = FrameStats::default();
        self.raster.begin_frame(self.program, projection);
    }

    /// Appends one whole primitive under `key`.
    pub(super) fn push(&mut self, key: BindingKey, vertices: &[Vertex]) {
        if vertices.is_empty() {
            return;
        }
        debug_assert!(
            vertices.len() <= self.buffer.capacity(),
            "primitive of {} vertices can never fit capacity {}",
            vertices.len(),
            self.buffer.capacity()
        );
        debug_assert!(
            vertices.len() % key.topology.vertices_per_primitive() == 0,
            "{} vertices do not form whole {:?} primitives",
            vertices.len(),
            key.topology
        );

        if self.pending != Some(key) {
            if self.flush() {
                self.stats.key_flushes += 1;
            }
            self.pending = Some(key);
        }
        if !self.buffer.fits(vertices.len()) && self.flush() {
            self.stats.overflow_flushes += 1;
        }

        self.buffer.append(vertices);
        self.stats.vertices += vertices.len() as u64;
    }

    /// Submits pending vertices under the pending key. The key is kept.
    pub(super) fn flush(&mut self) -> bool {
        let Some(key) = self.pending else { return false };
        let flushed = self.buffer.flush(&mut self.raster, &key);
        if flushed {
            self.stats.submissions += 1;
        }
        flushed
    }

    pub(super) fn end(&mut self) -> FrameStats {
        self.flush();
        self.raster.end_frame();
        self.pending = None;
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BindingKey, TextureId};
    use crate::coords::{Vec2, Viewport};
    use crate::paint::Color;
    use crate::render::{ProgramSource, RecordingRasterizer};

    fn batcher(capacity: usize) -> Batcher<RecordingRasterizer> {
        let mut raster = RecordingRasterizer::new();
        let program = raster.compile_program(&ProgramSource::GENERAL).unwrap();
        let gpu = raster
            .create_vertex_buffer((capacity * std::mem::size_of::<Vertex>()) as u64)
            .unwrap();
        let mut b = Batcher::new(raster, BatchBuffer::new(capacity, gpu), program);
        b.begin(&Viewport::new(100.0, 100.0).ortho_projection());
        b
    }

    fn prim(n: usize) -> Vec<Vertex> {
        vec![Vertex::shape(Vec2::zero(), Color::WHITE); n]
    }

    #[test]
    fn first_key_adoption_does_not_submit() {
        let mut b = batcher(24);
        let key = BindingKey::shapes(b.program());
        b.push(key, &prim(6));
        assert_eq!(b.pending_key(), Some(key));
        assert_eq!(b.stats().submissions, 0);
        assert_eq!(b.stats().key_flushes, 0);
    }

    #[test]
    fn key_change_flushes_once() {
        let mut b = batcher(24);
        let shapes = BindingKey::shapes(b.program());
        let glyphs = BindingKey::glyphs(b.program(), TextureId(0));
        b.push(shapes, &prim(6));
        b.push(glyphs, &prim(6));
        b.push(glyphs, &prim(6));

        let stats = b.end();
        assert_eq!(stats.submissions, 2);
        assert_eq!(stats.key_flushes, 1);
        let subs = b.raster.submissions();
        assert_eq!(subs[0].binding, shapes);
        assert_eq!(subs[1].vertices.len(), 12);
    }

    #[test]
    fn overflow_keeps_primitive_whole() {
        let mut b = batcher(24);
        let key = BindingKey::shapes(b.program());
        b.push(key, &prim(21));
        b.push(key, &prim(6));

        assert_eq!(b.stats().overflow_flushes, 1);
        assert_eq!(b.pending_len(), 6);
        assert_eq!(b.raster.submissions()[0].vertices.len(), 21);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "do not form whole")]
    fn partial_primitive_panics_in_debug() {
        let mut b = batcher(24);
        b.push(BindingKey::lines(b.program()), &prim(3));
    }

    #[test]
    fn line_pairs_are_accepted() {
        let mut b = batcher(24);
        b.push(BindingKey::lines(b.program()), &prim(4));
        assert_eq!(b.pending_len(), 4);
    }

    #[test]
    fn empty_primitive_changes_nothing() {
        let mut b = batcher(24);
        b.push(BindingKey::shapes(b.program()), &[]);
        assert_eq!(b.pending_key(), None);
        assert_eq!(b.end().submissions, 0);
    }

    #[test]
    fn begin_discards_previous_pending_state() {
        let mut b = batcher(24);
        b.push(BindingKey::shapes(b.program()), &prim(6));
        b.begin(&Viewport::new(10.0, 10.0).ortho_projection());
        assert_eq!(b.pending_len(), 0);
        assert_eq!(b.pending_key(), None);
        assert_eq!(b.stats(), FrameStats::default());
    }
}
