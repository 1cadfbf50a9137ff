//! Vertex batching.
//!
//! Responsibilities:
//! - the vertex format shared with every backend
//! - the binding key that decides which primitives may share a draw
//! - the bounded buffer that accumulates one batch and flushes it

mod buffer;
mod key;
mod vertex;

pub use buffer::BatchBuffer;
pub use key::{BindingKey, BufferId, ProgramId, TextureId, Topology};
pub use vertex::{Vertex, VertexKind};

pub(crate) use vertex::quad_corners;
