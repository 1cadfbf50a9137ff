use crate::batch::Vertex;
use crate::error::DrawError;

/// Smallest capacity that fits the largest single primitive (a stroked
/// rectangle, four bands of two triangles). Primitives are never split
/// across flushes, so anything smaller could not make progress.
pub const MIN_VERTEX_CAPACITY: usize = 24;

/// Largest capacity whose byte size still fits one allocation.
pub const MAX_VERTEX_CAPACITY: usize = isize::MAX as usize / std::mem::size_of::<Vertex>();

/// Draw engine configuration.
///
/// Keep this small; backend-specific knobs live on the backend's own config.
#[derive(Debug, Clone)]
pub struct DrawConfig {
    /// Maximum number of vertices pending between two flushes.
    ///
    /// Production builds want hundreds of thousands; tests use tiny values to
    /// exercise overflow flushing.
    pub vertex_capacity: usize,

    /// Debug label forwarded to backend resources.
    pub label: String,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            vertex_capacity: 256 * 1024,
            label: "nanodraw".to_owned(),
        }
    }
}

impl DrawConfig {
    /// Config with the given capacity and default label.
    pub fn with_capacity(vertex_capacity: usize) -> Self {
        Self {
            vertex_capacity,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), DrawError> {
        if self.vertex_capacity < MIN_VERTEX_CAPACITY {
            return Err(DrawError::InvalidConfig(format!(
                "vertex_capacity {} is below the minimum of {MIN_VERTEX_CAPACITY}",
                self.vertex_capacity
            )));
        }
        if self.vertex_capacity > MAX_VERTEX_CAPACITY {
            return Err(DrawError::InvalidConfig(format!(
                "vertex_capacity {} exceeds the maximum of {MAX_VERTEX_CAPACITY}",
                self.vertex_capacity
            )));
        }
        Ok(())
    }

    /// Byte size of a vertex buffer holding `vertex_capacity` vertices.
    pub(crate) fn vertex_bytes(&self) -> Result<u64, DrawError> {
        self.vertex_capacity
            .checked_mul(std::mem::size_of::<Vertex>())
            .and_then(|bytes| u64::try_from(bytes).ok())
            .ok_or_else(|| {
                DrawError::InvalidConfig(format!(
                    "vertex_capacity {} overflows the buffer size",
                    self.vertex_capacity
                ))
            })
    }
}
