/// Opaque handle to a compiled program, issued by a rasterizer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub u32);

/// Opaque handle to a GPU texture, issued by a rasterizer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureId(pub u32);

/// Opaque handle to a GPU vertex buffer, issued by a rasterizer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

/// Primitive assembly mode of a batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Topology {
    TriangleList,
    LineList,
}

impl Topology {
    /// Vertices consumed per primitive.
    #[inline]
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            Topology::TriangleList => 3,
            Topology::LineList => 2,
        }
    }
}

/// Everything that must stay constant across one batch.
///
/// Two primitives may share a submission only if their keys are equal.
/// Untextured geometry uses `texture: None`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BindingKey {
    pub topology: Topology,
    pub program: ProgramId,
    pub texture: Option<TextureId>,
}

impl BindingKey {
    #[inline]
    pub const fn shapes(program: ProgramId) -> Self {
        Self { topology: Topology::TriangleList, program, texture: None }
    }

    #[inline]
    pub const fn lines(program: ProgramId) -> Self {
        Self { topology: Topology::LineList, program, texture: None }
    }

    #[inline]
    pub const fn glyphs(program: ProgramId, atlas: TextureId) -> Self {
        Self { topology: Topology::TriangleList, program, texture: Some(atlas) }
    }
}
