use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;

/// What a vertex belongs to; selects the fragment path in the shader.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u32)]
pub enum VertexKind {
    /// Flat-colored geometry; UV is ignored.
    Shape = 0,
    /// Glyph quad; color alpha is modulated by atlas coverage.
    Glyph = 1,
}

/// One vertex of the batched stream (36 bytes).
///
///  offset  0  tag       u32        loc 0
///  offset  4  position  [f32; 2]   loc 1
///  offset 12  color     [f32; 4]   loc 2
///  offset 28  uv        [f32; 2]   loc 3
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Raw [`VertexKind`] discriminant.
    pub tag: u32,
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    #[inline]
    pub fn shape(position: Vec2, color: Color) -> Self {
        Self {
            tag: VertexKind::Shape as u32,
            position: position.to_array(),
            color: color.to_array(),
            uv: [0.0, 0.0],
        }
    }

    #[inline]
    pub fn glyph(position: Vec2, uv: Vec2, color: Color) -> Self {
        Self {
            tag: VertexKind::Glyph as u32,
            position: position.to_array(),
            color: color.to_array(),
            uv: uv.to_array(),
        }
    }

    /// Decodes the tag. Unknown values read as [`VertexKind::Shape`].
    #[inline]
    pub fn kind(&self) -> VertexKind {
        if self.tag == VertexKind::Glyph as u32 {
            VertexKind::Glyph
        } else {
            VertexKind::Shape
        }
    }
}

/// Emits the two triangles of an axis-aligned quad.
///
/// Diagonal runs from top-right to bottom-left:
/// `(x0,y0) (x1,y0) (x0,y1)` then `(x1,y0) (x1,y1) (x0,y1)`.
#[inline]
pub(crate) fn quad_corners(min: Vec2, max: Vec2) -> [Vec2; 6] {
    [
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(min.x, max.y),
        Vec2::new(max.x, min.y),
        Vec2::new(max.x, max.y),
        Vec2::new(min.x, max.y),
    ]
}
