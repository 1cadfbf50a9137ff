use crate::coords::Vec2;
use crate::paint::Color;
use crate::text::FontId;

/// Current primitive attributes.
///
/// Changing any of these never flushes by itself; only the binding key of
/// the next primitive decides that.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawState {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    pub font: Option<FontId>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            stroke: Color::WHITE,
            stroke_width: 1.0,
            font: None,
        }
    }
}

/// Per-frame batching counters. Reset by `begin`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw submissions issued to the rasterizer.
    pub submissions: u32,
    /// Vertices appended this frame.
    pub vertices: u64,
    /// Flushes forced by a full batch.
    pub overflow_flushes: u32,
    /// Flushes forced by a binding key change.
    pub key_flushes: u32,
}

/// Position, size, and text consumed by the draw commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct CommandCursor {
    pub origin: Vec2,
    pub size: Vec2,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_white_hairline_without_font() {
        let s = DrawState::default();
        assert_eq!(s.fill, Color::WHITE);
        assert_eq!(s.stroke, Color::WHITE);
        assert_eq!(s.stroke_width, 1.0);
        assert!(s.font.is_none());
    }
}
