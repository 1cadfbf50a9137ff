use std::str::Chars;

use crate::coords::{Rect, Vec2};

/// Placement of one glyph relative to the pen, at scale 1.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct GlyphMetrics {
    /// Top-left of the glyph bitmap relative to the pen position.
    pub offset: Vec2,
    /// Bitmap size in pixels. Zero for blank glyphs such as space.
    pub size: Vec2,
    /// Horizontal pen advance.
    pub advance: f32,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

impl GlyphMetrics {
    /// Quad for this glyph with the pen at `pen`.
    #[inline]
    pub fn quad(&self, pen: Vec2, scale: f32) -> GlyphQuad {
        let min = pen + self.offset * scale;
        let max = min + self.size * scale;
        GlyphQuad {
            min,
            max,
            uv_min: self.uv_min,
            uv_max: self.uv_max,
        }
    }
}

/// A positioned glyph: pixel-space corners and atlas UV corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphQuad {
    pub min: Vec2,
    pub max: Vec2,
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

impl GlyphQuad {
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.min, self.max)
    }
}

/// Glyph table for one font at one size.
///
/// Covers a contiguous code-point range starting at `first`. Characters
/// outside the range resolve to `fallback` when set, and are skipped
/// otherwise. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAtlas {
    width: u32,
    height: u32,
    size: f32,
    line_height: f32,
    first: u32,
    glyphs: Vec<GlyphMetrics>,
    fallback: Option<u32>,
}

impl FontAtlas {
    pub(crate) fn new(
        width: u32,
        height: u32,
        size: f32,
        line_height: f32,
        first: u32,
        glyphs: Vec<GlyphMetrics>,
        fallback: Option<u32>,
    ) -> Self {
        Self {
            width,
            height,
            size,
            line_height,
            first,
            glyphs,
            fallback,
        }
    }

    /// Atlas bitmap size in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Pixel size the atlas was baked at.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Distance between baselines at scale 1.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Code points with their own glyph.
    pub fn range(&self) -> std::ops::Range<u32> {
        self.first..self.first + self.glyphs.len() as u32
    }

    /// Metrics for `ch`, or `None` if the character is not drawable.
    pub fn glyph(&self, ch: char) -> Option<&GlyphMetrics> {
        let code = ch as u32;
        let code = if self.range().contains(&code) { code } else { self.fallback? };
        self.glyphs.get(code.checked_sub(self.first)? as usize)
    }

    /// Lays out `text` with the pen starting at `origin`.
    pub fn layout<'a>(&'a self, text: &'a str, origin: Vec2, scale: f32) -> GlyphRun<'a> {
        GlyphRun {
            atlas: self,
            chars: text.chars(),
            origin_x: origin.x,
            pen: origin,
            scale,
        }
    }
}

/// Iterator over the quads of a text run.
///
/// Unsupported characters are skipped without moving the pen.
#[derive(Debug, Clone)]
pub struct GlyphRun<'a> {
    atlas: &'a FontAtlas,
    chars: Chars<'a>,
    origin_x: f32,
    pen: Vec2,
    scale: f32,
}

impl GlyphRun<'_> {
    /// Horizontal distance the pen has moved so far.
    pub fn advance(&self) -> f32 {
        self.pen.x - self.origin_x
    }
}

impl Iterator for GlyphRun<'_> {
    type Item = GlyphQuad;

    fn next(&mut self) -> Option<GlyphQuad> {
        loop {
            let ch = self.chars.next()?;
            let Some(glyph) = self.atlas.glyph(ch) else { continue };
            let quad = glyph.quad(self.pen, self.scale);
            self.pen.x += glyph.advance * self.scale;
            return Some(quad);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 'A'..='C' with advances 10, 20, 30 and a 4x6 bitmap above the baseline.
    fn abc() -> FontAtlas {
        let glyphs = (1..=3)
            .map(|i| GlyphMetrics {
                offset: Vec2::new(1.0, -6.0),
                size: Vec2::new(4.0, 6.0),
                advance: 10.0 * i as f32,
                uv_min: Vec2::new(0.1 * i as f32, 0.0),
                uv_max: Vec2::new(0.1 * i as f32 + 0.05, 1.0),
            })
            .collect();
        FontAtlas::new(64, 8, 8.0, 10.0, 'A' as u32, glyphs, None)
    }

    #[test]
    fn lookup_respects_range() {
        let atlas = abc();
        assert_eq!(atlas.range(), 65..68);
        assert_eq!(atlas.glyph('B').map(|g| g.advance), Some(20.0));
        assert!(atlas.glyph('@').is_none());
        assert!(atlas.glyph('D').is_none());
    }

    #[test]
    fn fallback_substitutes_out_of_range() {
        let mut atlas = abc();
        atlas.fallback = Some('C' as u32);
        assert_eq!(atlas.glyph('z').map(|g| g.advance), Some(30.0));
    }

    #[test]
    fn run_skips_unknown_without_advancing() {
        let atlas = abc();
        let mut run = atlas.layout("A?B", Vec2::new(100.0, 50.0), 1.0);
        let quads: Vec<_> = run.by_ref().collect();
        assert_eq!(quads.len(), 2);
        assert_eq!(run.advance(), 30.0);
        assert_eq!(quads[1].min, Vec2::new(111.0, 44.0));
    }

    #[test]
    fn scale_applies_to_offsets_sizes_and_advance() {
        let atlas = abc();
        let mut run = atlas.layout("AA", Vec2::zero(), 2.0);
        let quads: Vec<_> = run.by_ref().collect();
        assert_eq!(run.advance(), 40.0);
        assert_eq!(quads[0].min, Vec2::new(2.0, -12.0));
        assert_eq!(quads[0].max, Vec2::new(10.0, 0.0));
        assert_eq!(quads[1].min.x, 22.0);
    }

    #[test]
    fn empty_text_yields_nothing() {
        let atlas = abc();
        let mut run = atlas.layout("", Vec2::new(5.0, 5.0), 1.0);
        assert!(run.next().is_none());
        assert_eq!(run.advance(), 0.0);
    }
}
