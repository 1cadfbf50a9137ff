use fontdue::{Font, FontSettings};

use crate::coords::Vec2;
use crate::error::DrawError;

use super::atlas::{FontAtlas, GlyphMetrics};

/// First baked code point (space).
pub(crate) const FIRST_CHAR: u32 = 32;
/// Number of baked code points: printable ASCII plus DEL.
pub(crate) const CHAR_COUNT: u32 = 96;

/// Pixels left empty between neighbouring glyphs so bilinear sampling never
/// bleeds into the next glyph.
const GLYPH_PADDING: u32 = 1;

/// Shelf packer over a fixed-size bitmap.
///
/// Glyphs are placed left to right; a new shelf starts below the tallest glyph
/// of the current one when the next glyph does not fit horizontally.
#[derive(Debug)]
struct ShelfPacker {
    width: u32,
    height: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor_x: GLYPH_PADDING,
            cursor_y: GLYPH_PADDING,
            row_height: 0,
        }
    }

    /// Top-left of a free `w`x`h` region, or `None` when the bitmap is full.
    fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if self.cursor_x + w + GLYPH_PADDING > self.width {
            self.cursor_y += self.row_height + GLYPH_PADDING;
            self.cursor_x = GLYPH_PADDING;
            self.row_height = 0;
        }
        if self.cursor_x + w + GLYPH_PADDING > self.width
            || self.cursor_y + h + GLYPH_PADDING > self.height
        {
            return None;
        }

        let origin = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + GLYPH_PADDING;
        self.row_height = self.row_height.max(h);
        Some(origin)
    }
}

/// Rasterizes code points 32..128 of a TrueType/OpenType font at `size`
/// pixels into `pixels`, one byte of coverage per texel.
///
/// `pixels` is cleared first. It must hold at least `width * height` bytes;
/// only that prefix is written.
pub(crate) fn bake_ttf(
    bytes: &[u8],
    size: f32,
    pixels: &mut [u8],
    width: u32,
    height: u32,
) -> Result<FontAtlas, DrawError> {
    if !(size.is_finite() && size > 0.0) {
        return Err(DrawError::FontBake(format!("invalid pixel size {size}")));
    }
    let area = width as usize * height as usize;
    if width == 0 || height == 0 || pixels.len() < area {
        return Err(DrawError::FontBake(format!(
            "atlas buffer of {} bytes cannot hold {width}x{height}",
            pixels.len()
        )));
    }

    let settings = FontSettings {
        scale: size,
        ..FontSettings::default()
    };
    let font = Font::from_bytes(bytes, settings)
        .map_err(|e| DrawError::FontBake(format!("failed to parse font: {e}")))?;

    let pixels = &mut pixels[..area];
    pixels.fill(0);

    let mut packer = ShelfPacker::new(width, height);
    let mut glyphs = Vec::with_capacity(CHAR_COUNT as usize);
    let (atlas_w, atlas_h) = (width as f32, height as f32);

    for code in FIRST_CHAR..FIRST_CHAR + CHAR_COUNT {
        let Some(ch) = char::from_u32(code) else { continue };
        let (metrics, bitmap) = font.rasterize(ch, size);
        let (w, h) = (metrics.width as u32, metrics.height as u32);

        let mut glyph = GlyphMetrics {
            // Pen sits on the baseline; `ymin` is the bitmap bottom above it.
            offset: Vec2::new(
                metrics.xmin as f32,
                -(metrics.ymin as f32 + metrics.height as f32),
            ),
            size: Vec2::new(w as f32, h as f32),
            advance: metrics.advance_width,
            ..GlyphMetrics::default()
        };

        if w > 0 && h > 0 {
            let Some((gx, gy)) = packer.place(w, h) else {
                return Err(DrawError::FontBake(format!(
                    "{width}x{height} atlas is too small for {size}px glyphs (ran out at {ch:?})"
                )));
            };
            for (row, src) in bitmap.chunks_exact(metrics.width).enumerate() {
                let start = (gy as usize + row) * width as usize + gx as usize;
                pixels[start..start + src.len()].copy_from_slice(src);
            }
            glyph.uv_min = Vec2::new(gx as f32 / atlas_w, gy as f32 / atlas_h);
            glyph.uv_max = Vec2::new((gx + w) as f32 / atlas_w, (gy + h) as f32 / atlas_h);
        }

        glyphs.push(glyph);
    }

    let line_height = font
        .horizontal_line_metrics(size)
        .map(|m| m.new_line_size)
        .unwrap_or(size);

    log::debug!(
        "baked {} glyphs at {size}px into {width}x{height} atlas",
        glyphs.len()
    );
    Ok(FontAtlas::new(width, height, size, line_height, FIRST_CHAR, glyphs, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU: &[u8] = include_bytes!("../../tests/fonts/DejaVuSans.ttf");

    fn bake(size: f32, side: u32) -> (FontAtlas, Vec<u8>) {
        // Non-zero fill so the clear is observable.
        let mut pixels = vec![0xAB; (side * side) as usize];
        let atlas = bake_ttf(DEJAVU, size, &mut pixels, side, side).unwrap();
        (atlas, pixels)
    }

    /// Same settings as the bake so outlines are flattened identically.
    fn reference(size: f32) -> Font {
        let settings = FontSettings {
            scale: size,
            ..FontSettings::default()
        };
        Font::from_bytes(DEJAVU, settings).unwrap()
    }

    #[test]
    fn bakes_printable_ascii_with_clear_padding() {
        let (atlas, pixels) = bake(24.0, 256);
        assert_eq!(atlas.range(), 32..128);
        assert_eq!(atlas.dimensions(), (256, 256));
        assert_eq!(atlas.size(), 24.0);
        assert!(atlas.line_height() > atlas.size());

        let space = atlas.glyph(' ').unwrap();
        assert_eq!(space.size, Vec2::zero());
        assert!(space.advance > 0.0);

        // Packing starts one pixel in, so the first row and column stay empty.
        assert!(pixels[..256].iter().all(|&p| p == 0));
        assert!(pixels.iter().step_by(256).all(|&p| p == 0));
        assert!(pixels.iter().any(|&p| p != 0));
    }

    #[test]
    fn glyph_offsets_hang_from_the_baseline() {
        let (atlas, _) = bake(24.0, 256);
        let font = reference(24.0);
        for ch in ['g', 'T', 'x', '.', 'j'] {
            let m = font.metrics(ch, 24.0);
            let g = atlas.glyph(ch).unwrap();
            assert_eq!(
                g.offset,
                Vec2::new(m.xmin as f32, -(m.ymin as f32 + m.height as f32)),
                "{ch:?}"
            );
            assert_eq!(g.size, Vec2::new(m.width as f32, m.height as f32));
            assert_eq!(g.advance, m.advance_width);
        }

        // Descenders reach below the baseline, caps sit on it.
        let g = atlas.glyph('g').unwrap();
        assert!(g.offset.y + g.size.y > 0.0);
        let t = atlas.glyph('T').unwrap();
        assert!(t.offset.y < 0.0);
        assert!(t.offset.y + t.size.y <= 1.0);
    }

    #[test]
    fn uv_rects_locate_each_bitmap_without_overlap() {
        let side = 256usize;
        let (atlas, pixels) = bake(24.0, side as u32);
        let font = reference(24.0);
        let mut placed: Vec<(usize, usize, usize, usize)> = Vec::new();

        for ch in '!'..='~' {
            let g = atlas.glyph(ch).unwrap();
            // Power-of-two atlas: UVs convert back to texels exactly.
            let x0 = (g.uv_min.x * side as f32) as usize;
            let y0 = (g.uv_min.y * side as f32) as usize;
            let x1 = (g.uv_max.x * side as f32) as usize;
            let y1 = (g.uv_max.y * side as f32) as usize;
            assert_eq!((x1 - x0) as f32, g.size.x, "{ch:?}");
            assert_eq!((y1 - y0) as f32, g.size.y, "{ch:?}");
            assert!(x1 <= side && y1 <= side);

            let (m, bitmap) = font.rasterize(ch, 24.0);
            for row in 0..m.height {
                let start = (y0 + row) * side + x0;
                assert_eq!(&pixels[start..start + m.width], &bitmap[row * m.width..(row + 1) * m.width]);
            }

            for &(px0, py0, px1, py1) in &placed {
                let disjoint = x1 <= px0 || px1 <= x0 || y1 <= py0 || py1 <= y0;
                assert!(disjoint, "{ch:?} overlaps another glyph");
            }
            placed.push((x0, y0, x1, y1));
        }
    }

    #[test]
    fn atlas_too_small_for_glyphs_fails() {
        let mut pixels = vec![0u8; 16 * 16];
        let err = bake_ttf(DEJAVU, 24.0, &mut pixels, 16, 16).unwrap_err();
        assert!(matches!(err, DrawError::FontBake(_)));
    }

    #[test]
    fn only_the_atlas_prefix_is_written() {
        let mut pixels = vec![0x5A; 128 * 128 + 4];
        bake_ttf(DEJAVU, 12.0, &mut pixels, 128, 128).unwrap();
        assert_eq!(&pixels[128 * 128..], &[0x5A; 4]);
    }

    #[test]
    fn packer_fills_rows_then_wraps() {
        let mut packer = ShelfPacker::new(16, 16);
        assert_eq!(packer.place(6, 4), Some((1, 1)));
        assert_eq!(packer.place(6, 3), Some((8, 1)));
        // 15 + 6 + 1 > 16: next shelf starts below the tallest glyph.
        assert_eq!(packer.place(6, 2), Some((1, 6)));
    }

    #[test]
    fn packer_reports_full() {
        let mut packer = ShelfPacker::new(8, 8);
        assert_eq!(packer.place(6, 6), Some((1, 1)));
        assert_eq!(packer.place(6, 6), None);
    }

    #[test]
    fn packer_rejects_glyph_wider_than_atlas() {
        let mut packer = ShelfPacker::new(8, 64);
        assert_eq!(packer.place(7, 2), None);
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let mut pixels = vec![0u8; 64 * 64];
        let err = bake_ttf(b"not a font", 16.0, &mut pixels, 64, 64).unwrap_err();
        assert!(matches!(err, DrawError::FontBake(_)));
    }

    #[test]
    fn short_buffer_is_rejected_before_parsing() {
        let mut pixels = vec![0u8; 10];
        let err = bake_ttf(b"", 16.0, &mut pixels, 64, 64).unwrap_err();
        assert!(err.to_string().contains("cannot hold 64x64"));
    }

    #[test]
    fn non_positive_size_is_rejected() {
        let mut pixels = vec![0u8; 16];
        assert!(bake_ttf(b"", 0.0, &mut pixels, 4, 4).is_err());
        assert!(bake_ttf(b"", f32::NAN, &mut pixels, 4, 4).is_err());
    }
}
