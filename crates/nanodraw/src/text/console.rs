use crate::coords::Vec2;
use crate::error::DrawError;

use super::atlas::{FontAtlas, GlyphMetrics};

/// Console glyph cell edge in pixels.
pub const CONSOLE_CELL: u32 = 8;
const CONSOLE_GLYPHS: u32 = 256;
/// Size of a packed console bitmap: 8 bytes per glyph, one byte per row.
pub const CONSOLE_BITMAP_LEN: usize = (CONSOLE_GLYPHS * CONSOLE_CELL) as usize;

/// Unpacks a 1-bit 8x8 console font into a single-row coverage atlas.
///
/// Byte `8 * c + row` holds row `row` of glyph `c`, most significant bit on
/// the left. Glyph `c` lands at x = `8 * c` of a 2048x8 bitmap. Characters
/// beyond Latin-1 render as `?`.
pub(crate) fn bake_console(bitmap: &[u8]) -> Result<(FontAtlas, Vec<u8>), DrawError> {
    if bitmap.len() < CONSOLE_BITMAP_LEN {
        return Err(DrawError::FontBake(format!(
            "console bitmap needs {CONSOLE_BITMAP_LEN} bytes, got {}",
            bitmap.len()
        )));
    }

    let width = CONSOLE_GLYPHS * CONSOLE_CELL;
    let height = CONSOLE_CELL;
    let cell = CONSOLE_CELL as usize;
    let mut pixels = vec![0u8; width as usize * height as usize];

    for (glyph, rows) in bitmap[..CONSOLE_BITMAP_LEN].chunks_exact(cell).enumerate() {
        for (row, bits) in rows.iter().enumerate() {
            let start = row * width as usize + glyph * cell;
            for (col, px) in pixels[start..start + cell].iter_mut().enumerate() {
                if bits & (0x80 >> col) != 0 {
                    *px = 0xFF;
                }
            }
        }
    }

    let cell_f = CONSOLE_CELL as f32;
    let glyphs = (0..CONSOLE_GLYPHS)
        .map(|c| GlyphMetrics {
            offset: Vec2::zero(),
            size: Vec2::new(cell_f, cell_f),
            advance: cell_f,
            uv_min: Vec2::new(c as f32 / CONSOLE_GLYPHS as f32, 0.0),
            uv_max: Vec2::new((c + 1) as f32 / CONSOLE_GLYPHS as f32, 1.0),
        })
        .collect();

    let atlas = FontAtlas::new(width, height, cell_f, cell_f, 0, glyphs, Some('?' as u32));
    Ok((atlas, pixels))
}
