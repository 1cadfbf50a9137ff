use std::path::Path;

use crate::batch::{BindingKey, Vertex, quad_corners};
use crate::coords::{Rect, Vec2};
use crate::error::DrawError;
use crate::render::Rasterizer;
use crate::text::{CONSOLE_CELL, FontId, GlyphQuad, bake_console, bake_ttf};

use super::DrawEngine;

impl<R: Rasterizer> DrawEngine<R> {
    // ── font loading ───────────────────────────────────────────────────────

    /// Bakes a TrueType/OpenType font at `size` pixels and registers it.
    ///
    /// Glyphs for code points 32..128 are rasterized into `atlas`, which is
    /// then uploaded as a `width` x `height` coverage texture. A font already
    /// loaded under the same `(name, size)` is returned as is and `atlas` is
    /// left untouched.
    pub fn load_font(
        &mut self,
        name: &str,
        ttf: &[u8],
        size: f32,
        atlas: &mut [u8],
        width: u32,
        height: u32,
    ) -> Result<FontId, DrawError> {
        if let Some(id) = self.fonts.lookup(name, size) {
            log::debug!("font '{name}' at {size}px already loaded as {id:?}");
            return Ok(id);
        }

        let baked = bake_ttf(ttf, size, atlas, width, height)?;
        let pixels = &atlas[..width as usize * height as usize];
        let texture = self.batcher.raster.create_texture(width, height, pixels)?;
        let id = self.fonts.insert(name, size, baked, texture);

        log::debug!("loaded font '{name}' at {size}px as {id:?} ({width}x{height} atlas)");
        Ok(id)
    }

    /// Reads a font file and loads it with its path as the name.
    pub fn load_font_file(
        &mut self,
        path: impl AsRef<Path>,
        size: f32,
        atlas: &mut [u8],
        width: u32,
        height: u32,
    ) -> Result<FontId, DrawError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        if let Some(id) = self.fonts.lookup(&name, size) {
            return Ok(id);
        }
        let bytes = std::fs::read(path)?;
        self.load_font(&name, &bytes, size, atlas, width, height)
    }

    /// Registers a fixed 8x8 console font from its packed 1-bit bitmap.
    ///
    /// See [`CONSOLE_BITMAP_LEN`](crate::text::CONSOLE_BITMAP_LEN) for the
    /// expected layout.
    pub fn load_console_font(&mut self, name: &str, bitmap: &[u8]) -> Result<FontId, DrawError> {
        let size = CONSOLE_CELL as f32;
        if let Some(id) = self.fonts.lookup(name, size) {
            return Ok(id);
        }

        let (baked, pixels) = bake_console(bitmap)?;
        let (width, height) = baked.dimensions();
        let texture = self.batcher.raster.create_texture(width, height, &pixels)?;
        let id = self.fonts.insert(name, size, baked, texture);

        log::debug!("loaded console font '{name}' as {id:?}");
        Ok(id)
    }

    // ── drawing ────────────────────────────────────────────────────────────

    /// Active font for [`Command::DrawText`](super::Command::DrawText).
    pub fn set_font(&mut self, font: FontId) {
        self.state.font = Some(font);
    }

    /// Draws `text` with the pen starting at `(x, y)`.
    ///
    /// For proportional fonts `y` is the baseline; console fonts place the
    /// cell's top-left corner at the pen. Returns the advanced width.
    pub fn draw_text(&mut self, font: FontId, text: &str, x: f32, y: f32) -> f32 {
        self.draw_text_scaled(font, text, x, y, 1.0)
    }

    /// [`draw_text`](Self::draw_text) with glyph quads and advances scaled.
    pub fn draw_text_scaled(&mut self, font: FontId, text: &str, x: f32, y: f32, scale: f32) -> f32 {
        self.assert_framing("draw_text");
        let Some((atlas, texture)) = self.fonts.get(font) else {
            log::warn!("draw_text: unknown {font:?}");
            return 0.0;
        };

        let key = BindingKey::glyphs(self.batcher.program(), texture);
        let color = self.state.fill;
        let mut run = atlas.layout(text, Vec2::new(x, y), scale);

        for quad in run.by_ref() {
            let verts = glyph_vertices(&quad).map(|(p, uv)| Vertex::glyph(p, uv, color));
            self.batcher.push(key, &verts);
        }
        run.advance()
    }

    /// Box `text` would cover if drawn with the pen at the origin.
    ///
    /// Width is the advanced width, exactly what `draw_text` at `(0, 0)`
    /// returns; the vertical extent spans the glyph quads. Nothing is drawn.
    pub fn measure_text(&self, font: FontId, text: &str) -> Rect {
        self.measure_text_scaled(font, text, 1.0)
    }

    pub fn measure_text_scaled(&self, font: FontId, text: &str, scale: f32) -> Rect {
        let Some(atlas) = self.fonts.atlas(font) else {
            log::warn!("measure_text: unknown {font:?}");
            return Rect::default();
        };

        let mut run = atlas.layout(text, Vec2::zero(), scale);
        let bounds = run.by_ref().map(|q| q.bounds()).reduce(Rect::union);
        let (top, height) = bounds.map_or((0.0, 0.0), |b| (b.origin.y, b.height()));
        Rect::new(0.0, top, run.advance(), height)
    }
}

fn glyph_vertices(quad: &GlyphQuad) -> [(Vec2, Vec2); 6] {
    let pos = quad_corners(quad.min, quad.max);
    let uv = quad_corners(quad.uv_min, quad.uv_max);
    std::array::from_fn(|i| (pos[i], uv[i]))
}
