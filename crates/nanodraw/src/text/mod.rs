//! Glyph atlases and the font registry.
//!
//! The draw engine treats a font as an opaque lookup from a character and a
//! pen position to a quad, a UV rectangle, and an advance. Two sources feed
//! that lookup:
//! - proportional TrueType/OpenType fonts baked once per size with `fontdue`
//! - fixed 8x8 console fonts unpacked from a 1-bit bitmap
//!
//! No shaping, kerning, or hinting happens here.

mod atlas;
mod bake;
mod console;
mod registry;

pub use atlas::{FontAtlas, GlyphMetrics, GlyphQuad, GlyphRun};
pub use console::{CONSOLE_BITMAP_LEN, CONSOLE_CELL};
pub use registry::{FontId, FontRegistry};

pub(crate) use bake::bake_ttf;
pub(crate) use console::bake_console;
