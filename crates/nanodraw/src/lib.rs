//! nanodraw: a small immediate-mode 2D renderer.
//!
//! Rectangles, outlines, lines, and bitmap-font text are turned into vertices
//! and accumulated in one bounded batch. A batch is submitted to the backend
//! when the binding (topology, program, texture) changes, when it is full, or
//! when the frame ends, so runs of similar primitives cost a single draw.
//!
//! Layers, bottom up:
//! - `coords`, `paint`: value types (pixels, straight-alpha colors)
//! - `batch`: vertex format, binding keys, the bounded vertex buffer
//! - `render`: the [`Rasterizer`](render::Rasterizer) seam and its backends
//! - `text`: glyph atlases baked from TrueType or console bitmaps
//! - `engine`: [`DrawEngine`], the public drawing API

pub mod batch;
pub mod config;
pub mod coords;
pub mod engine;
pub mod error;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;

pub use config::DrawConfig;
pub use engine::{Command, DrawEngine, DrawState, FrameStats};
pub use error::DrawError;
pub use paint::Color;
