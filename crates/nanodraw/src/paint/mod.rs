//! Color model shared by the draw state and the vertex stream.

mod color;

pub use color::Color;
