//! Geometry value types.
//!
//! Canonical CPU space:
//! - pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! Conversion to clip space happens once per frame through
//! [`Viewport::ortho_projection`].

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::{Projection, Viewport};
