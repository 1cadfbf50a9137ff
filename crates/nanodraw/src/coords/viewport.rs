/// Column-major 4x4 matrix, laid out the way WGSL's `mat4x4<f32>` reads it.
pub type Projection = [[f32; 4]; 4];

/// Frame size in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Orthographic mapping from pixel space (top-left origin, +Y down) to
    /// normalized device coordinates.
    ///
    /// `(0, 0)` lands on `(-1, 1)` and `(width, height)` on `(1, -1)`.
    /// Degenerate sizes are clamped to one pixel so the matrix stays finite.
    pub fn ortho_projection(self) -> Projection {
        let (l, r) = (0.0, self.width.max(1.0));
        let (t, b) = (0.0, self.height.max(1.0));

        [
            [2.0 / (r - l), 0.0, 0.0, 0.0],
            [0.0, 2.0 / (t - b), 0.0, 0.0],
            [0.0, 0.0, -1.0, 0.0],
            [-(r + l) / (r - l), -(t + b) / (t - b), 0.0, 1.0],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(m: &Projection, x: f32, y: f32) -> (f32, f32) {
        // column-major: out = col0 * x + col1 * y + col3
        (
            m[0][0] * x + m[1][0] * y + m[3][0],
            m[0][1] * x + m[1][1] * y + m[3][1],
        )
    }

    fn assert_near(got: (f32, f32), want: (f32, f32)) {
        assert!(
            (got.0 - want.0).abs() < 1e-5 && (got.1 - want.1).abs() < 1e-5,
            "{got:?} != {want:?}"
        );
    }

    #[test]
    fn corners_map_to_ndc() {
        let m = Viewport::new(800.0, 600.0).ortho_projection();
        assert_near(apply(&m, 0.0, 0.0), (-1.0, 1.0));
        assert_near(apply(&m, 800.0, 600.0), (1.0, -1.0));
        assert_near(apply(&m, 400.0, 300.0), (0.0, 0.0));
    }

    #[test]
    fn zero_size_stays_finite() {
        let m = Viewport::new(0.0, 0.0).ortho_projection();
        assert!(m.iter().flatten().all(|v| v.is_finite()));
        assert!(!Viewport::new(0.0, 10.0).is_valid());
    }
}
