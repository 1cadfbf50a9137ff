use super::Vec2;

/// Axis-aligned rectangle in pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Builds a rectangle spanning two corners given in any order.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        Rect::new(x0, y0, a.x.max(b.x) - x0, a.y.max(b.y) - y0)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Smallest rectangle containing both `self` and `other`.
    ///
    /// Zero-area rectangles still contribute their corners, so a run of
    /// blank glyphs keeps its horizontal extent.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        Rect::from_corners(
            Vec2::new(a0.x.min(b0.x), a0.y.min(b0.y)),
            Vec2::new(a1.x.max(b1.x), a1.y.max(b1.y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_corners_orders_any_pair() {
        let r = Rect::from_corners(Vec2::new(60.0, 40.0), Vec2::new(10.0, 10.0));
        assert_eq!(r, Rect::new(10.0, 10.0, 50.0, 30.0));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, -4.0, 20.0, 2.0);
        assert_eq!(a.union(b), Rect::new(0.0, -4.0, 25.0, 14.0));
    }

    #[test]
    fn union_keeps_degenerate_extent() {
        let a = Rect::new(0.0, 0.0, 0.0, 0.0);
        let b = Rect::new(8.0, 0.0, 0.0, 0.0);
        let u = a.union(b);
        assert_eq!(u.width(), 8.0);
        assert!(u.is_empty());
    }
}
