use crate::batch::{BindingKey, Vertex, quad_corners};
use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::render::Rasterizer;

use super::DrawEngine;

impl<R: Rasterizer> DrawEngine<R> {
    // ── state ──────────────────────────────────────────────────────────────

    /// Fill color for rectangles and text.
    pub fn set_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    /// Color for outlines and lines.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.state.stroke_width = width;
    }

    // ── primitives ─────────────────────────────────────────────────────────

    /// Filled rectangle: two triangles, six vertices.
    pub fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.assert_framing("draw_rect");
        let color = self.state.fill;
        let corners = quad_corners(Vec2::new(x, y), Vec2::new(x + w, y + h));
        let verts = corners.map(|p| Vertex::shape(p, color));
        let key = BindingKey::shapes(self.batcher.program());
        self.batcher.push(key, &verts);
    }

    /// Rectangle outline drawn inside the bounds.
    ///
    /// The band width is the stroke width clamped to half the smaller side,
    /// so thick outlines on small rectangles fill them instead of overlapping.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.assert_framing("stroke_rect");
        if self.state.stroke_width <= 0.0 {
            return;
        }

        let r = Rect::new(x, y, w, h);
        let r = Rect::from_corners(r.min(), r.max());
        let t = self.state.stroke_width.min(r.width() * 0.5).min(r.height() * 0.5);
        let (p0, p1) = (r.min(), r.max());

        let bands = [
            // top, bottom
            (p0, Vec2::new(p1.x, p0.y + t)),
            (Vec2::new(p0.x, p1.y - t), p1),
            // left, right (between the horizontal bands)
            (Vec2::new(p0.x, p0.y + t), Vec2::new(p0.x + t, p1.y - t)),
            (Vec2::new(p1.x - t, p0.y + t), Vec2::new(p1.x, p1.y - t)),
        ];

        let color = self.state.stroke;
        let mut verts = [Vertex::shape(Vec2::zero(), color); 24];
        for (band, (min, max)) in bands.into_iter().enumerate() {
            for (i, p) in quad_corners(min, max).into_iter().enumerate() {
                verts[band * 6 + i] = Vertex::shape(p, color);
            }
        }

        let key = BindingKey::shapes(self.batcher.program());
        self.batcher.push(key, &verts);
    }

    /// Line segment in the stroke color.
    ///
    /// Widths up to one pixel draw a hairline through the line-list pipeline.
    /// Wider lines become a quad centred on the segment.
    pub fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.assert_framing("draw_line");
        let color = self.state.stroke;
        let width = self.state.stroke_width;
        let (a, b) = (Vec2::new(x0, y0), Vec2::new(x1, y1));
        let program = self.batcher.program();

        if width <= 1.0 {
            let verts = [Vertex::shape(a, color), Vertex::shape(b, color)];
            self.batcher.push(BindingKey::lines(program), &verts);
            return;
        }

        let d = b - a;
        let len = d.length();
        // Zero-length lines collapse to a point.
        let n = if len > 0.0 {
            Vec2::new(-d.y, d.x) * (width * 0.5 / len)
        } else {
            Vec2::zero()
        };

        let verts = [a + n, b + n, a - n, b + n, b - n, a - n].map(|p| Vertex::shape(p, color));
        self.batcher.push(BindingKey::shapes(program), &verts);
    }
}

#[cfg(test)]
mod tests {
    use crate::batch::{Topology, VertexKind};
    use crate::config::DrawConfig;
    use crate::engine::DrawEngine;
    use crate::paint::Color;
    use crate::render::RecordingRasterizer;

    fn engine(capacity: usize) -> DrawEngine<RecordingRasterizer> {
        let mut e =
            DrawEngine::create(RecordingRasterizer::new(), DrawConfig::with_capacity(capacity)).unwrap();
        e.begin(200.0, 200.0);
        e
    }

    #[test]
    fn red_rect_has_six_red_vertices_in_order() {
        let mut e = engine(64);
        e.set_color(Color::RED);
        e.draw_rect(10.0, 10.0, 50.0, 30.0);
        e.end();

        let subs = e.raster().submissions();
        assert_eq!(subs.len(), 1);
        let positions: Vec<[f32; 2]> = subs[0].vertices.iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            [[10.0, 10.0], [60.0, 10.0], [10.0, 40.0], [60.0, 10.0], [60.0, 40.0], [10.0, 40.0]]
        );
        for v in &subs[0].vertices {
            assert_eq!(v.color, Color::RED.to_array());
            assert_eq!(v.uv, [0.0, 0.0]);
            assert_eq!(v.kind(), VertexKind::Shape);
        }
        assert_eq!(subs[0].binding.texture, None);
    }

    #[test]
    fn color_changes_alone_do_not_split_batches() {
        let mut e = engine(64);
        e.set_color(Color::RED);
        e.draw_rect(0.0, 0.0, 5.0, 5.0);
        e.set_color(Color::BLUE);
        e.draw_rect(5.0, 5.0, 5.0, 5.0);
        let stats = e.end();

        assert_eq!(stats.submissions, 1);
        assert_eq!(e.raster().submissions()[0].vertices.len(), 12);
    }

    #[test]
    fn zero_area_rect_is_still_drawn() {
        let mut e = engine(64);
        e.set_color(Color::TRANSPARENT);
        e.draw_rect(3.0, 3.0, 0.0, 0.0);
        assert_eq!(e.end().vertices, 6);
    }

    #[test]
    fn stroke_rect_is_four_bands_inside_bounds() {
        let mut e = engine(64);
        e.set_stroke_color(Color::GREEN);
        e.set_stroke_width(2.0);
        e.stroke_rect(10.0, 20.0, 30.0, 40.0);
        e.end();

        let verts = &e.raster().submissions()[0].vertices;
        assert_eq!(verts.len(), 24);
        for v in verts {
            assert_eq!(v.color, Color::GREEN.to_array());
            assert!((10.0..=40.0).contains(&v.position[0]));
            assert!((20.0..=60.0).contains(&v.position[1]));
        }
        // Top band spans the full width with the stroke's thickness.
        assert_eq!(verts[0].position, [10.0, 20.0]);
        assert_eq!(verts[4].position, [40.0, 22.0]);
        // Right band sits against the right edge.
        assert_eq!(verts[18].position, [38.0, 22.0]);
    }

    #[test]
    fn stroke_width_clamps_to_half_the_smaller_side() {
        let mut e = engine(64);
        e.set_stroke_width(50.0);
        e.stroke_rect(0.0, 0.0, 10.0, 4.0);
        e.end();

        let verts = &e.raster().submissions()[0].vertices;
        // Top band ends at y = 2, the vertical middle.
        assert_eq!(verts[4].position, [10.0, 2.0]);
    }

    #[test]
    fn non_positive_stroke_width_draws_nothing() {
        let mut e = engine(64);
        e.set_stroke_width(0.0);
        e.stroke_rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(e.end().vertices, 0);
        assert!(e.raster().submissions().is_empty());
    }

    #[test]
    fn stroke_rect_flushes_whole_when_it_does_not_fit() {
        let mut e = engine(24);
        e.draw_rect(0.0, 0.0, 1.0, 1.0);
        e.stroke_rect(0.0, 0.0, 10.0, 10.0);
        let stats = e.end();

        assert_eq!(stats.overflow_flushes, 1);
        let subs = e.raster().submissions();
        assert_eq!(subs[0].vertices.len(), 6);
        assert_eq!(subs[1].vertices.len(), 24);
    }

    #[test]
    fn hairline_uses_line_list_and_splits_from_triangles() {
        let mut e = engine(64);
        e.draw_rect(0.0, 0.0, 1.0, 1.0);
        e.draw_line(0.0, 0.0, 10.0, 10.0);
        e.draw_rect(0.0, 0.0, 1.0, 1.0);
        let stats = e.end();

        assert_eq!(stats.submissions, 3);
        let subs = e.raster().submissions();
        assert_eq!(subs[1].binding.topology, Topology::LineList);
        assert_eq!(subs[1].vertices.len(), 2);
    }

    #[test]
    fn thick_line_is_a_quad_around_the_segment() {
        let mut e = engine(64);
        e.set_stroke_width(4.0);
        e.draw_line(0.0, 10.0, 20.0, 10.0);
        e.end();

        let sub = &e.raster().submissions()[0];
        assert_eq!(sub.binding.topology, Topology::TriangleList);
        let ys: Vec<f32> = sub.vertices.iter().map(|v| v.position[1]).collect();
        assert_eq!(ys, [12.0, 12.0, 8.0, 12.0, 8.0, 8.0]);
    }

    #[test]
    fn zero_length_thick_line_is_degenerate_but_valid() {
        let mut e = engine(64);
        e.set_stroke_width(3.0);
        e.draw_line(5.0, 5.0, 5.0, 5.0);
        e.end();
        let sub = &e.raster().submissions()[0];
        assert!(sub.vertices.iter().all(|v| v.position == [5.0, 5.0]));
    }
}
