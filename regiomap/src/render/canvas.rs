//! Raster drawing onto a pixel canvas.

use geo::{Geometry, LineString, Polygon};
use tiny_skia::{
    Color, FillRule, Paint, PathBuilder, Pixmap, Shader, Stroke, Transform,
};

use crate::geometry::GeometrySet;
use crate::scalebar::ScaleBarSpec;
use crate::viewport::Viewport;

use super::glyphs::{glyph_segments, label_width, GLYPH_ADVANCE};
use super::pixel::PixelMap;
use super::style::{Background, Rgba, ScaleBarStyle};
use super::target::RenderTarget;
use super::RenderError;

fn to_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn solid_paint(c: Rgba) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(to_color(c)),
        anti_alias: true,
        ..Paint::default()
    }
}

/// A pixel canvas cropped to one viewport.
///
/// The pixmap is allocated at exactly the target's pixel size; everything
/// outside the viewport is clipped by construction of the coordinate map.
pub(crate) struct Canvas {
    pixmap: Pixmap,
    map: PixelMap,
    point_scale: f32,
}

impl Canvas {
    /// Allocate a canvas for `target`, fill the background, and set up the
    /// viewport crop.
    pub(crate) fn new(target: &RenderTarget, viewport: &Viewport) -> Result<Self, RenderError> {
        let mut pixmap =
            Pixmap::new(target.width, target.height).ok_or(RenderError::CanvasAllocation {
                width: target.width,
                height: target.height,
            })?;
        if let Background::Opaque(color) = target.background {
            pixmap.fill(to_color(color));
        }
        Ok(Self {
            pixmap,
            map: PixelMap::new(viewport, target.width, target.height),
            point_scale: target.point_scale(),
        })
    }

    /// Draw every feature of `set` with the given fill and border.
    pub(crate) fn draw_set(&mut self, set: &GeometrySet, fill: Rgba, border: Rgba, border_pt: f32) {
        let mut areas = PathBuilder::new();
        let mut lines = PathBuilder::new();
        for feature in set.features() {
            self.add_geometry(&feature.geometry, &mut areas, &mut lines);
        }

        let stroke = Stroke {
            width: (border_pt * self.point_scale).max(0.1),
            ..Stroke::default()
        };
        if let Some(path) = areas.finish() {
            self.pixmap.fill_path(
                &path,
                &solid_paint(fill),
                FillRule::EvenOdd,
                Transform::identity(),
                None,
            );
            self.pixmap
                .stroke_path(&path, &solid_paint(border), &stroke, Transform::identity(), None);
        }
        if let Some(path) = lines.finish() {
            self.pixmap
                .stroke_path(&path, &solid_paint(border), &stroke, Transform::identity(), None);
        }
    }

    fn add_geometry(&self, geometry: &Geometry<f64>, areas: &mut PathBuilder, lines: &mut PathBuilder) {
        match geometry {
            Geometry::Polygon(p) => self.add_polygon(p, areas),
            Geometry::MultiPolygon(mp) => {
                for p in &mp.0 {
                    self.add_polygon(p, areas);
                }
            }
            Geometry::LineString(ls) => self.add_line_string(ls, lines, false),
            Geometry::MultiLineString(mls) => {
                for ls in &mls.0 {
                    self.add_line_string(ls, lines, false);
                }
            }
            Geometry::Point(p) => self.add_point(p.x(), p.y(), areas),
            Geometry::MultiPoint(mp) => {
                for p in &mp.0 {
                    self.add_point(p.x(), p.y(), areas);
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in &gc.0 {
                    self.add_geometry(g, areas, lines);
                }
            }
            Geometry::Line(l) => {
                let (x1, y1) = self.map.project(l.start.x, l.start.y);
                let (x2, y2) = self.map.project(l.end.x, l.end.y);
                lines.move_to(x1, y1);
                lines.line_to(x2, y2);
            }
            Geometry::Rect(r) => self.add_polygon(&r.to_polygon(), areas),
            Geometry::Triangle(t) => self.add_polygon(&t.to_polygon(), areas),
        }
    }

    fn add_polygon(&self, polygon: &Polygon<f64>, pb: &mut PathBuilder) {
        self.add_line_string(polygon.exterior(), pb, true);
        for interior in polygon.interiors() {
            self.add_line_string(interior, pb, true);
        }
    }

    fn add_line_string(&self, ls: &LineString<f64>, pb: &mut PathBuilder, close: bool) {
        let mut coords = ls.coords();
        let Some(first) = coords.next() else {
            return;
        };
        let (x, y) = self.map.project(first.x, first.y);
        pb.move_to(x, y);
        for coord in coords {
            let (x, y) = self.map.project(coord.x, coord.y);
            pb.line_to(x, y);
        }
        if close {
            pb.close();
        }
    }

    fn add_point(&self, x: f64, y: f64, pb: &mut PathBuilder) {
        let (px, py) = self.map.project(x, y);
        pb.push_circle(px, py, 2.0 * self.point_scale);
    }

    /// Draw the scale bar with end ticks and a stroked label.
    pub(crate) fn draw_scale_bar(&mut self, spec: &ScaleBarSpec, style: &ScaleBarStyle) {
        let w = self.pixmap.width() as f32;
        let h = self.pixmap.height() as f32;

        let (ox, oy) = spec.anchor.origin();
        let x0 = ox as f32 * w;
        let y0 = h - oy as f32 * h;
        let len_px = spec.fraction_of_width as f32 * w;
        let tick_px = 0.02 * len_px;

        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x0 + len_px, y0);
        for x in [x0, x0 + len_px] {
            pb.move_to(x, y0);
            pb.line_to(x, y0 - tick_px);
        }

        let stroke = Stroke {
            width: (style.line_width * self.point_scale).max(0.5),
            ..Stroke::default()
        };
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &solid_paint(style.color),
                &stroke,
                Transform::identity(),
                None,
            );
        }

        let glyph_h = style.font_size * self.point_scale;
        let baseline = y0 - tick_px * 1.5;
        let left = x0 + len_px / 2.0 - label_width(&spec.label) * glyph_h / 2.0;
        self.draw_label(&spec.label, left, baseline, glyph_h, style.color);
    }

    fn draw_label(&mut self, label: &str, left: f32, baseline: f32, glyph_h: f32, color: Rgba) {
        let mut pb = PathBuilder::new();
        for (i, c) in label.chars().enumerate() {
            let origin_x = left + i as f32 * GLYPH_ADVANCE * glyph_h;
            for ((sx1, sy1), (sx2, sy2)) in glyph_segments(c) {
                pb.move_to(origin_x + sx1 * glyph_h, baseline - sy1 * glyph_h);
                pb.line_to(origin_x + sx2 * glyph_h, baseline - sy2 * glyph_h);
            }
        }
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width: (glyph_h / 8.0).max(1.0),
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &solid_paint(color),
            &stroke,
            Transform::identity(),
            None,
        );
    }

    /// Encode the finished canvas as PNG bytes.
    pub(crate) fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::ExportFailed {
                format: super::target::ExportFormat::Png,
                message: e.to_string(),
            })
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<tiny_skia::PremultipliedColorU8> {
        self.pixmap.pixel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::Crs;
    use crate::geometry::{Extent, Feature};
    use crate::scalebar::{Anchor, ScaleBarSpec};
    use crate::viewport;
    use geo::polygon;

    fn square_set(x0: f64, size: f64) -> GeometrySet {
        GeometrySet::new(
            Crs::from_epsg(3035),
            vec![Feature::new(
                Geometry::Polygon(polygon![
                    (x: x0, y: x0),
                    (x: x0 + size, y: x0),
                    (x: x0 + size, y: x0 + size),
                    (x: x0, y: x0 + size),
                    (x: x0, y: x0),
                ]),
                None,
            )],
        )
    }

    fn test_target() -> RenderTarget {
        RenderTarget {
            width: 100,
            height: 100,
            dpi: 100,
            formats: vec![],
            background: Background::Transparent,
        }
    }

    fn test_viewport() -> Viewport {
        viewport::fit(&Extent::new(0.0, 0.0, 10.0, 10.0), 1.0, 1.0).unwrap()
    }

    #[test]
    fn test_canvas_is_exact_pixel_size() {
        let canvas = Canvas::new(&test_target(), &test_viewport()).unwrap();
        assert_eq!(canvas.pixmap.width(), 100);
        assert_eq!(canvas.pixmap.height(), 100);
    }

    #[test]
    fn test_transparent_background() {
        let canvas = Canvas::new(&test_target(), &test_viewport()).unwrap();
        let px = canvas.pixel(50, 50).unwrap();
        assert_eq!(px.alpha(), 0);
    }

    #[test]
    fn test_opaque_background() {
        let target = RenderTarget {
            background: Background::Opaque(Rgba::opaque(10, 20, 30)),
            ..test_target()
        };
        let canvas = Canvas::new(&target, &test_viewport()).unwrap();
        let px = canvas.pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (10, 20, 30, 255));
    }

    #[test]
    fn test_fill_lands_inside_polygon() {
        let mut canvas = Canvas::new(&test_target(), &test_viewport()).unwrap();
        canvas.draw_set(&square_set(2.0, 6.0), Rgba::opaque(200, 0, 0), Rgba::BLACK, 1.0);

        // World (5, 5) is pixel (50, 50), well inside the square.
        let inside = canvas.pixel(50, 50).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue()), (200, 0, 0));

        // World (1, 1) is pixel (10, 90), outside the square.
        let outside = canvas.pixel(10, 90).unwrap();
        assert_eq!(outside.alpha(), 0);
    }

    #[test]
    fn test_later_layer_draws_on_top() {
        let mut canvas = Canvas::new(&test_target(), &test_viewport()).unwrap();
        canvas.draw_set(&square_set(2.0, 6.0), Rgba::opaque(200, 0, 0), Rgba::BLACK, 1.0);
        canvas.draw_set(&square_set(2.0, 6.0), Rgba::opaque(0, 180, 0), Rgba::BLACK, 1.0);

        let px = canvas.pixel(50, 50).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0, 180, 0));
    }

    #[test]
    fn test_scale_bar_marks_pixels() {
        let mut canvas = Canvas::new(&test_target(), &test_viewport()).unwrap();
        let spec = ScaleBarSpec {
            length_m: 1000.0,
            label: "1 km".to_string(),
            anchor: Anchor::BottomLeft,
            fraction_of_width: 0.4,
        };
        canvas.draw_scale_bar(&spec, &ScaleBarStyle::default());

        // The bar starts at x = 5 and runs to x = 45 at y = 95; sample the
        // middle of the line.
        let px = canvas.pixel(25, 95).unwrap();
        assert!(px.alpha() > 0, "scale bar left no trace");
    }

    #[test]
    fn test_png_encoding_round_trip() {
        let mut canvas = Canvas::new(&test_target(), &test_viewport()).unwrap();
        canvas.draw_set(&square_set(2.0, 6.0), Rgba::opaque(200, 0, 0), Rgba::BLACK, 1.0);
        let bytes = canvas.encode_png().unwrap();

        let decoded = Pixmap::decode_png(&bytes).unwrap();
        assert_eq!(decoded.width(), 100);
        assert_eq!(decoded.height(), 100);
    }
}
