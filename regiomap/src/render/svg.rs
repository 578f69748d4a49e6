//! Hand-written SVG export.
//!
//! The document uses the same pixel coordinate space as the raster canvas,
//! so both outputs show an identical frame. Geometry becomes `<path>`
//! elements; the scale bar keeps real `<text>` since vector output has no
//! font-asset constraint.

use geo::{Geometry, LineString, Polygon};

use crate::geometry::GeometrySet;
use crate::scalebar::ScaleBarSpec;
use crate::viewport::Viewport;

use super::pixel::PixelMap;
use super::style::{Background, Rgba, ScaleBarStyle};
use super::target::RenderTarget;

/// An SVG document under construction, cropped to one viewport.
pub(crate) struct SvgDocument {
    body: String,
    width: u32,
    height: u32,
    point_scale: f32,
    map: PixelMap,
}

impl SvgDocument {
    pub(crate) fn new(target: &RenderTarget, viewport: &Viewport) -> Self {
        let mut doc = Self {
            body: String::new(),
            width: target.width,
            height: target.height,
            point_scale: target.point_scale(),
            map: PixelMap::new(viewport, target.width, target.height),
        };
        if let Background::Opaque(color) = target.background {
            doc.body.push_str(&format!(
                "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"{}/>\n",
                color.hex_rgb(),
                opacity_attr("fill-opacity", color)
            ));
        }
        doc
    }

    /// Append every feature of `set` as one filled, stroked path.
    pub(crate) fn draw_set(&mut self, set: &GeometrySet, fill: Rgba, border: Rgba, border_pt: f32) {
        let mut area_data = String::new();
        let mut line_data = String::new();
        for feature in set.features() {
            self.append_geometry(&feature.geometry, &mut area_data, &mut line_data);
        }

        let stroke_width = (border_pt * self.point_scale).max(0.1);
        if !area_data.is_empty() {
            self.body.push_str(&format!(
                "  <path d=\"{}\" fill=\"{}\"{} fill-rule=\"evenodd\" stroke=\"{}\"{} stroke-width=\"{:.2}\"/>\n",
                area_data.trim_end(),
                fill.hex_rgb(),
                opacity_attr("fill-opacity", fill),
                border.hex_rgb(),
                opacity_attr("stroke-opacity", border),
                stroke_width
            ));
        }
        if !line_data.is_empty() {
            self.body.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\"{} stroke-width=\"{:.2}\"/>\n",
                line_data.trim_end(),
                border.hex_rgb(),
                opacity_attr("stroke-opacity", border),
                stroke_width
            ));
        }
    }

    fn append_geometry(&self, geometry: &Geometry<f64>, areas: &mut String, lines: &mut String) {
        match geometry {
            Geometry::Polygon(p) => self.append_polygon(p, areas),
            Geometry::MultiPolygon(mp) => {
                for p in &mp.0 {
                    self.append_polygon(p, areas);
                }
            }
            Geometry::LineString(ls) => self.append_ring(ls, lines, false),
            Geometry::MultiLineString(mls) => {
                for ls in &mls.0 {
                    self.append_ring(ls, lines, false);
                }
            }
            Geometry::Point(p) => self.append_point(p.x(), p.y(), areas),
            Geometry::MultiPoint(mp) => {
                for p in &mp.0 {
                    self.append_point(p.x(), p.y(), areas);
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in &gc.0 {
                    self.append_geometry(g, areas, lines);
                }
            }
            Geometry::Line(l) => {
                let (x1, y1) = self.map.project(l.start.x, l.start.y);
                let (x2, y2) = self.map.project(l.end.x, l.end.y);
                lines.push_str(&format!("M {x1:.2} {y1:.2} L {x2:.2} {y2:.2} "));
            }
            Geometry::Rect(r) => self.append_polygon(&r.to_polygon(), areas),
            Geometry::Triangle(t) => self.append_polygon(&t.to_polygon(), areas),
        }
    }

    fn append_polygon(&self, polygon: &Polygon<f64>, out: &mut String) {
        self.append_ring(polygon.exterior(), out, true);
        for interior in polygon.interiors() {
            self.append_ring(interior, out, true);
        }
    }

    fn append_ring(&self, ls: &LineString<f64>, out: &mut String, close: bool) {
        let mut coords = ls.coords();
        let Some(first) = coords.next() else {
            return;
        };
        let (x, y) = self.map.project(first.x, first.y);
        out.push_str(&format!("M {x:.2} {y:.2} "));
        for coord in coords {
            let (x, y) = self.map.project(coord.x, coord.y);
            out.push_str(&format!("L {x:.2} {y:.2} "));
        }
        if close {
            out.push_str("Z ");
        }
    }

    fn append_point(&self, x: f64, y: f64, out: &mut String) {
        // Points become tiny squares; a path has no circle primitive.
        let (px, py) = self.map.project(x, y);
        let r = 2.0 * self.point_scale;
        out.push_str(&format!(
            "M {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} Z ",
            px - r,
            py - r,
            px + r,
            py - r,
            px + r,
            py + r,
            px - r,
            py + r
        ));
    }

    /// Append the scale bar: line, end ticks, and a text label.
    pub(crate) fn draw_scale_bar(&mut self, spec: &ScaleBarSpec, style: &ScaleBarStyle) {
        let w = self.width as f32;
        let h = self.height as f32;

        let (ox, oy) = spec.anchor.origin();
        let x0 = ox as f32 * w;
        let y0 = h - oy as f32 * h;
        let len_px = spec.fraction_of_width as f32 * w;
        let tick_px = 0.02 * len_px;
        let stroke_width = (style.line_width * self.point_scale).max(0.5);
        let color = style.color.hex_rgb();

        for (x1, y1, x2, y2) in [
            (x0, y0, x0 + len_px, y0),
            (x0, y0, x0, y0 - tick_px),
            (x0 + len_px, y0, x0 + len_px, y0 - tick_px),
        ] {
            self.body.push_str(&format!(
                "  <line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{color}\" stroke-width=\"{stroke_width:.2}\"/>\n",
            ));
        }

        let font_px = style.font_size * self.point_scale;
        self.body.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"{:.2}\" fill=\"{}\">{}</text>\n",
            x0 + len_px / 2.0,
            y0 - tick_px * 1.5,
            font_px,
            color,
            spec.label
        ));
    }

    /// Close the document and return its bytes.
    pub(crate) fn finish(self) -> Vec<u8> {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{body}</svg>\n",
            w = self.width,
            h = self.height,
            body = self.body
        )
        .into_bytes()
    }
}

fn opacity_attr(attr: &str, color: Rgba) -> String {
    if color.a == 255 {
        String::new()
    } else {
        format!(" {}=\"{:.3}\"", attr, color.opacity())
    }
}
