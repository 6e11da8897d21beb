//! Vector export of a document as standalone SVG markup.

use crate::document::Document;
use crate::shapes::{Arrow, Geometry, Text};
use std::fmt::{self, Write};

/// Default export canvas width.
pub const DEFAULT_EXPORT_WIDTH: u32 = 3000;
/// Default export canvas height.
pub const DEFAULT_EXPORT_HEIGHT: u32 = 3000;

const ARROWHEAD_ID: &str = "arrowhead";

/// SVG exporter configuration.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    /// Canvas width in user units.
    pub width: u32,
    /// Canvas height in user units.
    pub height: u32,
    /// Stroke and text color, any SVG paint.
    pub stroke: String,
    pub stroke_width: f64,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            width: DEFAULT_EXPORT_WIDTH,
            height: DEFAULT_EXPORT_HEIGHT,
            stroke: "black".to_string(),
            stroke_width: 2.0,
        }
    }
}

impl SvgExporter {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = stroke.into();
        self
    }

    #[must_use]
    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    /// Render the document to an SVG string.
    #[must_use]
    pub fn export(&self, document: &Document) -> String {
        let mut out = String::new();
        // Formatting into a String is infallible.
        let _ = self.write_to(&mut out, document);
        out
    }

    /// Stream the SVG into any formatter sink.
    pub fn write_to(&self, out: &mut impl Write, document: &Document) -> fmt::Result {
        let (w, h) = (self.width, self.height);
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        )?;

        let has_arrows = document.iter().any(|s| matches!(s.geometry(), Geometry::Arrow(_)));
        if has_arrows {
            self.write_arrowhead_def(out)?;
        }

        for shape in document {
            self.write_geometry(out, shape.geometry())?;
        }
        out.write_str("</svg>\n")
    }

    fn stroke_attrs(&self) -> String {
        format!(
            "fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"",
            self.stroke, self.stroke_width
        )
    }

    /// Arrowhead marker matching the rendered head: sides of
    /// [`Arrow::HEAD_SIZE`] at [`Arrow::HEAD_ANGLE`] from the shaft.
    fn write_arrowhead_def(&self, out: &mut impl Write) -> fmt::Result {
        let len = Arrow::HEAD_SIZE * Arrow::HEAD_ANGLE.cos();
        let half = Arrow::HEAD_SIZE * Arrow::HEAD_ANGLE.sin();
        writeln!(
            out,
            "<defs><marker id=\"{ARROWHEAD_ID}\" markerUnits=\"userSpaceOnUse\" \
             markerWidth=\"{len}\" markerHeight=\"{h}\" refX=\"{len}\" refY=\"{half}\" orient=\"auto\">\
             <path d=\"M 0 0 L {len} {half} L 0 {h} Z\" fill=\"{}\"/></marker></defs>",
            self.stroke,
            h = half * 2.0,
        )
    }

    fn write_geometry(&self, out: &mut impl Write, geometry: &Geometry) -> fmt::Result {
        let stroke = self.stroke_attrs();
        match geometry {
            Geometry::Pencil(p) => {
                out.write_str("<path d=\"")?;
                for (i, pt) in p.points.iter().enumerate() {
                    let op = if i == 0 { "M" } else { " L" };
                    write!(out, "{op} {} {}", pt.x, pt.y)?;
                }
                writeln!(
                    out,
                    "\" {stroke} stroke-linecap=\"round\" stroke-linejoin=\"round\"/>"
                )
            }
            Geometry::Rectangle(r) => {
                let rect = r.normalized();
                writeln!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {stroke}/>",
                    rect.x0,
                    rect.y0,
                    rect.width(),
                    rect.height()
                )
            }
            Geometry::Line(l) => writeln!(
                out,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {stroke} stroke-linecap=\"round\"/>",
                l.x1, l.y1, l.x2, l.y2
            ),
            Geometry::Arrow(a) => writeln!(
                out,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {stroke} stroke-linecap=\"round\" \
                 marker-end=\"url(#{ARROWHEAD_ID})\"/>",
                a.x1, a.y1, a.x2, a.y2
            ),
            Geometry::Circle(c) => writeln!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" {stroke}/>",
                c.cx, c.cy, c.r
            ),
            Geometry::Text(t) => {
                write!(
                    out,
                    "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
                    t.x,
                    t.y,
                    Text::FONT_FAMILY,
                    Text::FONT_SIZE,
                    self.stroke
                )?;
                svg_escape_into(out, &t.text)?;
                out.write_str("</text>\n")
            }
        }
    }
}

/// Export with black 2-unit strokes on a `width` × `height` canvas.
pub fn export_svg(document: &Document, width: u32, height: u32) -> String {
    SvgExporter::new(width, height).export(document)
}

fn svg_escape_into(out: &mut impl Write, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '&' => out.write_str("&amp;")?,
            _ => out.write_char(c)?,
        }
    }
    Ok(())
}
