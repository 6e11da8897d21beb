//! Vello CPU renderer implementation.

use crate::renderer::{RenderResult, RendererError};
use crate::surface::{StrokeStyle, Surface};
use ab_glyph::{Font, FontArc, OutlineCurve, PxScale, ScaleFont};
use image::RgbaImage;
use kurbo::{BezPath, PathEl, Point};
use peniko::Color;
use vello_cpu::kurbo as vk;

/// Surface that builds a vello CPU scene and rasterizes it on demand.
///
/// Text needs a font; without one it is skipped.
pub struct VelloSurface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    font: Option<FontArc>,
}

impl std::fmt::Debug for VelloSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VelloSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl VelloSurface {
    /// Create an empty, fully transparent surface.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let invalid = || RendererError::InvalidSize { width, height };
        let w = u16::try_from(width).ok().filter(|&w| w > 0).ok_or_else(invalid)?;
        let h = u16::try_from(height).ok().filter(|&h| h > 0).ok_or_else(invalid)?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
            font: None,
        })
    }

    /// Use `font` for text shapes.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Parse a TrueType/OpenType font from bytes.
    pub fn load_font(bytes: Vec<u8>) -> RenderResult<FontArc> {
        FontArc::try_from_vec(bytes).map_err(|e| RendererError::Font(e.to_string()))
    }

    /// Rasterize everything drawn so far into a straight-alpha image.
    pub fn render_image(&mut self) -> RenderResult<RgbaImage> {
        let mut target = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut target);

        let rgba: Vec<u8> = target
            .data()
            .iter()
            .flat_map(|p| unpremultiply([p.r, p.g, p.b, p.a]))
            .collect();
        RgbaImage::from_raw(self.width.into(), self.height.into(), rgba)
            .ok_or_else(|| RendererError::Encode("pixel buffer size mismatch".to_string()))
    }

    fn set_color(&mut self, color: Color) {
        let c = color.to_rgba8();
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }
}

fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
    [un(r), un(g), un(b), a]
}

fn to_backend_point(p: Point) -> vk::Point {
    vk::Point::new(p.x, p.y)
}

/// Rebuild a path in the backend's geometry types.
fn to_backend_path(path: &BezPath) -> vk::BezPath {
    let mut out = vk::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(to_backend_point(p)),
            PathEl::LineTo(p) => out.line_to(to_backend_point(p)),
            PathEl::QuadTo(a, b) => out.quad_to(to_backend_point(a), to_backend_point(b)),
            PathEl::CurveTo(a, b, c) => {
                out.curve_to(to_backend_point(a), to_backend_point(b), to_backend_point(c))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Glyph outlines for `text` laid out on one baseline starting at `origin`.
fn text_path(font: &FontArc, text: &str, origin: Point, font_size: f64) -> BezPath {
    let scaled = font.as_scaled(PxScale::from(font_size as f32));
    let (sx, sy) = (scaled.h_scale_factor() as f64, scaled.v_scale_factor() as f64);

    let mut path = BezPath::new();
    let mut caret = origin.x;
    let mut previous = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id) as f64;
        }
        previous = Some(id);

        // Font units are y-up.
        let map = |p: ab_glyph::Point| Point::new(caret + p.x as f64 * sx, origin.y - p.y as f64 * sy);
        if let Some(outline) = font.outline(id) {
            let mut pen: Option<ab_glyph::Point> = None;
            for curve in &outline.curves {
                let (start, end) = match *curve {
                    OutlineCurve::Line(a, b) => (a, b),
                    OutlineCurve::Quad(a, _, c) => (a, c),
                    OutlineCurve::Cubic(a, _, _, d) => (a, d),
                };
                if pen != Some(start) {
                    path.move_to(map(start));
                }
                match *curve {
                    OutlineCurve::Line(_, b) => path.line_to(map(b)),
                    OutlineCurve::Quad(_, b, c) => path.quad_to(map(b), map(c)),
                    OutlineCurve::Cubic(_, b, c, d) => path.curve_to(map(b), map(c), map(d)),
                }
                pen = Some(end);
            }
        }
        caret += scaled.h_advance(id) as f64;
    }
    path
}

impl Surface for VelloSurface {
    fn size(&self) -> (u32, u32) {
        (self.width.into(), self.height.into())
    }

    fn clear(&mut self, color: Color) {
        self.ctx.reset();
        self.set_color(color);
        self.ctx
            .fill_rect(&vk::Rect::new(0.0, 0.0, self.width as f64, self.height as f64));
    }

    fn stroke_path(&mut self, path: &BezPath, style: &StrokeStyle) {
        let stroke = vk::Stroke::new(style.width)
            .with_caps(vk::Cap::Round)
            .with_join(vk::Join::Round);
        self.ctx.set_stroke(stroke);
        self.set_color(style.color);
        self.ctx.stroke_path(&to_backend_path(path));
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.set_color(color);
        self.ctx.fill_path(&to_backend_path(path));
    }

    fn fill_text(&mut self, text: &str, origin: Point, font_size: f64, color: Color) {
        let Some(font) = &self.font else {
            log::trace!("no font loaded, skipping text {text:?}");
            return;
        };
        let path = text_path(font, text, origin, font_size);
        if path.elements().is_empty() {
            return;
        }
        self.fill_path(&path, color);
    }
}
