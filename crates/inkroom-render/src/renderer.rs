//! Deterministic painting of a document and its live preview.

use crate::surface::{StrokeStyle, Surface};
use inkroom_core::document::Document;
use inkroom_core::shapes::{Geometry, Text};
use inkroom_core::tools::{InteractionSession, ToolKind};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("Font error: {0}")]
    Font(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything a frame depends on.
pub struct RenderContext<'a> {
    /// Committed shapes.
    pub document: &'a Document,
    /// Currently selected tool.
    pub tool: ToolKind,
    /// In-progress gesture, if any.
    pub session: Option<&'a InteractionSession>,
    /// Background color.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Context for the committed document only.
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            tool: ToolKind::default(),
            session: None,
            background_color: Color::from_rgba8(255, 255, 255, 255),
        }
    }

    /// Set the active tool and its gesture.
    pub fn with_session(mut self, tool: ToolKind, session: Option<&'a InteractionSession>) -> Self {
        self.tool = tool;
        self.session = session;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

/// Paints committed shapes in document order, then the live preview with
/// the same per-shape routine.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    pub stroke: StrokeStyle,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a whole frame. The output depends only on `ctx`.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, ctx: &RenderContext) {
        surface.clear(ctx.background_color);

        for shape in ctx.document {
            self.paint_geometry(surface, shape.geometry());
        }

        // A session left over from another tool is never painted.
        if let Some(session) = ctx.session.filter(|s| s.tool() == ctx.tool) {
            if let Some(preview) = session.preview() {
                self.paint_geometry(surface, &preview);
            }
        }
    }

    /// Paint one shape.
    pub fn paint_geometry<S: Surface + ?Sized>(&self, surface: &mut S, geometry: &Geometry) {
        let style = &self.stroke;
        match geometry {
            Geometry::Pencil(p) => surface.stroke_path(&p.to_path(), style),
            Geometry::Rectangle(r) => surface.stroke_path(&r.to_path(), style),
            Geometry::Line(l) => surface.stroke_path(&l.to_path(), style),
            Geometry::Arrow(a) => {
                surface.stroke_path(&a.shaft_path(), style);
                surface.fill_path(&a.head_path(), style.color);
            }
            Geometry::Circle(c) => surface.stroke_path(&c.to_path(), style),
            Geometry::Text(t) => {
                surface.fill_text(&t.text, t.position(), Text::FONT_SIZE, style.color)
            }
        }
    }
}
