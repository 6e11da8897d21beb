//! Shape definitions for the drawing board.

mod arrow;
mod circle;
mod line;
mod pencil;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use circle::Circle;
pub use line::Line;
pub use pencil::Pencil;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Structural problems that make a shape unsafe to render or export.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("shape id is empty")]
    EmptyId,
    #[error("{0} shape has a non-finite coordinate")]
    NonFinite(ShapeKind),
    #[error("pencil stroke needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("circle radius must not be negative, got {0}")]
    NegativeRadius(f64),
    #[error("text shape has no content")]
    EmptyText,
}

/// Unique, immutable handle of a committed shape.
///
/// Local shapes get a v4 UUID; remote and stored shapes may carry any
/// non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Generate a fresh id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ShapeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ShapeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Discriminant of a [`Geometry`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Pencil,
    Rectangle,
    Line,
    Arrow,
    Circle,
    Text,
}

impl ShapeKind {
    /// Every variant, in declaration order.
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Pencil,
        ShapeKind::Rectangle,
        ShapeKind::Line,
        ShapeKind::Arrow,
        ShapeKind::Circle,
        ShapeKind::Text,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Pencil => "pencil",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Circle => "circle",
            ShapeKind::Text => "text",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The drawable part of a shape, one variant per tool-produced primitive.
///
/// Serialized with an inline `"type"` tag so a shape reads as
/// `{"id": "…", "type": "rectangle", "x": 0, "y": 0, "w": 10, "h": 5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    Pencil(Pencil),
    Rectangle(Rectangle),
    Line(Line),
    Arrow(Arrow),
    Circle(Circle),
    Text(Text),
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Pencil(_) => ShapeKind::Pencil,
            Geometry::Rectangle(_) => ShapeKind::Rectangle,
            Geometry::Line(_) => ShapeKind::Line,
            Geometry::Arrow(_) => ShapeKind::Arrow,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Text(_) => ShapeKind::Text,
        }
    }

    /// Axis-aligned bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Pencil(p) => p.bounds(),
            Geometry::Rectangle(r) => r.normalized(),
            Geometry::Line(l) => Rect::from_points(l.start(), l.end()),
            Geometry::Arrow(a) => a.bounds(),
            Geometry::Circle(c) => c.bounds(),
            Geometry::Text(t) => t.bounds(),
        }
    }

    /// Check the per-variant field invariants.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let finite = |vals: &[f64]| vals.iter().all(|v| v.is_finite());
        let kind = self.kind();
        match self {
            Geometry::Pencil(p) => {
                if p.points.len() < 2 {
                    return Err(ShapeError::TooFewPoints(p.points.len()));
                }
                if !p.points.iter().all(|pt| finite(&[pt.x, pt.y])) {
                    return Err(ShapeError::NonFinite(kind));
                }
            }
            Geometry::Rectangle(r) => {
                if !finite(&[r.x, r.y, r.w, r.h]) {
                    return Err(ShapeError::NonFinite(kind));
                }
            }
            Geometry::Line(Line { x1, y1, x2, y2 }) | Geometry::Arrow(Arrow { x1, y1, x2, y2 }) => {
                if !finite(&[*x1, *y1, *x2, *y2]) {
                    return Err(ShapeError::NonFinite(kind));
                }
            }
            Geometry::Circle(c) => {
                if !finite(&[c.cx, c.cy, c.r]) {
                    return Err(ShapeError::NonFinite(kind));
                }
                if c.r < 0.0 {
                    return Err(ShapeError::NegativeRadius(c.r));
                }
            }
            Geometry::Text(t) => {
                if !finite(&[t.x, t.y]) {
                    return Err(ShapeError::NonFinite(kind));
                }
                if t.text.is_empty() {
                    return Err(ShapeError::EmptyText);
                }
            }
        }
        Ok(())
    }
}

/// A committed, uniquely identified drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    #[serde(flatten)]
    geometry: Geometry,
}

impl Shape {
    /// Create a shape with a freshly generated id.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: ShapeId::new(),
            geometry,
        }
    }

    /// Create a shape with a known id (remote payloads, storage, tests).
    pub fn with_id(id: impl Into<ShapeId>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }

    pub fn pencil(points: Vec<Point>) -> Self {
        Self::new(Geometry::Pencil(Pencil::new(points)))
    }

    pub fn rectangle(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(Geometry::Rectangle(Rectangle::new(x, y, w, h)))
    }

    pub fn line(start: Point, end: Point) -> Self {
        Self::new(Geometry::Line(Line::new(start, end)))
    }

    pub fn arrow(start: Point, end: Point) -> Self {
        Self::new(Geometry::Arrow(Arrow::new(start, end)))
    }

    pub fn circle(center: Point, r: f64) -> Self {
        Self::new(Geometry::Circle(Circle::new(center, r)))
    }

    pub fn text(position: Point, text: impl Into<String>) -> Self {
        Self::new(Geometry::Text(Text::new(position, text)))
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    /// Validate the id and the geometry invariants.
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.id.0.is_empty() {
            return Err(ShapeError::EmptyId);
        }
        self.geometry.validate()
    }
}
