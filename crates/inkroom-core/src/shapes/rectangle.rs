//! Rectangle shape.

use crate::geometry::normalize_rect;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An outlined rectangle.
///
/// `w` and `h` keep the drag direction and may be negative; use
/// [`Rectangle::normalized`] before measuring or drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle spanned by a drag from `start` to `current`.
    pub fn from_drag(start: Point, current: Point) -> Self {
        Self::new(start.x, start.y, current.x - start.x, current.y - start.y)
    }

    /// Bounds with non-negative width and height.
    pub fn normalized(&self) -> Rect {
        normalize_rect(self.x, self.y, self.w, self.h)
    }

    pub fn to_path(&self) -> BezPath {
        self.normalized().to_path(0.1)
    }
}
