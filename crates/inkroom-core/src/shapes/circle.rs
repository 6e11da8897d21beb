//! Circle shape.

use crate::geometry::distance;
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An outlined circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(center: Point, r: f64) -> Self {
        Self {
            cx: center.x,
            cy: center.y,
            r,
        }
    }

    /// Circle centred on the drag start, passing through the current point.
    pub fn from_drag(center: Point, current: Point) -> Self {
        Self::new(center, distance(center, current))
    }

    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.cx - self.r,
            self.cy - self.r,
            self.cx + self.r,
            self.cy + self.r,
        )
    }

    pub fn to_path(&self) -> BezPath {
        KurboCircle::new(self.center(), self.r).to_path(0.1)
    }
}
