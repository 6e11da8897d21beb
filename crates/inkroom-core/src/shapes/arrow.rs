//! Arrow shape.

use super::line::segment_path;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A line with a triangular head at its end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Arrow {
    /// Length of the head's sides.
    pub const HEAD_SIZE: f64 = 10.0;
    /// Half-angle between the shaft and each side of the head.
    pub const HEAD_ANGLE: f64 = PI / 6.0;

    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Shaft angle in radians, measured from start to end.
    pub fn angle(&self) -> f64 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    /// Head triangle: tip, then the two back corners.
    pub fn head(&self) -> [Point; 3] {
        let angle = self.angle();
        let tip = self.end();
        let corner = |a: f64| {
            Point::new(
                tip.x - Self::HEAD_SIZE * a.cos(),
                tip.y - Self::HEAD_SIZE * a.sin(),
            )
        };
        [tip, corner(angle - Self::HEAD_ANGLE), corner(angle + Self::HEAD_ANGLE)]
    }

    pub fn shaft_path(&self) -> BezPath {
        segment_path(self.start(), self.end())
    }

    /// Closed triangle path for the head.
    pub fn head_path(&self) -> BezPath {
        let [tip, left, right] = self.head();
        let mut path = BezPath::new();
        path.move_to(tip);
        path.line_to(left);
        path.line_to(right);
        path.close_path();
        path
    }

    pub fn bounds(&self) -> Rect {
        self.head()
            .iter()
            .fold(Rect::from_points(self.start(), self.end()), |acc, p| acc.union_pt(*p))
    }
}
