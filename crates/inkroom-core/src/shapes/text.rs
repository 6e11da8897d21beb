//! Text label.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A single-line text label anchored at its baseline start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

impl Text {
    /// Font size used by the renderer and the exporter.
    pub const FONT_SIZE: f64 = 16.0;
    /// Approximate advance per character for hit boxes.
    pub const AVG_CHAR_WIDTH: f64 = 8.0;
    /// Box height above the baseline.
    pub const LINE_HEIGHT: f64 = 16.0;
    pub const FONT_FAMILY: &'static str = "Inter, sans-serif";

    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            x: position.x,
            y: position.y,
            text: text.into(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Approximate box: extends right of the anchor and up from the baseline.
    pub fn bounds(&self) -> Rect {
        let width = self.text.chars().count() as f64 * Self::AVG_CHAR_WIDTH;
        Rect::new(self.x, self.y - Self::LINE_HEIGHT, self.x + width, self.y)
    }
}
