//! Pure geometry helpers used by hit-testing, sampling and rendering.

use kurbo::{Point, Rect, Vec2};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Squared Euclidean distance between two points.
pub fn distance_sq(a: Point, b: Point) -> f64 {
    (b - a).hypot2()
}

/// Shortest distance from `point` to the segment `a`→`b`.
///
/// A degenerate segment (`a == b`) falls back to point-to-point distance.
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    distance(point, proj)
}

/// Minimum distance from a point to a polyline (consecutive segments).
///
/// Returns infinity for fewer than two points.
pub fn distance_to_polyline(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| distance_to_segment(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Build a rectangle from an origin and a possibly negative extent.
pub fn normalize_rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    // Rect::new keeps the corners as given; abs() orders them.
    Rect::new(x, y, x + w, y + h).abs()
}

/// Inclusive containment test. Works on unnormalized rects too.
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}
