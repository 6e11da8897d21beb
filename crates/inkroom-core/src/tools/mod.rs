//! Tool system: turns pointer input into committed shapes.

use crate::document::Document;
use crate::geometry::distance_sq;
use crate::hit_test::{HIT_TOLERANCE, find_topmost_hit};
use crate::shapes::{Arrow, Circle, Geometry, Line, Pencil, Rectangle, Shape, ShapeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Squared distance a pencil sample must exceed to be kept.
pub const MIN_SAMPLE_DIST_SQ: f64 = 4.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    #[default]
    Pencil,
    Rectangle,
    Circle,
    Line,
    Arrow,
    Text,
    Eraser,
    /// Declared in the palette but does nothing yet.
    Image,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::Select,
        ToolKind::Pencil,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Text,
        ToolKind::Eraser,
        ToolKind::Image,
    ];

    /// Tools whose gesture is a drag that ends in a shape.
    pub fn is_drag_tool(self) -> bool {
        matches!(
            self,
            ToolKind::Pencil
                | ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Line
                | ToolKind::Arrow
        )
    }
}

/// In-progress geometry of one drag gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionSession {
    Pencil { points: Vec<Point> },
    Rectangle { start: Point, current: Point },
    Circle { center: Point, current: Point },
    Line { start: Point, current: Point },
    Arrow { start: Point, current: Point },
}

impl InteractionSession {
    /// Start a gesture for `tool` at `point`. `None` for non-drag tools.
    pub fn begin(tool: ToolKind, point: Point) -> Option<Self> {
        let session = match tool {
            ToolKind::Pencil => Self::Pencil {
                points: vec![point],
            },
            ToolKind::Rectangle => Self::Rectangle {
                start: point,
                current: point,
            },
            ToolKind::Circle => Self::Circle {
                center: point,
                current: point,
            },
            ToolKind::Line => Self::Line {
                start: point,
                current: point,
            },
            ToolKind::Arrow => Self::Arrow {
                start: point,
                current: point,
            },
            ToolKind::Select | ToolKind::Text | ToolKind::Eraser | ToolKind::Image => return None,
        };
        Some(session)
    }

    /// The tool that started this gesture.
    pub fn tool(&self) -> ToolKind {
        match self {
            Self::Pencil { .. } => ToolKind::Pencil,
            Self::Rectangle { .. } => ToolKind::Rectangle,
            Self::Circle { .. } => ToolKind::Circle,
            Self::Line { .. } => ToolKind::Line,
            Self::Arrow { .. } => ToolKind::Arrow,
        }
    }

    /// Feed a pointer position. Returns whether the preview changed.
    pub fn update(&mut self, point: Point, min_dist_sq: f64) -> bool {
        match self {
            Self::Pencil { points } => match points.last() {
                Some(last) if distance_sq(*last, point) <= min_dist_sq => false,
                _ => {
                    points.push(point);
                    true
                }
            },
            Self::Rectangle { current, .. }
            | Self::Circle { current, .. }
            | Self::Line { current, .. }
            | Self::Arrow { current, .. } => {
                *current = point;
                true
            }
        }
    }

    /// Geometry to paint while dragging, if there is anything to paint.
    pub fn preview(&self) -> Option<Geometry> {
        let geometry = match self {
            Self::Pencil { points } if points.len() < 2 => return None,
            Self::Pencil { points } => Geometry::Pencil(Pencil::new(points.clone())),
            Self::Rectangle { start, current } => {
                Geometry::Rectangle(Rectangle::from_drag(*start, *current))
            }
            Self::Circle { center, current } => Geometry::Circle(Circle::from_drag(*center, *current)),
            Self::Line { start, current } => Geometry::Line(Line::new(*start, *current)),
            Self::Arrow { start, current } => Geometry::Arrow(Arrow::new(*start, *current)),
        };
        Some(geometry)
    }

    /// Final geometry on release. A pencil gesture with a single sample
    /// yields nothing; zero-extent drags of the other tools still commit.
    pub fn finish(self) -> Option<Geometry> {
        match self {
            Self::Pencil { points } if points.len() < 2 => None,
            Self::Pencil { points } => Some(Geometry::Pencil(Pencil::new(points))),
            other => other.preview(),
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A drag gesture is in progress.
    Dragging(InteractionSession),
}

/// What a pointer event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Nothing to do.
    None,
    /// The live preview changed.
    Preview,
    /// A gesture finished with a new shape.
    Commit(Shape),
    /// The eraser hit this shape.
    Erase(ShapeId),
    /// The text tool wants a prompt at this point.
    PromptText(Point),
}

/// Manages the current tool and its gesture state.
#[derive(Debug, Clone)]
pub struct ToolManager {
    /// Currently selected tool.
    current_tool: ToolKind,
    /// Current state of the tool.
    state: ToolState,
    /// Pencil sampling threshold (squared canvas units).
    pub min_sample_dist_sq: f64,
    /// Eraser hit tolerance.
    pub hit_tolerance: f64,
}

impl Default for ToolManager {
    fn default() -> Self {
        Self {
            current_tool: ToolKind::default(),
            state: ToolState::Idle,
            min_sample_dist_sq: MIN_SAMPLE_DIST_SQ,
            hit_tolerance: HIT_TOLERANCE,
        }
    }
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    /// Select a tool. Switching away mid-drag abandons the gesture.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.current_tool {
            return;
        }
        if self.is_active() {
            log::debug!("tool switch to {tool:?} abandons {:?} gesture", self.current_tool);
        }
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Pointer pressed on the canvas.
    pub fn pointer_down(&mut self, point: Point, document: &Document) -> ToolOutput {
        // A press without a matching release starts over.
        self.state = ToolState::Idle;

        match self.current_tool {
            ToolKind::Eraser => match find_topmost_hit(document, point, self.hit_tolerance) {
                Some(shape) => ToolOutput::Erase(shape.id().clone()),
                None => ToolOutput::None,
            },
            ToolKind::Text => ToolOutput::PromptText(point),
            tool => match InteractionSession::begin(tool, point) {
                Some(session) => {
                    self.state = ToolState::Dragging(session);
                    ToolOutput::Preview
                }
                None => ToolOutput::None,
            },
        }
    }

    /// Pointer moved. Only meaningful while dragging.
    pub fn pointer_move(&mut self, point: Point) -> ToolOutput {
        match &mut self.state {
            ToolState::Dragging(session) => {
                if session.update(point, self.min_sample_dist_sq) {
                    ToolOutput::Preview
                } else {
                    ToolOutput::None
                }
            }
            _ => ToolOutput::None,
        }
    }

    /// Pointer released: finish the gesture.
    pub fn pointer_up(&mut self) -> ToolOutput {
        let ToolState::Dragging(session) = std::mem::take(&mut self.state) else {
            return ToolOutput::None;
        };
        // Stale sessions from a previous tool never commit.
        if session.tool() != self.current_tool {
            return ToolOutput::None;
        }
        match session.finish() {
            Some(geometry) => ToolOutput::Commit(Shape::new(geometry)),
            None => {
                log::debug!("gesture too short, nothing committed");
                ToolOutput::None
            }
        }
    }

    /// Pointer left the canvas; treated like a release.
    pub fn pointer_leave(&mut self) -> ToolOutput {
        self.pointer_up()
    }

    /// Abandon the current gesture without committing.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Dragging(_))
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        match &self.state {
            ToolState::Dragging(session) => Some(session),
            ToolState::Idle => None,
        }
    }

    /// Get the preview geometry for the current gesture.
    pub fn preview(&self) -> Option<Geometry> {
        self.session().and_then(InteractionSession::preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn committed(output: ToolOutput) -> Shape {
        match output {
            ToolOutput::Commit(shape) => shape,
            other => panic!("expected a commit, got {other:?}"),
        }
    }

    #[test]
    fn test_default_tool_is_pencil() {
        let tm = ToolManager::new();
        assert_eq!(tm.current_tool(), ToolKind::Pencil);
        assert!(!tm.is_active());
    }

    #[test]
    fn test_rectangle_interaction() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);

        assert_eq!(tm.pointer_down(Point::new(10.0, 10.0), &doc), ToolOutput::Preview);
        assert!(tm.is_active());
        assert_eq!(tm.pointer_move(Point::new(60.0, 40.0)), ToolOutput::Preview);
        assert_eq!(
            tm.preview(),
            Some(Geometry::Rectangle(Rectangle::new(10.0, 10.0, 50.0, 30.0)))
        );

        let shape = committed(tm.pointer_up());
        assert_eq!(
            shape.geometry(),
            &Geometry::Rectangle(Rectangle::new(10.0, 10.0, 50.0, 30.0))
        );
        assert!(!tm.is_active());
    }

    #[test]
    fn test_zero_extent_shapes_still_commit() {
        let doc = Document::new();
        for tool in [ToolKind::Rectangle, ToolKind::Circle, ToolKind::Line, ToolKind::Arrow] {
            let mut tm = ToolManager::new();
            tm.set_tool(tool);
            tm.pointer_down(Point::new(5.0, 5.0), &doc);
            let shape = committed(tm.pointer_up());
            match shape.geometry() {
                Geometry::Rectangle(r) => assert_eq!((r.w, r.h), (0.0, 0.0)),
                Geometry::Circle(c) => assert_eq!((c.cx, c.cy, c.r), (5.0, 5.0, 0.0)),
                Geometry::Line(l) => assert_eq!((l.x1, l.y1), (l.x2, l.y2)),
                Geometry::Arrow(a) => assert_eq!((a.x1, a.y1), (a.x2, a.y2)),
                other => panic!("unexpected {other:?} for {tool:?}"),
            }
        }
    }

    #[test]
    fn test_circle_radius_from_drag() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Circle);
        tm.pointer_down(Point::new(0.0, 0.0), &doc);
        tm.pointer_move(Point::new(6.0, 8.0));
        let shape = committed(tm.pointer_up());
        assert_eq!(shape.geometry(), &Geometry::Circle(Circle::new(Point::ZERO, 10.0)));
    }

    #[test]
    fn test_arrow_and_line_endpoints() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Arrow);
        tm.pointer_down(Point::new(1.0, 2.0), &doc);
        tm.pointer_move(Point::new(30.0, 40.0));
        let shape = committed(tm.pointer_leave());
        assert_eq!(
            shape.geometry(),
            &Geometry::Arrow(Arrow::new(Point::new(1.0, 2.0), Point::new(30.0, 40.0)))
        );

        tm.set_tool(ToolKind::Line);
        tm.pointer_down(Point::new(0.0, 0.0), &doc);
        tm.pointer_move(Point::new(3.0, 3.0));
        let shape = committed(tm.pointer_up());
        assert_eq!(shape.geometry(), &Geometry::Line(Line::new(Point::ZERO, Point::new(3.0, 3.0))));
    }

    #[test]
    fn test_single_point_pencil_commits_nothing() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.pointer_down(Point::new(0.0, 0.0), &doc);
        assert!(tm.preview().is_none());
        assert_eq!(tm.pointer_up(), ToolOutput::None);
        assert!(!tm.is_active());
    }

    #[test]
    fn test_pencil_sampling_threshold() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.pointer_down(Point::new(0.0, 0.0), &doc);
        // Exactly 4 squared units away: dropped.
        assert_eq!(tm.pointer_move(Point::new(2.0, 0.0)), ToolOutput::None);
        // Measured from the last kept sample, not the last event.
        assert_eq!(tm.pointer_move(Point::new(1.0, 1.0)), ToolOutput::None);
        assert_eq!(tm.pointer_move(Point::new(3.0, 0.0)), ToolOutput::Preview);
        assert_eq!(tm.pointer_move(Point::new(4.0, 0.0)), ToolOutput::None);
        assert_eq!(tm.pointer_move(Point::new(10.0, 0.0)), ToolOutput::Preview);

        let shape = committed(tm.pointer_up());
        assert_eq!(
            shape.geometry(),
            &Geometry::Pencil(Pencil::new(vec![
                Point::new(0.0, 0.0),
                Point::new(3.0, 0.0),
                Point::new(10.0, 0.0),
            ]))
        );
    }

    #[test]
    fn test_pencil_points_too_close_never_commit() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.pointer_down(Point::new(0.0, 0.0), &doc);
        tm.pointer_move(Point::new(1.0, 1.0));
        tm.pointer_move(Point::new(0.5, 1.5));
        assert_eq!(tm.pointer_up(), ToolOutput::None);
    }

    #[test]
    fn test_pointer_up_without_session_is_noop() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.pointer_up(), ToolOutput::None);
        assert_eq!(tm.pointer_up(), ToolOutput::None);
        assert_eq!(tm.pointer_move(Point::new(1.0, 1.0)), ToolOutput::None);
    }

    #[test]
    fn test_tool_switch_abandons_gesture() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);
        tm.pointer_down(Point::new(0.0, 0.0), &doc);
        tm.pointer_move(Point::new(50.0, 50.0));

        tm.set_tool(ToolKind::Circle);
        assert!(!tm.is_active());
        assert_eq!(tm.pointer_move(Point::new(60.0, 60.0)), ToolOutput::None);
        assert_eq!(tm.pointer_up(), ToolOutput::None);
    }

    #[test]
    fn test_cancel_interaction() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Line);
        tm.pointer_down(Point::new(0.0, 0.0), &doc);
        assert!(tm.is_active());

        tm.cancel();
        assert!(!tm.is_active());
        assert_eq!(tm.pointer_up(), ToolOutput::None);
    }

    #[test]
    fn test_eraser_hits_topmost() {
        let mut doc = Document::new();
        let below = Shape::rectangle(0.0, 0.0, 100.0, 100.0);
        let above = Shape::rectangle(50.0, 50.0, 100.0, 100.0);
        let above_id = above.id().clone();
        doc.push(below);
        doc.push(above);

        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Eraser);
        assert_eq!(tm.pointer_down(Point::new(75.0, 75.0), &doc), ToolOutput::Erase(above_id));
        assert!(!tm.is_active());
        assert_eq!(tm.pointer_down(Point::new(500.0, 500.0), &doc), ToolOutput::None);
    }

    #[test]
    fn test_text_tool_prompts_and_stays_idle() {
        let doc = Document::new();
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Text);
        assert_eq!(
            tm.pointer_down(Point::new(4.0, 5.0), &doc),
            ToolOutput::PromptText(Point::new(4.0, 5.0))
        );
        assert!(!tm.is_active());
        assert_eq!(tm.pointer_up(), ToolOutput::None);
    }

    #[test]
    fn test_select_and_image_are_noops() {
        let doc = Document::new();
        for tool in [ToolKind::Select, ToolKind::Image] {
            let mut tm = ToolManager::new();
            tm.set_tool(tool);
            assert_eq!(tm.pointer_down(Point::ZERO, &doc), ToolOutput::None);
            assert_eq!(tm.pointer_move(Point::new(9.0, 9.0)), ToolOutput::None);
            assert_eq!(tm.pointer_up(), ToolOutput::None);
        }
    }

    #[test]
    fn test_every_drag_tool_starts_a_session_of_its_own_kind() {
        for tool in ToolKind::ALL {
            match InteractionSession::begin(tool, Point::ZERO) {
                Some(session) => {
                    assert!(tool.is_drag_tool());
                    assert_eq!(session.tool(), tool);
                }
                None => assert!(!tool.is_drag_tool()),
            }
        }
    }
}
