//! The whiteboard session: one document, its history and the active tool.

use crate::collaboration::{WireError, decode_event};
use crate::config::EngineConfig;
use crate::document::Document;
use crate::effect::{Effect, Effects};
use crate::export::SvgExporter;
use crate::frame::FrameScheduler;
use crate::history::History;
use crate::shapes::{Geometry, Shape, ShapeError};
use crate::shortcuts::{Command, ShortcutRegistry};
use crate::tools::{InteractionSession, ToolKind, ToolManager, ToolOutput};
use kurbo::Point;

/// A single drawing session.
///
/// Every call returns the [`Effect`]s the host must carry out, in order.
/// The board itself never touches the network, storage or a screen.
#[derive(Debug, Clone)]
pub struct Whiteboard {
    config: EngineConfig,
    history: History,
    tools: ToolManager,
    frames: FrameScheduler,
}

impl Default for Whiteboard {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Whiteboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut tools = ToolManager::new();
        tools.hit_tolerance = config.hit_tolerance;
        tools.min_sample_dist_sq = config.sample_threshold_sq;
        Self {
            history: History::with_max_depth(config.max_undo_depth),
            tools,
            frames: FrameScheduler::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The committed document, for rendering or a persistence write.
    pub fn document(&self) -> &Document {
        self.history.document()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool()
    }

    /// The in-progress gesture, if any.
    pub fn session(&self) -> Option<&InteractionSession> {
        self.tools.session()
    }

    /// Live preview geometry of the in-progress gesture.
    pub fn preview(&self) -> Option<Geometry> {
        self.tools.preview()
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frames.is_pending()
    }

    /// Select a tool. A gesture in progress is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) -> Effects {
        let was_active = self.tools.is_active();
        self.tools.set_tool(tool);
        self.clear_preview(was_active)
    }

    pub fn pointer_down(&mut self, point: Point) -> Effects {
        let output = self.tools.pointer_down(point, self.history.document());
        self.apply_output(output)
    }

    pub fn pointer_move(&mut self, point: Point) -> Effects {
        let output = self.tools.pointer_move(point);
        self.apply_output(output)
    }

    pub fn pointer_up(&mut self) -> Effects {
        let was_active = self.tools.is_active();
        let output = self.tools.pointer_up();
        self.finish_gesture(was_active, output)
    }

    /// The pointer left the canvas; an active gesture commits as on release.
    pub fn pointer_leave(&mut self) -> Effects {
        let was_active = self.tools.is_active();
        let output = self.tools.pointer_leave();
        self.finish_gesture(was_active, output)
    }

    /// Abandon the in-progress gesture without committing anything.
    pub fn cancel(&mut self) -> Effects {
        let was_active = self.tools.is_active();
        self.tools.cancel();
        self.clear_preview(was_active)
    }

    /// Resolve a text prompt opened by [`Effect::PromptText`].
    ///
    /// Blank or whitespace-only input commits nothing. The text is stored
    /// as given.
    pub fn submit_text(&mut self, position: Point, text: &str) -> Effects {
        if text.trim().is_empty() {
            log::debug!("text prompt resolved empty, nothing committed");
            return Vec::new();
        }
        self.history.commit(Shape::text(position, text))
    }

    pub fn undo(&mut self) -> Effects {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Effects {
        self.history.redo()
    }

    /// Append a shape received from another participant.
    pub fn apply_remote(&mut self, shape: Shape) -> Result<Effects, ShapeError> {
        self.history.apply_remote(shape).inspect_err(|e| {
            log::warn!("Dropped remote shape: {e}");
        })
    }

    /// Decode a raw broadcast event and append its shape.
    pub fn apply_broadcast(&mut self, json: &str) -> Result<Effects, WireError> {
        let event = decode_event(json).inspect_err(|e| {
            log::warn!("Dropped broadcast: {e}");
        })?;
        Ok(self.history.apply_remote(event.into_shape())?)
    }

    /// Replace the document after a load. Undo/redo stacks are kept, and a
    /// document with any invalid shape is rejected whole.
    pub fn set_document(&mut self, document: Document) -> Result<Effects, ShapeError> {
        for shape in &document {
            shape.validate()?;
        }
        Ok(self.history.set_document(document))
    }

    /// Run the command bound to a key press, if any.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool) -> Effects {
        match ShortcutRegistry::resolve(key, ctrl, shift) {
            Some(Command::Undo) => self.undo(),
            Some(Command::Redo) => self.redo(),
            Some(Command::Cancel) => self.cancel(),
            None => Vec::new(),
        }
    }

    /// The host painted the scheduled frame.
    pub fn frame_rendered(&mut self) {
        self.frames.frame_rendered();
    }

    /// SVG of the committed document at the configured export size.
    pub fn export_svg(&self) -> String {
        SvgExporter::new(self.config.export_width, self.config.export_height)
            .export(self.history.document())
    }

    fn apply_output(&mut self, output: ToolOutput) -> Effects {
        match output {
            ToolOutput::None => Vec::new(),
            ToolOutput::Preview => self.schedule_frame(),
            ToolOutput::Commit(shape) => self.history.commit(shape),
            ToolOutput::Erase(id) => self.history.remove(&id),
            ToolOutput::PromptText(point) => vec![Effect::PromptText(point)],
        }
    }

    fn finish_gesture(&mut self, was_active: bool, output: ToolOutput) -> Effects {
        match output {
            ToolOutput::None => self.clear_preview(was_active),
            other => self.apply_output(other),
        }
    }

    /// A preview that was on screen needs one more paint to disappear.
    fn clear_preview(&mut self, was_active: bool) -> Effects {
        if was_active { vec![Effect::Redraw] } else { Vec::new() }
    }

    fn schedule_frame(&mut self) -> Effects {
        if self.frames.request() {
            vec![Effect::ScheduleFrame]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaboration::encode_event;
    use crate::shapes::{Circle, Pencil, Rectangle, ShapeKind};

    fn drag(board: &mut Whiteboard, tool: ToolKind, from: Point, to: Point) -> Effects {
        board.set_tool(tool);
        board.pointer_down(from);
        board.pointer_move(to);
        board.pointer_up()
    }

    fn kinds(board: &Whiteboard) -> Vec<ShapeKind> {
        board.document().iter().map(Shape::kind).collect()
    }

    #[test]
    fn test_default_tool_is_pencil() {
        let board = Whiteboard::new();
        assert_eq!(board.current_tool(), ToolKind::Pencil);
        assert!(board.document().is_empty());
    }

    #[test]
    fn test_gesture_scenario_with_undo_redo() {
        let mut board = Whiteboard::new();
        drag(&mut board, ToolKind::Rectangle, Point::new(10.0, 10.0), Point::new(60.0, 40.0));
        drag(&mut board, ToolKind::Circle, Point::new(100.0, 100.0), Point::new(110.0, 100.0));
        let r1 = board.document().shapes()[0].clone();
        let c1 = board.document().shapes()[1].clone();
        assert_eq!(r1.geometry(), &Geometry::Rectangle(Rectangle::new(10.0, 10.0, 50.0, 30.0)));
        assert_eq!(c1.geometry(), &Geometry::Circle(Circle::new(Point::new(100.0, 100.0), 10.0)));

        board.undo();
        assert_eq!(board.document().shapes(), &[r1.clone()]);
        board.undo();
        assert!(board.document().is_empty());
        board.redo();
        assert_eq!(board.document().shapes(), &[r1.clone()]);
        board.redo();
        assert_eq!(board.document().shapes(), &[r1, c1]);
    }

    #[test]
    fn test_commit_broadcasts_only_the_new_shape() {
        let mut board = Whiteboard::new();
        drag(&mut board, ToolKind::Line, Point::ZERO, Point::new(5.0, 5.0));
        let effects = drag(&mut board, ToolKind::Arrow, Point::ZERO, Point::new(9.0, 0.0));

        let arrow = board.document().shapes()[1].clone();
        assert_eq!(effects, vec![Effect::Broadcast(arrow), Effect::Redraw]);
    }

    #[test]
    fn test_drag_previews_are_coalesced_per_frame() {
        let mut board = Whiteboard::new();
        board.set_tool(ToolKind::Rectangle);
        assert_eq!(board.pointer_down(Point::ZERO), vec![Effect::ScheduleFrame]);
        assert!(board.pointer_move(Point::new(5.0, 5.0)).is_empty());
        assert!(board.pointer_move(Point::new(9.0, 9.0)).is_empty());

        board.frame_rendered();
        assert_eq!(board.pointer_move(Point::new(12.0, 12.0)), vec![Effect::ScheduleFrame]);
        assert_eq!(
            board.preview(),
            Some(Geometry::Rectangle(Rectangle::new(0.0, 0.0, 12.0, 12.0)))
        );
    }

    #[test]
    fn test_pencil_minimum_length() {
        let mut board = Whiteboard::new();
        board.pointer_down(Point::new(1.0, 1.0));
        assert!(board.pointer_up().iter().all(|e| !matches!(e, Effect::Broadcast(_))));
        assert!(board.document().is_empty());

        board.pointer_down(Point::new(0.0, 0.0));
        board.pointer_move(Point::new(5.0, 0.0));
        board.pointer_move(Point::new(10.0, 0.0));
        board.pointer_up();
        assert_eq!(
            board.document().shapes()[0].geometry(),
            &Geometry::Pencil(Pencil::new(vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 0.0),
                Point::new(10.0, 0.0),
            ]))
        );
    }

    #[test]
    fn test_pencil_sampling_threshold() {
        let mut board = Whiteboard::new();
        board.pointer_down(Point::new(0.0, 0.0));
        board.pointer_move(Point::new(1.0, 1.0));
        board.pointer_move(Point::new(1.4, 1.4));
        board.pointer_move(Point::new(3.0, 0.0));
        board.pointer_up();

        let Geometry::Pencil(p) = board.document().shapes()[0].geometry() else {
            panic!("expected a pencil stroke");
        };
        for pair in p.points.windows(2) {
            let d = pair[1] - pair[0];
            assert!(d.hypot2() > 4.0);
        }
        assert_eq!(p.points, vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)]);
    }

    #[test]
    fn test_pointer_leave_commits() {
        let mut board = Whiteboard::new();
        board.set_tool(ToolKind::Line);
        board.pointer_down(Point::ZERO);
        board.pointer_move(Point::new(20.0, 0.0));
        let effects = board.pointer_leave();
        assert!(matches!(effects.first(), Some(Effect::Broadcast(_))));
        assert_eq!(kinds(&board), vec![ShapeKind::Line]);
        assert!(board.pointer_up().is_empty());
    }

    #[test]
    fn test_tool_switch_mid_gesture_abandons() {
        let mut board = Whiteboard::new();
        board.set_tool(ToolKind::Rectangle);
        board.pointer_down(Point::ZERO);
        board.pointer_move(Point::new(30.0, 30.0));

        assert_eq!(board.set_tool(ToolKind::Circle), vec![Effect::Redraw]);
        assert!(board.pointer_up().is_empty());
        assert!(board.document().is_empty());
        assert!(!board.history().can_undo());
    }

    #[test]
    fn test_escape_cancels_gesture() {
        let mut board = Whiteboard::new();
        board.pointer_down(Point::ZERO);
        board.pointer_move(Point::new(10.0, 10.0));
        assert_eq!(board.handle_key("Escape", false, false), vec![Effect::Redraw]);
        assert!(board.session().is_none());
        assert!(board.pointer_up().is_empty());
        assert!(board.document().is_empty());
    }

    #[test]
    fn test_keyboard_undo_redo() {
        let mut board = Whiteboard::new();
        drag(&mut board, ToolKind::Rectangle, Point::ZERO, Point::new(5.0, 5.0));
        board.handle_key("z", true, false);
        assert!(board.document().is_empty());
        board.handle_key("Z", true, true);
        assert_eq!(board.document().len(), 1);
        board.handle_key("z", true, false);
        board.handle_key("y", true, false);
        assert_eq!(board.document().len(), 1);
        assert!(board.handle_key("q", false, false).is_empty());
    }

    #[test]
    fn test_eraser_removes_topmost_and_is_undoable() {
        let mut board = Whiteboard::new();
        drag(&mut board, ToolKind::Rectangle, Point::ZERO, Point::new(100.0, 100.0));
        drag(&mut board, ToolKind::Rectangle, Point::new(50.0, 50.0), Point::new(150.0, 150.0));
        let bottom = board.document().shapes()[0].id().clone();

        board.set_tool(ToolKind::Eraser);
        assert_eq!(board.pointer_down(Point::new(75.0, 75.0)), vec![Effect::Redraw]);
        assert!(board.pointer_up().is_empty());
        let remaining: Vec<_> = board.document().iter().map(|s| s.id().clone()).collect();
        assert_eq!(remaining, vec![bottom]);

        board.undo();
        assert_eq!(board.document().len(), 2);
    }

    #[test]
    fn test_eraser_miss_changes_nothing() {
        let mut board = Whiteboard::new();
        drag(&mut board, ToolKind::Circle, Point::ZERO, Point::new(3.0, 4.0));
        board.set_tool(ToolKind::Eraser);
        assert!(board.pointer_down(Point::new(500.0, 500.0)).is_empty());
        assert_eq!(board.history().undo_len(), 1);
    }

    #[test]
    fn test_text_prompt_flow() {
        let mut board = Whiteboard::new();
        board.set_tool(ToolKind::Text);
        let at = Point::new(40.0, 80.0);
        assert_eq!(board.pointer_down(at), vec![Effect::PromptText(at)]);
        assert!(board.session().is_none());

        assert!(board.submit_text(at, "   ").is_empty());
        assert!(board.submit_text(at, "").is_empty());
        assert!(board.document().is_empty());

        let effects = board.submit_text(at, " hi ");
        assert_eq!(effects.len(), 2);
        match board.document().shapes()[0].geometry() {
            Geometry::Text(t) => assert_eq!(t.text, " hi "),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_remote_shape_mid_gesture() {
        let mut board = Whiteboard::new();
        board.set_tool(ToolKind::Line);
        board.pointer_down(Point::ZERO);
        board.pointer_move(Point::new(10.0, 10.0));

        let remote = Shape::circle(Point::new(50.0, 50.0), 5.0);
        assert_eq!(board.apply_remote(remote.clone()).unwrap(), vec![Effect::Redraw]);
        assert!(board.session().is_some());

        board.pointer_up();
        assert_eq!(kinds(&board), vec![ShapeKind::Circle, ShapeKind::Line]);

        // Undo reverts the local line only; the remote circle stays.
        board.undo();
        assert_eq!(board.document().shapes(), &[remote]);
    }

    #[test]
    fn test_apply_broadcast() {
        let mut sender = Whiteboard::new();
        let effects = drag(&mut sender, ToolKind::Arrow, Point::ZERO, Point::new(5.0, 5.0));
        let Some(Effect::Broadcast(shape)) = effects.first() else {
            panic!("expected a broadcast");
        };

        let mut receiver = Whiteboard::new();
        receiver.apply_broadcast(&encode_event(shape).unwrap()).unwrap();
        assert_eq!(receiver.document(), sender.document());
        assert!(!receiver.history().can_undo());

        assert!(receiver.apply_broadcast("{\"event\":\"ADD_SHAPE\"}").is_err());
        assert_eq!(receiver.document().len(), 1);
    }

    #[test]
    fn test_invalid_remote_is_dropped() {
        let mut board = Whiteboard::new();
        assert!(board.apply_remote(Shape::text(Point::ZERO, "")).is_err());
        assert!(board.document().is_empty());
    }

    #[test]
    fn test_set_document_rejects_invalid_and_keeps_current() {
        let mut board = Whiteboard::new();
        drag(&mut board, ToolKind::Rectangle, Point::ZERO, Point::new(5.0, 5.0));
        let before = board.document().clone();

        let mut bad = Document::new();
        bad.push(Shape::circle(Point::ZERO, -2.0));
        assert!(board.set_document(bad).is_err());
        assert_eq!(board.document(), &before);

        let mut loaded = Document::new();
        loaded.push(Shape::circle(Point::ZERO, 2.0));
        assert_eq!(board.set_document(loaded.clone()).unwrap(), vec![Effect::Redraw]);
        assert_eq!(board.document(), &loaded);
    }

    #[test]
    fn test_concurrent_commits_can_diverge_in_order() {
        // Broadcasts carry no sequence numbers, so two boards that receive
        // the same shapes in different orders keep different paint orders.
        let a = Shape::rectangle(0.0, 0.0, 10.0, 10.0);
        let b = Shape::rectangle(5.0, 5.0, 10.0, 10.0);

        let mut first = Whiteboard::new();
        first.apply_remote(a.clone()).unwrap();
        first.apply_remote(b.clone()).unwrap();

        let mut second = Whiteboard::new();
        second.apply_remote(b).unwrap();
        second.apply_remote(a).unwrap();

        assert_ne!(first.document(), second.document());
        assert_eq!(first.document().len(), second.document().len());
    }

    #[test]
    fn test_config_is_applied() {
        let config = EngineConfig {
            hit_tolerance: 0.0,
            max_undo_depth: Some(1),
            export_width: 640,
            export_height: 480,
            ..EngineConfig::default()
        };
        let mut board = Whiteboard::with_config(config);
        drag(&mut board, ToolKind::Line, Point::ZERO, Point::new(10.0, 0.0));
        drag(&mut board, ToolKind::Line, Point::ZERO, Point::new(0.0, 10.0));
        assert_eq!(board.history().undo_len(), 1);

        board.set_tool(ToolKind::Eraser);
        assert!(board.pointer_down(Point::new(5.0, 3.0)).is_empty());
        assert!(board.export_svg().contains("width=\"640\" height=\"480\""));
    }

    #[test]
    fn test_select_and_image_tools_do_nothing() {
        let mut board = Whiteboard::new();
        for tool in [ToolKind::Select, ToolKind::Image] {
            let effects = drag(&mut board, tool, Point::ZERO, Point::new(10.0, 10.0));
            assert!(effects.is_empty());
        }
        assert!(board.document().is_empty());
    }
}
