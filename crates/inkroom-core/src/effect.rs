//! Side effects requested by the engine and carried out by the host.

use crate::shapes::Shape;
use kurbo::Point;

/// Something the host must do after an engine call.
///
/// Engine operations never touch the network, storage or the screen
/// themselves; they return these instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Relay a locally committed shape to the other room participants.
    Broadcast(Shape),
    /// The document changed; repaint now.
    Redraw,
    /// A live preview changed; repaint on the next display frame.
    ScheduleFrame,
    /// Open a text prompt anchored at this canvas point.
    PromptText(Point),
}

/// Effects returned by a single engine call, in the order they should run.
pub type Effects = Vec<Effect>;
