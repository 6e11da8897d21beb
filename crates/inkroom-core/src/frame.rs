//! Redraw coalescing for live previews.

/// Collapses any number of preview redraw requests into one pending frame.
///
/// The host asks for a frame when [`FrameScheduler::request`] returns
/// `true` and calls [`FrameScheduler::frame_rendered`] once it has painted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameScheduler {
    pending: bool,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a frame. Returns `true` only if none was pending.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// The host painted the pending frame.
    pub fn frame_rendered(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
