//! Snapshot-based undo/redo over the live document.

use crate::document::Document;
use crate::effect::{Effect, Effects};
use crate::shapes::{Shape, ShapeError, ShapeId};

/// Owns the live [`Document`] and its undo/redo snapshots.
///
/// Every snapshot is an owned copy of the shape list, so mutating the live
/// document never reaches a stored state. Only local actions are recorded;
/// remote shapes and loads change the document without touching the stacks.
#[derive(Debug, Clone, Default)]
pub struct History {
    document: Document,
    /// Past states, most recent last.
    undo_stack: Vec<Document>,
    /// Future states, most recent last.
    redo_stack: Vec<Document>,
    /// Oldest snapshots are dropped beyond this depth.
    max_depth: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `max_depth` undo states.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Record the current state before a local change.
    fn push_undo(&mut self) {
        self.undo_stack.push(self.document.clone());
        self.redo_stack.clear();

        if let Some(max) = self.max_depth {
            while self.undo_stack.len() > max {
                self.undo_stack.remove(0);
            }
        }
    }

    /// Append a locally created shape.
    pub fn commit(&mut self, shape: Shape) -> Effects {
        self.push_undo();
        self.document.push(shape.clone());
        vec![Effect::Broadcast(shape), Effect::Redraw]
    }

    /// Remove a shape by id. Unknown ids change nothing.
    pub fn remove(&mut self, id: &ShapeId) -> Effects {
        if !self.document.contains(id) {
            log::debug!("remove: no shape {id}");
            return Vec::new();
        }
        self.push_undo();
        self.document.remove(id);
        vec![Effect::Redraw]
    }

    /// Step back one local action.
    pub fn undo(&mut self) -> Effects {
        let Some(previous) = self.undo_stack.pop() else {
            log::debug!("undo: nothing to undo");
            return Vec::new();
        };
        let current = std::mem::replace(&mut self.document, previous);
        self.redo_stack.push(current);
        vec![Effect::Redraw]
    }

    /// Re-apply the most recently undone action.
    pub fn redo(&mut self) -> Effects {
        let Some(next) = self.redo_stack.pop() else {
            log::debug!("redo: nothing to redo");
            return Vec::new();
        };
        let current = std::mem::replace(&mut self.document, next);
        self.undo_stack.push(current);
        vec![Effect::Redraw]
    }

    /// Append a shape that arrived from another participant.
    ///
    /// Invalid shapes and ids already present are dropped. The stacks are
    /// not touched.
    pub fn apply_remote(&mut self, shape: Shape) -> Result<Effects, ShapeError> {
        shape.validate()?;
        if self.document.contains(shape.id()) {
            log::warn!("apply_remote: duplicate shape id {}, dropped", shape.id());
            return Ok(Vec::new());
        }
        self.document.push(shape);
        Ok(vec![Effect::Redraw])
    }

    /// Replace the document wholesale after a load. The stacks are kept.
    pub fn set_document(&mut self, document: Document) -> Effects {
        self.document = document;
        vec![Effect::Redraw]
    }
}
