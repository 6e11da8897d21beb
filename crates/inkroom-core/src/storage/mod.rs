//! Room persistence: one whole-document record per room.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::document::Document;
use crate::effect::Effects;
use crate::shapes::Shape;
use crate::whiteboard::Whiteboard;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Room used when the host does not pick one.
pub const DEFAULT_ROOM: &str = "demo-room";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Drawing not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future returned by storage backends.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persisted layout of a room: its id and the full ordered shape list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingRecord {
    pub room_id: String,
    pub shapes: Vec<Shape>,
}

impl DrawingRecord {
    pub fn new(room_id: impl Into<String>, document: &Document) -> Self {
        Self {
            room_id: room_id.into(),
            shapes: document.shapes().to_vec(),
        }
    }

    /// Convert into a document, rejecting invalid shapes.
    pub fn into_document(self) -> StorageResult<Document> {
        Document::from_shapes(self.shapes).map_err(|e| {
            StorageError::Serialization(format!("Invalid shape in room {}: {}", self.room_id, e))
        })
    }
}

/// Trait for room storage backends.
///
/// Writes are whole-document upserts keyed by room id; there is no
/// partial or delta persistence.
pub trait Storage: Send + Sync {
    /// Insert or replace the record for `record.room_id`.
    fn save(&self, record: &DrawingRecord) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a room's record.
    fn load(&self, room_id: &str) -> BoxFuture<'_, StorageResult<DrawingRecord>>;

    /// Delete a room's record.
    fn delete(&self, room_id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored room ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    /// Check if a room has a record.
    fn exists(&self, room_id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

/// Load a room into the board.
///
/// The board is only touched on success; on any failure it keeps its
/// current document.
pub async fn load_room(
    storage: &dyn Storage,
    room_id: &str,
    board: &mut Whiteboard,
) -> StorageResult<Effects> {
    let document = match storage.load(room_id).await.and_then(DrawingRecord::into_document) {
        Ok(document) => document,
        Err(e) => {
            log::warn!("Failed to load room {room_id}: {e}");
            return Err(e);
        }
    };
    log::info!("Loaded room {room_id} with {} shapes", document.len());
    board
        .set_document(document)
        .map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Upsert the board's current document for a room. Never mutates the board.
pub async fn save_room(storage: &dyn Storage, room_id: &str, board: &Whiteboard) -> StorageResult<()> {
    let record = DrawingRecord::new(room_id, board.document());
    let result = storage.save(&record).await;
    if let Err(e) = &result {
        log::warn!("Failed to save room {room_id}: {e}");
    }
    result
}

#[cfg(test)]
pub(crate) fn block_on<F: Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, Waker};

    let mut cx = Context::from_waker(Waker::noop());
    let mut f = std::pin::pin!(f);
    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
