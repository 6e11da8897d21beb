//! In-memory storage implementation.

use super::{BoxFuture, DrawingRecord, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for tests and ephemeral rooms.
#[derive(Default)]
pub struct MemoryStorage {
    rooms: RwLock<HashMap<String, DrawingRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl Storage for MemoryStorage {
    fn save(&self, record: &DrawingRecord) -> BoxFuture<'_, StorageResult<()>> {
        let record = record.clone();
        Box::pin(async move {
            let mut rooms = self.rooms.write().map_err(lock_error)?;
            rooms.insert(record.room_id.clone(), record);
            Ok(())
        })
    }

    fn load(&self, room_id: &str) -> BoxFuture<'_, StorageResult<DrawingRecord>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let rooms = self.rooms.read().map_err(lock_error)?;
            rooms
                .get(&room_id)
                .cloned()
                .ok_or(StorageError::NotFound(room_id))
        })
    }

    fn delete(&self, room_id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let mut rooms = self.rooms.write().map_err(lock_error)?;
            rooms.remove(&room_id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let rooms = self.rooms.read().map_err(lock_error)?;
            Ok(rooms.keys().cloned().collect())
        })
    }

    fn exists(&self, room_id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let room_id = room_id.to_string();
        Box::pin(async move {
            let rooms = self.rooms.read().map_err(lock_error)?;
            Ok(rooms.contains_key(&room_id))
        })
    }
}
